use crate::core::filter::filter_tasks;
use crate::core::task::Task;
use crate::message::{Effect, Message};

/// Where the refresh chain currently stands, shown alongside the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus {
    Idle,
    LoadingCache,
    Authenticating,
    Fetching,
    /// Last successful refresh, formatted timestamp.
    Refreshed(String),
    Error(String),
}

impl Default for RefreshStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// The task list state machine.
///
/// `update` is synchronous: it mutates the list and returns the work the
/// runtime should perform. All completions come back as messages on the
/// same loop, so nothing the display reads is ever touched from another
/// thread.
#[derive(Default)]
pub struct TaskList {
    snapshot: Vec<Task>,
    query: String,
    visible: Vec<Task>,
    status: RefreshStatus,
    /// True while the snapshot still comes from the cache only.
    from_cache: bool,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full unfiltered snapshot, in server order.
    pub fn snapshot(&self) -> &[Task] {
        &self.snapshot
    }

    /// Current filtered view of the snapshot.
    pub fn visible(&self) -> &[Task] {
        &self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> &RefreshStatus {
        &self.status
    }

    /// Whether the current rows are stale cache contents.
    pub fn showing_cached(&self) -> bool {
        self.from_cache
    }

    /// A refresh chain is running; further triggers are ignored until it
    /// settles.
    pub fn is_refreshing(&self) -> bool {
        matches!(
            self.status,
            RefreshStatus::LoadingCache | RefreshStatus::Authenticating | RefreshStatus::Fetching
        )
    }

    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::Start => {
                self.status = RefreshStatus::LoadingCache;
                vec![Effect::LoadCache]
            }

            Message::CacheLoaded(cached) => {
                if let Some(tasks) = cached {
                    log::info!("Loaded {} tasks from cache", tasks.len());
                    self.replace_snapshot(tasks, true);
                }
                // Cached or not, go to the network for fresh data.
                self.status = RefreshStatus::Authenticating;
                vec![Effect::Login]
            }

            Message::Refresh => {
                if self.is_refreshing() {
                    log::debug!("Refresh ignored, a chain is already in flight");
                    return Vec::new();
                }
                self.status = RefreshStatus::Authenticating;
                vec![Effect::Login]
            }

            Message::LoginCompleted(Ok(token)) => vec![Effect::StoreToken(token)],

            Message::LoginCompleted(Err(e)) => {
                log::error!("Login failed: {}", e);
                self.status = RefreshStatus::Error(e.to_string());
                Vec::new()
            }

            Message::TokenStored => {
                self.status = RefreshStatus::Fetching;
                vec![Effect::FetchTasks]
            }

            Message::TasksFetched(Ok(tasks)) => {
                log::info!("Fetched {} tasks", tasks.len());
                self.replace_snapshot(tasks.clone(), false);
                let now = chrono::Local::now().format("%H:%M").to_string();
                self.status = RefreshStatus::Refreshed(now);
                vec![Effect::SaveCache(tasks)]
            }

            Message::TasksFetched(Err(e)) => {
                log::error!("Task fetch failed: {}", e);
                self.status = RefreshStatus::Error(e.to_string());
                Vec::new()
            }

            Message::SearchChanged(query) => {
                self.query = query;
                self.visible = filter_tasks(&self.snapshot, &self.query);
                Vec::new()
            }

            // A decoded code is search input, same path as typing.
            Message::CodeScanned(code) => self.update(Message::SearchChanged(code)),
        }
    }

    fn replace_snapshot(&mut self, tasks: Vec<Task>, from_cache: bool) {
        self.snapshot = tasks;
        self.from_cache = from_cache;
        self.visible = filter_tasks(&self.snapshot, &self.query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    fn named(name: &str) -> Task {
        Task {
            task: name.into(),
            title: String::new(),
            description: String::new(),
            color_code: String::new(),
        }
    }

    #[test]
    fn start_loads_cache_first() {
        let mut list = TaskList::new();
        let effects = list.update(Message::Start);
        assert_eq!(effects, vec![Effect::LoadCache]);
        assert_eq!(*list.status(), RefreshStatus::LoadingCache);
    }

    #[test]
    fn cache_hit_shows_rows_then_authenticates() {
        let mut list = TaskList::new();
        list.update(Message::Start);

        let effects = list.update(Message::CacheLoaded(Some(vec![named("a"), named("b")])));
        assert_eq!(effects, vec![Effect::Login]);
        assert_eq!(list.snapshot().len(), 2);
        assert_eq!(list.visible().len(), 2);
        assert!(list.showing_cached());
        assert_eq!(*list.status(), RefreshStatus::Authenticating);
    }

    #[test]
    fn cache_miss_still_authenticates() {
        let mut list = TaskList::new();
        list.update(Message::Start);

        let effects = list.update(Message::CacheLoaded(None));
        assert_eq!(effects, vec![Effect::Login]);
        assert!(list.snapshot().is_empty());
    }

    #[test]
    fn login_success_stores_token_then_fetches() {
        let mut list = TaskList::new();
        list.update(Message::Start);
        list.update(Message::CacheLoaded(None));

        let effects = list.update(Message::LoginCompleted(Ok("tok".into())));
        assert_eq!(effects, vec![Effect::StoreToken("tok".into())]);

        let effects = list.update(Message::TokenStored);
        assert_eq!(effects, vec![Effect::FetchTasks]);
        assert_eq!(*list.status(), RefreshStatus::Fetching);
    }

    #[test]
    fn login_failure_halts_the_chain_and_keeps_the_snapshot() {
        let mut list = TaskList::new();
        list.update(Message::Start);
        list.update(Message::CacheLoaded(Some(vec![named("cached")])));

        let effects = list.update(Message::LoginCompleted(Err(ApiError::Timeout(10))));
        assert!(effects.is_empty());
        assert!(matches!(list.status(), RefreshStatus::Error(_)));
        assert!(!list.is_refreshing());
        assert_eq!(list.snapshot().len(), 1);
        assert!(list.showing_cached());
    }

    #[test]
    fn fetch_success_replaces_snapshot_and_persists() {
        let mut list = TaskList::new();
        list.update(Message::Start);
        list.update(Message::CacheLoaded(Some(vec![named("stale")])));
        list.update(Message::LoginCompleted(Ok("tok".into())));
        list.update(Message::TokenStored);

        let fresh = vec![named("a"), named("b"), named("c")];
        let effects = list.update(Message::TasksFetched(Ok(fresh.clone())));
        assert_eq!(effects, vec![Effect::SaveCache(fresh)]);
        assert_eq!(list.snapshot().len(), 3);
        assert_eq!(list.visible().len(), 3);
        assert!(!list.showing_cached());
        assert!(matches!(list.status(), RefreshStatus::Refreshed(_)));
        assert!(!list.is_refreshing());
    }

    #[test]
    fn empty_fetch_overwrites_the_snapshot() {
        let mut list = TaskList::new();
        list.update(Message::Start);
        list.update(Message::CacheLoaded(Some(vec![named("stale")])));
        list.update(Message::LoginCompleted(Ok("tok".into())));
        list.update(Message::TokenStored);

        let effects = list.update(Message::TasksFetched(Ok(Vec::new())));
        assert_eq!(effects, vec![Effect::SaveCache(Vec::new())]);
        assert!(list.snapshot().is_empty());
        assert!(list.visible().is_empty());
    }

    #[test]
    fn fetch_failure_keeps_previous_rows_and_clears_the_indicator() {
        let mut list = TaskList::new();
        list.update(Message::Start);
        list.update(Message::CacheLoaded(Some(vec![named("a"), named("b")])));
        list.update(Message::LoginCompleted(Ok("tok".into())));
        list.update(Message::TokenStored);

        let effects = list.update(Message::TasksFetched(Err(ApiError::Network("down".into()))));
        assert!(effects.is_empty());
        assert_eq!(list.snapshot().len(), 2);
        assert!(!list.is_refreshing());
    }

    #[test]
    fn refresh_reruns_the_full_chain() {
        let mut list = TaskList::new();
        list.update(Message::Start);
        list.update(Message::CacheLoaded(None));
        list.update(Message::LoginCompleted(Ok("tok".into())));
        list.update(Message::TokenStored);
        list.update(Message::TasksFetched(Ok(Vec::new())));

        let effects = list.update(Message::Refresh);
        assert_eq!(effects, vec![Effect::Login]);
        assert_eq!(*list.status(), RefreshStatus::Authenticating);
    }

    #[test]
    fn refresh_is_ignored_while_a_chain_is_in_flight() {
        let mut list = TaskList::new();
        list.update(Message::Start);
        list.update(Message::CacheLoaded(None));
        assert_eq!(*list.status(), RefreshStatus::Authenticating);

        assert!(list.update(Message::Refresh).is_empty());
        assert_eq!(*list.status(), RefreshStatus::Authenticating);

        list.update(Message::LoginCompleted(Ok("tok".into())));
        list.update(Message::TokenStored);
        assert!(list.update(Message::Refresh).is_empty());
    }

    #[test]
    fn refresh_is_allowed_again_after_an_error() {
        let mut list = TaskList::new();
        list.update(Message::Start);
        list.update(Message::CacheLoaded(None));
        list.update(Message::LoginCompleted(Err(ApiError::Auth)));

        let effects = list.update(Message::Refresh);
        assert_eq!(effects, vec![Effect::Login]);
    }

    #[test]
    fn search_recomputes_the_visible_rows() {
        let mut list = TaskList::new();
        list.update(Message::Start);
        list.update(Message::CacheLoaded(Some(vec![named("foobar"), named("baz")])));

        list.update(Message::SearchChanged("FOO".into()));
        assert_eq!(list.visible().len(), 1);
        assert_eq!(list.visible()[0].task, "foobar");

        list.update(Message::SearchChanged(String::new()));
        assert_eq!(list.visible().len(), 2);
    }

    #[test]
    fn scanned_code_behaves_exactly_like_typed_search() {
        let mut list = TaskList::new();
        list.update(Message::Start);
        list.update(Message::CacheLoaded(Some(vec![named("foobar"), named("baz")])));

        list.update(Message::CodeScanned("foo".into()));
        assert_eq!(list.query(), "foo");
        assert_eq!(list.visible().len(), 1);
        assert_eq!(list.visible()[0].task, "foobar");
    }

    #[test]
    fn search_set_before_fetch_applies_to_the_fresh_snapshot() {
        let mut list = TaskList::new();
        list.update(Message::SearchChanged("ab".into()));
        list.update(Message::Start);
        list.update(Message::CacheLoaded(None));
        list.update(Message::LoginCompleted(Ok("tok".into())));
        list.update(Message::TokenStored);
        list.update(Message::TasksFetched(Ok(vec![named("abc"), named("xyz")])));

        assert_eq!(list.visible().len(), 1);
        assert_eq!(list.visible()[0].task, "abc");
    }
}
