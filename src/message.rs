use crate::api::ApiError;
use crate::core::task::Task;

/// Everything the task list reacts to, delivered on the single loop that
/// owns its state.
#[derive(Debug)]
pub enum Message {
    /// App start: load the cache, then run the refresh chain.
    Start,
    /// Pull-to-refresh or an explicit reload request.
    Refresh,
    /// The search field changed.
    SearchChanged(String),
    /// A scanned code decoded successfully.
    CodeScanned(String),

    // Completions fed back by the runtime.
    CacheLoaded(Option<Vec<Task>>),
    LoginCompleted(Result<String, ApiError>),
    TokenStored,
    TasksFetched(Result<Vec<Task>, ApiError>),
}

/// Work the task list asks the runtime to perform.
///
/// `FetchTasks` deliberately carries no token: the runtime reads it back
/// from the credential store at send time, so the store stays the only
/// owner of the credential.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadCache,
    Login,
    StoreToken(String),
    FetchTasks,
    SaveCache(Vec<Task>),
}
