use crate::core::task::Task;

/// Derive the visible subset of a snapshot for a search string.
///
/// Keeps tasks whose short name contains the query as a case-insensitive
/// substring, in snapshot order. An empty query returns the snapshot
/// unchanged. Text decoded from a scanned code goes through this exact
/// function, same as typed input.
pub fn filter_tasks(tasks: &[Task], query: &str) -> Vec<Task> {
    if query.is_empty() {
        return tasks.to_vec();
    }
    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|t| t.task.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
