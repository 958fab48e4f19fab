use std::path::PathBuf;

use crate::core::task::Task;

/// Persisted copy of the last fetched task list.
///
/// The cache is a convenience, not a source of truth: a missing or corrupt
/// file reads as "no cache", and a failed save is logged and forgotten.
#[derive(Clone)]
pub struct TaskCache {
    path: PathBuf,
}

impl TaskCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the previously saved snapshot, if any.
    pub fn load(&self) -> Option<Vec<Task>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(tasks) => Some(tasks),
                Err(e) => {
                    log::warn!("Ignoring corrupt task cache: {}", e);
                    None
                }
            },
            Err(_) => None,
        }
    }

    /// Overwrite the snapshot with the given task list.
    pub fn save(&self, tasks: &[Task]) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create cache directory: {}", e);
                return;
            }
        }
        match serde_json::to_string_pretty(tasks) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    log::error!("Failed to save task cache: {}", e);
                }
            }
            Err(e) => log::error!("Failed to serialize task cache: {}", e),
        }
    }
}
