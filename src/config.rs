use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("hardhat")
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("hardhat")
        .join("config.json")
}

/// Client configuration: endpoints, login credentials, and local paths.
///
/// Defaults point at the production service with the account the original
/// client shipped with; a config file overrides any subset of fields.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub login_url: String,
    pub tasks_url: String,
    /// Pre-encoded Basic credential sent on the login request.
    pub api_auth: String,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
    pub data_dir: PathBuf,
    pub debug_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            login_url: "https://api.baubuddy.de/index.php/login".into(),
            tasks_url: "https://api.baubuddy.de/dev/index.php/v1/tasks/select".into(),
            api_auth: "QVBJX0V4cGxvcmVyOjEyMzQ1NmlzQUxhbWVQYXNz".into(),
            username: "365".into(),
            password: "1".into(),
            timeout_secs: 10,
            data_dir: default_data_dir(),
            debug_logging: false,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it is absent
    /// or unreadable.
    pub fn load() -> Self {
        match std::fs::read_to_string(config_path()) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed config file: {}", e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join("tasks.json")
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}
