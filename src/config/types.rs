use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What overlapping `fetch_questions` runs do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchPolicy {
    /// A newer run makes older runs discard their results.
    #[default]
    Supersede,
    /// Every run replaces the collection; the last to resolve wins.
    LastWriterWins,
    /// A run started while another is in flight is refused.
    RejectWhilePending,
}

/// Question store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Overlapping fetch behaviour (default: supersede).
    #[serde(default)]
    pub fetch_policy: FetchPolicy,
    /// Number of committed actions kept in the action log (default: 256).
    #[serde(default = "default_action_log_capacity")]
    pub action_log_capacity: usize,
}

/// Question service settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// JSON file served by the fixture question service.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Log to this file (suffixed with timestamp and pid) instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_action_log_capacity() -> usize {
    256
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            fetch_policy: FetchPolicy::default(),
            action_log_capacity: default_action_log_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: None,
        }
    }
}
