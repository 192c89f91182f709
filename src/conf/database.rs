use std::time::Duration;

use serde::{Deserialize, Serialize};

const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    #[serde(default = "DatabaseConfig::default_path")]
    pub path: String,
    #[serde(
        with = "humantime_serde",
        default = "DatabaseConfig::default_busy_timeout"
    )]
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    fn default_path() -> String {
        String::from("restplate.db")
    }

    fn default_busy_timeout() -> Duration {
        Duration::from_secs(5)
    }

    pub fn in_memory() -> Self {
        Self {
            path: IN_MEMORY.to_string(),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            busy_timeout: Self::default_busy_timeout(),
        }
    }
}
