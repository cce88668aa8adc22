//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3017";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Root for `sessions/`, `loadouts.yaml` and `markup.json`.
    pub data_dir: PathBuf,
    /// Avatar name; when set, other players' globals and HoFs are dropped.
    pub player_name: Option<String>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            player_name: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(bind) = read("LOOTLEDGER_BIND") {
            config.bind_addr = bind;
        }
        if let Some(dir) = read("LOOTLEDGER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.player_name = read("LOOTLEDGER_PLAYER");
        if let Some(filter) = read("LOOTLEDGER_LOG").or_else(|| read("RUST_LOG")) {
            config.log_filter = filter;
        }
        config
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }

    pub fn loadouts_path(&self) -> PathBuf {
        self.data_dir.join("loadouts.yaml")
    }

    pub fn markup_path(&self) -> PathBuf {
        self.data_dir.join("markup.json")
    }
}
