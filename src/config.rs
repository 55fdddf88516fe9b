use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Watchmode API key
    pub watchmode_api_key: String,

    /// Watchmode API base URL, including the version segment
    #[serde(default = "default_watchmode_api_url")]
    pub watchmode_api_url: String,

    /// File backing the local watchlist and review storage
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// How long cached provider responses stay valid
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum entries per cache before the oldest half is evicted
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_watchmode_api_url() -> String {
    "https://api.watchmode.com/v1".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("cinelog.json")
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_max_entries() -> usize {
    100
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
