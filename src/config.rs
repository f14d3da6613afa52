use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the SQLite database is stored
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// GitHub API configuration
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Base URL for the GitHub REST API
    pub base_url: String,
    /// Personal access token; unauthenticated requests work but are rate-limited
    pub token: Option<String>,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Full-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:8080".to_string(),
            github: GitHubConfig::default(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            token: None,
            connect_timeout_secs: 10,
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("REPO_TRACKER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("REPO_TRACKER_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(url) = std::env::var("GITHUB_API_BASE_URL") {
            config.github.base_url = url;
        }
        if let Ok(token) = std::env::var("GITHUB_API_TOKEN") {
            if !token.is_empty() {
                config.github.token = Some(token);
            }
        }
        if let Ok(val) = std::env::var("GITHUB_API_CONNECT_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.github.connect_timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("GITHUB_API_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.github.timeout_secs = v;
            }
        }

        config
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("repositories.db")
    }
}
