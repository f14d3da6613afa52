use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::github::GitHubClient;
use crate::service::RepoService;
use crate::store::RepoStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub service: Arc<RepoService>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let store = Arc::new(RepoStore::open(&config.db_path())?);

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("repo-tracker/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(config.github.connect_timeout_secs))
            .timeout(Duration::from_secs(config.github.timeout_secs))
            .build()?;
        let github = GitHubClient::new(http_client, config.github.clone());

        Ok(Self {
            service: Arc::new(RepoService::new(store, github)),
            config,
        })
    }
}
