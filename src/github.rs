//! GitHub search API client and response mapping.
//!
//! One synchronous-looking call: a single GET against `/search/repositories`
//! for the first page of results. No retry, no pagination, no rate-limit
//! backoff; upstream failures surface directly to the caller.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::GitHubConfig;
use crate::error::ServiceError;
use crate::models::Repository;

/// Top-level shape of a GitHub search response.
///
/// Items stay untyped here so a single malformed item can be dropped during
/// mapping without failing the whole page.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    /// Absent or null when the search matched nothing.
    pub items: Option<Vec<serde_json::Value>>,
}

/// One repository object as GitHub returns it.
#[derive(Debug, Deserialize)]
pub struct RepoItem {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<RepoOwner>,
    pub language: Option<String>,
    pub stargazers_count: Option<i64>,
    pub forks_count: Option<i64>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RepoOwner {
    pub login: Option<String>,
}

pub struct GitHubClient {
    http: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn new(http: reqwest::Client, config: GitHubConfig) -> Self {
        Self { http, config }
    }

    /// Fetch the first page of repository search results.
    ///
    /// `query` must already be transport-encoded (whitespace as `+`); it is
    /// spliced into the URL verbatim so GitHub sees `+` as a term separator.
    pub async fn search(
        &self,
        query: &str,
        sort: &str,
        order: &str,
        per_page: u32,
    ) -> Result<Vec<serde_json::Value>, ServiceError> {
        let url = format!(
            "{}/search/repositories?q={query}&sort={sort}&order={order}&per_page={per_page}",
            self.config.base_url
        );
        tracing::info!("GitHub API URL: {url}");

        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.config.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::info!("GitHub API response status: {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::GitHubApi { status, body });
        }

        let page: SearchPage = response.json().await?;
        let items = page.items.unwrap_or_default();
        if items.is_empty() {
            tracing::info!("No repositories found for query: {query}");
        }
        Ok(items)
    }
}

/// Convert one raw search item into a [`Repository`].
///
/// Returns `None` (after logging) when the item is structurally off: missing
/// or non-numeric id, a wrong-typed field, or a malformed `updated_at`.
/// Absent optional fields are tolerated; star/fork counts default to zero.
pub fn map_item(item: &serde_json::Value) -> Option<Repository> {
    let parsed: RepoItem = match serde_json::from_value(item.clone()) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("Error mapping repository item: {e}");
            return None;
        }
    };

    let last_updated = match parsed.updated_at.as_deref() {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!("Error mapping repository item {}: bad updated_at: {e}", parsed.id);
                return None;
            }
        },
        None => None,
    };

    Some(Repository {
        id: parsed.id,
        name: parsed.name,
        description: parsed.description,
        owner: parsed.owner.and_then(|o| o.login),
        language: parsed.language,
        stars: parsed.stargazers_count.unwrap_or(0),
        forks: parsed.forks_count.unwrap_or(0),
        last_updated,
    })
}
