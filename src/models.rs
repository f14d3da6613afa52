use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// A stored snapshot of one GitHub repository's metadata.
///
/// Keyed by the GitHub-assigned numeric `id`; re-saving a record with an
/// existing id overwrites all other fields (upsert semantics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Login of the owning user or organization.
    pub owner: Option<String>,
    pub language: Option<String>,
    pub stars: i64,
    pub forks: i64,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Field a repository list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Stars,
    Forks,
    Updated,
    Name,
}

impl SortKey {
    /// Parse a sort key, case-insensitively.
    pub fn parse(s: &str) -> Result<Self, ServiceError> {
        match s.to_lowercase().as_str() {
            "stars" => Ok(SortKey::Stars),
            "forks" => Ok(SortKey::Forks),
            "updated" => Ok(SortKey::Updated),
            "name" => Ok(SortKey::Name),
            _ => Err(ServiceError::InvalidArgument(
                "Invalid sort option. Must be one of: stars, forks, updated, name".to_string(),
            )),
        }
    }

    /// Canonical lowercase form, as sent to the GitHub API.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Stars => "stars",
            SortKey::Forks => "forks",
            SortKey::Updated => "updated",
            SortKey::Name => "name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Result<Self, ServiceError> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ServiceError::InvalidArgument(
                "Invalid sort order. Must be 'asc' or 'desc'".to_string(),
            )),
        }
    }
}

/// POST /api/github/search request body
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub language: Option<String>,
    pub sort: Option<String>,
}

/// POST /api/github/search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub message: String,
    pub repositories: Vec<Repository>,
}

/// GET /api/github/repositories query parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryQuery {
    pub language: Option<String>,
    pub min_stars: Option<i64>,
    pub min_forks: Option<i64>,
    /// Case-insensitive substring match on the repository name.
    pub name: Option<String>,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
}

fn default_sort_by() -> String {
    "stars".to_string()
}

fn default_sort_order() -> String {
    "desc".to_string()
}

/// GET /api/github/repositories response
#[derive(Debug, Clone, Serialize)]
pub struct RepositoriesResponse {
    pub repositories: Vec<Repository>,
}
