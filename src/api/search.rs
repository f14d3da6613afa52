use axum::extract::State;
use axum::Json;

use crate::error::ServiceError;
use crate::models::{SearchRequest, SearchResponse};
use crate::state::AppState;

/// POST /api/github/search - Query GitHub, persist the results, return them.
pub async fn search_repositories(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ServiceError> {
    tracing::info!(
        "Searching repositories with query: {:?}, language: {:?}, sort: {:?}",
        req.query,
        req.language,
        req.sort
    );

    let repositories = state
        .service
        .search_and_save(req.query.as_deref(), req.language.as_deref(), req.sort.as_deref())
        .await?;

    Ok(Json(SearchResponse {
        message: "Repositories fetched and saved successfully".to_string(),
        repositories,
    }))
}
