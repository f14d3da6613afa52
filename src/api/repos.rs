use axum::extract::{Query, State};
use axum::Json;

use crate::error::ServiceError;
use crate::models::{RepositoriesResponse, RepositoryQuery};
use crate::state::AppState;

/// GET /api/github/repositories - Filtered, sorted view of stored records.
pub async fn list_repositories(
    State(state): State<AppState>,
    Query(params): Query<RepositoryQuery>,
) -> Result<Json<RepositoriesResponse>, ServiceError> {
    tracing::info!(
        "Getting repositories with filters - language: {:?}, minStars: {:?}, minForks: {:?}, name: {:?}, sortBy: {}, sortOrder: {}",
        params.language,
        params.min_stars,
        params.min_forks,
        params.name,
        params.sort_by,
        params.sort_order
    );

    let repositories = state.service.repositories_with_filters(
        params.language.as_deref(),
        params.min_stars,
        params.min_forks,
        params.name.as_deref(),
        &params.sort_by,
        &params.sort_order,
    )?;

    Ok(Json(RepositoriesResponse { repositories }))
}
