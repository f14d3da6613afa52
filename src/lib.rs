//! # repo-tracker
//!
//! A small web service that searches the GitHub repository API, persists
//! matching repository records in SQLite, and serves filtered/sorted views
//! of the stored records.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server and GitHub API
//! - [`models`] - `Repository` record, sort enums, request/response types
//! - [`error`] - Error taxonomy and translation to HTTP `{error, message}` bodies
//! - [`store`] - SQLite-backed record store with upsert-by-id and filtered queries
//! - [`github`] - GitHub search API client and per-item response mapping
//! - [`service`] - Validation, query building, and filter/sort orchestration
//! - [`api`] - Axum HTTP handlers for the two endpoints
//! - [`state`] - Shared application state wiring config, store, and client

pub mod api;
pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod service;
pub mod state;
pub mod store;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/github/search", post(api::search::search_repositories))
        .route("/api/github/repositories", get(api::repos::list_repositories))
        .with_state(state)
}
