//! JSON API mounted under `/api`.
//!
//! Paths keep their trailing slash; the SDK and the web client
//! address them that way.

pub mod accounts;
pub mod analytics;
pub mod automation;
pub mod credentials;
pub mod jobs;
pub mod profile;

use axum::Router;

use crate::AppState;

/// Build the `/api` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(accounts::router())
        .merge(jobs::router())
        .merge(analytics::router())
        .merge(automation::router())
        .merge(credentials::router())
        .merge(profile::router())
}
