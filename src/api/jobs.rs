use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use tracing::info;

use crate::AppState;
use crate::domain::jobs::{ApplicationRequest, ApplicationView, Company, ListingQuery, ListingView};
use crate::error::{ApiError, ApiResult};
use crate::security::UserContext;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs/listings/", get(api_listings))
        .route("/jobs/listings/{id}/", get(api_listing))
        .route("/jobs/applications/", post(api_apply))
        .route("/jobs/my-applications/", get(api_my_applications))
        .route("/jobs/companies/", get(api_companies))
}

/// GET /api/jobs/listings/ - Active listings, newest first.
async fn api_listings(State(state): State<AppState>, Query(query): Query<ListingQuery>) -> Json<Vec<ListingView>> {
    Json(state.store.listings(&query))
}

/// GET /api/jobs/listings/{id}/
async fn api_listing(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Json<ListingView>> {
    state
        .store
        .listing(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("job listing not found".into()))
}

/// POST /api/jobs/applications/ - Apply to a listing once.
async fn api_apply(
    State(state): State<AppState>,
    user: UserContext,
    Json(req): Json<ApplicationRequest>,
) -> ApiResult<(StatusCode, Json<ApplicationView>)> {
    let view = state.store.apply(user.account_id, req)?;
    info!(
        name: "job.applied",
        account_id = user.account_id,
        job_id = view.application.job_id,
        "Application submitted"
    );
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/jobs/my-applications/ - The caller's applications, newest first.
async fn api_my_applications(State(state): State<AppState>, user: UserContext) -> Json<Vec<ApplicationView>> {
    Json(state.store.application_views(user.account_id))
}

/// GET /api/jobs/companies/
async fn api_companies(State(state): State<AppState>) -> Json<Vec<Company>> {
    Json(state.store.companies())
}
