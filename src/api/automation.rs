use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use tracing::info;

use crate::AppState;
use crate::domain::automation::{self, AutomationSession, Platform, SessionStats, StartSessionRequest};
use crate::editor::{selectable, submit};
use crate::error::{ApiError, ApiResult};
use crate::security::UserContext;
use crate::store::SessionAction;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/automation/platforms/", get(api_platforms))
        .route("/automation/sessions/", get(api_sessions))
        .route("/automation/sessions/start/", post(api_start_session))
        .route("/automation/sessions/{id}/stop/", post(api_stop_session))
        .route("/automation/sessions/{id}/resume/", post(api_resume_session))
        .route("/automation/sessions/{id}/stats/", get(api_session_stats))
}

/// Validate a start request and open the session.
pub fn start_session(state: &AppState, account_id: u64, req: StartSessionRequest) -> ApiResult<AutomationSession> {
    submit(&req, |_| ()).map_err(|_| ApiError::BadRequest("platform_ids are required".into()))?;
    for id in &req.platform_ids {
        selectable(id)?;
    }
    if !req.settings.is_valid() {
        return Err(ApiError::Validation(vec![crate::domain::FieldIssue::new(
            "max_applications_per_day",
            format!("must be between 1 and {}", automation::MAX_APPLICATIONS_PER_DAY),
        )]));
    }
    let session = state.store.start_session(account_id, req.platform_ids, req.settings)?;
    info!(
        name: "automation.started",
        account_id,
        session_id = session.id,
        platforms = ?session.platform_ids,
        "Automation session started"
    );
    Ok(session)
}

/// Stop or resume a session.
pub fn transition(state: &AppState, account_id: u64, id: u64, action: SessionAction) -> ApiResult<AutomationSession> {
    let session = state.store.transition_session(account_id, id, action)?;
    info!(
        name: "automation.transitioned",
        account_id,
        session_id = id,
        status = %session.status,
        "Automation session updated"
    );
    Ok(session)
}

/// GET /api/automation/platforms/ - The platform catalog.
async fn api_platforms() -> Json<&'static [Platform]> {
    Json(automation::catalog())
}

/// GET /api/automation/sessions/ - The caller's sessions, newest first.
async fn api_sessions(State(state): State<AppState>, user: UserContext) -> Json<Vec<AutomationSession>> {
    Json(state.store.sessions(user.account_id))
}

/// POST /api/automation/sessions/start/
async fn api_start_session(
    State(state): State<AppState>,
    user: UserContext,
    Json(req): Json<StartSessionRequest>,
) -> ApiResult<(StatusCode, Json<AutomationSession>)> {
    let session = start_session(&state, user.account_id, req)?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/automation/sessions/{id}/stop/
async fn api_stop_session(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<u64>,
) -> ApiResult<Json<AutomationSession>> {
    transition(&state, user.account_id, id, SessionAction::Stop).map(Json)
}

/// POST /api/automation/sessions/{id}/resume/
async fn api_resume_session(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<u64>,
) -> ApiResult<Json<AutomationSession>> {
    transition(&state, user.account_id, id, SessionAction::Resume).map(Json)
}

/// GET /api/automation/sessions/{id}/stats/
async fn api_session_stats(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<u64>,
) -> ApiResult<Json<SessionStats>> {
    let session = state
        .store
        .session(user.account_id, id)
        .ok_or_else(|| ApiError::NotFound("session not found".into()))?;
    Ok(Json(session.stats(Utc::now())))
}
