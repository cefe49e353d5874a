use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use tracing::info;

use crate::AppState;
use crate::domain::credentials::{Credential, CredentialRequest, CredentialTest};
use crate::editor::submit;
use crate::error::ApiResult;
use crate::security::UserContext;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/automation/credentials/", get(api_credentials).post(api_add_credential))
        .route("/automation/credentials/{id}/", delete(api_remove_credential))
        .route("/automation/credentials/{id}/toggle/", post(api_toggle_credential))
        .route("/automation/credentials/{id}/test/", post(api_test_credential))
}

/// Validate and store a platform login.
pub fn add_credential(state: &AppState, account_id: u64, req: CredentialRequest) -> ApiResult<Credential> {
    submit(&req, |_| ())?;
    let credential = state.store.add_credential(account_id, req)?;
    info!(
        name: "credential.added",
        account_id,
        platform = %credential.platform,
        "Platform credential added"
    );
    Ok(credential)
}

/// Queue a credential for verification.
///
/// No verification transport exists, so this only stamps the test date.
pub fn test_credential(state: &AppState, account_id: u64, id: &str) -> ApiResult<CredentialTest> {
    let credential = state.store.mark_credential_tested(account_id, id)?;
    let message = format!(
        "Verification of your {} login has been queued",
        credential.platform_name()
    );
    Ok(CredentialTest { credential, message })
}

/// GET /api/automation/credentials/ - Stored logins with masked passwords.
async fn api_credentials(State(state): State<AppState>, user: UserContext) -> Json<Vec<Credential>> {
    Json(state.store.credentials(user.account_id))
}

/// POST /api/automation/credentials/
async fn api_add_credential(
    State(state): State<AppState>,
    user: UserContext,
    Json(req): Json<CredentialRequest>,
) -> ApiResult<(StatusCode, Json<Credential>)> {
    let credential = add_credential(&state, user.account_id, req)?;
    Ok((StatusCode::CREATED, Json(credential)))
}

/// DELETE /api/automation/credentials/{id}/
async fn api_remove_credential(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.remove_credential(user.account_id, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/automation/credentials/{id}/toggle/ - Flip the active flag.
async fn api_toggle_credential(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Credential>> {
    Ok(Json(state.store.toggle_credential(user.account_id, &id)?))
}

/// POST /api/automation/credentials/{id}/test/
async fn api_test_credential(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<String>,
) -> ApiResult<Json<CredentialTest>> {
    test_credential(&state, user.account_id, &id).map(Json)
}
