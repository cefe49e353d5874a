use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::domain::account::{
    Account, AccountImport, AccountPatch, AccountProfile, ImportSummary, LoginRequest, NotificationSettings,
    PasswordChange, RegisterRequest,
};
use crate::domain::analytics::{ActivityKind, ActivityStatus};
use crate::domain::resume::{MAX_RESUME_BYTES, Resume, ResumeInfo};
use crate::editor::submit;
use crate::error::{ApiError, ApiResult};
use crate::security::password::{hash_password, verify_password};
use crate::security::{IssuedToken, UserContext};
use crate::store::{AccountExport, DataStats};

/// Resume size plus room for the multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_RESUME_BYTES + 64 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts/token/", post(api_token))
        .route("/accounts/register/", post(api_register))
        .route(
            "/accounts/profile/",
            get(api_get_profile).patch(api_patch_profile).delete(api_delete_account),
        )
        .route("/accounts/password/", post(api_change_password))
        .route(
            "/accounts/notifications/",
            get(api_get_notifications).put(api_put_notifications),
        )
        .route(
            "/accounts/resume/",
            post(api_upload_resume)
                .get(api_download_resume)
                .delete(api_delete_resume)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/accounts/export/", get(api_export))
        .route("/accounts/import/", post(api_import))
        .route("/accounts/data-stats/", get(api_data_stats))
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared with the HTML login and register forms
// ─────────────────────────────────────────────────────────────────────────────

/// Check credentials and issue an access token.
pub fn login(state: &AppState, request: &LoginRequest) -> ApiResult<(Account, IssuedToken)> {
    submit(request, |_| ())?;
    let account = state
        .store
        .find_by_username(&request.username)
        .filter(|account| verify_password(&request.password, &account.password_hash))
        .ok_or_else(|| ApiError::Unauthorized("invalid username or password".into()))?;

    let token = state.tokens.issue(&account).map_err(|e| ApiError::Internal(e.into()))?;
    state.store.log_activity(
        account.id,
        ActivityKind::Login,
        "Signed in".into(),
        ActivityStatus::Info,
    );
    info!(name: "account.login", account_id = account.id, "Account signed in");
    Ok((account, token))
}

/// Validate and create an account.
pub fn register(state: &AppState, request: &RegisterRequest) -> ApiResult<Account> {
    submit(request, |_| ())?;
    ApiError::check(request.validate())?;
    let hash = hash_password(&request.password)?;
    let account = state.store.register(request, hash)?;
    info!(name: "account.registered", account_id = account.id, "Account registered");
    Ok(account)
}

fn account_profile(state: &AppState, account_id: u64) -> ApiResult<AccountProfile> {
    let account = state.store.account(account_id).ok_or_else(|| ApiError::NotFound("account not found".into()))?;
    let profile = state.store.profile(account_id).unwrap_or_default();
    Ok(AccountProfile { account, profile })
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/accounts/token/ - Exchange username and password for a token.
async fn api_token(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> ApiResult<Json<IssuedToken>> {
    let (_, token) = login(&state, &req)?;
    Ok(Json(token))
}

/// POST /api/accounts/register/ - Create an account.
async fn api_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let account = register(&state, &req)?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /api/accounts/profile/ - Account fields and the full profile.
async fn api_get_profile(State(state): State<AppState>, user: UserContext) -> ApiResult<Json<AccountProfile>> {
    account_profile(&state, user.account_id).map(Json)
}

/// PATCH /api/accounts/profile/ - Partial account update; profile lists are replaced.
async fn api_patch_profile(
    State(state): State<AppState>,
    user: UserContext,
    Json(patch): Json<AccountPatch>,
) -> ApiResult<Json<AccountProfile>> {
    if let Some(profile) = &patch.profile {
        submit(profile, |_| ())?;
    }
    ApiError::check(patch.validate())?;
    let profile_changed = patch.profile.is_some();
    let (account, profile) = state.store.update_account(user.account_id, patch)?;
    if profile_changed {
        state.store.log_activity(
            user.account_id,
            ActivityKind::Profile,
            "Updated profile".into(),
            ActivityStatus::Success,
        );
    }
    Ok(Json(AccountProfile { account, profile }))
}

/// DELETE /api/accounts/profile/ - Remove the account and all of its records.
async fn api_delete_account(State(state): State<AppState>, user: UserContext) -> ApiResult<StatusCode> {
    if !state.store.delete_account(user.account_id) {
        return Err(ApiError::NotFound("account not found".into()));
    }
    info!(name: "account.deleted", account_id = user.account_id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/accounts/password/ - Change the password.
async fn api_change_password(
    State(state): State<AppState>,
    user: UserContext,
    Json(req): Json<PasswordChange>,
) -> ApiResult<StatusCode> {
    change_password(&state, user.account_id, &req)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn change_password(state: &AppState, account_id: u64, req: &PasswordChange) -> ApiResult<()> {
    submit(req, |_| ())?;
    ApiError::check(req.validate())?;
    let account = state.store.account(account_id).ok_or_else(|| ApiError::NotFound("account not found".into()))?;
    if !verify_password(&req.current_password, &account.password_hash) {
        return Err(ApiError::Validation(vec![crate::domain::FieldIssue::new(
            "current_password",
            "current password is incorrect",
        )]));
    }
    state.store.set_password_hash(account_id, hash_password(&req.new_password)?)?;
    info!(name: "account.password_changed", account_id, "Password changed");
    Ok(())
}

/// GET /api/accounts/notifications/
async fn api_get_notifications(State(state): State<AppState>, user: UserContext) -> Json<NotificationSettings> {
    Json(state.store.notifications(user.account_id))
}

/// PUT /api/accounts/notifications/ - Replace notification settings.
async fn api_put_notifications(
    State(state): State<AppState>,
    user: UserContext,
    Json(settings): Json<NotificationSettings>,
) -> ApiResult<Json<NotificationSettings>> {
    ApiError::check(settings.validate())?;
    state.store.set_notifications(user.account_id, settings.clone());
    Ok(Json(settings))
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(Debug, Deserialize)]
struct ExportQuery {
    #[serde(default)]
    format: ExportFormat,
}

/// Serialize an export as a downloadable attachment.
pub fn export_response(export: &AccountExport, format: ExportFormat) -> ApiResult<Response> {
    let (body, content_type, extension) = match format {
        ExportFormat::Json => (
            serde_json::to_string_pretty(export).map_err(anyhow::Error::from)?,
            "application/json",
            "json",
        ),
        ExportFormat::Yaml => (
            serde_yaml::to_string(export).map_err(anyhow::Error::from)?,
            "application/yaml",
            "yaml",
        ),
    };
    let disposition = format!(
        "attachment; filename=\"applypilot-export-{}.{extension}\"",
        export.exported_at.format("%Y-%m-%d")
    );
    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).map_err(anyhow::Error::from)?,
    );
    Ok(response)
}

/// GET /api/accounts/export/?format=json|yaml - Download all account data.
async fn api_export(
    State(state): State<AppState>,
    user: UserContext,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let export = state.store.export(user.account_id)?;
    export_response(&export, query.format)
}

/// GET /api/accounts/data-stats/ - Record counts and export size.
async fn api_data_stats(State(state): State<AppState>, user: UserContext) -> ApiResult<Json<DataStats>> {
    Ok(Json(state.store.data_stats(user.account_id)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Resume & import
// ─────────────────────────────────────────────────────────────────────────────

/// One file read from a multipart form.
#[derive(Debug, Default)]
pub struct Upload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Read the multipart field called `name`, skipping any others.
pub async fn read_upload(multipart: &mut Multipart, name: &str) -> ApiResult<Upload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(name) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?.to_vec();
        return Ok(Upload {
            filename,
            content_type,
            data,
        });
    }
    Err(ApiError::BadRequest(format!("missing `{name}` file")))
}

/// Validate and store an uploaded resume.
pub fn save_resume(state: &AppState, account_id: u64, upload: Upload) -> ApiResult<ResumeInfo> {
    let resume = Resume::new(upload.filename.as_deref(), upload.content_type.as_deref(), upload.data)
        .map_err(ApiError::Validation)?;
    let info = state.store.set_resume(account_id, resume)?;
    state.store.log_activity(
        account_id,
        ActivityKind::Profile,
        format!("Uploaded resume {}", info.filename),
        ActivityStatus::Success,
    );
    info!(name: "resume.uploaded", account_id, size = info.size_bytes, "Resume uploaded");
    Ok(info)
}

/// Validate the imported sections, then apply them.
pub fn import_data(state: &AppState, account_id: u64, import: AccountImport) -> ApiResult<ImportSummary> {
    if import.is_empty() {
        return Err(ApiError::BadRequest(
            "nothing to import: expected `profile` or `notifications`".into(),
        ));
    }
    if let Some(profile) = &import.profile {
        submit(profile, |_| ())?;
        ApiError::check(profile.validate())?;
    }
    if let Some(settings) = &import.notifications {
        ApiError::check(settings.validate())?;
    }
    let summary = state.store.import(account_id, import)?;
    state.store.log_activity(
        account_id,
        ActivityKind::Profile,
        "Imported data".into(),
        ActivityStatus::Success,
    );
    info!(
        name: "account.imported",
        account_id,
        profile = summary.profile,
        notifications = summary.notifications,
        "Account data imported"
    );
    Ok(summary)
}

/// POST /api/accounts/resume/ - Multipart upload in the `resume` field.
async fn api_upload_resume(
    State(state): State<AppState>,
    user: UserContext,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ResumeInfo>)> {
    let upload = read_upload(&mut multipart, "resume").await?;
    let info = save_resume(&state, user.account_id, upload)?;
    Ok((StatusCode::CREATED, Json(info)))
}

/// Serve a stored resume as a download.
pub fn resume_response(resume: Resume) -> ApiResult<Response> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", resume.info.filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    let content_type = HeaderValue::from_str(&resume.info.content_type).map_err(anyhow::Error::from)?;
    let mut response = resume.data.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok(response)
}

/// GET /api/accounts/resume/ - Download the stored file.
async fn api_download_resume(State(state): State<AppState>, user: UserContext) -> ApiResult<Response> {
    let resume = state
        .store
        .resume(user.account_id)
        .ok_or_else(|| ApiError::NotFound("no resume uploaded".into()))?;
    resume_response(resume)
}

/// DELETE /api/accounts/resume/
async fn api_delete_resume(State(state): State<AppState>, user: UserContext) -> ApiResult<StatusCode> {
    state.store.remove_resume(user.account_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/accounts/import/ - Restore profile and notifications from an export.
async fn api_import(
    State(state): State<AppState>,
    user: UserContext,
    Json(import): Json<AccountImport>,
) -> ApiResult<Json<ImportSummary>> {
    import_data(&state, user.account_id, import).map(Json)
}
