//! Settings: platform credentials, notifications, password and account data.

use std::fmt::Write as _;

use axum::{
    Extension, Form, Router,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, header},
    response::{Html, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use tracing::info;

use super::components::{Tone, badge, empty_state, escape, options, stat_card, tabs};
use super::shell::{Nav, html_shell};
use super::{UiResult, Viewer, redirect, removal_header, with_flash};
use crate::AppState;
use crate::api::accounts::{ExportFormat, change_password, export_response, import_data, read_upload};
use crate::api::credentials::{add_credential, test_credential};
use crate::domain::account::{AccountImport, NotificationSettings, PasswordChange, WEEKDAYS};
use crate::domain::automation;
use crate::domain::credentials::{Credential, CredentialRequest, CredentialStatus, MASKED_PASSWORD};
use crate::error::ApiError;
use crate::security::middleware::TOKEN_COOKIE;
use crate::workspace::Workspace;

const PANEL: &str = "settings-panel";

const TABS: [(&str, &str); 4] = [
    ("credentials", "Platform Credentials"),
    ("notifications", "Notifications"),
    ("security", "Security"),
    ("data", "Data Management"),
];

const EMAIL_TOGGLES: [(&str, &str); 5] = [
    ("email.application_success", "Successful applications"),
    ("email.application_failure", "Failed applications"),
    ("email.daily_summary", "Daily summary"),
    ("email.weekly_report", "Weekly report"),
    ("email.system_updates", "System updates"),
];

const PUSH_TOGGLES: [(&str, &str); 4] = [
    ("push.application_success", "Successful applications"),
    ("push.application_failure", "Failed applications"),
    ("push.session_complete", "Automation session complete"),
    ("push.system_alerts", "System alerts"),
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(page))
        .route("/ui/settings/tab/{tab}", get(tab_fragment))
        .route("/ui/settings/credentials", post(create_credential))
        .route("/ui/settings/credentials/{id}", delete(remove_credential))
        .route("/ui/settings/credentials/{id}/toggle", post(toggle_credential))
        .route("/ui/settings/credentials/{id}/test", post(run_credential_test))
        .route("/ui/settings/notifications/toggle/{key}", post(toggle_notification))
        .route("/ui/settings/notifications/frequency", post(save_frequency))
        .route("/ui/settings/password", post(update_password))
        .route("/ui/settings/export", get(export))
        .route("/ui/settings/import", post(import))
        .route("/ui/settings/account", delete(delete_account))
}

#[derive(Debug, Deserialize)]
pub struct TabQuery {
    tab: Option<String>,
}

/// The add-credential form; the login may be an email or a username.
#[derive(Debug, Deserialize)]
pub struct CredentialForm {
    #[serde(default)]
    platform: String,
    #[serde(default)]
    login: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct FrequencyForm {
    daily_summary_time: String,
    weekly_report_day: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    format: ExportFormat,
}

// ─────────────────────────────────────────────────────────────────────────────
// Panels
// ─────────────────────────────────────────────────────────────────────────────

fn credential_tone(status: CredentialStatus) -> Tone {
    match status {
        CredentialStatus::Verified => Tone::Green,
        CredentialStatus::Failed => Tone::Red,
        CredentialStatus::Pending => Tone::Orange,
    }
}

fn credential_card(credential: &Credential) -> String {
    let id = escape(&credential.id);
    let tested = credential
        .last_tested
        .map_or_else(|| "Never tested".to_string(), |d| format!("Last tested {d}"));
    let (active_label, active_tone) = if credential.is_active {
        ("Active", Tone::Green)
    } else {
        ("Inactive", Tone::Gray)
    };
    format!(
        r##"<article class="card record">
    <header class="record-head">
        <h3>{name}</h3>
        {status}{active}
    </header>
    <p>{login} · <span class="muted">{MASKED_PASSWORD}</span></p>
    <p class="muted">{tested}</p>
    <div class="actions">
        <button class="btn btn-ghost" hx-post="/ui/settings/credentials/{id}/test" hx-target="#{PANEL}">Test</button>
        <button class="btn btn-ghost" hx-post="/ui/settings/credentials/{id}/toggle" hx-target="#{PANEL}">{toggle}</button>
        <button class="btn btn-ghost tone-red" hx-delete="/ui/settings/credentials/{id}" hx-target="#{PANEL}" hx-confirm="Remove these credentials?">Remove</button>
    </div>
</article>"##,
        name = escape(credential.platform_name()),
        status = badge(credential.status.as_str(), credential_tone(credential.status)),
        active = badge(active_label, active_tone),
        login = escape(credential.login()),
        toggle = if credential.is_active { "Deactivate" } else { "Activate" },
    )
}

fn credentials_panel(credentials: &[Credential]) -> String {
    let listed = if credentials.is_empty() {
        empty_state("No platform credentials stored yet.")
    } else {
        credentials.iter().map(credential_card).collect()
    };
    let platforms = options(
        automation::catalog()
            .iter()
            .filter(|p| !credentials.iter().any(|c| c.platform == p.id))
            .map(|p| (p.id, p.name)),
        "",
    );
    format!(
        r##"<section class="stack">
    <h2>Platform Credentials</h2>
    <p class="muted">Stored logins are used by automation sessions. Passwords are never shown again.</p>
    {listed}
    <form class="card grid-4" hx-post="/ui/settings/credentials" hx-target="#{PANEL}">
        <label class="field"><span>Platform</span><select name="platform" required>{platforms}</select></label>
        <label class="field"><span>Email or username</span><input type="text" name="login" required></label>
        <label class="field"><span>Password</span><input type="password" name="password" required></label>
        <button type="submit" class="btn btn-primary">Add Platform</button>
    </form>
</section>"##
    )
}

fn toggle_list(settings: &NotificationSettings, items: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (key, label) in items {
        let on = settings.enabled(key).unwrap_or(false);
        let mark = if on { " checked" } else { "" };
        let _ = write!(
            out,
            r##"<label class="check"><input type="checkbox"{mark} hx-post="/ui/settings/notifications/toggle/{key}" hx-target="#{PANEL}"> {label}</label>"##
        );
    }
    out
}

fn notifications_panel(settings: &NotificationSettings) -> String {
    let days = options(
        WEEKDAYS.iter().map(|d| (*d, *d)),
        &settings.frequency.weekly_report_day,
    );
    format!(
        r##"<section class="stack">
    <div class="grid-2">
        <fieldset class="card"><legend>Email</legend>{email}</fieldset>
        <fieldset class="card"><legend>Push</legend>{push}</fieldset>
    </div>
    <form class="card grid-3" hx-post="/ui/settings/notifications/frequency" hx-target="#{PANEL}">
        <label class="field"><span>Daily summary time</span><input type="time" name="daily_summary_time" value="{time}"></label>
        <label class="field"><span>Weekly report day</span><select name="weekly_report_day">{days}</select></label>
        <button type="submit" class="btn btn-primary">Save schedule</button>
    </form>
</section>"##,
        email = toggle_list(settings, &EMAIL_TOGGLES),
        push = toggle_list(settings, &PUSH_TOGGLES),
        time = escape(&settings.frequency.daily_summary_time),
    )
}

fn security_panel(viewer: &Viewer) -> String {
    if !viewer.signed_in {
        return format!(
            r#"<section class="card">{}<p><a href="/login" class="btn btn-primary">Sign in</a></p></section>"#,
            empty_state("Sign in to change your password.")
        );
    }
    format!(
        r##"<section class="card">
    <h2>Change Password</h2>
    <form class="stack" hx-post="/ui/settings/password" hx-target="#{PANEL}">
        <label class="field"><span>Current password</span><input type="password" name="current_password" required></label>
        <label class="field"><span>New password</span><input type="password" name="new_password" required></label>
        <label class="field"><span>Confirm new password</span><input type="password" name="confirm_password" required></label>
        <button type="submit" class="btn btn-primary">Update password</button>
    </form>
</section>"##
    )
}

fn data_panel(state: &AppState, viewer: &Viewer) -> UiResult<String> {
    let stats = state.store.data_stats(viewer.id())?;
    let cards = [
        stat_card("Applications", &stats.applications.to_string(), Tone::Blue, None),
        stat_card("Sessions", &stats.sessions.to_string(), Tone::Purple, None),
        stat_card("Credentials", &stats.credentials.to_string(), Tone::Green, None),
        stat_card(
            "Export Size",
            &format!("{:.1} KB", stats.total_size_bytes as f64 / 1024.0),
            Tone::Orange,
            None,
        ),
    ]
    .concat();
    let danger = if viewer.signed_in {
        r#"<button class="btn btn-danger" hx-delete="/ui/settings/account" hx-confirm="Delete your account and every record in it? This cannot be undone.">Delete account</button>"#
    } else {
        r#"<p class="muted">Sign in to delete an account.</p>"#
    };
    Ok(format!(
        r##"<section class="stack">
    <div class="grid-4">{cards}</div>
    <div class="card">
        <h2>Export</h2>
        <p class="muted">Download everything stored for your account.</p>
        <a class="btn btn-secondary" href="/ui/settings/export?format=json" download>Export JSON</a>
        <a class="btn btn-secondary" href="/ui/settings/export?format=yaml" download>Export YAML</a>
    </div>
    <div class="card">
        <h2>Import</h2>
        <p class="muted">Restore your profile and notification settings from an exported JSON or YAML file.</p>
        <form class="stack" hx-post="/ui/settings/import" hx-encoding="multipart/form-data" hx-target="#{PANEL}">
            <input type="file" name="file" accept=".json,.yaml,.yml" required>
            <button type="submit" class="btn btn-secondary">Import Data</button>
        </form>
    </div>
    <div class="card danger-zone">
        <h2>Danger Zone</h2>
        {danger}
    </div>
</section>"##
    ))
}

fn panel(state: &AppState, viewer: &Viewer, tab: &str) -> UiResult<String> {
    let body = match tab {
        "credentials" => credentials_panel(&state.store.credentials(viewer.id())),
        "notifications" => notifications_panel(&state.store.notifications(viewer.id())),
        "security" => security_panel(viewer),
        "data" => data_panel(state, viewer)?,
        other => return Err(ApiError::NotFound(format!("unknown settings tab `{other}`")).into()),
    };
    Ok(format!("{}{body}", tabs("/ui/settings/tab", PANEL, &TABS, tab)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /settings?tab=
async fn page(State(state): State<AppState>, viewer: Viewer, Query(query): Query<TabQuery>) -> UiResult {
    let current = panel(&state, &viewer, query.tab.as_deref().unwrap_or("credentials"))?;
    let content = format!(
        r#"<section class="page-head">
    <h1>Settings</h1>
    <p class="muted">Manage platform logins, notifications and your data.</p>
</section>
<div id="{PANEL}">{current}</div>"#
    );
    Ok(Html(html_shell("Settings", Nav::Settings, &viewer, &content)))
}

/// GET /ui/settings/tab/{tab}
async fn tab_fragment(State(state): State<AppState>, viewer: Viewer, Path(tab): Path<String>) -> UiResult {
    panel(&state, &viewer, &tab).map(Html)
}

/// POST /ui/settings/credentials
async fn create_credential(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<CredentialForm>,
) -> UiResult {
    viewer.require_sign_in("save credentials")?;
    let request = CredentialRequest {
        platform: form.platform,
        password: form.password,
        ..CredentialRequest::default()
    }
    .with_login(&form.login);
    let credential = add_credential(&state, viewer.id(), request)?;
    let html = panel(&state, &viewer, "credentials")?;
    Ok(with_flash(
        html,
        &format!("{} credentials saved", credential.platform_name()),
    ))
}

/// DELETE /ui/settings/credentials/{id}
async fn remove_credential(State(state): State<AppState>, viewer: Viewer, Path(id): Path<String>) -> UiResult {
    viewer.require_sign_in("manage credentials")?;
    state.store.remove_credential(viewer.id(), &id)?;
    panel(&state, &viewer, "credentials").map(Html)
}

/// POST /ui/settings/credentials/{id}/toggle
async fn toggle_credential(State(state): State<AppState>, viewer: Viewer, Path(id): Path<String>) -> UiResult {
    viewer.require_sign_in("manage credentials")?;
    state.store.toggle_credential(viewer.id(), &id)?;
    panel(&state, &viewer, "credentials").map(Html)
}

/// POST /ui/settings/credentials/{id}/test
async fn run_credential_test(State(state): State<AppState>, viewer: Viewer, Path(id): Path<String>) -> UiResult {
    viewer.require_sign_in("manage credentials")?;
    let outcome = test_credential(&state, viewer.id(), &id)?;
    let html = panel(&state, &viewer, "credentials")?;
    Ok(with_flash(html, &outcome.message))
}

/// POST /ui/settings/notifications/toggle/{key}
async fn toggle_notification(State(state): State<AppState>, viewer: Viewer, Path(key): Path<String>) -> UiResult {
    viewer.require_sign_in("change notifications")?;
    let mut settings = state.store.notifications(viewer.id());
    settings
        .toggle(&key)
        .ok_or_else(|| ApiError::NotFound(format!("unknown notification `{key}`")))?;
    state.store.set_notifications(viewer.id(), settings);
    panel(&state, &viewer, "notifications").map(Html)
}

/// POST /ui/settings/notifications/frequency
async fn save_frequency(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<FrequencyForm>,
) -> UiResult {
    viewer.require_sign_in("change notifications")?;
    let mut settings = state.store.notifications(viewer.id());
    settings.frequency.daily_summary_time = form.daily_summary_time;
    settings.frequency.weekly_report_day = form.weekly_report_day.to_lowercase();
    ApiError::check(settings.validate())?;
    state.store.set_notifications(viewer.id(), settings);
    let html = panel(&state, &viewer, "notifications")?;
    Ok(with_flash(html, "Notification schedule saved"))
}

/// POST /ui/settings/password
async fn update_password(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<PasswordChange>,
) -> UiResult {
    viewer.require_sign_in("change your password")?;
    change_password(&state, viewer.id(), &form)?;
    let html = panel(&state, &viewer, "security")?;
    Ok(with_flash(html, "Password updated"))
}

/// GET /ui/settings/export?format=json|yaml
async fn export(State(state): State<AppState>, viewer: Viewer, Query(query): Query<ExportQuery>) -> UiResult<Response> {
    let export = state.store.export(viewer.id())?;
    Ok(export_response(&export, query.format)?)
}

/// POST /ui/settings/import - Restore profile and notifications from an export file.
async fn import(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    mut multipart: Multipart,
) -> UiResult {
    viewer.require_sign_in("import data")?;
    let upload = read_upload(&mut multipart, "file").await?;
    let filename = upload.filename.as_deref().unwrap_or("import.json");
    let data = AccountImport::parse(filename, &upload.data).map_err(ApiError::BadRequest)?;
    let summary = import_data(&state, viewer.id(), data)?;
    workspace.reset_profile();

    let restored = match (summary.profile, summary.notifications) {
        (true, true) => "profile and notification settings",
        (true, false) => "profile",
        _ => "notification settings",
    };
    let html = panel(&state, &viewer, "data")?;
    Ok(with_flash(html, &format!("Imported {restored}")))
}

/// DELETE /ui/settings/account - Remove the account and sign out.
async fn delete_account(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    headers: HeaderMap,
) -> UiResult<Response> {
    viewer.require_sign_in("delete your account")?;
    if !state.store.delete_account(viewer.id()) {
        return Err(ApiError::NotFound("account not found".into()).into());
    }
    workspace.reset_profile();
    info!(name: "account.deleted", account_id = viewer.id(), "Account deleted from settings");

    let mut response = redirect(&headers, "/login");
    if let Some(cookie) = removal_header(TOKEN_COOKIE) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    Ok(response)
}
