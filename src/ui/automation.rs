use std::fmt::Write as _;

use axum::{
    Extension, Form, Router,
    extract::{Path, State},
    response::Html,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;

use super::components::{Tone, badge, empty_state, escape, stat_card};
use super::shell::{Nav, html_shell};
use super::{UiResult, Viewer, with_flash};
use crate::AppState;
use crate::api::automation::{start_session, transition};
use crate::domain::automation::{self, AutomationSession, AutomationSettings, MAX_APPLICATIONS_PER_DAY, SessionStatus};
use crate::editor::PlatformSelection;
use crate::error::ApiError;
use crate::store::SessionAction;
use crate::workspace::Workspace;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/automation", get(page))
        .route("/ui/automation/platforms/{id}", post(toggle_platform))
        .route("/ui/automation/settings/{field}", post(set_setting))
        .route("/ui/automation/start", post(start))
        .route("/ui/automation/sessions", get(sessions_fragment))
        .route("/ui/automation/sessions/{id}/stop", post(stop))
        .route("/ui/automation/sessions/{id}/resume", post(resume))
}

#[derive(Debug, Deserialize)]
pub struct FieldValue {
    #[serde(default)]
    value: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Fragments
// ─────────────────────────────────────────────────────────────────────────────

/// Platform cards. Inactive platforms render as "Coming Soon" and cannot be picked.
fn platform_selector(selection: &PlatformSelection) -> String {
    let mut out = String::new();
    for platform in automation::catalog() {
        let features: String = platform.features.iter().map(|f| badge(f, Tone::Gray)).collect();
        let (class, action, marker) = if !platform.is_active {
            ("card platform disabled", String::new(), badge("Coming Soon", Tone::Orange))
        } else if selection.contains(platform.id) {
            (
                "card platform selected",
                format!(r##"hx-post="/ui/automation/platforms/{}" hx-target="#platform-selector""##, platform.id),
                badge("Selected", Tone::Green),
            )
        } else {
            (
                "card platform",
                format!(r##"hx-post="/ui/automation/platforms/{}" hx-target="#platform-selector""##, platform.id),
                String::new(),
            )
        };
        let _ = write!(
            out,
            r#"<div class="{class}" {action}>
    <div class="platform-head"><span class="logo">{logo}</span><h3>{name}</h3>{marker}</div>
    <p class="muted">{description}</p>
    <div class="badges">{features}</div>
</div>"#,
            logo = platform.logo,
            name = escape(platform.name),
            description = escape(platform.description),
        );
    }
    out
}

fn settings_form(settings: &AutomationSettings) -> String {
    let check = |field: &str, label: &str, on: bool| {
        let mark = if on { " checked" } else { "" };
        let next = if on { "false" } else { "true" };
        format!(
            r##"<label class="check"><input type="checkbox"{mark} hx-post="/ui/automation/settings/{field}" hx-vals='{{"value":"{next}"}}' hx-target="#automation-settings"> {label}</label>"##
        )
    };
    format!(
        r#"{cover}
{responses}
<label class="field"><span>Max applications per day (1-{MAX_APPLICATIONS_PER_DAY})</span>
    <input type="number" name="value" min="1" max="{MAX_APPLICATIONS_PER_DAY}" value="{max}" hx-post="/ui/automation/settings/max_applications_per_day" hx-trigger="change" hx-swap="none">
</label>
<label class="field wide"><span>Custom instructions</span>
    <textarea name="value" rows="3" placeholder="e.g. Prefer remote roles, mention my open-source work" hx-post="/ui/automation/settings/custom_instructions" hx-trigger="change" hx-swap="none">{instructions}</textarea>
</label>"#,
        cover = check("use_ai_cover_letter", "Generate cover letters with AI", settings.use_ai_cover_letter),
        responses = check("use_ai_responses", "Answer screening questions with AI", settings.use_ai_responses),
        max = settings.max_applications_per_day,
        instructions = escape(&settings.custom_instructions),
    )
}

fn status_tone(status: SessionStatus) -> Tone {
    match status {
        SessionStatus::Running => Tone::Green,
        SessionStatus::Pending => Tone::Blue,
        SessionStatus::Paused => Tone::Orange,
        SessionStatus::Completed => Tone::Gray,
        SessionStatus::Failed => Tone::Red,
    }
}

fn session_row(session: &AutomationSession) -> String {
    let control = match session.status {
        SessionStatus::Running | SessionStatus::Pending => format!(
            r##"<button class="btn btn-ghost" hx-post="/ui/automation/sessions/{}/stop" hx-target="#sessions">Stop</button>"##,
            session.id
        ),
        SessionStatus::Paused => format!(
            r##"<button class="btn btn-secondary" hx-post="/ui/automation/sessions/{}/resume" hx-target="#sessions">Resume</button>"##,
            session.id
        ),
        SessionStatus::Completed | SessionStatus::Failed => String::new(),
    };
    format!(
        r#"<article class="card session">
    <header class="record-head">
        <h3>{platforms}</h3>
        {status}
        {control}
    </header>
    <p class="muted">Started {started} · {minutes} min</p>
    <p>{total} applied · {ok} successful · {failed} failed · {rate}% success</p>
</article>"#,
        platforms = escape(&session.platform_names().join(", ")),
        status = badge(session.status.as_str(), status_tone(session.status)),
        started = session.start_time.format("%Y-%m-%d %H:%M"),
        minutes = session.duration_minutes(Utc::now()),
        total = session.total_applications,
        ok = session.successful_applications,
        failed = session.failed_applications,
        rate = session.success_rate(),
    )
}

fn sessions_list(sessions: &[AutomationSession]) -> String {
    if sessions.is_empty() {
        return empty_state("No automation sessions yet.");
    }
    let running = sessions.iter().filter(|s| s.status == SessionStatus::Running).count();
    let total: u32 = sessions.iter().map(|s| s.total_applications).sum();
    let summary = [
        stat_card("Sessions", &sessions.len().to_string(), Tone::Blue, None),
        stat_card("Running", &running.to_string(), Tone::Green, None),
        stat_card("Applications Sent", &total.to_string(), Tone::Purple, None),
    ]
    .concat();
    let rows: String = sessions.iter().map(session_row).collect();
    format!(r#"<div class="grid-3">{summary}</div>{rows}"#)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /automation
async fn page(State(state): State<AppState>, viewer: Viewer, Extension(workspace): Extension<Workspace>) -> Html<String> {
    let (selector, settings) = workspace.with_automation(|draft| {
        (platform_selector(&draft.selection), settings_form(&draft.settings))
    });
    let sessions = sessions_list(&state.store.sessions(viewer.id()));

    let content = format!(
        r##"<section class="page-head">
    <h1>Automation Control</h1>
    <p class="muted">Choose platforms, tune the assistant and start applying.</p>
</section>

<section>
    <h2>Select Platforms</h2>
    <div id="platform-selector" class="grid-2">{selector}</div>
</section>

<section class="card">
    <h2>Automation Settings</h2>
    <div id="automation-settings" class="stack">{settings}</div>
    <div class="actions">
        <button class="btn btn-primary" hx-post="/ui/automation/start" hx-target="#sessions">Start Automation</button>
    </div>
</section>

<section>
    <h2>Sessions</h2>
    <div id="sessions" hx-get="/ui/automation/sessions" hx-trigger="every 30s">{sessions}</div>
</section>"##
    );
    Html(html_shell("Automation", Nav::Automation, &viewer, &content))
}

/// POST /ui/automation/platforms/{id} - Select or deselect a platform.
async fn toggle_platform(Extension(workspace): Extension<Workspace>, Path(id): Path<String>) -> UiResult {
    let html = workspace.with_automation(|draft| {
        draft.selection.toggle(&id)?;
        Ok::<_, ApiError>(platform_selector(&draft.selection))
    })?;
    Ok(Html(html))
}

/// POST /ui/automation/settings/{field}
async fn set_setting(
    Extension(workspace): Extension<Workspace>,
    Path(field): Path<String>,
    Form(form): Form<FieldValue>,
) -> UiResult {
    let html = workspace.with_automation(|draft| {
        draft.settings.set_field(&field, &form.value)?;
        Ok::<_, ApiError>(settings_form(&draft.settings))
    })?;
    Ok(Html(html))
}

/// POST /ui/automation/start - Start a session from the current selection.
async fn start(State(state): State<AppState>, viewer: Viewer, Extension(workspace): Extension<Workspace>) -> UiResult {
    viewer.require_sign_in("start automation")?;
    let request = workspace.with_automation(|draft| draft.start_request());
    if request.platform_ids.is_empty() {
        return Err(ApiError::BadRequest("Please select at least one platform".into()).into());
    }
    let session = start_session(&state, viewer.id(), request)?;
    let selector = workspace.with_automation(|draft| {
        draft.selection.clear();
        platform_selector(&draft.selection)
    });

    let fragment = format!(
        r#"{sessions}<div id="platform-selector" class="grid-2" hx-swap-oob="true">{selector}</div>"#,
        sessions = sessions_list(&state.store.sessions(viewer.id())),
    );
    Ok(with_flash(
        fragment,
        &format!("Automation started on {}", session.platform_names().join(", ")),
    ))
}

/// GET /ui/automation/sessions
async fn sessions_fragment(State(state): State<AppState>, viewer: Viewer) -> Html<String> {
    Html(sessions_list(&state.store.sessions(viewer.id())))
}

fn apply_action(state: &AppState, viewer: &Viewer, id: u64, action: SessionAction) -> UiResult {
    viewer.require_sign_in("manage sessions")?;
    transition(state, viewer.id(), id, action)?;
    Ok(Html(sessions_list(&state.store.sessions(viewer.id()))))
}

/// POST /ui/automation/sessions/{id}/stop
async fn stop(State(state): State<AppState>, viewer: Viewer, Path(id): Path<u64>) -> UiResult {
    apply_action(&state, &viewer, id, SessionAction::Stop)
}

/// POST /ui/automation/sessions/{id}/resume
async fn resume(State(state): State<AppState>, viewer: Viewer, Path(id): Path<u64>) -> UiResult {
    apply_action(&state, &viewer, id, SessionAction::Resume)
}
