use std::fmt::Write as _;

use axum::{extract::State, response::Html};
use chrono::Utc;

use super::Viewer;
use super::components::{Tone, empty_state, escape, progress, stat_card};
use super::shell::{Nav, html_shell};
use crate::AppState;
use crate::api::analytics::dashboard_report;
use crate::domain::analytics::{ActivityEntry, ActivityStatus, DashboardStats, relative_time};
use crate::domain::automation::{AutomationSession, SessionStatus};

fn stats_cards(stats: &DashboardStats) -> String {
    [
        stat_card("Total Applications", &stats.total_applications.to_string(), Tone::Blue, None),
        stat_card(
            "Successful Applications",
            &stats.successful_applications.to_string(),
            Tone::Green,
            None,
        ),
        stat_card("Active Automations", &stats.active_automations.to_string(), Tone::Purple, None),
        stat_card("Success Rate", &format!("{:.1}%", stats.success_rate), Tone::Orange, None),
    ]
    .concat()
}

fn activity_tone(status: ActivityStatus) -> Tone {
    match status {
        ActivityStatus::Success => Tone::Green,
        ActivityStatus::Running => Tone::Blue,
        ActivityStatus::Failed => Tone::Red,
        ActivityStatus::Info => Tone::Gray,
    }
}

fn activity_list(entries: &[ActivityEntry]) -> String {
    if entries.is_empty() {
        return empty_state("No recent activity yet.");
    }
    let now = Utc::now();
    let mut out = String::from(r#"<ul class="activity">"#);
    for entry in entries {
        let _ = write!(
            out,
            r#"<li><span class="dot {tone}"></span><div><p>{title}</p><p class="muted">{when}</p></div></li>"#,
            tone = activity_tone(entry.status).class(),
            title = escape(&entry.title),
            when = relative_time(entry.timestamp, now),
        );
    }
    out.push_str("</ul>");
    out
}

fn running_sessions(sessions: &[AutomationSession]) -> String {
    let running: Vec<&AutomationSession> = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Running)
        .collect();
    if running.is_empty() {
        return empty_state("No automation running. Start one to apply while you sleep.");
    }
    let mut out = String::from(r#"<ul class="sessions">"#);
    for session in running {
        let _ = write!(
            out,
            r#"<li><strong>{}</strong> <span class="muted">{} applied · {}% success</span></li>"#,
            escape(&session.platform_names().join(", ")),
            session.total_applications,
            session.success_rate(),
        );
    }
    out.push_str("</ul>");
    out
}

const QUICK_ACTIONS: [(&str, &str, &str); 4] = [
    ("/automation", "Start Automation", "Pick platforms and let ApplyPilot apply"),
    ("/profile", "Update Profile", "Keep your details current"),
    ("/analytics", "View Analytics", "See how your applications perform"),
    ("/settings", "Add Platform", "Store login credentials for a job board"),
];

/// GET / - Dashboard.
pub async fn page(State(state): State<AppState>, viewer: Viewer) -> Html<String> {
    let report = dashboard_report(&state.store, viewer.id(), Utc::now());
    let sessions = state.store.sessions(viewer.id());
    let completion = state.store.profile(viewer.id()).unwrap_or_default().completion();

    let actions: String = QUICK_ACTIONS
        .iter()
        .map(|(href, title, note)| {
            format!(r#"<a class="card action" href="{href}" hx-boost="true"><strong>{title}</strong><span class="muted">{note}</span></a>"#)
        })
        .collect();

    let content = format!(
        r#"<section class="page-head">
    <h1>Welcome back, {name}!</h1>
    <p class="muted">Here is where your job search stands today.</p>
</section>

<section id="dashboard-stats" class="grid-4" hx-get="/ui/dashboard/stats" hx-trigger="every 30s" hx-swap="innerHTML">
    {stats}
</section>

<div class="grid-2">
    <section class="card">
        <h2>Recent Activity</h2>
        {activity}
    </section>
    <section class="card">
        <h2>Running Automations</h2>
        {sessions}
    </section>
</div>

<section>
    <h2>Quick Actions</h2>
    <div class="grid-4">{actions}</div>
</section>

<section class="card">
    <h2>Profile Completion</h2>
    {bar}
    <p class="muted">{completion}% complete. <a href="/profile">Finish your profile</a> to improve matches.</p>
</section>"#,
        name = escape(&viewer.account.first_name),
        stats = stats_cards(&report.stats),
        activity = activity_list(&report.recent_activity),
        sessions = running_sessions(&sessions),
        bar = progress(u32::from(completion)),
    );
    Html(html_shell("Dashboard", Nav::Dashboard, &viewer, &content))
}

/// GET /ui/dashboard/stats - Stat cards, polled by the dashboard.
pub async fn stats_fragment(State(state): State<AppState>, viewer: Viewer) -> Html<String> {
    let report = dashboard_report(&state.store, viewer.id(), Utc::now());
    Html(stats_cards(&report.stats))
}
