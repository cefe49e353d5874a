use std::fmt::Write as _;

use axum::{extract::State, response::Html};
use chrono::Utc;

use super::Viewer;
use super::components::{Tone, badge, empty_state, escape, stat_card};
use super::shell::{Nav, html_shell};
use crate::AppState;
use crate::api::analytics::dashboard_report;
use crate::domain::analytics::{
    CompanyJobAnalytics, PerformanceTier, PlatformPerformance, TrendPoint, job_analytics,
};
use crate::domain::automation::platform_name;
use crate::domain::jobs::{ApplicationStatus, ApplicationView};

/// Applications listed under "Recent Applications".
const RECENT_APPLICATIONS: usize = 5;

fn status_tone(status: ApplicationStatus) -> Tone {
    match status {
        ApplicationStatus::Pending => Tone::Gray,
        ApplicationStatus::Reviewing => Tone::Blue,
        ApplicationStatus::Interview => Tone::Purple,
        ApplicationStatus::Accepted => Tone::Green,
        ApplicationStatus::Rejected => Tone::Red,
    }
}

fn tier_tone(tier: PerformanceTier) -> Tone {
    match tier {
        PerformanceTier::High => Tone::Green,
        PerformanceTier::Medium => Tone::Orange,
        PerformanceTier::Low => Tone::Red,
    }
}

/// Bar chart of daily applications, scaled to the busiest day.
fn trend_chart(points: &[TrendPoint]) -> String {
    let peak = points.iter().map(|p| p.applications).max().unwrap_or(0).max(1);
    let mut out = String::from(r#"<div class="trend">"#);
    for point in points {
        let height = point.applications * 100 / peak;
        let _ = write!(
            out,
            r#"<div class="trend-col" title="{apps} applications, {ok} successful">
    <div class="trend-bar" style="height: {height}%"></div>
    <span class="muted">{day}</span>
</div>"#,
            apps = point.applications,
            ok = point.successful,
            day = point.date.format("%a"),
        );
    }
    out.push_str("</div>");
    out
}

fn platform_table(rows: &[PlatformPerformance]) -> String {
    if rows.is_empty() {
        return empty_state("No applications yet.");
    }
    let mut out = String::from(
        r#"<table class="table"><thead><tr><th>Platform</th><th>Applications</th><th>Successful</th><th>Success Rate</th><th>Performance</th></tr></thead><tbody>"#,
    );
    for row in rows {
        let _ = write!(
            out,
            "<tr><td>{logo} {name}</td><td>{apps}</td><td>{ok}</td><td>{rate:.1}%</td><td>{tier}</td></tr>",
            logo = row.logo,
            name = escape(&row.name),
            apps = row.applications,
            ok = row.successful,
            rate = row.success_rate,
            tier = badge(row.tier.as_str(), tier_tone(row.tier)),
        );
    }
    out.push_str("</tbody></table>");
    out
}

fn recent_applications(views: &[ApplicationView]) -> String {
    if views.is_empty() {
        return empty_state("You have not applied anywhere yet.");
    }
    let mut out = String::from(r#"<ul class="applications">"#);
    for view in views.iter().take(RECENT_APPLICATIONS) {
        let status = view.application.status;
        let _ = write!(
            out,
            r#"<li class="record-head">
    <div><strong>{title}</strong><p class="muted">{company} · {location} · {platform} · {date}</p></div>
    {badge}
</li>"#,
            title = escape(&view.job_title),
            company = escape(&view.company_name),
            location = escape(&view.location),
            platform = escape(platform_name(&view.platform)),
            date = view.application.applied_date.format("%Y-%m-%d"),
            badge = badge(status.label(), status_tone(status)),
        );
    }
    out.push_str("</ul>");
    out
}

fn company_table(rows: &[CompanyJobAnalytics]) -> String {
    if rows.is_empty() {
        return empty_state("No companies listed.");
    }
    let mut out = String::from(
        r#"<table class="table"><thead><tr><th>Company</th><th>Open Jobs</th><th>Applications</th><th>Avg. Salary</th><th>Top Requirements</th></tr></thead><tbody>"#,
    );
    for row in rows {
        let salary = row
            .average_salary
            .map_or_else(|| "—".to_string(), |s| format!("₹{s:.0}"));
        let reqs: String = row.top_requirements.iter().map(|r| badge(r, Tone::Gray)).collect();
        let _ = write!(
            out,
            "<tr><td>{company}</td><td>{active}/{total}</td><td>{apps}</td><td>{salary}</td><td>{reqs}</td></tr>",
            company = escape(&row.company),
            active = row.active_jobs,
            total = row.total_jobs,
            apps = row.total_applications,
        );
    }
    out.push_str("</tbody></table>");
    out
}

/// GET /analytics
pub async fn page(State(state): State<AppState>, viewer: Viewer) -> Html<String> {
    let report = dashboard_report(&state.store, viewer.id(), Utc::now());
    let views = state.store.application_views(viewer.id());
    let (companies, listings, applications) = state.store.job_records();
    let companies = job_analytics(&companies, &listings, &applications);
    let summary = &report.summary;

    let cards = [
        stat_card("Total Applications", &summary.total.to_string(), Tone::Blue, None),
        stat_card(
            "Success Rate",
            &format!("{:.1}%", summary.success_rate()),
            Tone::Green,
            Some(&format!("{} successful", summary.successful)),
        ),
        stat_card(
            "Response Rate",
            &format!("{:.1}%", report.response_rate),
            Tone::Purple,
            Some(&format!("{} responded", summary.responded)),
        ),
        stat_card("Pending", &summary.pending.to_string(), Tone::Orange, None),
    ]
    .concat();

    let content = format!(
        r#"<section class="page-head">
    <h1>Analytics</h1>
    <p class="muted">How your applications are doing across platforms and companies.</p>
</section>

<section class="grid-4">{cards}</section>

<div class="grid-2">
    <section class="card">
        <h2>Last 7 Days</h2>
        {trend}
    </section>
    <section class="card">
        <h2>Recent Applications</h2>
        {recent}
    </section>
</div>

<section class="card">
    <h2>Platform Performance</h2>
    {platforms}
</section>

<section class="card">
    <h2>Companies</h2>
    {companies}
</section>"#,
        trend = trend_chart(&report.trend),
        recent = recent_applications(&views),
        platforms = platform_table(&report.platforms),
        companies = company_table(&companies),
    );
    Html(html_shell("Analytics", Nav::Analytics, &viewer, &content))
}
