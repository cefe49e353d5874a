use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};

use crate::AppState;
use crate::domain::analytics::{
    ApplicationSummary, CompanyJobAnalytics, DashboardReport, DashboardStats, daily_trend, job_analytics,
    platform_performance,
};
use crate::security::UserContext;
use crate::store::Store;

/// Days covered by the dashboard trend.
pub const TREND_DAYS: u32 = 7;

/// Entries shown under "Recent Activity".
pub const RECENT_ACTIVITY: usize = 5;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analytics/jobs/", get(api_job_analytics))
        .route("/analytics/dashboard/", get(api_dashboard))
}

/// Assemble the dashboard numbers for one account.
#[must_use]
pub fn dashboard_report(store: &Store, account_id: u64, now: DateTime<Utc>) -> DashboardReport {
    let applications = store.applications(account_id);
    let sessions = store.sessions(account_id);
    let summary = ApplicationSummary::from_statuses(applications.iter().map(|a| a.status));
    let platform_rows = store.application_platforms(account_id);

    DashboardReport {
        stats: DashboardStats::compute(&applications, &sessions),
        response_rate: summary.response_rate(),
        summary,
        trend: daily_trend(&applications, now.date_naive(), TREND_DAYS),
        platforms: platform_performance(platform_rows.iter().map(|(p, s)| (p.as_str(), *s))),
        recent_activity: store.activity(account_id, RECENT_ACTIVITY),
    }
}

/// GET /api/analytics/jobs/ - Per-company listing and application counts.
async fn api_job_analytics(State(state): State<AppState>) -> Json<Vec<CompanyJobAnalytics>> {
    let (companies, listings, applications) = state.store.job_records();
    Json(job_analytics(&companies, &listings, &applications))
}

/// GET /api/analytics/dashboard/
async fn api_dashboard(State(state): State<AppState>, user: UserContext) -> Json<DashboardReport> {
    Json(dashboard_report(&state.store, user.account_id, Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    #[test]
    fn demo_report_matches_seeded_records() {
        let store = Store::new();
        let id = seed::demo_data(&store, "hash".into()).unwrap();
        let report = dashboard_report(&store, id, Utc::now());

        assert_eq!(report.stats.total_applications, 6);
        assert_eq!(report.summary.pending, 1);
        assert_eq!(report.response_rate, 83.3);
        assert_eq!(report.trend.len(), TREND_DAYS as usize);
        assert_eq!(report.trend.iter().map(|p| p.applications).sum::<usize>(), 6);
        assert!(report.recent_activity.len() <= RECENT_ACTIVITY);
        assert_eq!(report.platforms[0].platform, "linkedin");
    }
}
