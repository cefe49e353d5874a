//! Aggregations behind the dashboard and analytics views.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use super::automation::{self, AutomationSession, SessionStatus};
use super::jobs::{Application, ApplicationStatus, Company, JobListing};

/// Percentage of `successful` in `total`; zero when there is nothing to count.
#[must_use]
pub fn success_rate(successful: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    successful as f64 / total as f64 * 100.0
}

/// [`success_rate`] rounded to a whole percentage.
#[must_use]
pub fn rounded_rate(successful: usize, total: usize) -> u32 {
    success_rate(successful, total).round() as u32
}

/// Round to one decimal place.
#[must_use]
pub fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    pub total: usize,
    pub pending: usize,
    pub reviewing: usize,
    pub interview: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub successful: usize,
    pub responded: usize,
}

impl ApplicationSummary {
    pub fn from_statuses(statuses: impl IntoIterator<Item = ApplicationStatus>) -> Self {
        let mut summary = Self::default();
        for status in statuses {
            summary.total += 1;
            match status {
                ApplicationStatus::Pending => summary.pending += 1,
                ApplicationStatus::Reviewing => summary.reviewing += 1,
                ApplicationStatus::Interview => summary.interview += 1,
                ApplicationStatus::Accepted => summary.accepted += 1,
                ApplicationStatus::Rejected => summary.rejected += 1,
            }
            if status.is_successful() {
                summary.successful += 1;
            }
            if status.is_responded() {
                summary.responded += 1;
            }
        }
        summary
    }

    #[must_use]
    pub fn success_rate(&self) -> f64 {
        one_decimal(success_rate(self.successful, self.total))
    }

    #[must_use]
    pub fn response_rate(&self) -> f64 {
        one_decimal(success_rate(self.responded, self.total))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_applications: usize,
    pub successful_applications: usize,
    pub active_automations: usize,
    /// One decimal place.
    pub success_rate: f64,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(applications: &[Application], sessions: &[AutomationSession]) -> Self {
        let summary = ApplicationSummary::from_statuses(applications.iter().map(|a| a.status));
        Self {
            total_applications: summary.total,
            successful_applications: summary.successful,
            active_automations: sessions
                .iter()
                .filter(|s| s.status == SessionStatus::Running)
                .count(),
            success_rate: summary.success_rate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub applications: usize,
    pub successful: usize,
}

/// Applications per day for the `days` days ending on `today`, oldest first.
#[must_use]
pub fn daily_trend(applications: &[Application], today: NaiveDate, days: u32) -> Vec<TrendPoint> {
    let days = i64::from(days.max(1));
    let first = today - Duration::days(days - 1);
    let mut buckets: BTreeMap<NaiveDate, TrendPoint> = (0..days)
        .map(|offset| {
            let date = first + Duration::days(offset);
            (
                date,
                TrendPoint {
                    date,
                    applications: 0,
                    successful: 0,
                },
            )
        })
        .collect();

    for app in applications {
        if let Some(point) = buckets.get_mut(&app.applied_date.date_naive()) {
            point.applications += 1;
            if app.status.is_successful() {
                point.successful += 1;
            }
        }
    }
    buckets.into_values().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    High,
    Medium,
    Low,
}

impl PerformanceTier {
    #[must_use]
    pub fn for_rate(rate: f64) -> Self {
        if rate >= 70.0 {
            Self::High
        } else if rate >= 60.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformPerformance {
    pub platform: String,
    pub name: String,
    pub logo: String,
    pub applications: usize,
    pub successful: usize,
    pub success_rate: f64,
    pub tier: PerformanceTier,
}

/// Per-platform totals from `(platform id, status)` pairs, best rate first.
pub fn platform_performance<'a>(
    rows: impl IntoIterator<Item = (&'a str, ApplicationStatus)>,
) -> Vec<PlatformPerformance> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (platform, status) in rows {
        let entry = counts.entry(platform).or_default();
        entry.0 += 1;
        if status.is_successful() {
            entry.1 += 1;
        }
    }

    let mut result: Vec<PlatformPerformance> = counts
        .into_iter()
        .map(|(platform, (applications, successful))| {
            let rate = one_decimal(success_rate(successful, applications));
            let (name, logo) = automation::platform(platform)
                .map_or((platform, "🌐"), |p| (p.name, p.logo));
            PlatformPerformance {
                platform: platform.to_string(),
                name: name.to_string(),
                logo: logo.to_string(),
                applications,
                successful,
                success_rate: rate,
                tier: PerformanceTier::for_rate(rate),
            }
        })
        .collect();
    result.sort_by(|a, b| {
        b.success_rate
            .total_cmp(&a.success_rate)
            .then_with(|| a.platform.cmp(&b.platform))
    });
    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyJobAnalytics {
    pub company_id: u64,
    pub company: String,
    pub total_jobs: usize,
    pub active_jobs: usize,
    pub total_applications: usize,
    pub average_salary: Option<f64>,
    pub top_requirements: Vec<String>,
}

/// How many requirement keywords to report per company.
const TOP_REQUIREMENTS: usize = 5;

/// Listing and application counts grouped by company, busiest first.
#[must_use]
pub fn job_analytics(
    companies: &[Company],
    listings: &[JobListing],
    applications: &[Application],
) -> Vec<CompanyJobAnalytics> {
    let mut per_job: HashMap<u64, usize> = HashMap::new();
    for app in applications {
        *per_job.entry(app.job_id).or_default() += 1;
    }

    let mut result: Vec<CompanyJobAnalytics> = companies
        .iter()
        .map(|company| {
            let jobs: Vec<&JobListing> = listings.iter().filter(|l| l.company_id == company.id).collect();
            let salaries: Vec<f64> = jobs.iter().filter_map(|l| l.salary_midpoint()).collect();
            let average_salary = if salaries.is_empty() {
                None
            } else {
                Some((salaries.iter().sum::<f64>() / salaries.len() as f64).round())
            };

            let mut keywords: HashMap<String, (usize, String)> = HashMap::new();
            for requirement in jobs.iter().flat_map(|l| l.requirement_list()) {
                let entry = keywords
                    .entry(requirement.to_lowercase())
                    .or_insert_with(|| (0, requirement.clone()));
                entry.0 += 1;
            }
            let mut ranked: Vec<(usize, String)> = keywords.into_values().collect();
            ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

            CompanyJobAnalytics {
                company_id: company.id,
                company: company.name.clone(),
                total_jobs: jobs.len(),
                active_jobs: jobs.iter().filter(|l| l.is_active).count(),
                total_applications: jobs.iter().map(|l| per_job.get(&l.id).copied().unwrap_or(0)).sum(),
                average_salary,
                top_requirements: ranked.into_iter().take(TOP_REQUIREMENTS).map(|(_, k)| k).collect(),
            }
        })
        .collect();
    result.sort_by(|a, b| {
        b.total_applications
            .cmp(&a.total_applications)
            .then_with(|| a.company.cmp(&b.company))
    });
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Activity feed
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Application,
    Automation,
    Profile,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Success,
    Running,
    Failed,
    Info,
}

impl ActivityStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Running => "running",
            Self::Failed => "failed",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub id: u64,
    pub account_id: u64,
    pub kind: ActivityKind,
    pub title: String,
    pub status: ActivityStatus,
    pub timestamp: DateTime<Utc>,
}

/// "just now", "2 minutes ago", "1 hour ago", "3 days ago".
#[must_use]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };
    if elapsed.num_minutes() < 1 {
        "just now".to_string()
    } else if elapsed.num_hours() < 1 {
        plural(elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        plural(elapsed.num_hours(), "hour")
    } else {
        plural(elapsed.num_days(), "day")
    }
}

/// Everything the analytics dashboard endpoint returns.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub stats: DashboardStats,
    pub summary: ApplicationSummary,
    pub response_rate: f64,
    pub trend: Vec<TrendPoint>,
    pub platforms: Vec<PlatformPerformance>,
    pub recent_activity: Vec<ActivityEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(job_id: u64, status: ApplicationStatus, applied: DateTime<Utc>) -> Application {
        Application {
            id: job_id,
            account_id: 1,
            job_id,
            cover_letter: String::new(),
            status,
            applied_date: applied,
            updated_date: applied,
        }
    }

    #[test]
    fn rate_is_zero_without_applications() {
        assert_eq!(success_rate(0, 0), 0.0);
        assert_eq!(rounded_rate(12, 15), 80);
        assert_eq!(one_decimal(success_rate(89, 156)), 57.1);
    }

    #[test]
    fn summary_counts_successful_and_responded() {
        use ApplicationStatus::*;
        let summary = ApplicationSummary::from_statuses([Pending, Reviewing, Interview, Accepted, Rejected]);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.responded, 4);
        assert_eq!(summary.success_rate(), 40.0);
    }

    #[test]
    fn trend_buckets_by_day() {
        let now = Utc::now();
        let today = now.date_naive();
        let apps = vec![
            app(1, ApplicationStatus::Interview, now),
            app(2, ApplicationStatus::Pending, now),
            app(3, ApplicationStatus::Accepted, now - Duration::days(2)),
            app(4, ApplicationStatus::Accepted, now - Duration::days(30)),
        ];
        let trend = daily_trend(&apps, today, 7);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[6].date, today);
        assert_eq!((trend[6].applications, trend[6].successful), (2, 1));
        assert_eq!((trend[4].applications, trend[4].successful), (1, 1));
        assert_eq!(trend.iter().map(|p| p.applications).sum::<usize>(), 3);
    }

    #[test]
    fn platform_tiers_and_ordering() {
        use ApplicationStatus::*;
        let mut rows = Vec::new();
        rows.extend(std::iter::repeat_n(("naukri", Accepted), 3));
        rows.extend(std::iter::repeat_n(("naukri", Rejected), 2));
        rows.extend(std::iter::repeat_n(("internshala", Interview), 7));
        rows.extend(std::iter::repeat_n(("internshala", Pending), 3));
        rows.push(("linkedin", Pending));

        let perf = platform_performance(rows);
        let order: Vec<&str> = perf.iter().map(|p| p.platform.as_str()).collect();
        assert_eq!(order, vec!["internshala", "naukri", "linkedin"]);
        assert_eq!(perf[0].tier, PerformanceTier::High);
        assert_eq!(perf[1].tier, PerformanceTier::Medium);
        assert_eq!(perf[2].tier, PerformanceTier::Low);
        assert_eq!(perf[1].name, "Naukri.com");
    }

    #[test]
    fn relative_time_labels() {
        let now = Utc::now();
        assert_eq!(relative_time(now, now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(2), now), "2 minutes ago");
        assert_eq!(relative_time(now - Duration::minutes(61), now), "1 hour ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
    }
}
