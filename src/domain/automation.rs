//! Platform catalog and automation session records.
//!
//! Sessions are bookkeeping only: nothing in this crate submits
//! applications, so counters change only through seeding or tests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::editor::{FieldError, RequiredFields};

/// A job board known to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct Platform {
    pub id: &'static str,
    pub name: &'static str,
    pub logo: &'static str,
    pub description: &'static str,
    pub base_url: &'static str,
    pub is_active: bool,
    pub features: &'static [&'static str],
}

static PLATFORMS: [Platform; 4] = [
    Platform {
        id: "internshala",
        name: "Internshala",
        logo: "🎓",
        description: "India's largest internship platform",
        base_url: "https://internshala.com",
        is_active: true,
        features: &["Internships", "Entry-level jobs", "Skills courses"],
    },
    Platform {
        id: "naukri",
        name: "Naukri.com",
        logo: "💼",
        description: "Leading job portal in India",
        base_url: "https://www.naukri.com",
        is_active: true,
        features: &["Full-time jobs", "Experience roles", "Career guidance"],
    },
    Platform {
        id: "linkedin",
        name: "LinkedIn",
        logo: "💼",
        description: "Professional networking platform",
        base_url: "https://www.linkedin.com",
        is_active: false,
        features: &["Professional network", "Job applications", "Easy Apply"],
    },
    Platform {
        id: "indeed",
        name: "Indeed",
        logo: "🔍",
        description: "Global job search engine",
        base_url: "https://www.indeed.com",
        is_active: false,
        features: &["Job search", "Company reviews", "Salary insights"],
    },
];

#[must_use]
pub fn catalog() -> &'static [Platform] {
    &PLATFORMS
}

#[must_use]
pub fn platform(id: &str) -> Option<&'static Platform> {
    PLATFORMS.iter().find(|p| p.id == id)
}

/// Display name for a platform id, falling back to the id itself.
#[must_use]
pub fn platform_name(id: &str) -> &str {
    platform(id).map_or(id, |p| p.name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Running,
    Paused,
    Completed,
    Failed,
}

impl SessionStatus {
    /// Status after a stop request, if the session can be stopped.
    #[must_use]
    pub fn stopped(self) -> Option<Self> {
        match self {
            Self::Running | Self::Pending => Some(Self::Paused),
            _ => None,
        }
    }

    /// Status after a resume request, if the session can be resumed.
    #[must_use]
    pub fn resumed(self) -> Option<Self> {
        match self {
            Self::Paused => Some(Self::Running),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const MAX_APPLICATIONS_PER_DAY: u32 = 50;

/// AI and pacing options attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationSettings {
    pub use_ai_cover_letter: bool,
    pub use_ai_responses: bool,
    pub max_applications_per_day: u32,
    pub custom_instructions: String,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            use_ai_cover_letter: true,
            use_ai_responses: true,
            max_applications_per_day: 10,
            custom_instructions: String::new(),
        }
    }
}

impl AutomationSettings {
    /// Write one setting from its form value.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "use_ai_cover_letter" => self.use_ai_cover_letter = super::profile::parse_bool(field, value)?,
            "use_ai_responses" => self.use_ai_responses = super::profile::parse_bool(field, value)?,
            "max_applications_per_day" => {
                let max: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| FieldError::invalid(field, "expected a whole number"))?;
                if !(1..=MAX_APPLICATIONS_PER_DAY).contains(&max) {
                    return Err(FieldError::invalid(
                        field,
                        format!("must be between 1 and {MAX_APPLICATIONS_PER_DAY}"),
                    ));
                }
                self.max_applications_per_day = max;
            }
            "custom_instructions" => self.custom_instructions = value.to_string(),
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        (1..=MAX_APPLICATIONS_PER_DAY).contains(&self.max_applications_per_day)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AutomationSession {
    pub id: u64,
    pub account_id: u64,
    pub platform_ids: Vec<String>,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_applications: u32,
    pub successful_applications: u32,
    pub failed_applications: u32,
    #[serde(flatten)]
    pub settings: AutomationSettings,
}

impl AutomationSession {
    #[must_use]
    pub fn platform_names(&self) -> Vec<String> {
        self.platform_ids
            .iter()
            .map(|id| platform_name(id).to_string())
            .collect()
    }

    /// Rounded integer percentage of successful applications.
    #[must_use]
    pub fn success_rate(&self) -> u32 {
        super::analytics::rounded_rate(
            self.successful_applications as usize,
            self.total_applications as usize,
        )
    }

    /// Whole minutes between start and end (or now for open sessions).
    #[must_use]
    pub fn duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        let end = self.end_time.unwrap_or(now);
        (end - self.start_time).num_minutes().max(0)
    }

    #[must_use]
    pub fn stats(&self, now: DateTime<Utc>) -> SessionStats {
        SessionStats {
            session_id: self.id,
            status: self.status,
            total_applications: self.total_applications,
            successful_applications: self.successful_applications,
            failed_applications: self.failed_applications,
            success_rate: self.success_rate(),
            platforms: self.platform_names(),
            duration_minutes: self.duration_minutes(now),
        }
    }
}

/// Body of `POST automation/sessions/start/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub platform_ids: Vec<String>,
    #[serde(flatten)]
    pub settings: AutomationSettings,
}

impl RequiredFields for StartSessionRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        if self.platform_ids.is_empty() {
            vec!["platform_ids"]
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub session_id: u64,
    pub status: SessionStatus,
    pub total_applications: u32,
    pub successful_applications: u32,
    pub failed_applications: u32,
    pub success_rate: u32,
    pub platforms: Vec<String>,
    pub duration_minutes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn catalog_marks_coming_soon_platforms_inactive() {
        let active: Vec<&str> = catalog().iter().filter(|p| p.is_active).map(|p| p.id).collect();
        assert_eq!(active, vec!["internshala", "naukri"]);
        assert_eq!(platform_name("naukri"), "Naukri.com");
        assert_eq!(platform_name("other"), "other");
    }

    #[test]
    fn status_transitions() {
        assert_eq!(SessionStatus::Running.stopped(), Some(SessionStatus::Paused));
        assert_eq!(SessionStatus::Pending.stopped(), Some(SessionStatus::Paused));
        assert_eq!(SessionStatus::Completed.stopped(), None);
        assert_eq!(SessionStatus::Paused.resumed(), Some(SessionStatus::Running));
        assert_eq!(SessionStatus::Running.resumed(), None);
    }

    #[test]
    fn settings_reject_out_of_range_daily_limit() {
        let mut settings = AutomationSettings::default();
        assert!(settings.set_field("max_applications_per_day", "0").is_err());
        assert!(settings.set_field("max_applications_per_day", "51").is_err());
        assert_eq!(settings.max_applications_per_day, 10);
        settings.set_field("max_applications_per_day", "25").unwrap();
        assert_eq!(settings.max_applications_per_day, 25);
        settings.set_field("use_ai_responses", "false").unwrap();
        assert!(!settings.use_ai_responses);
    }

    #[test]
    fn stats_report_rounded_rate_and_duration() {
        let start = Utc::now() - Duration::minutes(90);
        let session = AutomationSession {
            id: 1,
            account_id: 1,
            platform_ids: vec!["internshala".into(), "naukri".into()],
            status: SessionStatus::Running,
            start_time: start,
            end_time: None,
            total_applications: 15,
            successful_applications: 12,
            failed_applications: 3,
            settings: AutomationSettings::default(),
        };
        let stats = session.stats(start + Duration::minutes(90));
        assert_eq!(stats.success_rate, 80);
        assert_eq!(stats.duration_minutes, 90);
        assert_eq!(stats.platforms, vec!["Internshala", "Naukri.com"]);
    }

    #[test]
    fn start_request_requires_platforms() {
        let request: StartSessionRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.missing_fields(), vec!["platform_ids"]);
        assert_eq!(request.settings, AutomationSettings::default());
    }
}
