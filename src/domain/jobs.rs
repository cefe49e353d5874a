//! Companies, job listings and the applications made to them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::split_list;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[serde(alias = "full-time")]
    FullTime,
    #[serde(alias = "part-time")]
    PartTime,
    Internship,
    Contract,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::Internship,
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::Internship => "internship",
            Self::Contract => "contract",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full Time",
            Self::PartTime => "Part Time",
            Self::Internship => "Internship",
            Self::Contract => "Contract",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "full_time" => Ok(Self::FullTime),
            "part_time" => Ok(Self::PartTime),
            "internship" => Ok(Self::Internship),
            "contract" => Ok(Self::Contract),
            other => Err(format!("unknown job type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobListing {
    pub id: u64,
    pub company_id: u64,
    pub title: String,
    pub description: String,
    /// Comma separated.
    pub requirements: String,
    pub location: String,
    pub job_type: JobType,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub job_url: String,
    /// Catalog id of the platform the listing was found on.
    pub source_platform: String,
    pub is_active: bool,
    pub posted_date: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
}

impl JobListing {
    #[must_use]
    pub fn requirement_list(&self) -> Vec<String> {
        split_list(&self.requirements)
    }

    /// Midpoint of the advertised range, or the single bound when only one is known.
    #[must_use]
    pub fn salary_midpoint(&self) -> Option<f64> {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => Some((f64::from(min) + f64::from(max)) / 2.0),
            (Some(only), None) | (None, Some(only)) => Some(f64::from(only)),
            (None, None) => None,
        }
    }

    #[must_use]
    pub fn salary_label(&self) -> String {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => format!("₹{min} - ₹{max}"),
            (Some(min), None) => format!("from ₹{min}"),
            (None, Some(max)) => format!("up to ₹{max}"),
            (None, None) => "Not disclosed".to_string(),
        }
    }
}

/// A listing joined with its company.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: JobListing,
    pub company: Company,
}

/// Filters accepted by `jobs/listings/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub company: Option<String>,
    pub platform: Option<String>,
}

fn filter(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

impl ListingQuery {
    /// Case-insensitive match of every non-empty filter.
    #[must_use]
    pub fn matches(&self, listing: &JobListing, company: &Company) -> bool {
        if let Some(search) = filter(self.search.as_ref()) {
            let haystack = format!(
                "{} {} {} {}",
                listing.title, listing.description, listing.requirements, company.name
            )
            .to_lowercase();
            if !haystack.contains(&search) {
                return false;
            }
        }
        if let Some(location) = filter(self.location.as_ref()) {
            if !listing.location.to_lowercase().contains(&location) {
                return false;
            }
        }
        if let Some(job_type) = filter(self.job_type.as_ref()) {
            match job_type.parse::<JobType>() {
                Ok(wanted) if wanted == listing.job_type => {}
                _ => return false,
            }
        }
        if let Some(name) = filter(self.company.as_ref()) {
            let by_id = name.parse::<u64>().is_ok_and(|id| id == company.id);
            if !by_id && !company.name.to_lowercase().contains(&name) {
                return false;
            }
        }
        if let Some(platform) = filter(self.platform.as_ref()) {
            if listing.source_platform != platform {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewing,
    Interview,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    /// Interview or accepted.
    #[must_use]
    pub fn is_successful(self) -> bool {
        matches!(self, Self::Interview | Self::Accepted)
    }

    /// The employer has reacted in some way.
    #[must_use]
    pub fn is_responded(self) -> bool {
        self != Self::Pending
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Reviewing => "Under Review",
            Self::Interview => "Interview Scheduled",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Application {
    pub id: u64,
    pub account_id: u64,
    pub job_id: u64,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// Body of `POST jobs/applications/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationRequest {
    pub job: u64,
    #[serde(default)]
    pub cover_letter: String,
}

/// An application joined with the listing it was made to.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub platform: String,
    pub job_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> (JobListing, Company) {
        let company = Company {
            id: 7,
            name: "TechCorp Solutions".into(),
            website: String::new(),
            description: String::new(),
            location: "Bangalore".into(),
        };
        let listing = JobListing {
            id: 1,
            company_id: 7,
            title: "Software Developer Intern".into(),
            description: "Build internal tools".into(),
            requirements: "Python, Django, SQL".into(),
            location: "Bangalore".into(),
            job_type: JobType::Internship,
            salary_min: Some(15_000),
            salary_max: Some(25_000),
            job_url: "https://internshala.com/internship/detail/1".into(),
            source_platform: "internshala".into(),
            is_active: true,
            posted_date: Utc::now(),
            deadline: None,
        };
        (listing, company)
    }

    #[test]
    fn job_type_accepts_both_spellings() {
        assert_eq!("full-time".parse::<JobType>(), Ok(JobType::FullTime));
        assert_eq!("FULL_TIME".parse::<JobType>(), Ok(JobType::FullTime));
        let parsed: JobType = serde_json::from_str("\"part-time\"").unwrap();
        assert_eq!(parsed, JobType::PartTime);
        assert_eq!(serde_json::to_string(&JobType::FullTime).unwrap(), "\"full_time\"");
    }

    #[test]
    fn query_filters_combine() {
        let (listing, company) = listing();
        let mut query = ListingQuery {
            search: Some("django".into()),
            ..ListingQuery::default()
        };
        assert!(query.matches(&listing, &company));

        query.location = Some("mumbai".into());
        assert!(!query.matches(&listing, &company));

        query.location = None;
        query.job_type = Some("internship".into());
        query.company = Some("techcorp".into());
        query.platform = Some("internshala".into());
        assert!(query.matches(&listing, &company));

        query.job_type = Some("contract".into());
        assert!(!query.matches(&listing, &company));
    }

    #[test]
    fn salary_midpoint_uses_known_bounds() {
        let (mut listing, _) = listing();
        assert_eq!(listing.salary_midpoint(), Some(20_000.0));
        listing.salary_max = None;
        assert_eq!(listing.salary_midpoint(), Some(15_000.0));
        listing.salary_min = None;
        assert_eq!(listing.salary_midpoint(), None);
    }

    #[test]
    fn status_classification() {
        assert!(ApplicationStatus::Interview.is_successful());
        assert!(ApplicationStatus::Accepted.is_successful());
        assert!(!ApplicationStatus::Reviewing.is_successful());
        assert!(ApplicationStatus::Rejected.is_responded());
        assert!(!ApplicationStatus::Pending.is_responded());
    }
}
