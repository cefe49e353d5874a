//! Demo records loaded at startup when `seed.demo_data` is enabled.

use chrono::{Duration, NaiveDate, Utc};
use tracing::debug;

use super::{Store, StoreError};
use crate::domain::account::RegisterRequest;
use crate::domain::analytics::{ActivityKind, ActivityStatus};
use crate::domain::automation::{AutomationSession, AutomationSettings, SessionStatus};
use crate::domain::credentials::{Credential, CredentialStatus};
use crate::domain::jobs::{ApplicationStatus, Company, JobListing, JobType};
use crate::domain::profile::{Degree, Education, JobPreferences, Profile, Project, Skill, SkillLevel};
use crate::editor::Record;

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo-password";

struct ListingSeed {
    company: usize,
    title: &'static str,
    requirements: &'static str,
    location: &'static str,
    job_type: JobType,
    salary: Option<(u32, u32)>,
    platform: &'static str,
    url: &'static str,
    days_ago: i64,
    applied: Option<ApplicationStatus>,
}

const COMPANIES: [(&str, &str, &str); 6] = [
    ("TechCorp Solutions", "https://techcorp.example.com", "Bangalore"),
    ("StartupXYZ", "https://startupxyz.example.com", "Mumbai"),
    ("InnovateLabs", "https://innovatelabs.example.com", "Remote"),
    ("DataTech Inc", "https://datatech.example.com", "Delhi"),
    ("WebSolutions", "https://websolutions.example.com", "Pune"),
    ("CloudNine Systems", "https://cloudnine.example.com", "Hyderabad"),
];

fn listings() -> Vec<ListingSeed> {
    use ApplicationStatus::{Accepted, Interview, Pending, Rejected, Reviewing};
    vec![
        ListingSeed {
            company: 0,
            title: "Software Developer Intern",
            requirements: "Python, Django, SQL, Git",
            location: "Bangalore",
            job_type: JobType::Internship,
            salary: Some((15_000, 25_000)),
            platform: "internshala",
            url: "https://internshala.com/internship/detail/software-developer-intern-at-techcorp-solutions",
            days_ago: 0,
            applied: Some(Interview),
        },
        ListingSeed {
            company: 1,
            title: "Frontend Developer",
            requirements: "React, TypeScript, CSS",
            location: "Mumbai",
            job_type: JobType::FullTime,
            salary: Some((600_000, 900_000)),
            platform: "naukri",
            url: "https://naukri.com/job-listings/frontend-developer-startupxyz",
            days_ago: 0,
            applied: Some(Reviewing),
        },
        ListingSeed {
            company: 2,
            title: "Full Stack Developer Intern",
            requirements: "React, Node.js, MongoDB",
            location: "Remote",
            job_type: JobType::Internship,
            salary: Some((20_000, 30_000)),
            platform: "linkedin",
            url: "https://linkedin.com/jobs/view/full-stack-developer-intern",
            days_ago: 1,
            applied: Some(Accepted),
        },
        ListingSeed {
            company: 3,
            title: "Python Developer",
            requirements: "Python, Pandas, SQL",
            location: "Delhi",
            job_type: JobType::FullTime,
            salary: Some((500_000, 800_000)),
            platform: "internshala",
            url: "https://internshala.com/internship/detail/python-developer-at-datatech",
            days_ago: 1,
            applied: Some(Rejected),
        },
        ListingSeed {
            company: 4,
            title: "React Developer Intern",
            requirements: "React, JavaScript, Git",
            location: "Pune",
            job_type: JobType::Internship,
            salary: None,
            platform: "naukri",
            url: "https://naukri.com/job-listings/react-developer-intern-websolutions",
            days_ago: 2,
            applied: Some(Interview),
        },
        ListingSeed {
            company: 0,
            title: "Backend Engineer",
            requirements: "Rust, PostgreSQL, Docker",
            location: "Bangalore",
            job_type: JobType::FullTime,
            salary: Some((900_000, 1_400_000)),
            platform: "internshala",
            url: "https://internshala.com/job/detail/backend-engineer-at-techcorp-solutions",
            days_ago: 3,
            applied: Some(Pending),
        },
        ListingSeed {
            company: 5,
            title: "Cloud Support Associate",
            requirements: "AWS, Linux, Docker",
            location: "Hyderabad",
            job_type: JobType::Contract,
            salary: Some((400_000, 600_000)),
            platform: "naukri",
            url: "https://naukri.com/job-listings/cloud-support-associate-cloudnine",
            days_ago: 4,
            applied: None,
        },
        ListingSeed {
            company: 3,
            title: "Data Analyst Intern",
            requirements: "SQL, Excel, Python",
            location: "Delhi",
            job_type: JobType::PartTime,
            salary: Some((10_000, 15_000)),
            platform: "internshala",
            url: "https://internshala.com/internship/detail/data-analyst-intern-at-datatech",
            days_ago: 5,
            applied: None,
        },
    ]
}

fn demo_profile() -> Profile {
    Profile {
        personal: crate::domain::profile::PersonalInfo {
            phone: "+91 98765 43210".into(),
            location: "Bangalore".into(),
            linkedin_url: "https://linkedin.com/in/demo-user".into(),
            github_url: "https://github.com/demo-user".into(),
            portfolio_url: String::new(),
        },
        education: vec![Education {
            institution: "National Institute of Technology".into(),
            degree: Degree::Btech,
            field_of_study: "Computer Science".into(),
            start_year: Some(2021),
            end_year: Some(2025),
            cgpa: Some(8.6),
            ..Education::blank(String::new())
        }],
        experience: Vec::new(),
        projects: vec![Project {
            title: "Job Tracker".into(),
            description: "Kanban board for tracking job applications".into(),
            technologies: "React, Django, PostgreSQL".into(),
            github_url: "https://github.com/demo-user/job-tracker".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            is_ongoing: true,
            ..Project::blank(String::new())
        }],
        skills: vec![
            Skill {
                name: "Python".into(),
                level: SkillLevel::Advanced,
                ..Skill::blank(String::new())
            },
            Skill {
                name: "React".into(),
                category: "Framework".into(),
                ..Skill::blank(String::new())
            },
        ],
        preferences: JobPreferences {
            preferred_roles: "Software Developer, Backend Developer".into(),
            preferred_locations: "Bangalore, Remote".into(),
            ..JobPreferences::default()
        },
        updated_at: None,
    }
}

/// Load the demo account and the shared job board. Returns the demo account id.
pub fn demo_data(store: &Store, password_hash: String) -> Result<u64, StoreError> {
    let now = Utc::now();

    let companies: Vec<Company> = COMPANIES
        .iter()
        .map(|(name, website, location)| {
            store.add_company(Company {
                id: 0,
                name: (*name).to_string(),
                website: (*website).to_string(),
                description: format!("{name} is hiring engineers"),
                location: (*location).to_string(),
            })
        })
        .collect();

    let account = store.register(
        &RegisterRequest {
            username: DEMO_USERNAME.into(),
            email: "user@example.com".into(),
            password: String::new(),
            first_name: "Demo".into(),
            last_name: "User".into(),
            phone: "+91 98765 43210".into(),
            college: "National Institute of Technology".into(),
            branch: "Computer Science".into(),
            graduation_year: Some(2025),
        },
        password_hash,
    )?;
    store.save_profile(account.id, demo_profile())?;

    let mut applied = Vec::new();
    for seed in listings() {
        let company = &companies[seed.company];
        let posted = now - Duration::days(seed.days_ago + 2);
        let listing = store.add_listing(JobListing {
            id: 0,
            company_id: company.id,
            title: seed.title.to_string(),
            description: format!("{} role at {}", seed.title, company.name),
            requirements: seed.requirements.to_string(),
            location: seed.location.to_string(),
            job_type: seed.job_type,
            salary_min: seed.salary.map(|(min, _)| min),
            salary_max: seed.salary.map(|(_, max)| max),
            job_url: seed.url.to_string(),
            source_platform: seed.platform.to_string(),
            is_active: true,
            posted_date: posted,
            deadline: Some(posted + Duration::days(30)),
        })?;
        if let Some(status) = seed.applied {
            applied.push((listing.id, status, seed.days_ago));
        }
    }

    for (job, status, days_ago) in applied {
        let at = now - Duration::days(days_ago) - Duration::minutes(2);
        let view = store.insert_application(account.id, job, String::new(), status, at)?;
        store.log_activity_at(
            account.id,
            ActivityKind::Application,
            format!("Applied to {} at {}", view.job_title, view.company_name),
            ActivityStatus::Success,
            at,
        );
    }

    store.insert_session(AutomationSession {
        id: 0,
        account_id: account.id,
        platform_ids: vec!["internshala".into(), "naukri".into()],
        status: SessionStatus::Running,
        start_time: now - Duration::minutes(15),
        end_time: None,
        total_applications: 15,
        successful_applications: 12,
        failed_applications: 3,
        settings: AutomationSettings::default(),
    });
    store.insert_session(AutomationSession {
        id: 0,
        account_id: account.id,
        platform_ids: vec!["linkedin".into()],
        status: SessionStatus::Completed,
        start_time: now - Duration::days(1),
        end_time: Some(now - Duration::days(1) + Duration::hours(2)),
        total_applications: 8,
        successful_applications: 6,
        failed_applications: 2,
        settings: AutomationSettings::default(),
    });

    store.insert_credential(
        account.id,
        Credential {
            platform: "internshala".into(),
            email: "user@example.com".into(),
            password: "demo-internshala".into(),
            last_tested: Some((now - Duration::days(1)).date_naive()),
            status: CredentialStatus::Verified,
            ..Credential::blank(String::new())
        },
    );
    store.insert_credential(
        account.id,
        Credential {
            platform: "naukri".into(),
            username: "john_doe".into(),
            email: "user@example.com".into(),
            password: "demo-naukri".into(),
            is_active: false,
            last_tested: Some((now - Duration::days(5)).date_naive()),
            status: CredentialStatus::Failed,
            ..Credential::blank(String::new())
        },
    );

    store.log_activity_at(
        account.id,
        ActivityKind::Automation,
        "Started automation for Internshala".into(),
        ActivityStatus::Running,
        now - Duration::minutes(15),
    );

    debug!(
        name: "store.seeded",
        account_id = account.id,
        companies = companies.len(),
        "Demo data loaded"
    );
    Ok(account.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::DashboardStats;
    use crate::editor::RequiredFields;

    #[test]
    fn demo_account_has_dashboard_data() {
        let store = Store::new();
        let id = demo_data(&store, "hash".into()).unwrap();

        let applications = store.applications(id);
        let stats = DashboardStats::compute(&applications, &store.sessions(id));
        assert_eq!(stats.total_applications, 6);
        assert_eq!(stats.successful_applications, 3);
        assert_eq!(stats.active_automations, 1);
        assert_eq!(stats.success_rate, 50.0);

        assert_eq!(store.credentials(id).len(), 2);
        assert_eq!(store.listings(&Default::default()).len(), 8);
    }

    #[test]
    fn demo_profile_passes_save_checks() {
        let profile = demo_profile();
        assert!(profile.missing_fields().is_empty());
        assert!(profile.validate().is_empty());
    }
}
