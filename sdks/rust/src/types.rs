//! Shared types for the SDK.
//!
//! These types mirror the server's JSON bodies. Unknown fields are ignored so
//! older clients keep working when the server adds fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Accounts
// =============================================================================

/// Body of `accounts/token/`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// An issued access token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

/// Body of `accounts/register/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub college: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub college: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Account fields plus the full profile document.
///
/// The profile is kept as raw JSON; its sections are edited through
/// `update_profile` with a partial document.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountProfile {
    #[serde(flatten)]
    pub account: Account,
    pub profile: serde_json::Value,
}

/// Metadata of the uploaded resume.
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeInfo {
    pub filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Sections applied by `accounts/import/`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ImportSummary {
    pub profile: bool,
    pub notifications: bool,
}

// =============================================================================
// Jobs
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
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

/// A listing joined with its company.
#[derive(Debug, Clone, Deserialize)]
pub struct JobListing {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    /// `full_time`, `part_time`, `internship` or `contract`.
    pub job_type: String,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub job_url: String,
    pub source_platform: String,
    pub is_active: bool,
    pub posted_date: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub company: Company,
}

/// Filters for `jobs/listings/`. Unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// Body of `jobs/applications/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplicationRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cover_letter: String,
}

/// One of the caller's applications with listing details.
#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    pub id: u64,
    pub job_id: u64,
    /// `pending`, `reviewing`, `interview`, `accepted` or `rejected`.
    pub status: String,
    #[serde(default)]
    pub cover_letter: String,
    pub applied_date: DateTime<Utc>,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub platform: String,
    pub job_url: String,
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyJobAnalytics {
    pub company_id: u64,
    pub company: String,
    pub total_jobs: usize,
    pub active_jobs: usize,
    pub total_applications: usize,
    pub average_salary: Option<f64>,
    pub top_requirements: Vec<String>,
}

// =============================================================================
// Automation
// =============================================================================

/// A job board in the automation catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Platform {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub description: String,
    pub base_url: String,
    pub is_active: bool,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationSettings {
    pub use_ai_cover_letter: bool,
    pub use_ai_responses: bool,
    pub max_applications_per_day: u32,
    #[serde(default)]
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

/// Body of `automation/sessions/start/`.
#[derive(Debug, Clone, Serialize)]
pub struct StartSessionRequest {
    pub platform_ids: Vec<String>,
    #[serde(flatten)]
    pub settings: AutomationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutomationSession {
    pub id: u64,
    pub platform_ids: Vec<String>,
    /// `pending`, `running`, `paused`, `completed` or `failed`.
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_applications: u32,
    pub successful_applications: u32,
    pub failed_applications: u32,
    #[serde(flatten)]
    pub settings: AutomationSettings,
}

// =============================================================================
// Credentials
// =============================================================================

/// Body of `automation/credentials/`. Either `username` or `email` is required.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CredentialRequest {
    pub platform: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub password: String,
}

/// A stored platform login. The server never returns the real password.
#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    pub id: String,
    pub platform: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub is_active: bool,
    pub last_tested: Option<chrono::NaiveDate>,
    /// `verified`, `failed` or `pending`.
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialTest {
    pub credential: Credential,
    pub message: String,
}
