//! User accounts and the account-level settings forms.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::FieldIssue;
use super::profile::Profile;
use crate::editor::RequiredFields;
use crate::editor::form::blank_fields;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// A registered user.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub college: String,
    pub branch: String,
    pub graduation_year: Option<i32>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Account fields plus the full profile, as returned by `accounts/profile/`.
#[derive(Debug, Clone, Serialize)]
pub struct AccountProfile {
    #[serde(flatten)]
    pub account: Account,
    pub profile: Profile,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
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
}

impl RequiredFields for RegisterRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        blank_fields(&[
            ("username", &self.username),
            ("email", &self.email),
            ("password", &self.password),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ])
    }
}

impl RegisterRequest {
    /// Rules that apply once every required field is present.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        if !self.email.contains('@') {
            issues.push(FieldIssue::new("email", "enter a valid email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            issues.push(FieldIssue::new(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if self.username.trim().contains(char::is_whitespace) {
            issues.push(FieldIssue::new("username", "must not contain spaces"));
        }
        issues
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl RequiredFields for LoginRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        blank_fields(&[("username", &self.username), ("password", &self.password)])
    }
}

/// Partial update for `PATCH accounts/profile/`.
///
/// Profile lists present in the patch replace the stored lists wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub branch: Option<String>,
    pub graduation_year: Option<i32>,
    pub profile: Option<Profile>,
}

impl AccountPatch {
    #[must_use]
    pub fn validate(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        if let Some(email) = &self.email {
            if !email.contains('@') {
                issues.push(FieldIssue::new("email", "enter a valid email address"));
            }
        }
        if let Some(profile) = &self.profile {
            issues.extend(profile.validate());
        }
        issues
    }

    pub fn apply(self, account: &mut Account) {
        let Self {
            email,
            first_name,
            last_name,
            phone,
            college,
            branch,
            graduation_year,
            profile: _,
        } = self;
        if let Some(v) = email {
            account.email = v;
        }
        if let Some(v) = first_name {
            account.first_name = v;
        }
        if let Some(v) = last_name {
            account.last_name = v;
        }
        if let Some(v) = phone {
            account.phone = v;
        }
        if let Some(v) = college {
            account.college = v;
        }
        if let Some(v) = branch {
            account.branch = v;
        }
        if graduation_year.is_some() {
            account.graduation_year = graduation_year;
        }
        account.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl RequiredFields for PasswordChange {
    fn missing_fields(&self) -> Vec<&'static str> {
        blank_fields(&[
            ("current_password", &self.current_password),
            ("new_password", &self.new_password),
            ("confirm_password", &self.confirm_password),
        ])
    }
}

impl PasswordChange {
    /// Checks that do not need the stored hash.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            issues.push(FieldIssue::new(
                "new_password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if self.new_password != self.confirm_password {
            issues.push(FieldIssue::new("confirm_password", "passwords do not match"));
        }
        issues
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notification preferences
// ─────────────────────────────────────────────────────────────────────────────

pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailNotifications {
    pub application_success: bool,
    pub application_failure: bool,
    pub daily_summary: bool,
    pub weekly_report: bool,
    pub system_updates: bool,
}

impl Default for EmailNotifications {
    fn default() -> Self {
        Self {
            application_success: true,
            application_failure: true,
            daily_summary: true,
            weekly_report: false,
            system_updates: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushNotifications {
    pub application_success: bool,
    pub application_failure: bool,
    pub session_complete: bool,
    pub system_alerts: bool,
}

impl Default for PushNotifications {
    fn default() -> Self {
        Self {
            application_success: true,
            application_failure: true,
            session_complete: true,
            system_alerts: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationFrequency {
    /// `HH:MM`, 24 hour clock.
    pub daily_summary_time: String,
    pub weekly_report_day: String,
}

impl Default for NotificationFrequency {
    fn default() -> Self {
        Self {
            daily_summary_time: "18:00".to_string(),
            weekly_report_day: "sunday".to_string(),
        }
    }
}

/// Data read back from an export file.
///
/// Only the profile and notification settings are restored. Other export
/// sections are history or masked and are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountImport {
    pub profile: Option<Profile>,
    pub notifications: Option<NotificationSettings>,
}

/// Which parts of an import were applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub profile: bool,
    pub notifications: bool,
}

impl AccountImport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profile.is_none() && self.notifications.is_none()
    }

    /// Read an export in JSON, or YAML when `filename` says so.
    pub fn parse(filename: &str, data: &[u8]) -> Result<Self, String> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            serde_yaml::from_slice(data).map_err(|e| format!("invalid YAML: {e}"))
        } else {
            serde_json::from_slice(data).map_err(|e| format!("invalid JSON: {e}"))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub email: EmailNotifications,
    pub push: PushNotifications,
    pub frequency: NotificationFrequency,
}

impl NotificationSettings {
    #[must_use]
    pub fn validate(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        if NaiveTime::parse_from_str(&self.frequency.daily_summary_time, "%H:%M").is_err() {
            issues.push(FieldIssue::new(
                "frequency.daily_summary_time",
                "expected a time as HH:MM",
            ));
        }
        let day = self.frequency.weekly_report_day.to_lowercase();
        if !WEEKDAYS.contains(&day.as_str()) {
            issues.push(FieldIssue::new(
                "frequency.weekly_report_day",
                "expected a day of the week",
            ));
        }
        issues
    }

    /// Flip one boolean toggle addressed as `email.<key>` or `push.<key>`.
    /// Current value of a dotted switch such as `email.daily_summary`.
    #[must_use]
    pub fn enabled(&self, key: &str) -> Option<bool> {
        self.clone().slot(key).map(|slot| *slot)
    }

    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        let slot = self.slot(key)?;
        *slot = !*slot;
        Some(*slot)
    }

    fn slot(&mut self, key: &str) -> Option<&mut bool> {
        let slot = match key {
            "email.application_success" => &mut self.email.application_success,
            "email.application_failure" => &mut self.email.application_failure,
            "email.daily_summary" => &mut self.email.daily_summary,
            "email.weekly_report" => &mut self.email.weekly_report,
            "email.system_updates" => &mut self.email.system_updates,
            "push.application_success" => &mut self.push.application_success,
            "push.application_failure" => &mut self.push.application_failure,
            "push.session_complete" => &mut self.push.session_complete,
            "push.system_alerts" => &mut self.push.system_alerts,
            _ => return None,
        };
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register() -> RegisterRequest {
        RegisterRequest {
            username: "asha".into(),
            email: "asha@example.com".into(),
            password: "correct-horse".into(),
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            ..RegisterRequest::default()
        }
    }

    #[test]
    fn register_rules() {
        assert!(register().missing_fields().is_empty());
        assert!(register().validate().is_empty());

        let mut short = register();
        short.password = "short".into();
        short.email = "asha.example.com".into();
        let fields: Vec<String> = short.validate().into_iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["email", "password"]);

        let blank = RegisterRequest::default();
        assert_eq!(blank.missing_fields().len(), 5);
    }

    #[test]
    fn password_change_requires_matching_confirmation() {
        let change = PasswordChange {
            current_password: "old-password".into(),
            new_password: "new-password".into(),
            confirm_password: "new-passw0rd".into(),
        };
        let issues = change.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "confirm_password");
    }

    #[test]
    fn notification_defaults_and_toggle() {
        let mut settings = NotificationSettings::default();
        assert!(settings.validate().is_empty());
        assert!(!settings.email.weekly_report);

        assert_eq!(settings.toggle("email.weekly_report"), Some(true));
        assert!(settings.email.weekly_report);
        assert_eq!(settings.toggle("push.nope"), None);

        settings.frequency.daily_summary_time = "25:99".into();
        settings.frequency.weekly_report_day = "someday".into();
        assert_eq!(settings.validate().len(), 2);
    }

    #[test]
    fn import_reads_export_files_and_ignores_history() {
        let json = br#"{
            "exported_at": "2026-01-01T00:00:00Z",
            "account": {"username": "asha"},
            "profile": {"personal": {"phone": "9876543210"}},
            "applications": [{"id": 1}]
        }"#;
        let import = AccountImport::parse("applypilot-export.json", json).expect("json export");
        assert_eq!(import.profile.expect("profile").personal.phone, "9876543210");
        assert!(import.notifications.is_none());

        let yaml = b"notifications:\n  frequency:\n    daily_summary_time: '07:30'\n";
        let import = AccountImport::parse("export.YML", yaml).expect("yaml export");
        let settings = import.notifications.expect("notifications");
        assert_eq!(settings.frequency.daily_summary_time, "07:30");
        assert_eq!(settings.frequency.weekly_report_day, "sunday");
    }

    #[test]
    fn import_rejects_malformed_files() {
        let err = AccountImport::parse("export.json", b"{not json").unwrap_err();
        assert!(err.starts_with("invalid JSON"));
        assert!(AccountImport::parse("export.json", b"{}").expect("empty object").is_empty());
    }
}
