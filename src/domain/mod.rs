//! Records shown and edited by the dashboard.
//!
//! # Modules
//!
//! - [`account`]: user accounts, registration and settings forms
//! - [`jobs`]: companies, listings and applications
//! - [`automation`]: platform catalog and automation sessions
//! - [`credentials`]: stored platform logins
//! - [`profile`]: the multi-section candidate profile
//! - [`resume`]: the uploaded resume file
//! - [`analytics`]: pure aggregations over the records above

pub mod account;
pub mod analytics;
pub mod automation;
pub mod credentials;
pub mod jobs;
pub mod profile;
pub mod resume;

use serde::Serialize;
use url::Url;

/// One failed validation rule, reported next to the offending field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Record an issue when a non-empty value is not an absolute http(s) URL.
pub fn check_url(field: &str, value: &str, issues: &mut Vec<FieldIssue>) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => issues.push(FieldIssue::new(field, "must be a valid http(s) URL")),
    }
}

/// Split a comma separated field into trimmed, non-empty entries.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_check_ignores_blank_and_rejects_garbage() {
        let mut issues = Vec::new();
        check_url("github_url", "", &mut issues);
        check_url("github_url", "https://github.com/asha", &mut issues);
        assert!(issues.is_empty());

        check_url("live_url", "not a url", &mut issues);
        check_url("live_url", "ftp://example.com", &mut issues);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, "live_url");
    }

    #[test]
    fn split_list_trims_entries() {
        assert_eq!(
            split_list(" React, Rust ,, Docker "),
            vec!["React", "Rust", "Docker"]
        );
        assert!(split_list("  ").is_empty());
    }
}
