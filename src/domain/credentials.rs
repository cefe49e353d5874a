//! Login details stored for each job platform.
//!
//! Passwords are kept as entered and never leave the server: every
//! serialized credential carries the mask instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use super::automation;
use super::profile::parse_bool;
use crate::editor::form::blank_fields;
use crate::editor::{FieldError, Record, RequiredFields};

pub const MASKED_PASSWORD: &str = "••••••••";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialStatus {
    Verified,
    Failed,
    Pending,
}

impl CredentialStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Failed => "failed",
            Self::Pending => "pending",
        }
    }
}

fn masked<S: Serializer>(_: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(MASKED_PASSWORD)
}

#[derive(Debug, Clone, Serialize)]
pub struct Credential {
    pub id: String,
    pub platform: String,
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "masked")]
    pub password: String,
    pub is_active: bool,
    pub last_tested: Option<NaiveDate>,
    pub status: CredentialStatus,
}

impl Credential {
    #[must_use]
    pub fn platform_name(&self) -> &str {
        automation::platform_name(&self.platform)
    }

    /// Email when set, otherwise the username.
    #[must_use]
    pub fn login(&self) -> &str {
        if self.email.trim().is_empty() {
            &self.username
        } else {
            &self.email
        }
    }
}

impl Record for Credential {
    fn id(&self) -> &str {
        &self.id
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            platform: String::new(),
            username: String::new(),
            email: String::new(),
            password: String::new(),
            is_active: true,
            last_tested: None,
            status: CredentialStatus::Pending,
        }
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "username" => self.username = value.trim().to_string(),
            "email" => self.email = value.trim().to_string(),
            "password" => {
                if value.is_empty() {
                    return Err(FieldError::invalid(field, "password cannot be empty"));
                }
                self.password = value.to_string();
                self.status = CredentialStatus::Pending;
            }
            "is_active" => self.is_active = parse_bool(field, value)?,
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

/// Body of `POST automation/credentials/`.
///
/// The login may be given as either an email or a username.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialRequest {
    pub platform: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RequiredFields for CredentialRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = blank_fields(&[("platform", &self.platform), ("password", &self.password)]);
        if self.username.trim().is_empty() && self.email.trim().is_empty() {
            missing.push("email");
        }
        missing
    }
}

impl CredentialRequest {
    /// Split a combined "Email/Username" input into the matching field.
    pub fn with_login(mut self, login: &str) -> Self {
        let login = login.trim();
        if login.contains('@') {
            self.email = login.to_string();
        } else {
            self.username = login.to_string();
        }
        self
    }
}

/// Response of `POST automation/credentials/{id}/test/`.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialTest {
    pub credential: Credential,
    pub message: String,
}
