//! In-memory record store shared by the API and the HTML views.
//!
//! Every collection sits behind its own lock. Guards are held for a single
//! operation and never across an `.await`.

pub mod seed;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;

use crate::domain::account::{
    Account, AccountImport, AccountPatch, ImportSummary, NotificationSettings, RegisterRequest,
};
use crate::domain::analytics::{ActivityEntry, ActivityKind, ActivityStatus};
use crate::domain::automation::{self, AutomationSession, AutomationSettings, SessionStatus};
use crate::domain::credentials::{Credential, CredentialRequest, CredentialStatus};
use crate::domain::jobs::{
    Application, ApplicationRequest, ApplicationStatus, ApplicationView, Company, JobListing,
    ListingQuery, ListingView,
};
use crate::domain::profile::Profile;
use crate::domain::resume::{Resume, ResumeInfo};
use crate::editor::{ListEditor, Record};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Invalid(String),
}

/// Session state change requested through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Stop,
    Resume,
}

/// Everything held for one account, as exported from settings.
#[derive(Debug, Clone, Serialize)]
pub struct AccountExport {
    pub exported_at: DateTime<Utc>,
    pub account: Account,
    pub profile: Profile,
    pub notifications: NotificationSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<ResumeInfo>,
    pub applications: Vec<ApplicationView>,
    pub sessions: Vec<AutomationSession>,
    pub credentials: Vec<Credential>,
    pub activity: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataStats {
    pub profiles: usize,
    pub applications: usize,
    pub sessions: usize,
    pub credentials: usize,
    pub activity: usize,
    /// Size of the JSON export in bytes.
    pub total_size_bytes: usize,
}

/// Thread-safe record store.
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    next_id: AtomicU64,
    accounts: RwLock<HashMap<u64, Account>>,
    profiles: RwLock<HashMap<u64, Profile>>,
    notifications: RwLock<HashMap<u64, NotificationSettings>>,
    resumes: RwLock<HashMap<u64, Resume>>,
    companies: RwLock<Vec<Company>>,
    listings: RwLock<Vec<JobListing>>,
    applications: RwLock<Vec<Application>>,
    sessions: RwLock<Vec<AutomationSession>>,
    credentials: RwLock<HashMap<u64, ListEditor<Credential>>>,
    activity: RwLock<Vec<ActivityEntry>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                next_id: AtomicU64::new(1),
                accounts: RwLock::new(HashMap::new()),
                profiles: RwLock::new(HashMap::new()),
                notifications: RwLock::new(HashMap::new()),
                resumes: RwLock::new(HashMap::new()),
                companies: RwLock::new(Vec::new()),
                listings: RwLock::new(Vec::new()),
                applications: RwLock::new(Vec::new()),
                sessions: RwLock::new(Vec::new()),
                credentials: RwLock::new(HashMap::new()),
                activity: RwLock::new(Vec::new()),
            }),
        }
    }

    fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::Relaxed)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────

    /// Create an account and its empty profile.
    ///
    /// Usernames are compared case-insensitively.
    pub fn register(&self, request: &RegisterRequest, password_hash: String) -> Result<Account, StoreError> {
        let username = request.username.trim();
        let mut accounts = self.inner.accounts.write();
        if accounts
            .values()
            .any(|a| a.username.eq_ignore_ascii_case(username))
        {
            return Err(StoreError::Conflict(format!(
                "username `{username}` is already taken"
            )));
        }

        let now = Utc::now();
        let account = Account {
            id: self.next_id(),
            username: username.to_string(),
            email: request.email.trim().to_string(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            college: request.college.trim().to_string(),
            branch: request.branch.trim().to_string(),
            graduation_year: request.graduation_year,
            password_hash,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());
        drop(accounts);

        let mut profile = Profile::default();
        profile.personal.phone.clone_from(&account.phone);
        self.inner.profiles.write().insert(account.id, profile);
        self.inner
            .notifications
            .write()
            .insert(account.id, NotificationSettings::default());
        Ok(account)
    }

    #[must_use]
    pub fn account(&self, id: u64) -> Option<Account> {
        self.inner.accounts.read().get(&id).cloned()
    }

    fn require_account(&self, id: u64) -> Result<(), StoreError> {
        if self.inner.accounts.read().contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::NotFound("account"))
        }
    }

    #[must_use]
    pub fn find_by_username(&self, username: &str) -> Option<Account> {
        self.inner
            .accounts
            .read()
            .values()
            .find(|a| a.username.eq_ignore_ascii_case(username.trim()))
            .cloned()
    }

    #[must_use]
    pub fn account_count(&self) -> usize {
        self.inner.accounts.read().len()
    }

    pub fn update_account(&self, id: u64, patch: AccountPatch) -> Result<(Account, Profile), StoreError> {
        let profile = patch.profile.clone();
        let account = {
            let mut accounts = self.inner.accounts.write();
            let account = accounts.get_mut(&id).ok_or(StoreError::NotFound("account"))?;
            patch.apply(account);
            account.clone()
        };
        let profile = match profile {
            Some(profile) => self.save_profile(id, profile)?,
            None => self.profile(id).ok_or(StoreError::NotFound("profile"))?,
        };
        Ok((account, profile))
    }

    pub fn set_password_hash(&self, id: u64, hash: String) -> Result<(), StoreError> {
        let mut accounts = self.inner.accounts.write();
        let account = accounts.get_mut(&id).ok_or(StoreError::NotFound("account"))?;
        account.password_hash = hash;
        account.updated_at = Utc::now();
        Ok(())
    }

    /// Remove the account and everything that belongs to it.
    pub fn delete_account(&self, id: u64) -> bool {
        let removed = self.inner.accounts.write().remove(&id).is_some();
        if removed {
            self.inner.profiles.write().remove(&id);
            self.inner.notifications.write().remove(&id);
            self.inner.resumes.write().remove(&id);
            self.inner.applications.write().retain(|a| a.account_id != id);
            self.inner.sessions.write().retain(|s| s.account_id != id);
            self.inner.credentials.write().remove(&id);
            self.inner.activity.write().retain(|a| a.account_id != id);
        }
        removed
    }

    // ─────────────────────────────────────────────────────────────────────
    // Profile & settings
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn profile(&self, account_id: u64) -> Option<Profile> {
        self.inner.profiles.read().get(&account_id).cloned()
    }

    /// Replace the stored profile. Records without an id are given one.
    pub fn save_profile(&self, account_id: u64, profile: Profile) -> Result<Profile, StoreError> {
        self.require_account(account_id)?;
        let mut profile = Profile {
            education: ListEditor::from_items(profile.education).to_vec(),
            experience: ListEditor::from_items(profile.experience).to_vec(),
            projects: ListEditor::from_items(profile.projects).to_vec(),
            skills: ListEditor::from_items(profile.skills).to_vec(),
            ..profile
        };
        profile.updated_at = Some(Utc::now());
        self.inner.profiles.write().insert(account_id, profile.clone());
        Ok(profile)
    }

    #[must_use]
    pub fn notifications(&self, account_id: u64) -> NotificationSettings {
        self.inner
            .notifications
            .read()
            .get(&account_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_notifications(&self, account_id: u64, settings: NotificationSettings) {
        self.inner.notifications.write().insert(account_id, settings);
    }

    /// Store `resume`, replacing any earlier upload.
    pub fn set_resume(&self, account_id: u64, resume: Resume) -> Result<ResumeInfo, StoreError> {
        self.require_account(account_id)?;
        let info = resume.info.clone();
        self.inner.resumes.write().insert(account_id, resume);
        Ok(info)
    }

    #[must_use]
    pub fn resume(&self, account_id: u64) -> Option<Resume> {
        self.inner.resumes.read().get(&account_id).cloned()
    }

    #[must_use]
    pub fn resume_info(&self, account_id: u64) -> Option<ResumeInfo> {
        self.inner.resumes.read().get(&account_id).map(|r| r.info.clone())
    }

    pub fn remove_resume(&self, account_id: u64) -> Result<ResumeInfo, StoreError> {
        self.inner
            .resumes
            .write()
            .remove(&account_id)
            .map(|r| r.info)
            .ok_or(StoreError::NotFound("resume"))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Jobs
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_company(&self, mut company: Company) -> Company {
        company.id = self.next_id();
        self.inner.companies.write().push(company.clone());
        company
    }

    pub fn add_listing(&self, mut listing: JobListing) -> Result<JobListing, StoreError> {
        if !self
            .inner
            .companies
            .read()
            .iter()
            .any(|c| c.id == listing.company_id)
        {
            return Err(StoreError::NotFound("company"));
        }
        listing.id = self.next_id();
        self.inner.listings.write().push(listing.clone());
        Ok(listing)
    }

    #[must_use]
    pub fn companies(&self) -> Vec<Company> {
        let mut companies = self.inner.companies.read().clone();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        companies
    }

    /// Active listings matching `query`, newest first.
    #[must_use]
    pub fn listings(&self, query: &ListingQuery) -> Vec<ListingView> {
        let companies = self.inner.companies.read();
        let listings = self.inner.listings.read();
        let mut views: Vec<ListingView> = listings
            .iter()
            .filter(|l| l.is_active)
            .filter_map(|listing| {
                let company = companies.iter().find(|c| c.id == listing.company_id)?;
                query.matches(listing, company).then(|| ListingView {
                    listing: listing.clone(),
                    company: company.clone(),
                })
            })
            .collect();
        views.sort_by(|a, b| b.listing.posted_date.cmp(&a.listing.posted_date));
        views
    }

    #[must_use]
    pub fn listing(&self, id: u64) -> Option<ListingView> {
        let listing = self.inner.listings.read().iter().find(|l| l.id == id).cloned()?;
        let company = self
            .inner
            .companies
            .read()
            .iter()
            .find(|c| c.id == listing.company_id)
            .cloned()?;
        Some(ListingView { listing, company })
    }

    /// Record an application. An account can apply to a listing once.
    pub fn apply(&self, account_id: u64, request: ApplicationRequest) -> Result<ApplicationView, StoreError> {
        let view = self.insert_application(
            account_id,
            request.job,
            request.cover_letter,
            ApplicationStatus::Pending,
            Utc::now(),
        )?;
        self.log_activity(
            account_id,
            ActivityKind::Application,
            format!("Applied to {} at {}", view.job_title, view.company_name),
            ActivityStatus::Success,
        );
        Ok(view)
    }

    /// Insert an application with an explicit status and date.
    pub fn insert_application(
        &self,
        account_id: u64,
        job_id: u64,
        cover_letter: String,
        status: ApplicationStatus,
        applied_date: DateTime<Utc>,
    ) -> Result<ApplicationView, StoreError> {
        self.require_account(account_id)?;
        let view = self.listing(job_id).ok_or(StoreError::NotFound("job listing"))?;
        if !view.listing.is_active {
            return Err(StoreError::Invalid(
                "this listing is no longer accepting applications".into(),
            ));
        }

        let mut applications = self.inner.applications.write();
        if applications
            .iter()
            .any(|a| a.account_id == account_id && a.job_id == job_id)
        {
            return Err(StoreError::Conflict("you have already applied to this job".into()));
        }
        let application = Application {
            id: self.next_id(),
            account_id,
            job_id,
            cover_letter,
            status,
            applied_date,
            updated_date: applied_date,
        };
        applications.push(application.clone());
        Ok(Self::application_view(application, &view))
    }

    fn application_view(application: Application, view: &ListingView) -> ApplicationView {
        ApplicationView {
            application,
            job_title: view.listing.title.clone(),
            company_name: view.company.name.clone(),
            location: view.listing.location.clone(),
            platform: automation::platform_name(&view.listing.source_platform).to_string(),
            job_url: view.listing.job_url.clone(),
        }
    }

    /// Raw application records for an account.
    #[must_use]
    pub fn applications(&self, account_id: u64) -> Vec<Application> {
        self.inner
            .applications
            .read()
            .iter()
            .filter(|a| a.account_id == account_id)
            .cloned()
            .collect()
    }

    /// Applications joined with their listings, newest first.
    #[must_use]
    pub fn application_views(&self, account_id: u64) -> Vec<ApplicationView> {
        let mut views: Vec<ApplicationView> = self
            .applications(account_id)
            .into_iter()
            .filter_map(|app| {
                let listing = self.listing(app.job_id)?;
                Some(Self::application_view(app, &listing))
            })
            .collect();
        views.sort_by(|a, b| b.application.applied_date.cmp(&a.application.applied_date));
        views
    }

    /// `(source platform, status)` for each of the account's applications.
    #[must_use]
    pub fn application_platforms(&self, account_id: u64) -> Vec<(String, ApplicationStatus)> {
        let listings = self.inner.listings.read();
        self.applications(account_id)
            .into_iter()
            .filter_map(|app| {
                let listing = listings.iter().find(|l| l.id == app.job_id)?;
                Some((listing.source_platform.clone(), app.status))
            })
            .collect()
    }

    /// All listings and applications, for job analytics.
    #[must_use]
    pub fn job_records(&self) -> (Vec<Company>, Vec<JobListing>, Vec<Application>) {
        (
            self.inner.companies.read().clone(),
            self.inner.listings.read().clone(),
            self.inner.applications.read().clone(),
        )
    }

    // ─────────────────────────────────────────────────────────────────────
    // Automation sessions
    // ─────────────────────────────────────────────────────────────────────

    /// Sessions for an account, newest first.
    #[must_use]
    pub fn sessions(&self, account_id: u64) -> Vec<AutomationSession> {
        let mut sessions: Vec<AutomationSession> = self
            .inner
            .sessions
            .read()
            .iter()
            .filter(|s| s.account_id == account_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        sessions
    }

    #[must_use]
    pub fn session(&self, account_id: u64, id: u64) -> Option<AutomationSession> {
        self.inner
            .sessions
            .read()
            .iter()
            .find(|s| s.id == id && s.account_id == account_id)
            .cloned()
    }

    /// Open a running session over the given platforms.
    ///
    /// Platform ids are validated by the caller.
    pub fn start_session(
        &self,
        account_id: u64,
        platform_ids: Vec<String>,
        settings: AutomationSettings,
    ) -> Result<AutomationSession, StoreError> {
        self.require_account(account_id)?;
        if platform_ids.is_empty() {
            return Err(StoreError::Invalid("platform_ids are required".into()));
        }
        let session = AutomationSession {
            id: self.next_id(),
            account_id,
            platform_ids,
            status: SessionStatus::Running,
            start_time: Utc::now(),
            end_time: None,
            total_applications: 0,
            successful_applications: 0,
            failed_applications: 0,
            settings,
        };
        self.inner.sessions.write().push(session.clone());
        self.log_activity(
            account_id,
            ActivityKind::Automation,
            format!("Started automation for {}", session.platform_names().join(", ")),
            ActivityStatus::Running,
        );
        Ok(session)
    }

    /// Insert a session record as-is, keeping its counters and status.
    pub fn insert_session(&self, mut session: AutomationSession) -> AutomationSession {
        session.id = self.next_id();
        self.inner.sessions.write().push(session.clone());
        session
    }

    pub fn transition_session(
        &self,
        account_id: u64,
        id: u64,
        action: SessionAction,
    ) -> Result<AutomationSession, StoreError> {
        let mut sessions = self.inner.sessions.write();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id && s.account_id == account_id)
            .ok_or(StoreError::NotFound("session"))?;
        let next = match action {
            SessionAction::Stop => session.status.stopped(),
            SessionAction::Resume => session.status.resumed(),
        };
        let Some(next) = next else {
            let verb = match action {
                SessionAction::Stop => "stopped",
                SessionAction::Resume => "resumed",
            };
            return Err(StoreError::Conflict(format!(
                "a {} session cannot be {verb}",
                session.status
            )));
        };
        session.status = next;
        Ok(session.clone())
    }

    /// Drop sessions that started before `now - retention`.
    pub fn prune_sessions(&self, now: DateTime<Utc>, retention: Duration) -> usize {
        let cutoff = now - retention;
        let mut sessions = self.inner.sessions.write();
        let before = sessions.len();
        sessions.retain(|s| s.start_time >= cutoff);
        before - sessions.len()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Credentials
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn credentials(&self, account_id: u64) -> Vec<Credential> {
        self.inner
            .credentials
            .read()
            .get(&account_id)
            .map(ListEditor::to_vec)
            .unwrap_or_default()
    }

    /// Store a credential for a platform the account has none for yet.
    pub fn add_credential(&self, account_id: u64, request: CredentialRequest) -> Result<Credential, StoreError> {
        self.require_account(account_id)?;
        let platform = request.platform.trim().to_lowercase();
        if automation::platform(&platform).is_none() {
            return Err(StoreError::Invalid(format!("unknown platform `{platform}`")));
        }
        let mut all = self.inner.credentials.write();
        let editor = all.entry(account_id).or_default();
        if editor.iter().any(|c| c.platform == platform) {
            return Err(StoreError::Conflict(format!(
                "credentials for {} already exist",
                automation::platform_name(&platform)
            )));
        }
        let id = editor.push_with(|credential| {
            credential.platform = platform;
            credential.username = request.username.trim().to_string();
            credential.email = request.email.trim().to_string();
            credential.password = request.password;
        });
        editor
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("credential"))
    }

    /// Insert a credential record as-is.
    pub fn insert_credential(&self, account_id: u64, credential: Credential) -> Credential {
        let mut all = self.inner.credentials.write();
        let editor = all.entry(account_id).or_default();
        let id = editor.push_with(|slot| *slot = credential);
        editor.get(&id).cloned().unwrap_or_else(|| Credential::blank(id))
    }

    pub fn remove_credential(&self, account_id: u64, id: &str) -> Result<Credential, StoreError> {
        self.inner
            .credentials
            .write()
            .get_mut(&account_id)
            .and_then(|editor| editor.remove(id))
            .ok_or(StoreError::NotFound("credential"))
    }

    fn with_credential<T>(
        &self,
        account_id: u64,
        id: &str,
        f: impl FnOnce(&mut ListEditor<Credential>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut all = self.inner.credentials.write();
        let editor = all
            .get_mut(&account_id)
            .filter(|editor| editor.get(id).is_some())
            .ok_or(StoreError::NotFound("credential"))?;
        f(editor)
    }

    pub fn toggle_credential(&self, account_id: u64, id: &str) -> Result<Credential, StoreError> {
        self.with_credential(account_id, id, |editor| {
            let active = editor.get(id).is_some_and(|c| c.is_active);
            editor
                .update(id, "is_active", if active { "false" } else { "true" })
                .map_err(|e| StoreError::Invalid(e.to_string()))?;
            editor.get(id).cloned().ok_or(StoreError::NotFound("credential"))
        })
    }

    /// Mark a credential as queued for verification today.
    pub fn mark_credential_tested(&self, account_id: u64, id: &str) -> Result<Credential, StoreError> {
        let today = Utc::now().date_naive();
        self.with_credential(account_id, id, |editor| {
            let credential = editor.get_mut(id).ok_or(StoreError::NotFound("credential"))?;
            credential.last_tested = Some(today);
            credential.status = CredentialStatus::Pending;
            Ok(credential.clone())
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Activity
    // ─────────────────────────────────────────────────────────────────────

    pub fn log_activity(&self, account_id: u64, kind: ActivityKind, title: String, status: ActivityStatus) {
        self.log_activity_at(account_id, kind, title, status, Utc::now());
    }

    pub fn log_activity_at(
        &self,
        account_id: u64,
        kind: ActivityKind,
        title: String,
        status: ActivityStatus,
        timestamp: DateTime<Utc>,
    ) {
        let entry = ActivityEntry {
            id: self.next_id(),
            account_id,
            kind,
            title,
            status,
            timestamp,
        };
        self.inner.activity.write().push(entry);
    }

    /// Most recent activity first.
    #[must_use]
    pub fn activity(&self, account_id: u64, limit: usize) -> Vec<ActivityEntry> {
        let mut entries: Vec<ActivityEntry> = self
            .inner
            .activity
            .read()
            .iter()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        entries.truncate(limit);
        entries
    }

    // ─────────────────────────────────────────────────────────────────────
    // Data management
    // ─────────────────────────────────────────────────────────────────────

    pub fn export(&self, account_id: u64) -> Result<AccountExport, StoreError> {
        let account = self.account(account_id).ok_or(StoreError::NotFound("account"))?;
        Ok(AccountExport {
            exported_at: Utc::now(),
            profile: self.profile(account_id).unwrap_or_default(),
            notifications: self.notifications(account_id),
            resume: self.resume_info(account_id),
            applications: self.application_views(account_id),
            sessions: self.sessions(account_id),
            credentials: self.credentials(account_id),
            activity: self.activity(account_id, usize::MAX),
            account,
        })
    }

    /// Restore the sections an export carries back. Callers validate first.
    pub fn import(&self, account_id: u64, import: AccountImport) -> Result<ImportSummary, StoreError> {
        self.require_account(account_id)?;
        let summary = ImportSummary {
            profile: import.profile.is_some(),
            notifications: import.notifications.is_some(),
        };
        if let Some(profile) = import.profile {
            self.save_profile(account_id, profile)?;
        }
        if let Some(settings) = import.notifications {
            self.set_notifications(account_id, settings);
        }
        Ok(summary)
    }

    pub fn data_stats(&self, account_id: u64) -> Result<DataStats, StoreError> {
        let export = self.export(account_id)?;
        let total_size_bytes = serde_json::to_vec(&export).map(|b| b.len()).unwrap_or(0);
        Ok(DataStats {
            profiles: 1,
            applications: export.applications.len(),
            sessions: export.sessions.len(),
            credentials: export.credentials.len(),
            activity: export.activity.len(),
            total_size_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::jobs::JobType;

    fn store_with_account() -> (Store, Account) {
        let store = Store::new();
        let account = store
            .register(
                &RegisterRequest {
                    username: "asha".into(),
                    email: "asha@example.com".into(),
                    password: "irrelevant".into(),
                    first_name: "Asha".into(),
                    last_name: "Rao".into(),
                    ..RegisterRequest::default()
                },
                "hash".into(),
            )
            .unwrap();
        (store, account)
    }

    fn add_listing(store: &Store) -> JobListing {
        let company = store.add_company(Company {
            id: 0,
            name: "StartupXYZ".into(),
            website: String::new(),
            description: String::new(),
            location: "Mumbai".into(),
        });
        store
            .add_listing(JobListing {
                id: 0,
                company_id: company.id,
                title: "Frontend Developer".into(),
                description: String::new(),
                requirements: "React".into(),
                location: "Mumbai".into(),
                job_type: JobType::FullTime,
                salary_min: None,
                salary_max: None,
                job_url: "https://naukri.com/job-listings/frontend".into(),
                source_platform: "naukri".into(),
                is_active: true,
                posted_date: Utc::now(),
                deadline: None,
            })
            .unwrap()
    }

    #[test]
    fn usernames_are_unique() {
        let (store, _) = store_with_account();
        let again = RegisterRequest {
            username: "ASHA".into(),
            ..RegisterRequest::default()
        };
        assert!(matches!(store.register(&again, "h".into()), Err(StoreError::Conflict(_))));
        assert!(store.profile(1).is_some());
    }

    #[test]
    fn one_application_per_job() {
        let (store, account) = store_with_account();
        let listing = add_listing(&store);
        let request = || ApplicationRequest {
            job: listing.id,
            cover_letter: String::new(),
        };

        let view = store.apply(account.id, request()).unwrap();
        assert_eq!(view.application.status, ApplicationStatus::Pending);
        assert_eq!(view.platform, "Naukri.com");
        assert!(matches!(store.apply(account.id, request()), Err(StoreError::Conflict(_))));
        assert_eq!(store.application_views(account.id).len(), 1);
        assert_eq!(store.activity(account.id, 10).len(), 1);
    }

    #[test]
    fn session_transitions_follow_status_rules() {
        let (store, account) = store_with_account();
        let session = store
            .start_session(account.id, vec!["internshala".into()], AutomationSettings::default())
            .unwrap();
        assert_eq!(session.status, SessionStatus::Running);

        assert!(matches!(
            store.transition_session(account.id, session.id, SessionAction::Resume),
            Err(StoreError::Conflict(_))
        ));
        let paused = store
            .transition_session(account.id, session.id, SessionAction::Stop)
            .unwrap();
        assert_eq!(paused.status, SessionStatus::Paused);
        let running = store
            .transition_session(account.id, session.id, SessionAction::Resume)
            .unwrap();
        assert_eq!(running.status, SessionStatus::Running);
        assert!(matches!(
            store.transition_session(account.id + 1, session.id, SessionAction::Stop),
            Err(StoreError::NotFound("session"))
        ));
    }

    #[test]
    fn old_sessions_are_pruned() {
        let (store, account) = store_with_account();
        store
            .start_session(account.id, vec!["naukri".into()], AutomationSettings::default())
            .unwrap();
        let later = Utc::now() + Duration::days(31);
        assert_eq!(store.prune_sessions(Utc::now(), Duration::days(30)), 0);
        assert_eq!(store.prune_sessions(later, Duration::days(30)), 1);
        assert!(store.sessions(account.id).is_empty());
    }

    #[test]
    fn credential_lifecycle() {
        let (store, account) = store_with_account();
        let request = CredentialRequest {
            platform: "Internshala".into(),
            email: "asha@example.com".into(),
            password: "pw".into(),
            ..CredentialRequest::default()
        };
        let credential = store.add_credential(account.id, request.clone()).unwrap();
        assert_eq!(credential.status, CredentialStatus::Pending);
        assert!(matches!(
            store.add_credential(account.id, request),
            Err(StoreError::Conflict(_))
        ));

        let toggled = store.toggle_credential(account.id, &credential.id).unwrap();
        assert!(!toggled.is_active);

        let tested = store.mark_credential_tested(account.id, &credential.id).unwrap();
        assert_eq!(tested.last_tested, Some(Utc::now().date_naive()));
        assert_eq!(store.credentials(account.id).len(), 1);

        store.remove_credential(account.id, &credential.id).unwrap();
        assert!(store.credentials(account.id).is_empty());
        assert!(matches!(
            store.remove_credential(account.id, &credential.id),
            Err(StoreError::NotFound("credential"))
        ));
    }

    #[test]
    fn deleting_an_account_removes_its_records() {
        let (store, account) = store_with_account();
        let listing = add_listing(&store);
        store
            .apply(
                account.id,
                ApplicationRequest {
                    job: listing.id,
                    cover_letter: String::new(),
                },
            )
            .unwrap();
        assert!(store.delete_account(account.id));
        assert!(store.account(account.id).is_none());
        assert!(store.applications(account.id).is_empty());
        assert!(store.activity(account.id, 10).is_empty());
        assert!(!store.delete_account(account.id));
    }

    #[test]
    fn deleted_accounts_take_no_new_records() {
        let (store, account) = store_with_account();
        let listing = add_listing(&store);
        assert!(store.delete_account(account.id));

        let apply = store.apply(
            account.id,
            ApplicationRequest {
                job: listing.id,
                cover_letter: String::new(),
            },
        );
        assert!(matches!(apply, Err(StoreError::NotFound("account"))));
        assert!(matches!(
            store.start_session(account.id, vec!["naukri".into()], AutomationSettings::default()),
            Err(StoreError::NotFound("account"))
        ));
        let credential = CredentialRequest {
            platform: "naukri".into(),
            password: "pw".into(),
            ..CredentialRequest::default()
        };
        assert!(matches!(
            store.add_credential(account.id, credential),
            Err(StoreError::NotFound("account"))
        ));
        assert!(store.sessions(account.id).is_empty());
        assert!(store.credentials(account.id).is_empty());
        assert!(store.applications(account.id).is_empty());
    }

    #[test]
    fn saved_profiles_never_repeat_record_ids() {
        use crate::domain::profile::Education;

        let (store, account) = store_with_account();
        let record = |institution: &str| Education {
            institution: institution.into(),
            ..Education::blank("5".into())
        };
        let profile = Profile {
            education: vec![record("A"), record("B")],
            ..Profile::default()
        };

        let saved = store.save_profile(account.id, profile).unwrap();

        assert_eq!(saved.education.len(), 2);
        assert_eq!(saved.education[0].id, "5");
        assert_ne!(saved.education[1].id, "5");
    }

    #[test]
    fn export_and_stats_cover_account_records() {
        let (store, account) = store_with_account();
        let stats = store.data_stats(account.id).unwrap();
        assert_eq!(stats.profiles, 1);
        assert_eq!(stats.applications, 0);
        assert!(stats.total_size_bytes > 0);
        let export = store.export(account.id).unwrap();
        let json = serde_json::to_string(&export).unwrap();
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn resume_is_replaced_exported_and_dropped_with_the_account() {
        let (store, account) = store_with_account();
        let upload = |name: &str| {
            Resume::new(Some(name), Some("application/pdf"), b"%PDF".to_vec()).expect("valid resume")
        };

        store.set_resume(account.id, upload("first.pdf")).unwrap();
        store.set_resume(account.id, upload("second.pdf")).unwrap();
        assert_eq!(store.resume(account.id).unwrap().info.filename, "second.pdf");
        let export = store.export(account.id).unwrap();
        assert_eq!(export.resume.map(|r| r.filename).as_deref(), Some("second.pdf"));

        assert!(store.delete_account(account.id));
        assert!(store.resume(account.id).is_none());
        assert_eq!(
            store.set_resume(account.id, upload("third.pdf")).map(|_| ()),
            Err(StoreError::NotFound("account"))
        );
        assert_eq!(store.remove_resume(account.id).map(|_| ()), Err(StoreError::NotFound("resume")));
    }

    #[test]
    fn import_restores_exported_profile_and_notifications() {
        let (store, account) = store_with_account();
        let mut profile = store.profile(account.id).unwrap();
        profile.personal.location = "Pune".into();
        store.save_profile(account.id, profile).unwrap();
        let mut settings = store.notifications(account.id);
        settings.frequency.weekly_report_day = "friday".into();
        store.set_notifications(account.id, settings);

        let json = serde_json::to_vec(&store.export(account.id).unwrap()).unwrap();
        let (other, target) = store_with_account();
        let import = AccountImport::parse("export.json", &json).unwrap();
        let summary = other.import(target.id, import).unwrap();

        assert_eq!(summary, ImportSummary { profile: true, notifications: true });
        assert_eq!(other.profile(target.id).unwrap().personal.location, "Pune");
        assert_eq!(other.notifications(target.id).frequency.weekly_report_day, "friday");
        assert!(other.applications(target.id).is_empty());
    }
}
