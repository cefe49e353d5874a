//! Per-browser form state for the HTML views.
//!
//! A workspace holds unsaved edits (profile sections, platform selection,
//! automation settings) between HTMX requests. It is found through a cookie
//! and dropped after a period of inactivity.

mod draft;

pub use draft::{AutomationDraft, ProfileDraft};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::profile::Profile;
use crate::store::Store;

/// Cookie that carries the workspace id.
pub const WORKSPACE_COOKIE: &str = "applypilot_ws";

/// Default idle timeout (30 minutes).
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Form state for one browser.
#[derive(Debug, Clone)]
pub struct Workspace {
    inner: Arc<WorkspaceInner>,
}

#[derive(Debug)]
struct WorkspaceInner {
    id: String,
    created_at: DateTime<Utc>,
    last_activity: RwLock<DateTime<Utc>>,
    profile: RwLock<Option<ProfileDraft>>,
    automation: RwLock<AutomationDraft>,
}

impl Workspace {
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(WorkspaceInner {
                id,
                created_at: now,
                last_activity: RwLock::new(now),
                profile: RwLock::new(None),
                automation: RwLock::new(AutomationDraft::default()),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Run `f` against the profile draft of `account_id`.
    ///
    /// The draft is loaded from the store on first use, and reloaded when
    /// the workspace was last used by a different account.
    pub fn with_profile<R>(&self, store: &Store, account_id: u64, f: impl FnOnce(&mut ProfileDraft) -> R) -> R {
        let mut guard = self.inner.profile.write();
        let stale = guard.as_ref().is_none_or(|draft| draft.account_id != account_id);
        if stale {
            let profile = store.profile(account_id).unwrap_or_default();
            *guard = Some(ProfileDraft::from_profile(account_id, &profile));
        }
        let draft = guard.get_or_insert_with(|| ProfileDraft::from_profile(account_id, &Profile::default()));
        let result = f(draft);
        drop(guard);
        self.touch();
        result
    }

    /// Throw away unsaved profile edits.
    pub fn reset_profile(&self) {
        *self.inner.profile.write() = None;
        self.touch();
    }

    /// Run `f` against the automation form state.
    pub fn with_automation<R>(&self, f: impl FnOnce(&mut AutomationDraft) -> R) -> R {
        let result = f(&mut self.inner.automation.write());
        self.touch();
        result
    }

    fn touch(&self) {
        *self.inner.last_activity.write() = Utc::now();
    }

    /// Check if the workspace has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *self.inner.last_activity.read();
        // A negative duration means the clock went backwards; keep the workspace.
        (Utc::now() - last).to_std().is_ok_and(|idle| idle > timeout)
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    #[cfg(test)]
    fn backdate(&self, by: chrono::Duration) {
        *self.inner.last_activity.write() = Utc::now() - by;
    }
}

/// Thread-safe store for workspaces.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceStore {
    inner: Arc<RwLock<HashMap<String, Workspace>>>,
}

impl WorkspaceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a workspace with a fresh random id.
    #[must_use]
    pub fn create(&self) -> Workspace {
        self.create_with_id(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn create_with_id(&self, id: impl Into<String>) -> Workspace {
        let id = id.into();
        let workspace = Workspace::new(id.clone());
        self.inner.write().insert(id, workspace.clone());
        workspace
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Workspace> {
        self.inner.read().get(id).cloned()
    }

    /// Look up a workspace, creating a new one when the id is unknown.
    ///
    /// Unknown ids are not reused; the returned workspace may have a new id.
    #[must_use]
    pub fn resolve(&self, id: Option<&str>) -> Workspace {
        id.and_then(|id| self.get(id)).unwrap_or_else(|| self.create())
    }

    pub fn remove(&self, id: &str) -> Option<Workspace> {
        self.inner.write().remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove workspaces that have been idle longer than the timeout.
    ///
    /// Returns the number of workspaces removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self.inner.write();
        let before = guard.len();
        guard.retain(|_, workspace| !workspace.is_expired_with_timeout(timeout));
        before - guard.len()
    }

    #[must_use]
    pub fn list_ids(&self) -> Vec<String> {
        self.inner.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::ProfileSection;
    use crate::store::seed;

    #[test]
    fn store_lifecycle() {
        let store = WorkspaceStore::new();
        assert!(store.is_empty());

        let workspace = store.create();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(workspace.id()).unwrap().id(), workspace.id());

        let resolved = store.resolve(Some(workspace.id()));
        assert_eq!(resolved.id(), workspace.id());
        let fresh = store.resolve(Some("forged-id"));
        assert_ne!(fresh.id(), "forged-id");
        assert_eq!(store.len(), 2);

        store.remove(workspace.id());
        assert_eq!(store.list_ids(), vec![fresh.id().to_string()]);
    }

    #[test]
    fn idle_workspaces_expire() {
        let store = WorkspaceStore::new();
        let idle = store.create();
        let active = store.create();
        idle.backdate(chrono::Duration::minutes(45));

        assert!(idle.is_expired_with_timeout(DEFAULT_IDLE_TIMEOUT));
        assert!(!active.is_expired_with_timeout(DEFAULT_IDLE_TIMEOUT));
        assert_eq!(store.cleanup_expired_with_timeout(DEFAULT_IDLE_TIMEOUT), 1);
        assert!(store.get(active.id()).is_some());
    }

    #[test]
    fn profile_draft_loads_once_and_keeps_edits() {
        let records = Store::new();
        let account = seed::demo_data(&records, "hash".into()).unwrap();
        let workspace = WorkspaceStore::new().create();

        let id = workspace.with_profile(&records, account, |draft| draft.add(ProfileSection::Experience));
        let count = workspace.with_profile(&records, account, |draft| draft.experience.len());
        assert_eq!(count, 1);
        assert!(workspace.with_profile(&records, account, |draft| draft.experience.get(&id).is_some()));

        workspace.reset_profile();
        let count = workspace.with_profile(&records, account, |draft| draft.experience.len());
        assert_eq!(count, 0);
    }
}
