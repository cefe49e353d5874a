use crate::domain::automation::{AutomationSettings, StartSessionRequest};
use crate::domain::profile::{
    Education, Experience, JobPreferences, PersonalInfo, Profile, ProfileSection, Project, Skill,
};
use crate::editor::{EditorError, ListEditor, PlatformSelection};

/// Unsaved profile edits for one account.
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub account_id: u64,
    pub personal: PersonalInfo,
    pub education: ListEditor<Education>,
    pub experience: ListEditor<Experience>,
    pub projects: ListEditor<Project>,
    pub skills: ListEditor<Skill>,
    pub preferences: JobPreferences,
}

impl ProfileDraft {
    #[must_use]
    pub fn from_profile(account_id: u64, profile: &Profile) -> Self {
        Self {
            account_id,
            personal: profile.personal.clone(),
            education: ListEditor::from_items(profile.education.clone()),
            experience: ListEditor::from_items(profile.experience.clone()),
            projects: ListEditor::from_items(profile.projects.clone()),
            skills: ListEditor::from_items(profile.skills.clone()),
            preferences: profile.preferences.clone(),
        }
    }

    #[must_use]
    pub fn to_profile(&self) -> Profile {
        Profile {
            personal: self.personal.clone(),
            education: self.education.to_vec(),
            experience: self.experience.to_vec(),
            projects: self.projects.to_vec(),
            skills: self.skills.to_vec(),
            preferences: self.preferences.clone(),
            updated_at: None,
        }
    }

    /// Append a blank record to a section.
    pub fn add(&mut self, section: ProfileSection) -> String {
        match section {
            ProfileSection::Education => self.education.add(),
            ProfileSection::Experience => self.experience.add(),
            ProfileSection::Projects => self.projects.add(),
            ProfileSection::Skills => self.skills.add(),
        }
    }

    pub fn update(&mut self, section: ProfileSection, id: &str, field: &str, value: &str) -> Result<(), EditorError> {
        match section {
            ProfileSection::Education => self.education.update(id, field, value),
            ProfileSection::Experience => self.experience.update(id, field, value),
            ProfileSection::Projects => self.projects.update(id, field, value),
            ProfileSection::Skills => self.skills.update(id, field, value),
        }
    }

    /// Remove a record; returns whether anything was removed.
    pub fn remove(&mut self, section: ProfileSection, id: &str) -> bool {
        match section {
            ProfileSection::Education => self.education.remove(id).is_some(),
            ProfileSection::Experience => self.experience.remove(id).is_some(),
            ProfileSection::Projects => self.projects.remove(id).is_some(),
            ProfileSection::Skills => self.skills.remove(id).is_some(),
        }
    }
}

/// Unsaved automation form: selected platforms and session settings.
#[derive(Debug, Clone, Default)]
pub struct AutomationDraft {
    pub selection: PlatformSelection,
    pub settings: AutomationSettings,
}

impl AutomationDraft {
    /// The start request this form would submit.
    #[must_use]
    pub fn start_request(&self) -> StartSessionRequest {
        StartSessionRequest {
            platform_ids: self.selection.ids().to_vec(),
            settings: self.settings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::RequiredFields;

    #[test]
    fn sections_round_trip_through_profile() {
        let mut draft = ProfileDraft::from_profile(1, &Profile::default());
        let edu = draft.add(ProfileSection::Education);
        draft.update(ProfileSection::Education, &edu, "institution", "IIT").unwrap();
        let skill = draft.add(ProfileSection::Skills);
        assert!(draft.remove(ProfileSection::Skills, &skill));
        assert!(!draft.remove(ProfileSection::Skills, &skill));

        let profile = draft.to_profile();
        assert_eq!(profile.education.len(), 1);
        assert_eq!(profile.education[0].institution, "IIT");
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn empty_selection_produces_incomplete_start_request() {
        let draft = AutomationDraft::default();
        assert_eq!(draft.start_request().missing_fields(), vec!["platform_ids"]);
    }
}
