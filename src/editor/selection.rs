//! Platform multi-select used by the automation form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::automation::{self, Platform};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown platform `{0}`")]
    Unknown(String),
    #[error("{0} is coming soon and cannot be selected yet")]
    Inactive(String),
}

/// Outcome of a [`PlatformSelection::toggle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
}

/// Ordered set of selected platform identifiers.
///
/// Only active catalog platforms can be selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformSelection {
    ids: Vec<String>,
}

impl PlatformSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the id when absent, deselect it when present.
    pub fn toggle(&mut self, id: &str) -> Result<Toggle, SelectionError> {
        if let Some(idx) = self.ids.iter().position(|selected| selected == id) {
            self.ids.remove(idx);
            return Ok(Toggle::Deselected);
        }

        let platform = selectable(id)?;
        self.ids.push(platform.id.to_string());
        Ok(Toggle::Selected)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Look up a catalog platform that may be selected.
pub fn selectable(id: &str) -> Result<&'static Platform, SelectionError> {
    let platform = automation::platform(id).ok_or_else(|| SelectionError::Unknown(id.to_string()))?;
    if !platform.is_active {
        return Err(SelectionError::Inactive(platform.name.to_string()));
    }
    Ok(platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes_once() {
        let mut selection = PlatformSelection::new();

        assert_eq!(selection.toggle("internshala"), Ok(Toggle::Selected));
        assert_eq!(selection.ids(), ["internshala"]);

        assert_eq!(selection.toggle("naukri"), Ok(Toggle::Selected));
        assert_eq!(selection.toggle("internshala"), Ok(Toggle::Deselected));
        assert_eq!(selection.ids(), ["naukri"]);
        assert!(!selection.contains("internshala"));
    }

    #[test]
    fn double_toggle_restores_original_set() {
        let mut selection = PlatformSelection::new();
        selection.toggle("naukri").unwrap();
        let before = selection.clone();

        selection.toggle("internshala").unwrap();
        selection.toggle("internshala").unwrap();

        assert_eq!(selection, before);
    }

    #[test]
    fn inactive_and_unknown_platforms_are_rejected() {
        let mut selection = PlatformSelection::new();

        assert_eq!(
            selection.toggle("linkedin"),
            Err(SelectionError::Inactive("LinkedIn".into()))
        );
        assert_eq!(
            selection.toggle("monster"),
            Err(SelectionError::Unknown("monster".into()))
        );
        assert!(selection.is_empty());
    }
}
