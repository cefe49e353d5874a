//! Ordered record lists edited by identifier.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a single field cannot be written.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The record has no field with this name.
    #[error("unknown field `{0}`")]
    UnknownField(String),
    /// The value could not be parsed into the field's type.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl FieldError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Error raised by [`ListEditor::update`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("no record with id `{0}`")]
    NotFound(String),
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// A form record that lives in a [`ListEditor`].
pub trait Record: Clone {
    /// The record's identifier.
    fn id(&self) -> &str;

    /// A record with default field values and the given identifier.
    fn blank(id: String) -> Self;

    /// Overwrite the record's identifier.
    fn set_id(&mut self, id: String);

    /// Write one field, parsing `value` into the field's type.
    ///
    /// Implementations must leave the record untouched when they return an error.
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError>;
}

/// Timestamp-based identifier source.
///
/// Identifiers are the current Unix time in milliseconds, bumped by one
/// whenever the clock has not moved past the last issued value, so every
/// identifier from one generator is distinct.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator that will only issue values above `floor`.
    #[must_use]
    pub fn after(floor: u64) -> Self {
        Self { last: floor }
    }

    /// Issue the next identifier.
    ///
    /// Restarts from the clock if the counter is exhausted; callers that hold
    /// foreign identifiers must check the result against them.
    pub fn next_id(&mut self) -> String {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        self.last = match self.last.checked_add(1) {
            Some(bumped) => bumped.max(now),
            None => now,
        };
        self.last.to_string()
    }
}

/// Ordered list of records with add/update/remove by identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<T>", into = "Vec<T>")]
pub struct ListEditor<T: Record> {
    items: Vec<T>,
    ids: IdGenerator,
}

impl<T: Record> Default for ListEditor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> From<Vec<T>> for ListEditor<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_items(items)
    }
}

impl<T: Record> From<ListEditor<T>> for Vec<T> {
    fn from(editor: ListEditor<T>) -> Self {
        editor.items
    }
}

impl<T: Record> ListEditor<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            ids: IdGenerator::new(),
        }
    }

    /// Seed the editor with existing records.
    ///
    /// Records without an identifier, or repeating one already seen earlier in
    /// the list, get a fresh one. New identifiers are issued above the largest
    /// numeric identifier already present.
    #[must_use]
    pub fn from_items(items: Vec<T>) -> Self {
        let floor = items
            .iter()
            .filter_map(|item| item.id().parse::<u64>().ok())
            .max()
            .unwrap_or_default();
        let mut editor = Self {
            items,
            ids: IdGenerator::after(floor),
        };
        let mut seen = HashSet::new();
        for idx in 0..editor.items.len() {
            let id = editor.items[idx].id();
            if id.is_empty() || !seen.insert(id.to_string()) {
                let id = editor.fresh_id();
                seen.insert(id.clone());
                editor.items[idx].set_id(id);
            }
        }
        editor
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Append a blank record and return its identifier.
    pub fn add(&mut self) -> String {
        self.push_with(|_| {})
    }

    /// Append a blank record, let `init` fill it, and return its identifier.
    pub fn push_with(&mut self, init: impl FnOnce(&mut T)) -> String {
        let id = self.fresh_id();
        let mut record = T::blank(id.clone());
        init(&mut record);
        record.set_id(id.clone());
        self.items.push(record);
        id
    }

    /// Set one field of the record with the given identifier.
    pub fn update(&mut self, id: &str, field: &str, value: &str) -> Result<(), EditorError> {
        let record = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        record.set_field(field, value)?;
        Ok(())
    }

    /// Remove the record with the given identifier.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let idx = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(idx))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<'a, T: Record> IntoIterator for &'a ListEditor<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
