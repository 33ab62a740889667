use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// A free-text note attached to an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteModel {
    /// Generated once on creation, never changes
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Username of the actor who added the note
    pub created_by: String,
    /// Set on first edit, stays set
    pub is_updated: bool,
    pub updated_by: Option<String>,
}

impl Identifiable for NoteModel {
    type Id = Uuid;

    fn get_id(&self) -> Uuid {
        self.id
    }
}

/// Error returned when a note id is not part of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteNotFound(pub Uuid);

impl std::fmt::Display for NoteNotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Note with ID {} not found", self.0)
    }
}

impl std::error::Error for NoteNotFound {}

/// Ordered notes of one application.
///
/// Insertion order is preserved; notes are only appended, edited in place or
/// removed individually.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteSequence(Vec<NoteModel>);

impl NoteSequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a new note and returns it
    pub fn append(&mut self, text: &str, actor: &str, now: DateTime<Utc>) -> &NoteModel {
        self.0.push(NoteModel {
            id: Uuid::new_v4(),
            text: text.to_string(),
            created_at: now,
            created_by: actor.to_string(),
            is_updated: false,
            updated_by: None,
        });
        let last = self.0.len() - 1;
        &self.0[last]
    }

    /// Replaces the text of the note with `id`, marking it as edited by `actor`
    pub fn update(&mut self, id: Uuid, text: &str, actor: &str) -> Result<&NoteModel, NoteNotFound> {
        let note = self
            .0
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(NoteNotFound(id))?;
        note.text = text.to_string();
        note.is_updated = true;
        note.updated_by = Some(actor.to_string());
        Ok(note)
    }

    /// Removes exactly the note with `id`, keeping the order of the others
    pub fn remove(&mut self, id: Uuid) -> Result<NoteModel, NoteNotFound> {
        let position = self
            .0
            .iter()
            .position(|n| n.id == id)
            .ok_or(NoteNotFound(id))?;
        Ok(self.0.remove(position))
    }

    pub fn get(&self, id: Uuid) -> Option<&NoteModel> {
        self.0.iter().find(|n| n.id == id)
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.0.iter().map(|n| n.id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteModel> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<NoteModel>> for NoteSequence {
    fn from(notes: Vec<NoteModel>) -> Self {
        Self(notes)
    }
}

impl<'a> IntoIterator for &'a NoteSequence {
    type Item = &'a NoteModel;
    type IntoIter = std::slice::Iter<'a, NoteModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
