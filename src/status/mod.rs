//! Read-only views over a notes collection.
//!
//! Nothing here caches: every view is recomputed from the notes it is given.

pub mod sensor;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::Note;

/// Aggregate counts plus the most recently appended note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub last_note: Option<Note>,
}

/// One row of the formatted notes list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteView {
    pub id: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

impl From<&Note> for NoteView {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            content: note.content.clone(),
            created_at: note.created_at,
            completed: note.completed,
        }
    }
}

pub fn active_count(notes: &[Note]) -> usize {
    notes.iter().filter(|n| n.is_active()).count()
}

pub fn summary(notes: &[Note]) -> Summary {
    let active = active_count(notes);
    Summary {
        total: notes.len(),
        active,
        completed: notes.len() - active,
        last_note: notes.last().cloned(),
    }
}

/// The full collection in store order.
pub fn formatted_list(notes: &[Note]) -> Vec<NoteView> {
    notes.iter().map(NoteView::from).collect()
}

/// State published by a store after each successful mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotesSnapshot {
    pub notes: Vec<Note>,
    /// The note created by the mutation that produced this snapshot, if it
    /// was an add.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Note>,
}

impl NotesSnapshot {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes,
            created: None,
        }
    }

    pub fn total(&self) -> usize {
        self.notes.len()
    }

    pub fn active_count(&self) -> usize {
        active_count(&self.notes)
    }

    pub fn summary(&self) -> Summary {
        summary(&self.notes)
    }

    pub fn formatted_list(&self) -> Vec<NoteView> {
        formatted_list(&self.notes)
    }
}
