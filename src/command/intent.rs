//! The `AddVoiceNote` voice intent.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ResponseTemplates;
use crate::entity::Note;
use crate::error::{Result, VoiceNotesError};
use crate::notes::NotesStore;

pub const INTENT_ADD_NOTE: &str = "AddVoiceNote";

/// A recognized voice command with its filled slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub intent_type: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub value: Value,
}

impl Intent {
    pub fn new(intent_type: &str) -> Self {
        Self {
            intent_type: intent_type.to_string(),
            slots: HashMap::new(),
        }
    }

    /// An `AddVoiceNote` intent with its `content` slot filled.
    pub fn add_note(content: &str) -> Self {
        Self::new(INTENT_ADD_NOTE).with_slot("content", Value::String(content.to_string()))
    }

    pub fn with_slot(mut self, name: &str, value: Value) -> Self {
        self.slots.insert(name.to_string(), Slot { value });
        self
    }

    /// Text value of a slot; scalars are rendered as text.
    pub fn slot_text(&self, name: &str) -> Option<String> {
        match &self.slots.get(name)?.value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentResponse {
    pub speech: String,
    /// The note that was added, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,
}

pub struct AddNoteIntentHandler {
    responses: ResponseTemplates,
}

impl AddNoteIntentHandler {
    pub fn new(responses: ResponseTemplates) -> Self {
        Self { responses }
    }

    pub fn intent_type(&self) -> &'static str {
        INTENT_ADD_NOTE
    }

    /// Add the spoken note. Missing content gets an apology and leaves the
    /// store alone.
    pub fn handle(&self, store: &mut NotesStore, intent: &Intent) -> Result<IntentResponse> {
        if intent.intent_type != INTENT_ADD_NOTE {
            return Err(VoiceNotesError::UnknownIntent(intent.intent_type.clone()));
        }

        let content = intent.slot_text("content").unwrap_or_default();
        if content.trim().is_empty() {
            tracing::warn!("voice note intent without content");
            return Ok(IntentResponse {
                speech: self.responses.missing_content.clone(),
                note: None,
            });
        }

        let note = store.add_note(&content)?;
        Ok(IntentResponse {
            speech: self.responses.acknowledge(&note.content),
            note: Some(note),
        })
    }
}
