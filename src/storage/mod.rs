//! Persistence adapters for the notes document.
//!
//! A store instance owns exactly one document, identified by a storage key and
//! wrapped in a versioned envelope:
//!
//! ```json
//! { "version": 1, "key": "voice_notes", "data": { "notes": [], "next_id": 1 } }
//! ```

mod json_store;
mod memory;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::entity::Note;
use crate::error::{Result, VoiceNotesError};

/// Default storage key, also the file name under the storage directory.
pub const STORAGE_KEY: &str = "voice_notes";

/// The only document version this build reads or writes.
pub const STORAGE_VERSION: u32 = 1;

/// The persisted payload of one store instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesDocument {
    pub notes: Vec<Note>,
    /// Next id to hand out. Older documents do not carry it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    key: String,
    data: NotesDocument,
}

/// Durable home of a [`NotesDocument`].
///
/// `load` returning `Ok(None)` means nothing was ever saved, which is not an
/// error. Any failure to write must be reported as
/// [`VoiceNotesError::Persistence`].
pub trait Persistence: Send {
    fn key(&self) -> &str;
    fn load(&self) -> Result<Option<NotesDocument>>;
    fn save(&self, document: &NotesDocument) -> Result<()>;
}

pub(crate) fn encode_document(key: &str, document: &NotesDocument) -> Result<String> {
    let envelope = Envelope {
        version: STORAGE_VERSION,
        key: key.to_string(),
        data: document.clone(),
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

pub(crate) fn decode_document(raw: &str) -> Result<NotesDocument> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    if envelope.version != STORAGE_VERSION {
        return Err(VoiceNotesError::UnsupportedVersion {
            found: envelope.version,
            expected: STORAGE_VERSION,
        });
    }
    Ok(envelope.data)
}
