//! Named services: `add_note`, `complete_note` and `delete_note`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::Note;
use crate::error::{Result, VoiceNotesError};
use crate::notes::NotesStore;

pub const DOMAIN: &str = "voice_notes";

pub const SERVICE_ADD_NOTE: &str = "add_note";
pub const SERVICE_COMPLETE_NOTE: &str = "complete_note";
pub const SERVICE_DELETE_NOTE: &str = "delete_note";

pub const SERVICES: &[&str] = &[SERVICE_ADD_NOTE, SERVICE_COMPLETE_NOTE, SERVICE_DELETE_NOTE];

/// A raw service invocation, as it arrives from the automation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    #[serde(default)]
    pub data: Value,
}

impl ServiceCall {
    pub fn new(service: &str, data: Value) -> Self {
        Self {
            domain: DOMAIN.to_string(),
            service: service.to_string(),
            data,
        }
    }
}

/// A service call whose parameters passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceRequest {
    AddNote { content: String },
    CompleteNote { note_id: u32 },
    DeleteNote { note_id: u32 },
}

impl ServiceRequest {
    /// Validate a raw call against the service's parameter schema.
    pub fn parse(call: &ServiceCall) -> Result<Self> {
        if call.domain != DOMAIN || !SERVICES.contains(&call.service.as_str()) {
            return Err(VoiceNotesError::UnknownService(format!(
                "{}.{}",
                call.domain, call.service
            )));
        }

        match call.service.as_str() {
            SERVICE_ADD_NOTE => Ok(ServiceRequest::AddNote {
                content: required_string(&call.data, "content")?,
            }),
            SERVICE_COMPLETE_NOTE => Ok(ServiceRequest::CompleteNote {
                note_id: required_positive_int(&call.data, "note_id")?,
            }),
            _ => Ok(ServiceRequest::DeleteNote {
                note_id: required_positive_int(&call.data, "note_id")?,
            }),
        }
    }
}

/// What a successful service call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ServiceOutcome {
    Added { note: Note },
    Completed { note_id: u32 },
    Deleted { note_id: u32, removed: usize },
}

/// Validate and run a service call.
///
/// Every failure is returned to the caller; rejected calls and unknown note
/// ids are also logged.
pub fn call(store: &mut NotesStore, call: &ServiceCall) -> Result<ServiceOutcome> {
    let request = ServiceRequest::parse(call).map_err(|e| {
        tracing::warn!(service = %call.service, error = %e, "rejected service call");
        e
    })?;
    execute(store, request)
}

pub fn execute(store: &mut NotesStore, request: ServiceRequest) -> Result<ServiceOutcome> {
    let result = match request {
        ServiceRequest::AddNote { content } => store
            .add_note(&content)
            .map(|note| ServiceOutcome::Added { note }),
        ServiceRequest::CompleteNote { note_id } => store
            .complete_note(note_id)
            .map(|()| ServiceOutcome::Completed { note_id }),
        ServiceRequest::DeleteNote { note_id } => store
            .delete_note(note_id)
            .map(|removed| ServiceOutcome::Deleted { note_id, removed }),
    };

    if let Err(ref err) = result {
        match err {
            VoiceNotesError::NoteNotFound(id) => {
                tracing::warn!(note_id = id, "note with id {} not found", id)
            }
            other => tracing::warn!(error = %other, "service call failed"),
        }
    }
    result
}

fn required_string(data: &Value, field: &str) -> Result<String> {
    match data.get(field) {
        None | Some(Value::Null) => Err(VoiceNotesError::validation(field, "required")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(VoiceNotesError::validation(field, "expected a string")),
    }
}

fn required_positive_int(data: &Value, field: &str) -> Result<u32> {
    let raw = match data.get(field) {
        None | Some(Value::Null) => return Err(VoiceNotesError::validation(field, "required")),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    match raw.map(u32::try_from) {
        Some(Ok(n)) if n > 0 => Ok(n),
        _ => Err(VoiceNotesError::validation(
            field,
            "expected a positive integer",
        )),
    }
}
