use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceNotesError {
    #[error("Not in a voice-notes project. Run 'voice-notes init' first.")]
    NotConfigured,

    #[error("Already configured. Remove .voice_notes/ to reconfigure.")]
    AlreadyConfigured,

    #[error("Validation failed for field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Note not found: {0}")]
    NoteNotFound(u32),

    #[error("No note ids left to assign")]
    IdsExhausted,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Unsupported storage version {found} (this build reads version {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Unknown intent: {0}")]
    UnknownIntent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl VoiceNotesError {
    /// Shorthand for a `Validation` error.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        VoiceNotesError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VoiceNotesError>;
