pub mod cli;
pub mod command;
pub mod config;
pub mod entity;
pub mod error;
pub mod instance;
pub mod notes;
pub mod status;
pub mod storage;

pub use config::Config;
pub use entity::Note;
pub use error::{Result, VoiceNotesError};
pub use instance::NotesInstance;
pub use notes::{IdPolicy, NotesStore};
