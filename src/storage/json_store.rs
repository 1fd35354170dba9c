use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{decode_document, encode_document, NotesDocument, Persistence};
use crate::error::{Result, VoiceNotesError};

/// File-backed document store: one JSON file per storage key.
pub struct JsonFileStore {
    key: String,
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(storage_dir: &Path, key: &str) -> Self {
        Self {
            key: key.to_string(),
            path: storage_dir.join(key),
        }
    }

    /// Path of the document file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            e
        })
    }
}

impl Persistence for JsonFileStore {
    fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Result<Option<NotesDocument>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no stored notes document");
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)?;
        let document = decode_document(&raw)?;
        tracing::debug!(
            path = %self.path.display(),
            notes = document.notes.len(),
            "loaded notes document"
        );
        Ok(Some(document))
    }

    fn save(&self, document: &NotesDocument) -> Result<()> {
        let contents = encode_document(&self.key, document)?;
        self.write_atomic(&contents).map_err(|e| {
            VoiceNotesError::Persistence(format!("writing {}: {}", self.path.display(), e))
        })?;
        tracing::debug!(
            path = %self.path.display(),
            notes = document.notes.len(),
            "saved notes document"
        );
        Ok(())
    }
}
