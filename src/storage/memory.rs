use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{decode_document, encode_document, NotesDocument, Persistence, STORAGE_KEY};
use crate::error::{Result, VoiceNotesError};

/// In-memory document store.
///
/// Clones share the same backing document, so a test can hand one clone to a
/// [`NotesStore`](crate::notes::NotesStore) and keep another to inspect what was
/// written or to make the next write fail.
#[derive(Clone, Default)]
pub struct MemoryStore {
    raw: Arc<Mutex<Option<String>>>,
    saves: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already persisted document.
    pub fn with_document(document: &NotesDocument) -> Result<Self> {
        let store = Self::new();
        store.put(encode_document(STORAGE_KEY, document)?)?;
        Ok(store)
    }

    /// Make every following `save` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The last persisted document, decoded.
    pub fn stored(&self) -> Result<Option<NotesDocument>> {
        self.load()
    }

    fn put(&self, raw: String) -> Result<()> {
        let mut slot = self
            .raw
            .lock()
            .map_err(|_| VoiceNotesError::Persistence("memory store poisoned".to_string()))?;
        *slot = Some(raw);
        Ok(())
    }
}

impl Persistence for MemoryStore {
    fn key(&self) -> &str {
        STORAGE_KEY
    }

    fn load(&self) -> Result<Option<NotesDocument>> {
        let slot = self
            .raw
            .lock()
            .map_err(|_| VoiceNotesError::Persistence("memory store poisoned".to_string()))?;
        slot.as_deref().map(decode_document).transpose()
    }

    fn save(&self, document: &NotesDocument) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VoiceNotesError::Persistence(
                "simulated write failure".to_string(),
            ));
        }
        self.put(encode_document(STORAGE_KEY, document)?)?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
