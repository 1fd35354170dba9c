use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::entity::Note;
use crate::error::{Result, VoiceNotesError};
use crate::status::NotesSnapshot;
use crate::storage::{NotesDocument, Persistence};

/// How a new note's id is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// Persisted counter; ids are never reused after a delete.
    #[default]
    Monotonic,
    /// `len(notes) + 1`, as older stored data was written. Deleting a note and
    /// adding another can hand out an id that is still in use.
    CollectionLength,
}

/// In-memory state captured before a mutation, restored if the write fails.
struct Checkpoint {
    notes: Vec<Note>,
    next_id: u32,
}

/// Sole owner of one instance's notes.
///
/// Every mutation is applied in memory, written through the persistence
/// adapter, and only then published to subscribers. A failed write restores
/// the previous in-memory state and publishes nothing.
pub struct NotesStore {
    notes: Vec<Note>,
    next_id: u32,
    id_policy: IdPolicy,
    persistence: Box<dyn Persistence>,
    status: watch::Sender<NotesSnapshot>,
}

impl NotesStore {
    /// Load the stored document, or start empty if there is none.
    pub fn load(persistence: Box<dyn Persistence>, id_policy: IdPolicy) -> Result<Self> {
        let document = persistence.load()?.unwrap_or_default();

        // A stored counter never goes behind ids already in use.
        let floor = next_id_after(&document.notes);
        let next_id = document.next_id.map_or(floor, |n| n.max(floor));

        tracing::debug!(
            key = persistence.key(),
            notes = document.notes.len(),
            next_id,
            ?id_policy,
            "notes store loaded"
        );

        let (status, _) = watch::channel(NotesSnapshot::new(document.notes.clone()));

        Ok(Self {
            notes: document.notes,
            next_id,
            id_policy,
            persistence,
            status,
        })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// First note with the given id, in collection order.
    pub fn get(&self, id: u32) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// The last published state.
    pub fn snapshot(&self) -> NotesSnapshot {
        self.status.borrow().clone()
    }

    /// Receive every state published after a successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<NotesSnapshot> {
        self.status.subscribe()
    }

    /// Append a new, not yet completed note. Content is stored as given.
    pub fn add_note(&mut self, content: &str) -> Result<Note> {
        if content.trim().is_empty() {
            return Err(VoiceNotesError::validation("content", "must not be empty"));
        }

        let (id, next_id) = self.assign_id()?;
        let checkpoint = self.checkpoint();
        let note = Note::new(id, content.to_string());
        self.next_id = next_id;
        self.notes.push(note.clone());

        self.commit(checkpoint, Some(note.clone()))?;
        tracing::info!(id = note.id, content = %note.content, "added voice note");
        Ok(note)
    }

    /// Mark the first note with `id` as completed. Completing it again is a
    /// no-op.
    pub fn complete_note(&mut self, id: u32) -> Result<()> {
        let index = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(VoiceNotesError::NoteNotFound(id))?;

        if self.notes[index].completed {
            tracing::debug!(id, "voice note already completed");
            return Ok(());
        }

        let checkpoint = self.checkpoint();
        self.notes[index].completed = true;

        self.commit(checkpoint, None)?;
        tracing::info!(id, "completed voice note");
        Ok(())
    }

    /// Remove every note with `id`. Returns how many were removed.
    pub fn delete_note(&mut self, id: u32) -> Result<usize> {
        let matching = self.notes.iter().filter(|n| n.id == id).count();
        if matching == 0 {
            return Err(VoiceNotesError::NoteNotFound(id));
        }

        let checkpoint = self.checkpoint();
        self.notes.retain(|n| n.id != id);

        self.commit(checkpoint, None)?;
        tracing::info!(id, removed = matching, "deleted voice note");
        Ok(matching)
    }

    /// The id for the next note and the counter value after handing it out.
    fn assign_id(&self) -> Result<(u32, u32)> {
        match self.id_policy {
            IdPolicy::Monotonic => {
                let next_id = self
                    .next_id
                    .checked_add(1)
                    .ok_or(VoiceNotesError::IdsExhausted)?;
                Ok((self.next_id, next_id))
            }
            IdPolicy::CollectionLength => {
                let id = u32::try_from(self.notes.len())
                    .ok()
                    .and_then(|len| len.checked_add(1))
                    .ok_or(VoiceNotesError::IdsExhausted)?;
                Ok((id, self.next_id.max(id.saturating_add(1))))
            }
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            notes: self.notes.clone(),
            next_id: self.next_id,
        }
    }

    fn commit(&mut self, checkpoint: Checkpoint, created: Option<Note>) -> Result<()> {
        let document = NotesDocument {
            notes: self.notes.clone(),
            next_id: Some(self.next_id),
        };

        if let Err(err) = self.persistence.save(&document) {
            tracing::warn!(error = %err, "saving notes failed, rolling back");
            self.notes = checkpoint.notes;
            self.next_id = checkpoint.next_id;
            return Err(match err {
                VoiceNotesError::Persistence(_) => err,
                other => VoiceNotesError::Persistence(other.to_string()),
            });
        }

        self.status.send_replace(NotesSnapshot {
            notes: document.notes,
            created,
        });
        Ok(())
    }
}

/// `u32::MAX` is never handed out by the monotonic counter; a counter at that
/// value is exhausted.
fn next_id_after(notes: &[Note]) -> u32 {
    notes
        .iter()
        .map(|n| n.id)
        .max()
        .map_or(1, |max| max.checked_add(1).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileStore, MemoryStore};
    use tempfile::TempDir;

    fn empty_store(policy: IdPolicy) -> (NotesStore, MemoryStore) {
        let backend = MemoryStore::new();
        let store = NotesStore::load(Box::new(backend.clone()), policy).unwrap();
        (store, backend)
    }

    fn store_with(contents: &[&str]) -> (NotesStore, MemoryStore) {
        let (mut store, backend) = empty_store(IdPolicy::Monotonic);
        for content in contents {
            store.add_note(content).unwrap();
        }
        (store, backend)
    }

    fn ids(store: &NotesStore) -> Vec<u32> {
        store.notes().iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_load_without_document_is_empty() {
        let (store, backend) = empty_store(IdPolicy::Monotonic);
        assert!(store.notes().is_empty());
        assert_eq!(store.next_id(), 1);
        assert_eq!(backend.saves(), 0);
    }

    #[test]
    fn test_add_first_note() {
        let (mut store, backend) = empty_store(IdPolicy::Monotonic);

        let note = store.add_note("buy milk").unwrap();

        assert_eq!(note.id, 1);
        assert_eq!(note.content, "buy milk");
        assert!(!note.completed);
        assert_eq!(store.notes().len(), 1);
        assert_eq!(store.snapshot().active_count(), 1);
        assert_eq!(backend.saves(), 1);
        assert_eq!(backend.stored().unwrap().unwrap().notes, vec![note]);
    }

    #[test]
    fn test_add_increases_total_by_one() {
        let (mut store, _backend) = store_with(&["a", "b"]);
        let before = store.notes().len();

        let note = store.add_note("c").unwrap();

        assert_eq!(store.notes().len(), before + 1);
        assert!(!note.completed);
        assert_eq!(store.notes().last(), Some(&note));
    }

    #[test]
    fn test_add_keeps_content_as_given() {
        let (mut store, backend) = empty_store(IdPolicy::Monotonic);
        let note = store.add_note("  call mom \n").unwrap();
        assert_eq!(note.content, "  call mom \n");
        assert_eq!(backend.stored().unwrap().unwrap().notes[0].content, "  call mom \n");
    }

    #[test]
    fn test_add_empty_content_rejected() {
        let (mut store, backend) = store_with(&["a"]);

        for content in ["", "   ", "\n\t"] {
            let result = store.add_note(content);
            assert!(matches!(
                result,
                Err(VoiceNotesError::Validation { ref field, .. }) if field == "content"
            ));
        }

        assert_eq!(ids(&store), vec![1]);
        assert_eq!(backend.saves(), 1);
    }

    #[test]
    fn test_complete_note() {
        let (mut store, _backend) = store_with(&["a", "b"]);

        store.complete_note(1).unwrap();

        assert!(store.get(1).unwrap().completed);
        assert!(!store.get(2).unwrap().completed);
        assert_eq!(store.snapshot().active_count(), 1);
    }

    #[test]
    fn test_complete_note_is_idempotent() {
        let (mut store, backend) = store_with(&["a", "b"]);

        store.complete_note(2).unwrap();
        let once = store.notes().to_vec();
        let saves = backend.saves();

        store.complete_note(2).unwrap();

        assert_eq!(store.notes(), once.as_slice());
        assert_eq!(backend.saves(), saves);
    }

    #[test]
    fn test_complete_missing_note() {
        let (mut store, backend) = store_with(&["a"]);
        let before = store.notes().to_vec();

        let result = store.complete_note(42);

        assert!(matches!(result, Err(VoiceNotesError::NoteNotFound(42))));
        assert_eq!(store.notes(), before.as_slice());
        assert_eq!(backend.saves(), 1);
    }

    #[test]
    fn test_delete_middle_note() {
        let (mut store, backend) = store_with(&["a", "b", "c"]);

        let removed = store.delete_note(2).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(ids(&store), vec![1, 3]);
        assert_eq!(store.snapshot().total(), 2);
        assert_eq!(backend.stored().unwrap().unwrap().notes.len(), 2);
    }

    #[test]
    fn test_delete_missing_note() {
        let (mut store, _backend) = store_with(&["a", "b"]);

        let result = store.delete_note(7);

        assert!(matches!(result, Err(VoiceNotesError::NoteNotFound(7))));
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_monotonic_ids_not_reused_after_delete() {
        let (mut store, _backend) = store_with(&["only"]);

        store.delete_note(1).unwrap();
        let note = store.add_note("x").unwrap();

        assert_eq!(note.id, 2);
    }

    #[test]
    fn test_collection_length_policy_reuses_ids() {
        let (mut store, _backend) = empty_store(IdPolicy::CollectionLength);
        store.add_note("only").unwrap();

        store.delete_note(1).unwrap();
        let note = store.add_note("x").unwrap();

        assert_eq!(note.id, 1);
    }

    #[test]
    fn test_duplicate_ids_complete_first_delete_all() {
        let (mut store, _backend) = empty_store(IdPolicy::CollectionLength);
        store.add_note("a").unwrap();
        store.add_note("b").unwrap();
        store.delete_note(1).unwrap();
        store.add_note("c").unwrap();
        assert_eq!(ids(&store), vec![2, 2]);

        store.complete_note(2).unwrap();
        assert!(store.notes()[0].completed);
        assert!(!store.notes()[1].completed);

        assert_eq!(store.delete_note(2).unwrap(), 2);
        assert!(store.notes().is_empty());
    }

    #[test]
    fn test_switching_policy_never_moves_counter_back() {
        let backend = MemoryStore::new();
        {
            let mut store =
                NotesStore::load(Box::new(backend.clone()), IdPolicy::CollectionLength).unwrap();
            store.add_note("a").unwrap();
            store.add_note("b").unwrap();
            store.delete_note(1).unwrap();
        }

        let mut store = NotesStore::load(Box::new(backend), IdPolicy::Monotonic).unwrap();
        assert_eq!(store.add_note("c").unwrap().id, 3);
    }

    #[test]
    fn test_legacy_document_without_counter() {
        let mut first = Note::new(4, "a".to_string());
        first.completed = true;
        let document = NotesDocument {
            notes: vec![first, Note::new(2, "b".to_string())],
            next_id: None,
        };
        let backend = MemoryStore::with_document(&document).unwrap();

        let mut store = NotesStore::load(Box::new(backend), IdPolicy::Monotonic).unwrap();

        assert_eq!(store.next_id(), 5);
        assert_eq!(store.add_note("c").unwrap().id, 5);
    }

    #[test]
    fn test_stale_counter_is_raised_to_existing_ids() {
        let document = NotesDocument {
            notes: vec![Note::new(9, "a".to_string())],
            next_id: Some(3),
        };
        let backend = MemoryStore::with_document(&document).unwrap();

        let store = NotesStore::load(Box::new(backend), IdPolicy::Monotonic).unwrap();
        assert_eq!(store.next_id(), 10);
    }

    #[test]
    fn test_add_rejected_when_ids_exhausted() {
        let document = NotesDocument {
            notes: vec![Note::new(u32::MAX, "last".to_string())],
            next_id: None,
        };
        let backend = MemoryStore::with_document(&document).unwrap();
        let mut store = NotesStore::load(Box::new(backend.clone()), IdPolicy::Monotonic).unwrap();

        for content in ["x", "y"] {
            let result = store.add_note(content);
            assert!(matches!(result, Err(VoiceNotesError::IdsExhausted)));
        }

        assert_eq!(ids(&store), vec![u32::MAX]);
        assert_eq!(store.next_id(), u32::MAX);
        assert_eq!(backend.saves(), 0);
    }

    #[test]
    fn test_last_monotonic_id_before_exhaustion() {
        let document = NotesDocument {
            notes: vec![Note::new(u32::MAX - 2, "a".to_string())],
            next_id: None,
        };
        let backend = MemoryStore::with_document(&document).unwrap();
        let mut store = NotesStore::load(Box::new(backend), IdPolicy::Monotonic).unwrap();

        assert_eq!(store.add_note("b").unwrap().id, u32::MAX - 1);
        assert!(matches!(store.add_note("c"), Err(VoiceNotesError::IdsExhausted)));
        assert_eq!(ids(&store), vec![u32::MAX - 2, u32::MAX - 1]);
    }

    #[test]
    fn test_failed_write_rolls_back_add() {
        let (mut store, backend) = store_with(&["a"]);
        let published = store.subscribe();
        backend.set_fail_writes(true);

        let result = store.add_note("b");

        assert!(matches!(result, Err(VoiceNotesError::Persistence(_))));
        assert_eq!(ids(&store), vec![1]);
        assert_eq!(store.next_id(), 2);
        assert!(!published.has_changed().unwrap());
        assert_eq!(backend.stored().unwrap().unwrap().notes.len(), 1);

        // The store is still usable once writes succeed again.
        backend.set_fail_writes(false);
        assert_eq!(store.add_note("b").unwrap().id, 2);
    }

    #[test]
    fn test_failed_write_rolls_back_complete_and_delete() {
        let (mut store, backend) = store_with(&["a", "b"]);
        backend.set_fail_writes(true);

        assert!(matches!(
            store.complete_note(1),
            Err(VoiceNotesError::Persistence(_))
        ));
        assert!(!store.get(1).unwrap().completed);

        assert!(matches!(
            store.delete_note(2),
            Err(VoiceNotesError::Persistence(_))
        ));
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_subscribers_see_each_mutation() {
        let (mut store, _backend) = empty_store(IdPolicy::Monotonic);
        let mut published = store.subscribe();

        let note = store.add_note("buy milk").unwrap();
        assert!(published.has_changed().unwrap());
        {
            let snapshot = published.borrow_and_update();
            assert_eq!(snapshot.total(), 1);
            assert_eq!(snapshot.created.as_ref(), Some(&note));
        }

        store.complete_note(note.id).unwrap();
        let snapshot = published.borrow_and_update();
        assert_eq!(snapshot.active_count(), 0);
        assert!(snapshot.created.is_none());
    }

    #[test]
    fn test_reload_from_disk_yields_equal_collection() {
        let tmp = TempDir::new().unwrap();
        let saved = {
            let backend = JsonFileStore::new(tmp.path(), "voice_notes");
            let mut store = NotesStore::load(Box::new(backend), IdPolicy::Monotonic).unwrap();
            store.add_note("buy milk").unwrap();
            store.add_note("call mom").unwrap();
            store.add_note("water plants").unwrap();
            store.complete_note(2).unwrap();
            store.delete_note(1).unwrap();
            store.notes().to_vec()
        };

        let backend = JsonFileStore::new(tmp.path(), "voice_notes");
        let store = NotesStore::load(Box::new(backend), IdPolicy::Monotonic).unwrap();

        assert_eq!(store.notes(), saved.as_slice());
        assert_eq!(store.next_id(), 4);
        assert_eq!(store.snapshot().notes, saved);
    }
}
