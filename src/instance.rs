//! One configured notes instance and everything it owns.
//!
//! The instance holds its store behind an async mutex so only one mutation is
//! in flight at a time. Reads go through the store's published snapshot and
//! never wait on that lock.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::command::{
    service, AddNoteIntentHandler, Intent, IntentResponse, ServiceCall, ServiceOutcome,
};
use crate::config::{storage_dir, Config};
use crate::entity::Note;
use crate::error::Result;
use crate::notes::NotesStore;
use crate::status::sensor::{self, SensorState};
use crate::status::NotesSnapshot;
use crate::storage::{JsonFileStore, Persistence, STORAGE_KEY};

#[derive(Clone)]
pub struct NotesInstance {
    config: Arc<Config>,
    store: Arc<Mutex<NotesStore>>,
    intent_handler: Arc<AddNoteIntentHandler>,
    status: watch::Receiver<NotesSnapshot>,
}

impl NotesInstance {
    /// Load the store through `persistence` and wire it up.
    pub fn setup(config: Config, persistence: Box<dyn Persistence>) -> Result<Self> {
        let store = NotesStore::load(persistence, config.id_policy)?;
        let status = store.subscribe();
        let intent_handler = AddNoteIntentHandler::new(config.responses.clone());

        tracing::info!(
            name = %config.name,
            entry_id = %config.entry_id,
            notes = store.notes().len(),
            "voice notes instance ready"
        );

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
            intent_handler: Arc::new(intent_handler),
            status,
        })
    }

    /// Open the configured project at `root`, stored on disk.
    pub fn open(root: &Path) -> Result<Self> {
        let config = Config::load(root)?;
        let persistence = JsonFileStore::new(&storage_dir(root), STORAGE_KEY);
        Self::setup(config, Box::new(persistence))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn add_note(&self, content: &str) -> Result<Note> {
        self.store.lock().await.add_note(content)
    }

    pub async fn complete_note(&self, id: u32) -> Result<()> {
        self.store.lock().await.complete_note(id)
    }

    pub async fn delete_note(&self, id: u32) -> Result<usize> {
        self.store.lock().await.delete_note(id)
    }

    pub async fn call_service(&self, call: &ServiceCall) -> Result<ServiceOutcome> {
        let mut store = self.store.lock().await;
        service::call(&mut store, call)
    }

    pub async fn handle_intent(&self, intent: &Intent) -> Result<IntentResponse> {
        let mut store = self.store.lock().await;
        self.intent_handler.handle(&mut store, intent)
    }

    /// The last published state.
    pub fn snapshot(&self) -> NotesSnapshot {
        self.status.borrow().clone()
    }

    /// A receiver that is notified after every successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<NotesSnapshot> {
        self.status.clone()
    }

    /// Both status sensors, rendered from the current snapshot.
    pub fn sensors(&self) -> Vec<SensorState> {
        sensor::render_all(&self.config.entry_id, &self.status.borrow())
    }
}
