// src/entity/note.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u32,
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Absent in partially written documents; treated as not completed.
    #[serde(default)]
    pub completed: bool,
}

impl Note {
    pub fn new(id: u32, content: String) -> Self {
        Self {
            id,
            content,
            created_at: Utc::now(),
            completed: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}
