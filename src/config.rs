use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoiceNotesError};
use crate::notes::IdPolicy;

/// Per-project directory holding config and stored notes.
pub const PROJECT_DIR: &str = ".voice_notes";
const CONFIG_FILE: &str = "config.yaml";
const STORAGE_DIR: &str = "storage";

pub const DEFAULT_NAME: &str = "Voice Notes";

/// Configuration of one notes instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_name")]
    pub name: String,
    /// Stable identifier of this instance, used for sensor ids.
    #[serde(default = "generate_entry_id")]
    pub entry_id: String,
    #[serde(default)]
    pub id_policy: IdPolicy,
    #[serde(default)]
    pub responses: ResponseTemplates,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_NAME.to_string())
    }
}

/// Spoken replies of the voice intent. `{content}` is replaced with the note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTemplates {
    #[serde(default = "default_acknowledgement")]
    pub acknowledgement: String,
    #[serde(default = "default_missing_content")]
    pub missing_content: String,
}

impl Default for ResponseTemplates {
    fn default() -> Self {
        Self {
            acknowledgement: default_acknowledgement(),
            missing_content: default_missing_content(),
        }
    }
}

impl ResponseTemplates {
    pub fn acknowledge(&self, content: &str) -> String {
        self.acknowledgement.replace("{content}", content)
    }
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn generate_entry_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn default_acknowledgement() -> String {
    "好的，我已经记下了：{content}".to_string()
}

fn default_missing_content() -> String {
    "抱歉，我没有听到笔记内容。".to_string()
}

impl Config {
    pub fn new(name: String) -> Self {
        Self {
            name,
            entry_id: generate_entry_id(),
            id_policy: IdPolicy::default(),
            responses: ResponseTemplates::default(),
        }
    }

    /// Create the project directory under `root` and write `config`.
    ///
    /// Only one instance is allowed per project.
    pub fn init(root: &Path, config: &Config) -> Result<()> {
        let dir = project_dir(root);
        if dir.exists() {
            return Err(VoiceNotesError::AlreadyConfigured);
        }

        fs::create_dir_all(&dir)?;
        config.save(root)
    }

    /// Read the config of the project at `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let dir = project_dir(root);
        if !dir.exists() {
            return Err(VoiceNotesError::NotConfigured);
        }

        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = project_dir(root).join(CONFIG_FILE);
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

pub fn project_dir(root: &Path) -> PathBuf {
    root.join(PROJECT_DIR)
}

/// Directory the notes document is stored in.
pub fn storage_dir(root: &Path) -> PathBuf {
    project_dir(root).join(STORAGE_DIR)
}
