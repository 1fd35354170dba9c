use clap::{Parser, Subcommand};

use crate::config::DEFAULT_NAME;

#[derive(Parser, Debug)]
#[command(name = "voice-notes")]
#[command(version, about = "Persistent voice notes with intent and service front ends")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set up a voice notes project in the current directory
    Init {
        /// Display name of this notes instance
        #[arg(long, default_value = DEFAULT_NAME)]
        name: String,

        /// Assign ids as note count + 1 (compatible with older stored data;
        /// ids can repeat after a delete)
        #[arg(long)]
        legacy_ids: bool,
    },

    /// Add a note
    Add {
        /// Note content
        content: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a note as completed
    Complete {
        /// Note id
        id: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a note
    Delete {
        /// Note id
        id: u32,

        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all notes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the status sensors
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Speak an AddVoiceNote intent, e.g. `voice-notes say buy milk`
    Say {
        /// Spoken note content
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
