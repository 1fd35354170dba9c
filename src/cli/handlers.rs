use std::env;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::command::service::{SERVICE_ADD_NOTE, SERVICE_COMPLETE_NOTE, SERVICE_DELETE_NOTE};
use crate::command::{Intent, ServiceCall, ServiceOutcome};
use crate::config::{Config, PROJECT_DIR};
use crate::error::{Result, VoiceNotesError};
use crate::instance::NotesInstance;
use crate::notes::IdPolicy;
use crate::status::sensor::format_sensor;

/// Find the project root by walking up from the cwd to the nearest .voice_notes/
fn find_project_root() -> Result<PathBuf> {
    let cwd = env::current_dir()?;

    cwd.ancestors()
        .find(|dir| dir.join(PROJECT_DIR).is_dir())
        .map(Path::to_path_buf)
        .ok_or(VoiceNotesError::NotConfigured)
}

fn open_instance() -> Result<NotesInstance> {
    NotesInstance::open(&find_project_root()?)
}

fn print_outcome(outcome: &ServiceOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match outcome {
        ServiceOutcome::Added { note } => println!("Added note {:03} - {}", note.id, note.content),
        ServiceOutcome::Completed { note_id } => println!("Completed note {:03}", note_id),
        ServiceOutcome::Deleted { note_id, removed } if *removed > 1 => {
            println!("Deleted {} notes with id {:03}", removed, note_id)
        }
        ServiceOutcome::Deleted { note_id, .. } => println!("Deleted note {:03}", note_id),
    }
    Ok(())
}

pub fn handle_init(name: String, legacy_ids: bool) -> Result<()> {
    let root = env::current_dir()?;

    let mut config = Config::new(name);
    if legacy_ids {
        config.id_policy = IdPolicy::CollectionLength;
    }
    Config::init(&root, &config)?;

    println!(
        "Initialized voice notes '{}' in {}",
        config.name,
        root.display()
    );
    Ok(())
}

pub async fn handle_add(content: String, json: bool) -> Result<()> {
    let instance = open_instance()?;
    let outcome = instance
        .call_service(&ServiceCall::new(SERVICE_ADD_NOTE, json!({ "content": content })))
        .await?;
    print_outcome(&outcome, json)
}

pub async fn handle_complete(id: u32, json: bool) -> Result<()> {
    let instance = open_instance()?;
    let outcome = instance
        .call_service(&ServiceCall::new(SERVICE_COMPLETE_NOTE, json!({ "note_id": id })))
        .await?;
    print_outcome(&outcome, json)
}

pub async fn handle_delete(id: u32, force: bool, json: bool) -> Result<()> {
    let instance = open_instance()?;

    let note = instance
        .snapshot()
        .notes
        .into_iter()
        .find(|n| n.id == id)
        .ok_or(VoiceNotesError::NoteNotFound(id))?;

    // Confirm deletion unless --force is used
    if !force {
        eprintln!("Delete note {:03} - {}? [y/N] ", note.id, note.content);

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(VoiceNotesError::validation(
                "force",
                "use --force to delete in non-interactive mode",
            ));
        }
    }

    let outcome = instance
        .call_service(&ServiceCall::new(SERVICE_DELETE_NOTE, json!({ "note_id": id })))
        .await?;
    print_outcome(&outcome, json)
}

pub fn handle_list(json: bool) -> Result<()> {
    let instance = open_instance()?;
    let snapshot = instance.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot.formatted_list())?);
    } else if snapshot.notes.is_empty() {
        println!("No notes found.");
    } else {
        let summary = snapshot.summary();
        println!(
            "Notes ({} active, {} total):\n",
            summary.active, summary.total
        );
        for note in snapshot.formatted_list() {
            println!(
                "  {:03} [{}] {}",
                note.id,
                if note.completed { "x" } else { " " },
                note.content
            );
            println!(
                "      created: {}",
                note.created_at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    Ok(())
}

pub fn handle_status(json: bool) -> Result<()> {
    let instance = open_instance()?;
    let sensors = instance.sensors();

    if json {
        println!("{}", serde_json::to_string_pretty(&sensors)?);
    } else {
        println!("{}", instance.config().name);
        for sensor in &sensors {
            println!("  {}", format_sensor(sensor));
        }
    }

    Ok(())
}

pub async fn handle_say(words: Vec<String>, json: bool) -> Result<()> {
    let instance = open_instance()?;
    let intent = Intent::add_note(&words.join(" "));
    let response = instance.handle_intent(&intent).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", response.speech);
    }

    Ok(())
}
