use std::env;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use voice_notes::cli::{
    handle_add, handle_complete, handle_delete, handle_init, handle_list, handle_say,
    handle_status, Cli, Commands,
};

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { name, legacy_ids } => handle_init(name, legacy_ids),
        Commands::Add { content, json } => handle_add(content, json).await,
        Commands::Complete { id, json } => handle_complete(id, json).await,
        Commands::Delete { id, force, json } => handle_delete(id, force, json).await,
        Commands::List { json } => handle_list(json),
        Commands::Status { json } => handle_status(json),
        Commands::Say { words, json } => handle_say(words, json).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("VOICE_NOTES_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "voice_notes=debug"
        } else {
            "voice_notes=warn"
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
