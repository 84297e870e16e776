//! One-shot "say" command

use std::error::Error;
use std::path::PathBuf;

use crate::cli::transport_for;
use crate::core::message::ERROR_PREFIX;
use crate::core::session::ChatSession;

/// Sends a single turn (with optional attachments) as if typed into the chat,
/// prints the reply and records both in the saved conversation.
pub async fn run_say(
    mut session: ChatSession,
    attach: Vec<PathBuf>,
    prompt: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() && attach.is_empty() {
        eprintln!("Usage: alokahub say [-a FILE]... <prompt>");
        std::process::exit(1);
    }

    let failures = session.attach_paths(&attach).await;
    for failure in &failures {
        eprintln!("❌ {failure}");
    }
    if prompt.trim().is_empty() && session.pending().is_empty() {
        std::process::exit(1);
    }

    let client = reqwest::Client::new();
    let transport = transport_for(&session, &client);
    let Some(reply) = session.send_turn(&transport, &prompt).await else {
        return Ok(());
    };

    let text = reply.text();
    if text.starts_with(ERROR_PREFIX) {
        eprintln!("{text}");
        std::process::exit(1);
    }
    println!("{text}");
    Ok(())
}
