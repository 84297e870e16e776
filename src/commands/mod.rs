//! Slash commands available inside the interactive chat.
//!
//! Handlers run synchronously against the session. Anything that needs I/O
//! (ingesting files, the balance lookup) is returned as a [`CommandResult`]
//! for the chat loop to carry out.

mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation};

use std::path::PathBuf;

use crate::core::attachment::AttachmentKind;
use crate::core::session::ChatSession;
use crate::core::settings::BUILTIN_MODELS;

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    Notice(String),
    ProcessAsMessage(String),
    Attach(Vec<PathBuf>),
    CheckBalance,
    Quit,
}

pub fn process_input(session: &mut ChatSession, input: &str) -> CommandResult {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return CommandResult::Continue;
    }

    let Some(command_line) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = command_line.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match find_command(command_name) {
        Some(command) => (command.handler)(session, CommandInvocation { args }),
        None => CommandResult::Notice(format!(
            "Unknown command: /{command_name}. Type /help for a list."
        )),
    }
}

pub fn help_text() -> String {
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    let mut help = String::from("Commands:\n");
    for command in all_commands() {
        help.push_str(&format!("  {:width$}  {}\n", command.usage, command.help));
    }
    help.push_str("Anything else is sent to the model together with queued files.");
    help
}

pub(super) fn handle_help(
    _session: &mut ChatSession,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Notice(help_text())
}

pub(super) fn handle_attach(
    _session: &mut ChatSession,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let paths: Vec<PathBuf> = invocation
        .args
        .split_whitespace()
        .map(PathBuf::from)
        .collect();
    if paths.is_empty() {
        return CommandResult::Notice("Usage: /attach <path>...".to_string());
    }
    CommandResult::Attach(paths)
}

pub(super) fn handle_detach(
    session: &mut ChatSession,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let name = invocation.args;
    if name.is_empty() {
        return CommandResult::Notice("Usage: /detach <name>".to_string());
    }
    match session.detach(name) {
        Some(removed) => CommandResult::Notice(format!("Removed {}", removed.name)),
        None => CommandResult::Notice(format!("No queued file named {name}")),
    }
}

pub(super) fn handle_files(
    session: &mut ChatSession,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    if session.pending().is_empty() {
        return CommandResult::Notice("No files queued.".to_string());
    }

    let lines: Vec<String> = session
        .pending()
        .iter()
        .map(|attachment| match attachment.kind {
            AttachmentKind::Image => format!("  🖼  {}", attachment.name),
            AttachmentKind::Text => format!(
                "  📄 {} ({} chars)",
                attachment.name,
                attachment.payload.chars().count()
            ),
        })
        .collect();
    CommandResult::Notice(format!("Queued files:\n{}", lines.join("\n")))
}

pub(super) fn handle_model(
    session: &mut ChatSession,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let requested = invocation.args;
    if requested.is_empty() {
        return CommandResult::Notice(format!(
            "Current model: {}\nBuilt-in models: {}",
            session.model(),
            BUILTIN_MODELS.join(", ")
        ));
    }
    session.set_model(requested);
    CommandResult::Notice(format!("Model set to {requested} for this session."))
}

pub(super) fn handle_balance(
    _session: &mut ChatSession,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::CheckBalance
}

pub(super) fn handle_clear(
    session: &mut ChatSession,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    match session.clear_history() {
        Ok(()) => CommandResult::Notice("History cleared.".to_string()),
        Err(err) => CommandResult::Notice(format!("❌ Could not clear history: {err}")),
    }
}

pub(super) fn handle_quit(
    _session: &mut ChatSession,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Quit
}
