use super::CommandResult;
use crate::core::session::ChatSession;

pub type CommandHandler = fn(&mut ChatSession, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands().iter().find(|command| {
        command.name.eq_ignore_ascii_case(name)
            || command
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
    })
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        aliases: &["?"],
        usage: "/help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "attach",
        aliases: &[],
        usage: "/attach <path>...",
        help: "Queue files (images, PDF, .docx, text) for the next message.",
        handler: super::handle_attach,
    },
    Command {
        name: "detach",
        aliases: &[],
        usage: "/detach <name>",
        help: "Remove a queued file by name.",
        handler: super::handle_detach,
    },
    Command {
        name: "files",
        aliases: &[],
        usage: "/files",
        help: "List files queued for the next message.",
        handler: super::handle_files,
    },
    Command {
        name: "model",
        aliases: &[],
        usage: "/model [name]",
        help: "Show or switch the model for this session.",
        handler: super::handle_model,
    },
    Command {
        name: "balance",
        aliases: &[],
        usage: "/balance",
        help: "Show the remaining credits for the configured key.",
        handler: super::handle_balance,
    },
    Command {
        name: "clear",
        aliases: &[],
        usage: "/clear",
        help: "Clear the conversation history.",
        handler: super::handle_clear,
    },
    Command {
        name: "quit",
        aliases: &["exit", "q"],
        usage: "/quit",
        help: "Leave the chat.",
        handler: super::handle_quit,
    },
];
