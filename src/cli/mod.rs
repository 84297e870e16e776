//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod model_list;
pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::balance::fetch_balance;
use crate::api::HttpTransport;
use crate::cli::chat::run_chat;
use crate::cli::model_list::list_models;
use crate::cli::say::run_say;
use crate::cli::settings::{SettingError, SettingRegistry};
use crate::core::message::Role;
use crate::core::session::ChatSession;
use crate::core::store::{path_display, FileStore};
use crate::utils::logging;

#[derive(Parser)]
#[command(name = "alokahub")]
#[command(about = "A terminal chat client for the AlokaHub AI gateway")]
#[command(
    long_about = "AlokaHub is a chat client for an OpenAI-compatible gateway. Messages can carry \
images, PDFs, Word documents and text files; documents are converted to text locally and \
sent along with your message.\n\n\
Settings are kept in a small state file together with the conversation history.\n\n\
Environment Variables (used when no value is stored):\n\
  OPENAI_API_KEY    Your API key\n\
  OPENAI_BASE_URL   Custom API base URL (defaults to https://ai.alokahub.com/)\n\
  ALOKAHUB_LOG      Diagnostic log filter, e.g. 'alokahub=debug'\n\n\
Chat commands:\n\
  /attach <path>    Queue files for the next message\n\
  /files            List queued files\n\
  /balance          Show remaining credits\n\
  /help             Show all commands"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for this run instead of the saved default
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Path of the state file (settings and history)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Print diagnostic logs to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// Files to attach to the message
        #[arg(short = 'a', long = "attach", value_name = "FILE")]
        attach: Vec<PathBuf>,
        /// Message text
        #[arg(trailing_var_arg = true)]
        prompt: Vec<String>,
    },
    /// Set a stored setting
    Set {
        /// Setting key (see `alokahub show`)
        key: String,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Reset a stored setting to its default
    Unset {
        /// Setting key to reset
        key: String,
    },
    /// Show all stored settings
    Show,
    /// Print the saved conversation
    History,
    /// Delete the saved conversation
    Clear,
    /// Show the remaining credits for the configured key
    Balance,
    /// List the built-in models
    Models,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let mut session = open_session(args.store)?;
    if let Some(model) = args.model {
        session.set_model(model);
    }

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(session).await,
        Commands::Say { attach, prompt } => run_say(session, attach, prompt).await,
        Commands::Set { key, value } => {
            apply_setting(&mut session, &key, |handler, session| {
                handler.set(&value, session)
            });
            if matches!(key.as_str(), "base-url" | "api-key") {
                if let Some(line) = balance_line(&session, &reqwest::Client::new()).await {
                    println!("{line}");
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            apply_setting(&mut session, &key, |handler, session| handler.unset(session));
            Ok(())
        }
        Commands::Show => {
            print!("{}", format_settings(&session));
            Ok(())
        }
        Commands::History => {
            print_history(&session);
            Ok(())
        }
        Commands::Clear => {
            session.clear_history()?;
            println!("✅ Conversation cleared");
            Ok(())
        }
        Commands::Balance => {
            print_balance(&session, &reqwest::Client::new()).await;
            Ok(())
        }
        Commands::Models => {
            list_models(&session);
            Ok(())
        }
    }
}

fn open_session(store_path: Option<PathBuf>) -> Result<ChatSession, Box<dyn Error>> {
    let path = match store_path.or_else(FileStore::default_path) {
        Some(path) => path,
        None => return Err("could not determine a data directory; pass --store <PATH>".into()),
    };
    let store = FileStore::open(path)?;
    Ok(ChatSession::load(Box::new(store))?)
}

fn apply_setting<F>(session: &mut ChatSession, key: &str, op: F)
where
    F: FnOnce(
        &dyn settings::SettingHandler,
        &mut ChatSession,
    ) -> Result<String, SettingError>,
{
    let registry = SettingRegistry::new();
    let result = match registry.get(key) {
        Some(handler) => op(handler, session),
        None => Err(SettingError::UnknownKey(key.to_string())),
    };

    match result {
        Ok(message) => println!("{message}"),
        Err(err) => {
            err.print();
            std::process::exit(1);
        }
    }
}

pub(crate) fn format_settings(session: &ChatSession) -> String {
    let registry = SettingRegistry::new();
    let mut output = String::from("Current settings:\n");
    for key in registry.keys_display_order() {
        if let Some(handler) = registry.get(key) {
            output.push_str(&handler.format(session));
            output.push('\n');
        }
    }
    if let Some(path) = FileStore::default_path() {
        output.push_str(&format!("\nDefault state file: {}\n", path_display(path)));
    }
    output
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::System => "System",
        Role::User => "You",
        Role::Assistant => "Assistant",
    }
}

pub(crate) fn print_history(session: &ChatSession) {
    let conversation = session.conversation();
    if conversation.is_empty() {
        println!("No saved conversation.");
        return;
    }

    for message in conversation.messages() {
        println!("{}:", role_label(message.role));
        let text = message.text();
        if !text.is_empty() {
            println!("{text}");
        }
        match message.image_count() {
            0 => {}
            1 => println!("[1 image]"),
            n => println!("[{n} images]"),
        }
        println!();
    }
}

/// Balance line for the configured key. `None` when no key is set or the
/// lookup fails.
pub(crate) async fn balance_line(
    session: &ChatSession,
    client: &reqwest::Client,
) -> Option<String> {
    let settings = session.settings();
    let api_key = settings.api_key.as_deref()?;
    let credits = fetch_balance(client, &settings.base_url, api_key).await?;
    Some(format!("💳 Credits: {credits}"))
}

/// Prints the balance line, or a short notice when it cannot be determined.
pub(crate) async fn print_balance(session: &ChatSession, client: &reqwest::Client) {
    let settings = session.settings();
    let Some(api_key) = settings.api_key.as_deref() else {
        println!("⚠️  No API key configured. Run 'alokahub set api-key <KEY>'.");
        return;
    };

    match fetch_balance(client, &settings.base_url, api_key).await {
        Some(credits) => println!("💳 Credits: {credits}"),
        None => println!("💳 Credits: unavailable"),
    }
}

pub(crate) fn transport_for(session: &ChatSession, client: &reqwest::Client) -> HttpTransport {
    let settings = session.settings();
    HttpTransport::new(
        client.clone(),
        settings.base_url.clone(),
        settings.api_key.clone(),
    )
}
