//! Line-oriented interactive chat.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::cli::{balance_line, print_balance, transport_for};
use crate::commands::{process_input, CommandResult};
use crate::core::session::ChatSession;

const PROMPT: &str = "> ";

pub async fn run_chat(mut session: ChatSession) -> Result<(), Box<dyn Error>> {
    let client = reqwest::Client::new();

    println!("AlokaHub chat · model {} · /help for commands", session.model());
    if session.settings().has_credentials() {
        print_balance(&session, &client).await;
    } else {
        println!("⚠️  No API key configured. Run 'alokahub set api-key <KEY>' first.");
    }
    if !session.conversation().is_empty() {
        println!(
            "Continuing a saved conversation ({} messages). /clear starts over.",
            session.conversation().len()
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt(&session)?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match process_input(&mut session, &line) {
            CommandResult::Continue => {}
            CommandResult::Notice(text) => println!("{text}"),
            CommandResult::ProcessAsMessage(text) => send(&mut session, &client, &text).await,
            CommandResult::Attach(paths) => attach(&mut session, &paths).await,
            CommandResult::CheckBalance => print_balance(&session, &client).await,
            CommandResult::Quit => break,
        }
    }

    Ok(())
}

fn print_prompt(session: &ChatSession) -> io::Result<()> {
    let queued = session.pending().len();
    if queued > 0 {
        print!("[{queued} file(s)] {PROMPT}");
    } else {
        print!("{PROMPT}");
    }
    io::stdout().flush()
}

async fn attach(session: &mut ChatSession, paths: &[PathBuf]) {
    let before = session.pending().len();
    let failures = session.attach_paths(paths).await;
    for failure in &failures {
        eprintln!("❌ {failure}");
    }

    let added = session.pending().len() - before;
    if added > 0 {
        println!("📎 Queued {added} file(s) for the next message.");
    }
}

async fn send(session: &mut ChatSession, client: &reqwest::Client, text: &str) {
    let transport = transport_for(session, client);
    let Some(reply) = session.send_turn(&transport, text).await else {
        debug!("nothing to send");
        return;
    };

    println!();
    println!("{}", reply.text());
    println!();

    if let Some(line) = balance_line(session, client).await {
        println!("{line}");
    }
}
