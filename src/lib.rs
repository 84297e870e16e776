//! AlokaHub is a multimodal chat client for chat-completions compatible
//! endpoints.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the message model, settings and persistence, the file
//!   ingestion pipeline, request composition, and the chat session that ties
//!   them together.
//! - [`api`] defines the wire payloads and performs the HTTP calls (chat
//!   completion and the best-effort balance lookup).
//! - [`commands`] implements the slash commands available inside `chat`.
//! - [`cli`] parses command-line arguments and drives a session from the
//!   terminal.
//!
//! The binary (`src/main.rs`) only calls [`cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod utils;
