pub mod attachment;
pub mod conversation;
pub mod ingest;
pub mod message;
pub mod orchestrator;
pub mod session;
pub mod settings;
pub mod store;
