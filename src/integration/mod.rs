//! Integration layer
//!
//! Wires configuration, speech adapter, mailbox transport and dialogue
//! controller together and runs them on a worker thread.

pub mod config;
pub mod orchestrator;

pub use config::{DialogueConfig, MailboxConfig, MailboxRoutes, SpeechConfig, SummarizeSource, VoxmailConfig};
pub use orchestrator::{ControllerCommand, ControllerEvent, Orchestrator, OrchestratorHandle};
