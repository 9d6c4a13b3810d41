//! Voxmail - operate an email mailbox entirely by voice
//!
//! The crate is built around a single-threaded dialogue controller that turns
//! speech recognition results into mailbox actions (compose, read, search,
//! summarize) and answers through speech synthesis.

pub mod audio;
pub mod dialogue;
pub mod integration;
pub mod mailbox;
pub mod sanitize;
pub mod speech;
pub mod ui;

pub use dialogue::{Continuation, DialogueController, DialogueEvent, DialogueState, Session};
pub use integration::{Orchestrator, OrchestratorHandle, VoxmailConfig};
pub use mailbox::{MailboxClient, MailboxError, Message};
pub use sanitize::sanitize;
pub use speech::{CapabilityError, RecognitionError, SpeechCapability, SpeechError};
pub use ui::StatusBoard;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum VoxmailError {
    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("Mailbox error: {0}")]
    Mailbox(#[from] MailboxError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for VoxmailError {
    fn from(e: std::io::Error) -> Self {
        VoxmailError::IOError(e.to_string())
    }
}

/// How an error is treated by the dialogue controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Microphone or engine unavailable; ends the session
    Capability,
    /// A single recognition attempt failed; listening restarts
    Recognition,
    /// A mailbox call or speech output failed mid-action
    Action,
    /// Input rejected before any network call
    Validation,
}

impl VoxmailError {
    pub fn class(&self) -> ErrorClass {
        match self {
            VoxmailError::Capability(_) => ErrorClass::Capability,
            VoxmailError::Recognition(RecognitionError::NotAllowed) => ErrorClass::Capability,
            VoxmailError::Recognition(_) => ErrorClass::Recognition,
            VoxmailError::Mailbox(e) if e.is_validation() => ErrorClass::Validation,
            VoxmailError::Mailbox(_) => ErrorClass::Action,
            VoxmailError::Speech(_) => ErrorClass::Action,
            VoxmailError::ConfigError(_) => ErrorClass::Validation,
            VoxmailError::ChannelError(_) => ErrorClass::Action,
            VoxmailError::IOError(_) => ErrorClass::Action,
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Without a microphone no further interaction is possible
            VoxmailError::Capability(_) => false,
            VoxmailError::Recognition(e) => !e.is_permission_loss(),
            VoxmailError::Speech(_) => true,
            VoxmailError::Mailbox(_) => true,
            VoxmailError::ConfigError(_) => false,
            VoxmailError::ChannelError(_) => false,
            VoxmailError::IOError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            VoxmailError::Capability(_) => {
                "Please allow microphone access and restart.".to_string()
            }
            VoxmailError::Recognition(e) if e.is_permission_loss() => {
                "Please allow microphone access and restart.".to_string()
            }
            VoxmailError::Recognition(e) => format!("Error: {}", e),
            VoxmailError::Speech(_) => "Speech output failed. Please try again.".to_string(),
            VoxmailError::Mailbox(_) => "An error occurred. Please try again.".to_string(),
            VoxmailError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            VoxmailError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            VoxmailError::IOError(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VoxmailError>;
