//! Voice dialogue controller
//!
//! Turns recognition results into mailbox actions and spoken feedback.
//! The controller owns the [`Session`]; nothing else mutates it.
//!
//! State table (trigger -> next state):
//! - Idle + activation -> Listening
//! - Listening + "compose" -> ComposeTo -> ComposeSubject -> ComposeBody -> Listening (send)
//! - Listening + "search" -> Searching -> ReadingResults (or Listening without hits)
//! - ReadingResults + "next"/"stop" -> ReadingResults / Listening
//! - Listening + "change folder" -> ChooseFolder -> Listening
//! - Listening + "exit" -> Idle
//!
//! Everything else handled in `Listening` (read, summaries, speed, folder
//! list, unknown phrases) stays in `Listening`.

pub mod bootstrap;
pub mod commands;
pub mod controller;
pub mod prompts;
pub mod state;

pub use commands::{Command, ResultsCommand, Transcript};
pub use controller::{Continuation, DialogueController, DialogueEvent};
pub use state::{DialogueState, SearchResults, Session};
