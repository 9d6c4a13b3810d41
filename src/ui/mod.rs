//! Status surface for display code
//!
//! The dialogue has no window of its own. Whatever shows it (the console
//! binary, a future GUI) reads [`StatusBoard`] snapshots or consumes the
//! events it publishes.

pub mod status;

pub use status::{StatusBoard, StatusSnapshot};
