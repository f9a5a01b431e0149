//! Input Collector: platform events mapped to camera actions.
//!
//! # Invariants
//! - The camera consumes actions, never raw platform events.
//! - Intents stay set until the matching key-up arrives.

pub mod action;
mod collector;

pub use action::{Action, InputEvent, Intent, Key};
pub use collector::{Flow, InputCollector};

pub fn crate_info() -> &'static str {
    "skyview-input v0.1.0"
}
