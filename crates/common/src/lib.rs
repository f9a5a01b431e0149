//! Shared types for the viewer: startup configuration, projection, frame pacing.
//!
//! # Invariants
//! - A `ViewerConfig` that passed `validate` always yields a finite projection.

mod config;
mod frame;
mod types;

pub use config::{ConfigError, ViewerConfig};
pub use frame::FrameLimiter;
pub use types::{Projection, WindowConfig};
