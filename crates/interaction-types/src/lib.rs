//! Shared types for component interactions exchanged over NATS

pub mod commands;
pub mod events;
pub mod types;

pub use commands::*;
pub use events::*;
pub use types::*;
