//! Error types for interaction waiters

use std::time::Duration;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, WaitError>;

/// Why a wait did not produce an activation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WaitError {
    /// The caller supplied a layout without any control. Nothing was registered.
    #[error("layout contains no controls")]
    NoControls,

    /// Two controls in one layout share an identifier. Nothing was registered.
    #[error("duplicate control identifier in layout: {0}")]
    DuplicateIdentifier(String),

    #[error("no matching interaction within {0:?}")]
    Timeout(Duration),

    #[error("failed to deliver layout: {0}")]
    Surface(String),
}

/// A completion handle was written more than once
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("completion handle already completed")]
    AlreadyCompleted,
}

/// Failure reported by a [`LayoutSurface`](crate::surface::LayoutSurface)
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error(transparent)]
    Transport(#[from] interaction_nats::Error),

    #[error("surface unavailable: {0}")]
    Unavailable(String),
}
