//! Correlates component interactions with the operations waiting on them.
//!
//! A caller registers every control of a layout under one waiter and
//! suspends. Activations arriving from the chat bot go through
//! [`ComponentDispatcher`], which resolves the matching waiter exactly once
//! or degrades the UI when nothing is waiting.

pub mod completion;
pub mod dispatch;
pub mod error;
pub mod flatten;
pub mod reaper;
pub mod registry;
pub mod surface;
pub mod wait;
pub mod waiter;

pub use completion::{CompletionHandle, CompletionState};
pub use dispatch::{ComponentDispatcher, DEFAULT_STALE_NOTICE};
pub use error::{CompletionError, Result, SurfaceError, WaitError};
pub use flatten::{flatten, owned_identifiers};
pub use reaper::{spawn_reaper, ReaperHandle, MIN_REAPER_INTERVAL};
pub use registry::{Resolution, WaiterRegistry};
pub use surface::{LayoutSurface, NatsLayoutSurface};
pub use wait::{
    await_with_timeout, begin_wait, register_layout, send_and_wait, InteractionWaiter,
    PendingWait, WaitGuard, DEFAULT_WAIT_TIMEOUT,
};
pub use waiter::{accept_all, requester_is, Predicate, Waiter};
