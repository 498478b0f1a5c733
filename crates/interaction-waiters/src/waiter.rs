//! A pending wait: completion handle, acceptance predicate and the control
//! identifiers routed to it.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use interaction_types::ComponentActivatedEvent;
use tracing::error;

use crate::completion::CompletionHandle;

/// Acceptance check evaluated synchronously against each inbound event.
///
/// Runs on the dispatch path, so it should be quick and must not block.
/// It is called without the registry lock held.
pub type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Accepts every event
pub fn accept_all<E: 'static>() -> Predicate<E> {
    Arc::new(|_: &E| true)
}

/// Accepts activations made by `user_id` only
pub fn requester_is(user_id: u64) -> Predicate<ComponentActivatedEvent> {
    Arc::new(move |event: &ComponentActivatedEvent| event.requester.id == user_id)
}

pub struct Waiter<E> {
    handle: CompletionHandle<E>,
    predicate: Predicate<E>,
    identifiers: Vec<String>,
}

impl<E> Waiter<E> {
    pub(crate) fn new(
        handle: CompletionHandle<E>,
        predicate: Predicate<E>,
        identifiers: Vec<String>,
    ) -> Self {
        Self {
            handle,
            predicate,
            identifiers,
        }
    }

    pub fn handle(&self) -> &CompletionHandle<E> {
        &self.handle
    }

    /// Every control identifier this waiter was registered under
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Runs the predicate. A panicking predicate counts as a rejection so one
    /// bad check cannot take down event dispatch.
    pub(crate) fn accepts(&self, event: &E) -> bool {
        match catch_unwind(AssertUnwindSafe(|| (self.predicate)(event))) {
            Ok(accepted) => accepted,
            Err(_) => {
                error!(
                    identifiers = ?self.identifiers,
                    "Waiter predicate panicked; treating event as rejected"
                );
                false
            }
        }
    }
}
