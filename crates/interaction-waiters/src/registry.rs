//! Process-wide mapping from control identifier to the waiter it resolves.
//!
//! One waiter may own several identifiers (every button of one layout).
//! All of them point at the same shared [`Waiter`], so resolving via any
//! identifier completes the wait for all of them.

#[path = "registry_tests.rs"]
mod registry_tests;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::completion::CompletionHandle;
use crate::waiter::{Predicate, Waiter};

/// Outcome of routing one event through the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The owning waiter accepted the event and is now resolved
    Resolved,
    /// No waiter is registered under the identifier
    Unknown,
    /// The waiter had already completed; its stale entry was removed
    Stale,
    /// The predicate declined the event; the waiter stays pending
    Rejected,
}

impl Resolution {
    pub fn is_resolved(self) -> bool {
        matches!(self, Resolution::Resolved)
    }
}

pub struct WaiterRegistry<E> {
    waiters: Mutex<HashMap<String, Arc<Waiter<E>>>>,
}

impl<E> Default for WaiterRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> WaiterRegistry<E> {
    pub fn new() -> Self {
        Self {
            waiters: Mutex::new(HashMap::new()),
        }
    }

    /// Registers one shared waiter under every identifier.
    ///
    /// An identifier can only be awaited by one waiter at a time. Registering
    /// an identifier that a pending waiter already owns is a caller bug: the
    /// new registration wins and a warning is logged.
    pub fn register(
        &self,
        identifiers: Vec<String>,
        handle: CompletionHandle<E>,
        predicate: Predicate<E>,
    ) -> Arc<Waiter<E>> {
        let waiter = Arc::new(Waiter::new(handle, predicate, identifiers));
        let mut waiters = self.waiters.lock().unwrap();
        for identifier in waiter.identifiers() {
            if let Some(previous) = waiters.insert(identifier.clone(), Arc::clone(&waiter)) {
                if !previous.handle().is_complete() {
                    warn!(
                        identifier = %identifier,
                        "Identifier already awaited by a pending waiter; last registration wins"
                    );
                }
            }
        }
        debug!(identifiers = ?waiter.identifiers(), "Registered waiter");
        waiter
    }

    pub fn lookup(&self, identifier: &str) -> Option<Arc<Waiter<E>>> {
        self.waiters.lock().unwrap().get(identifier).cloned()
    }

    /// Removes one identifier. Removing an absent identifier is a no-op.
    pub fn remove(&self, identifier: &str) -> bool {
        self.waiters.lock().unwrap().remove(identifier).is_some()
    }

    /// Removes every identifier owned by `waiter` that still points at it.
    /// Entries taken over by a later registration are left alone.
    pub fn remove_owned(&self, waiter: &Arc<Waiter<E>>) -> usize {
        let mut waiters = self.waiters.lock().unwrap();
        remove_owned_locked(&mut waiters, waiter)
    }

    /// Drops every entry whose waiter has already completed.
    pub fn sweep_completed(&self) -> usize {
        let mut waiters = self.waiters.lock().unwrap();
        let before = waiters.len();
        waiters.retain(|_, waiter| !waiter.handle().is_complete());
        before - waiters.len()
    }

    pub fn len(&self) -> usize {
        self.waiters.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.lock().unwrap().is_empty()
    }

    /// Sorted snapshot of the registered identifiers
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.waiters.lock().unwrap().keys().cloned().collect();
        identifiers.sort();
        identifiers
    }
}

impl<E: Clone> WaiterRegistry<E> {
    /// Routes one inbound event for `identifier`.
    ///
    /// The predicate runs without the registry lock held, so it may read the
    /// registry. The completed check, resolution and removal of every owned
    /// identifier then run under one lock, so a waiter is resolved at most
    /// once no matter how many events race for its identifiers.
    pub fn resolve(&self, identifier: &str, event: &E) -> Resolution {
        let Some(waiter) = self.lookup(identifier) else {
            return Resolution::Unknown;
        };

        if !waiter.handle().is_complete() && !waiter.accepts(event) {
            debug!(identifier = %identifier, "Waiter predicate declined event");
            return Resolution::Rejected;
        }

        let mut waiters = self.waiters.lock().unwrap();

        // removed or taken over by a later registration while the predicate ran
        if !waiters
            .get(identifier)
            .is_some_and(|current| Arc::ptr_eq(current, &waiter))
        {
            return Resolution::Unknown;
        }

        if waiter.handle().resolve(event.clone()).is_err() {
            waiters.remove(identifier);
            debug!(identifier = %identifier, "Removed stale waiter entry");
            return Resolution::Stale;
        }

        let removed = remove_owned_locked(&mut waiters, &waiter);
        debug!(
            identifier = %identifier,
            removed,
            "Resolved waiter"
        );
        Resolution::Resolved
    }
}

fn remove_owned_locked<E>(
    waiters: &mut HashMap<String, Arc<Waiter<E>>>,
    waiter: &Arc<Waiter<E>>,
) -> usize {
    let mut removed = 0;
    for identifier in waiter.identifiers() {
        if waiters
            .get(identifier)
            .is_some_and(|current| Arc::ptr_eq(current, waiter))
        {
            waiters.remove(identifier);
            removed += 1;
        }
    }
    removed
}
