//! Single-assignment completion slot that a waiting caller suspends on.
//!
//! A handle moves from `Pending` to either `Resolved` or `Rejected` exactly
//! once. Clones share the same slot, so the registry and the suspended
//! caller observe the same state.

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tracing::error;

use crate::error::{CompletionError, WaitError};

/// Observable state of a [`CompletionHandle`]
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionState<T> {
    Pending,
    Resolved(T),
    Rejected(WaitError),
}

impl<T> CompletionState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, CompletionState::Pending)
    }
}

struct Shared<T> {
    state: Mutex<CompletionState<T>>,
    notify: Notify,
}

pub struct CompletionHandle<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for CompletionHandle<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for CompletionHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for CompletionHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionHandle")
            .field("complete", &self.is_complete())
            .finish()
    }
}

impl<T> CompletionHandle<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(CompletionState::Pending),
                notify: Notify::new(),
            }),
        }
    }

    /// True once resolved or rejected
    pub fn is_complete(&self) -> bool {
        !self.shared.state.lock().unwrap().is_pending()
    }

    /// Whether both handles share one slot
    pub fn same_as(&self, other: &CompletionHandle<T>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn resolve(&self, value: T) -> Result<(), CompletionError> {
        self.complete(CompletionState::Resolved(value))
    }

    pub fn reject(&self, error: WaitError) -> Result<(), CompletionError> {
        self.complete(CompletionState::Rejected(error))
    }

    fn complete(&self, next: CompletionState<T>) -> Result<(), CompletionError> {
        {
            let mut state = self.shared.state.lock().unwrap();
            if !state.is_pending() {
                error!("Completion handle written twice; keeping the first outcome");
                return Err(CompletionError::AlreadyCompleted);
            }
            *state = next;
        }
        self.shared.notify.notify_waiters();
        Ok(())
    }
}

impl<T: Clone> CompletionHandle<T> {
    pub fn state(&self) -> CompletionState<T> {
        self.shared.state.lock().unwrap().clone()
    }

    fn outcome(&self) -> Option<Result<T, WaitError>> {
        match &*self.shared.state.lock().unwrap() {
            CompletionState::Pending => None,
            CompletionState::Resolved(value) => Some(Ok(value.clone())),
            CompletionState::Rejected(err) => Some(Err(err.clone())),
        }
    }

    /// Suspends until the handle is resolved or rejected.
    ///
    /// Cancel-safe: dropping the future leaves the handle untouched.
    pub async fn wait(&self) -> Result<T, WaitError> {
        loop {
            let notified = self.shared.notify.notified();
            tokio::pin!(notified);
            // register interest before checking, so a completion between the
            // check and the await is not missed
            notified.as_mut().enable();
            if let Some(outcome) = self.outcome() {
                return outcome;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_handle_is_pending() {
        let handle = CompletionHandle::<u32>::new();
        assert!(!handle.is_complete());
        assert_eq!(handle.state(), CompletionState::Pending);
    }

    #[test]
    fn test_second_write_fails_and_keeps_first_value() {
        let handle = CompletionHandle::new();
        handle.resolve(1).unwrap();
        assert_eq!(handle.resolve(2), Err(CompletionError::AlreadyCompleted));
        assert_eq!(
            handle.reject(WaitError::NoControls),
            Err(CompletionError::AlreadyCompleted)
        );
        assert_eq!(handle.state(), CompletionState::Resolved(1));
    }

    #[test]
    fn test_clones_share_state() {
        let a = CompletionHandle::<u32>::new();
        let b = a.clone();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&CompletionHandle::new()));
        b.reject(WaitError::Timeout(Duration::from_secs(1))).unwrap();
        assert!(a.is_complete());
    }

    #[tokio::test]
    async fn test_wait_returns_immediately_when_complete() {
        let handle = CompletionHandle::new();
        handle.resolve("done".to_string()).unwrap();
        assert_eq!(handle.wait().await.unwrap(), "done");
        // value stays readable after being consumed
        assert_eq!(handle.wait().await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_wait_wakes_on_resolve_from_another_task() {
        let handle = CompletionHandle::new();
        let writer = handle.clone();
        let task = tokio::spawn(async move { handle.wait().await });
        tokio::task::yield_now().await;
        writer.resolve(7u64).unwrap();
        assert_eq!(task.await.unwrap().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_wait_surfaces_rejection() {
        let handle = CompletionHandle::<u8>::new();
        let waiter = handle.clone();
        let task = tokio::spawn(async move { waiter.wait().await });
        handle.reject(WaitError::NoControls).unwrap();
        assert_eq!(task.await.unwrap().unwrap_err(), WaitError::NoControls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_wait_leaves_handle_pending() {
        let handle = CompletionHandle::<u8>::new();
        let timed = tokio::time::timeout(Duration::from_millis(10), handle.wait()).await;
        assert!(timed.is_err());
        assert!(!handle.is_complete());
    }
}
