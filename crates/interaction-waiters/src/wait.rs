//! Waiting on a layout: register its controls, suspend with a deadline,
//! and keep the registry consistent on timeout and cancellation.

use std::sync::Arc;
use std::time::Duration;

use interaction_types::{ComponentActivatedEvent, Destination, Layout};
use tracing::{debug, warn};

use crate::completion::CompletionHandle;
use crate::error::{Result, WaitError};
use crate::flatten::owned_identifiers;
use crate::registry::WaiterRegistry;
use crate::surface::LayoutSurface;
use crate::waiter::{Predicate, Waiter};

/// Used when a caller does not pick its own deadline
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(180);

/// Suspends until `handle` completes or `duration` elapses.
///
/// On timeout the handle is left pending. The caller still owns the
/// registry entries pointing at it and must remove them; the reaper only
/// collects completed waiters.
pub async fn await_with_timeout<T: Clone>(
    handle: &CompletionHandle<T>,
    duration: Duration,
) -> Result<T> {
    match tokio::time::timeout(duration, handle.wait()).await {
        Ok(outcome) => outcome,
        Err(_) => Err(WaitError::Timeout(duration)),
    }
}

/// RAII guard that unregisters the waiter's identifiers on drop.
/// Covers cancellation: a wait future dropped mid-flight leaves no entries.
pub struct WaitGuard<'a, E> {
    registry: &'a WaiterRegistry<E>,
    waiter: Arc<Waiter<E>>,
    armed: bool,
}

impl<'a, E> WaitGuard<'a, E> {
    fn new(registry: &'a WaiterRegistry<E>, waiter: Arc<Waiter<E>>) -> Self {
        Self {
            registry,
            waiter,
            armed: true,
        }
    }

    pub fn waiter(&self) -> &Arc<Waiter<E>> {
        &self.waiter
    }

    /// Keep the registry entries when the guard goes out of scope.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl<'a, E> Drop for WaitGuard<'a, E> {
    fn drop(&mut self) {
        if self.armed {
            let removed = self.registry.remove_owned(&self.waiter);
            debug!(removed, "Wait abandoned; unregistered its controls");
        }
    }
}

/// A registered wait that has not been awaited yet
pub struct PendingWait<'a, E> {
    handle: CompletionHandle<E>,
    guard: WaitGuard<'a, E>,
}

impl<'a, E: Clone> PendingWait<'a, E> {
    pub fn handle(&self) -> &CompletionHandle<E> {
        &self.handle
    }

    pub fn identifiers(&self) -> &[String] {
        self.guard.waiter().identifiers()
    }

    /// Suspends until a matching event arrives or `timeout` elapses.
    ///
    /// On timeout the handle is rejected with [`WaitError::Timeout`] and the
    /// entries stay registered: later activations take the stale path, and
    /// the reaper or the caller removes them.
    pub async fn wait(self, timeout: Duration) -> Result<E> {
        let result = await_with_timeout(&self.handle, timeout).await;
        match &result {
            Ok(_) => {}
            Err(WaitError::Timeout(_)) => {
                // a resolution may land between the deadline and here
                if self.handle.reject(WaitError::Timeout(timeout)).is_err() {
                    self.guard.disarm();
                    return self.handle.wait().await;
                }
                warn!(
                    identifiers = ?self.identifiers(),
                    "Timed out waiting for component interaction after {:?}",
                    timeout
                );
            }
            Err(e) => debug!(error = %e, "Wait completed with error"),
        }
        self.guard.disarm();
        result
    }
}

/// Registers one waiter for every control of `layout`.
///
/// Fails before registering anything when the layout is empty or repeats an
/// identifier.
pub fn register_layout<'a, E>(
    registry: &'a WaiterRegistry<E>,
    layout: &Layout,
    predicate: Predicate<E>,
) -> Result<PendingWait<'a, E>> {
    let identifiers = owned_identifiers(layout)?;
    let handle = CompletionHandle::new();
    let waiter = registry.register(identifiers, handle.clone(), predicate);
    Ok(PendingWait {
        handle,
        guard: WaitGuard::new(registry, waiter),
    })
}

/// Registers `layout` and waits for the first activation `predicate` accepts.
pub async fn begin_wait<E: Clone>(
    registry: &WaiterRegistry<E>,
    layout: &Layout,
    predicate: Predicate<E>,
    timeout: Duration,
) -> Result<E> {
    register_layout(registry, layout, predicate)?
        .wait(timeout)
        .await
}

/// Registers `layout`, sends it through `surface`, then waits.
///
/// Registration happens before sending so a fast click cannot arrive ahead
/// of its waiter. A failed send unregisters the controls.
pub async fn send_and_wait<E: Clone, S: LayoutSurface>(
    registry: &WaiterRegistry<E>,
    surface: &S,
    destination: &Destination,
    content: Option<&str>,
    layout: &Layout,
    predicate: Predicate<E>,
    timeout: Duration,
) -> Result<E> {
    let pending = register_layout(registry, layout, predicate)?;
    if let Err(e) = surface.send_layout(destination, content, layout).await {
        warn!(channel_id = destination.channel_id, error = %e, "Failed to send layout");
        return Err(WaitError::Surface(e.to_string()));
    }
    pending.wait(timeout).await
}

/// Entry point for callers: owns a shared registry, the surface used to send
/// layouts, and the default deadline.
pub struct InteractionWaiter<S> {
    registry: Arc<WaiterRegistry<ComponentActivatedEvent>>,
    surface: S,
    default_timeout: Duration,
}

impl<S: LayoutSurface> InteractionWaiter<S> {
    pub fn new(registry: Arc<WaiterRegistry<ComponentActivatedEvent>>, surface: S) -> Self {
        Self {
            registry,
            surface,
            default_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<WaiterRegistry<ComponentActivatedEvent>> {
        &self.registry
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Waits on a layout the caller has already sent.
    pub async fn begin_wait(
        &self,
        layout: &Layout,
        predicate: Predicate<ComponentActivatedEvent>,
        timeout: Option<Duration>,
    ) -> Result<ComponentActivatedEvent> {
        begin_wait(
            &self.registry,
            layout,
            predicate,
            timeout.unwrap_or(self.default_timeout),
        )
        .await
    }

    /// Sends `layout` to `destination` and waits on it.
    pub async fn send_and_wait(
        &self,
        destination: &Destination,
        content: Option<&str>,
        layout: &Layout,
        predicate: Predicate<ComponentActivatedEvent>,
        timeout: Option<Duration>,
    ) -> Result<ComponentActivatedEvent> {
        send_and_wait(
            &self.registry,
            &self.surface,
            destination,
            content,
            layout,
            predicate,
            timeout.unwrap_or(self.default_timeout),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionState;
    use crate::waiter::accept_all;
    use interaction_types::{ActionRow, Button, ButtonStyle};

    fn yes_no() -> Layout {
        Layout::Row(ActionRow::new([
            Button::new("yes", ButtonStyle::Success).into(),
            Button::new("no", ButtonStyle::Danger).into(),
        ]))
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_with_timeout_leaves_handle_pending() {
        let handle = CompletionHandle::<u32>::new();
        let err = await_with_timeout(&handle, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, WaitError::Timeout(Duration::from_secs(1)));
        assert_eq!(handle.state(), CompletionState::Pending);
    }

    #[tokio::test]
    async fn test_await_with_timeout_returns_value() {
        let handle = CompletionHandle::new();
        handle.resolve(5u32).unwrap();
        assert_eq!(
            await_with_timeout(&handle, Duration::from_secs(1)).await,
            Ok(5)
        );
    }

    #[test]
    fn test_register_layout_rejects_empty_layout() {
        let registry = WaiterRegistry::<u32>::new();
        let err = register_layout(&registry, &Layout::Many(vec![]), accept_all())
            .err()
            .unwrap();
        assert_eq!(err, WaitError::NoControls);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_layout_rejects_duplicates_without_registering() {
        let registry = WaiterRegistry::<u32>::new();
        let layout = Layout::Many(vec![yes_no(), yes_no()]);
        let err = register_layout(&registry, &layout, accept_all())
            .err()
            .unwrap();
        assert_eq!(err, WaitError::DuplicateIdentifier("yes".into()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dropping_pending_wait_unregisters() {
        let registry = WaiterRegistry::<u32>::new();
        let pending = register_layout(&registry, &yes_no(), accept_all()).unwrap();
        assert_eq!(pending.identifiers(), ["yes", "no"]);
        assert_eq!(registry.len(), 2);
        drop(pending);
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_wait_unregisters() {
        let registry = WaiterRegistry::<u32>::new();
        let layout = yes_no();
        let wait = begin_wait(&registry, &layout, accept_all(), Duration::from_secs(60));
        // cancel from outside before the wait's own deadline
        let outer = tokio::time::timeout(Duration::from_secs(1), wait).await;
        assert!(outer.is_err());
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_rejects_handle_and_keeps_entries() {
        let registry = WaiterRegistry::<u32>::new();
        let err = begin_wait(&registry, &yes_no(), accept_all(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, WaitError::Timeout(Duration::from_secs(1)));

        let waiter = registry.lookup("yes").unwrap();
        assert_eq!(
            waiter.handle().state(),
            CompletionState::Rejected(WaitError::Timeout(Duration::from_secs(1)))
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.sweep_completed(), 2);
    }

    #[tokio::test]
    async fn test_resolution_returns_event() {
        let registry = Arc::new(WaiterRegistry::<u32>::new());
        let waiting = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                begin_wait(&registry, &yes_no(), accept_all(), Duration::from_secs(60)).await
            })
        };

        while registry.lookup("no").is_none() {
            tokio::task::yield_now().await;
        }
        registry.resolve("no", &9);

        assert_eq!(waiting.await.unwrap(), Ok(9));
        assert!(registry.is_empty());
    }
}
