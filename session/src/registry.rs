use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::{debug, trace};

use crate::error::SessionError;

/// Outcome of a bounded result wait.
#[derive(Debug, Clone, PartialEq)]
pub enum WaitOutcome<T> {
    /// A result was published before the deadline.
    Ready(T),
    /// The deadline elapsed, or the session was unknown / torn down.
    TimedOut,
}

/// One session's slot: a notify primitive signaled at most once, plus the
/// published result. The slot lock is per session; holding it never
/// blocks another session.
struct Slot<T> {
    notify: Notify,
    result: Mutex<Option<T>>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            notify: Notify::new(),
            result: Mutex::new(None),
        }
    }
}

/// Registry of in-flight login sessions.
///
/// Instantiated once per server process and shared by `Arc`; the inner
/// map lock is held only for lookups and insertions, never across a
/// suspension point. Single-waiter design: one task awaits each session.
pub struct SessionRegistry<T> {
    slots: Mutex<HashMap<String, Arc<Slot<T>>>>,
}

impl<T: Clone + Send> SessionRegistry<T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a fresh session slot.
    ///
    /// Fails with [`SessionError::Duplicate`] if the id is already
    /// registered: silently replacing a slot would strand the in-flight
    /// waiter attached to it.
    pub fn open(&self, session_id: &str) -> Result<(), SessionError> {
        let mut slots = self.slots.lock();
        if slots.contains_key(session_id) {
            return Err(SessionError::Duplicate(session_id.to_string()));
        }
        slots.insert(session_id.to_string(), Arc::new(Slot::new()));
        debug!(session_id, "session opened");
        Ok(())
    }

    /// Stores the session's result and wakes its waiter.
    ///
    /// First-writer-wins: only the first publish after open is ever
    /// observed. Publishing to an unknown or already-resolved session is
    /// a harmless no-op (the submission path races channel teardown);
    /// returns whether the result was actually delivered.
    pub fn publish(&self, session_id: &str, result: T) -> bool {
        let Some(slot) = self.slot(session_id) else {
            trace!(session_id, "publish to unknown session dropped");
            return false;
        };

        {
            let mut stored = slot.result.lock();
            if stored.is_some() {
                trace!(session_id, "duplicate publish dropped");
                return false;
            }
            *stored = Some(result);
        }
        slot.notify.notify_one();
        debug!(session_id, "result published");
        true
    }

    /// Suspends the calling task until the session's result is published
    /// or `timeout` elapses.
    ///
    /// Returns [`WaitOutcome::TimedOut`] immediately for an unknown
    /// session rather than erroring: by the time a waiter asks, the
    /// session may already have been torn down.
    pub async fn await_result(&self, session_id: &str, timeout: Duration) -> WaitOutcome<T> {
        let Some(slot) = self.slot(session_id) else {
            return WaitOutcome::TimedOut;
        };

        // Register interest before checking the result so a publish
        // landing in between cannot be missed.
        let notified = slot.notify.notified();
        tokio::pin!(notified);

        if let Some(result) = slot.result.lock().clone() {
            return WaitOutcome::Ready(result);
        }

        match tokio::time::timeout(timeout, notified).await {
            Ok(()) => match slot.result.lock().clone() {
                Some(result) => WaitOutcome::Ready(result),
                // Woken by close rather than publish.
                None => WaitOutcome::TimedOut,
            },
            Err(_) => WaitOutcome::TimedOut,
        }
    }

    /// Tears the session down: removes the slot and wakes any pending
    /// waiter so it observes the teardown instead of running out its
    /// timeout. Idempotent; closing an unknown session is a no-op.
    pub fn close(&self, session_id: &str) {
        let removed = self.slots.lock().remove(session_id);
        if let Some(slot) = removed {
            slot.notify.notify_one();
            debug!(session_id, "session closed");
        }
    }

    /// Returns true if the session is currently registered.
    pub fn contains(&self, session_id: &str) -> bool {
        self.slots.lock().contains_key(session_id)
    }

    /// Returns the number of in-flight sessions.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Returns true if no session is in flight.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    fn slot(&self, session_id: &str) -> Option<Arc<Slot<T>>> {
        self.slots.lock().get(session_id).cloned()
    }
}

impl<T: Clone + Send> Default for SessionRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn open_twice_fails_fast() {
        let registry = SessionRegistry::<u32>::new();
        registry.open("S").unwrap();
        let err = registry.open("S").unwrap_err();
        assert!(matches!(err, SessionError::Duplicate(_)));
    }

    #[tokio::test]
    async fn wait_without_publish_times_out_on_schedule() {
        let registry = SessionRegistry::<u32>::new();
        registry.open("S").unwrap();

        let start = Instant::now();
        let outcome = registry.await_result("S", Duration::from_millis(200)).await;
        let elapsed = start.elapsed();

        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert!(elapsed >= Duration::from_millis(200), "returned early: {elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "hung: {elapsed:?}");
    }

    #[tokio::test]
    async fn publish_before_wait_is_delivered() {
        let registry = SessionRegistry::<u32>::new();
        registry.open("S").unwrap();

        assert!(registry.publish("S", 7));
        let outcome = registry.await_result("S", Duration::from_secs(5)).await;
        assert_eq!(outcome, WaitOutcome::Ready(7));
    }

    #[tokio::test]
    async fn publish_while_waiting_wakes_promptly() {
        let registry = Arc::new(SessionRegistry::<u32>::new());
        registry.open("S").unwrap();

        let publisher = {
            let registry = registry.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                registry.publish("S", 42);
            })
        };

        let start = Instant::now();
        let outcome = registry.await_result("S", Duration::from_secs(5)).await;
        assert_eq!(outcome, WaitOutcome::Ready(42));
        assert!(start.elapsed() < Duration::from_secs(1), "did not wake promptly");
        publisher.await.unwrap();
    }

    #[tokio::test]
    async fn publish_after_close_is_noop() {
        let registry = SessionRegistry::<u32>::new();
        registry.open("S").unwrap();
        registry.close("S");

        assert!(!registry.publish("S", 1));
        assert!(!registry.contains("S"));
    }

    #[tokio::test]
    async fn first_publish_wins() {
        let registry = SessionRegistry::<u32>::new();
        registry.open("S").unwrap();

        assert!(registry.publish("S", 1));
        assert!(!registry.publish("S", 2));

        let outcome = registry.await_result("S", Duration::from_secs(1)).await;
        assert_eq!(outcome, WaitOutcome::Ready(1));
    }

    #[tokio::test]
    async fn wait_on_unknown_session_times_out_immediately() {
        let registry = SessionRegistry::<u32>::new();
        let start = Instant::now();
        let outcome = registry.await_result("missing", Duration::from_secs(5)).await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn close_wakes_a_pending_waiter() {
        let registry = Arc::new(SessionRegistry::<u32>::new());
        registry.open("S").unwrap();

        let closer = {
            let registry = registry.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                registry.close("S");
            })
        };

        let start = Instant::now();
        let outcome = registry.await_result("S", Duration::from_secs(10)).await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert!(start.elapsed() < Duration::from_secs(1), "waiter not woken by close");
        closer.await.unwrap();
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let registry = SessionRegistry::<u32>::new();
        registry.open("S").unwrap();
        registry.close("S");
        registry.close("S");
        registry.close("never-opened");
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn sessions_do_not_serialize_each_other() {
        let registry = Arc::new(SessionRegistry::<u32>::new());
        registry.open("A").unwrap();
        registry.open("B").unwrap();

        // B's waiter suspends; publishing to A must still go through and
        // A's waiter must resolve while B keeps waiting.
        let b_wait = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.await_result("B", Duration::from_millis(300)).await })
        };

        registry.publish("A", 5);
        let a = registry.await_result("A", Duration::from_secs(1)).await;
        assert_eq!(a, WaitOutcome::Ready(5));

        assert_eq!(b_wait.await.unwrap(), WaitOutcome::TimedOut);
    }

    #[tokio::test]
    async fn reopen_after_close_is_allowed() {
        let registry = SessionRegistry::<u32>::new();
        registry.open("S").unwrap();
        registry.close("S");
        registry.open("S").unwrap();
        assert!(registry.contains("S"));
    }
}
