//! Blocking iterator over state change notifications
//!
//! Provides various iteration patterns for consuming changes:
//! - Blocking: `recv()`, `for change in iter`
//! - Non-blocking: `try_recv()`, `try_iter()`
//! - Timeout: `recv_timeout()`, `timeout_iter()`

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::event::StateChange;

/// Blocking iterator over state changes
///
/// Receives changes for subscribed state ids via `std::sync::mpsc`.
/// All methods are synchronous.
///
/// # Example
///
/// ```rust,ignore
/// store.subscribe_states("*");
/// for change in store.iter() {
///     if !change.ack {
///         println!("{} requested -> {}", change.id, change.value);
///     }
/// }
/// ```
pub struct ChangeIterator {
    rx: Arc<Mutex<mpsc::Receiver<StateChange>>>,
}

impl ChangeIterator {
    pub(crate) fn new(rx: Arc<Mutex<mpsc::Receiver<StateChange>>>) -> Self {
        Self { rx }
    }

    /// Block until the next change is available
    ///
    /// Returns `None` if the channel is closed.
    pub fn recv(&self) -> Option<StateChange> {
        self.rx.lock().recv().ok()
    }

    /// Block until the next change or timeout expires
    pub fn recv_timeout(&self, timeout: Duration) -> Option<StateChange> {
        self.rx.lock().recv_timeout(timeout).ok()
    }

    /// Try to receive a change without blocking
    pub fn try_recv(&self) -> Option<StateChange> {
        self.rx.lock().try_recv().ok()
    }

    /// Non-blocking iterator over currently queued changes
    pub fn try_iter(&self) -> TryIter<'_> {
        TryIter { inner: self }
    }

    /// Blocking iterator that stops once `timeout` passes without a change
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIter<'_> {
        TimeoutIter {
            inner: self,
            timeout,
        }
    }
}

impl Iterator for ChangeIterator {
    type Item = StateChange;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

/// Non-blocking iterator over currently available changes
pub struct TryIter<'a> {
    inner: &'a ChangeIterator,
}

impl<'a> Iterator for TryIter<'a> {
    type Item = StateChange;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with timeout
pub struct TimeoutIter<'a> {
    inner: &'a ChangeIterator,
    timeout: Duration,
}

impl<'a> Iterator for TimeoutIter<'a> {
    type Item = StateChange;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::StateValue;
    use std::thread;
    use std::time::Instant;

    fn change(id: &str) -> StateChange {
        StateChange::new(id, StateValue::Bool(true), false)
    }

    fn iterator() -> (mpsc::Sender<StateChange>, ChangeIterator) {
        let (tx, rx) = mpsc::channel();
        (tx, ChangeIterator::new(Arc::new(Mutex::new(rx))))
    }

    #[test]
    fn test_try_recv_empty() {
        let (_tx, iter) = iterator();
        assert!(iter.try_recv().is_none());
    }

    #[test]
    fn test_try_recv_with_change() {
        let (tx, iter) = iterator();
        tx.send(change("Kitchen.power")).unwrap();

        let received = iter.try_recv().unwrap();
        assert_eq!(received.id, "Kitchen.power");
        assert!(iter.try_recv().is_none());
    }

    #[test]
    fn test_recv_timeout_expires() {
        let (_tx, iter) = iterator();

        let start = Instant::now();
        assert!(iter.recv_timeout(Duration::from_millis(50)).is_none());
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[test]
    fn test_recv_timeout_with_delayed_change() {
        let (tx, iter) = iterator();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            tx.send(change("Kitchen.volume")).unwrap();
        });

        assert!(iter.recv_timeout(Duration::from_millis(500)).is_some());
    }

    #[test]
    fn test_try_iter_drains_queue() {
        let (tx, iter) = iterator();
        for id in ["a.x", "b.x", "c.x"] {
            tx.send(change(id)).unwrap();
        }

        let ids: Vec<String> = iter.try_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["a.x", "b.x", "c.x"]);
    }

    #[test]
    fn test_iterator_ends_when_sender_dropped() {
        let (tx, mut iter) = iterator();
        tx.send(change("a.x")).unwrap();
        drop(tx);

        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
    }
}
