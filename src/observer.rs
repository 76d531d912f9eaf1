//! Observer streams
//!
//! Multi-subscriber fan-out over unbounded crossbeam channels.
//!
//! Each subscriber owns a [`Receiver`]; dropping it unsubscribes, and the
//! dead sender is pruned on the next publish. Publishing never blocks.

use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

/// Fan-out stream without replay: late subscribers only see future values
pub struct Broadcast<T> {
    subscribers: Mutex<Vec<Sender<T>>>,
}

impl<T: Clone> Broadcast<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Receiver<T> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Deliver `value` to every live subscriber
    pub fn publish(&self, value: &T) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Number of registered subscribers (including not yet pruned ones)
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl<T: Clone> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Replay-latest value holder
///
/// Not internally synchronized: the owner keeps it behind the same lock
/// that orders updates, so every subscriber sees one total order.
pub struct Latest<T> {
    value: T,
    subscribers: Vec<Sender<T>>,
}

impl<T: Clone + PartialEq> Latest<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Register a subscriber; it receives the current value immediately
    pub fn subscribe(&mut self) -> Receiver<T> {
        let (tx, rx) = unbounded();
        // Fresh channel with a live receiver: this send cannot fail
        let _ = tx.send(self.value.clone());
        self.subscribers.push(tx);
        rx
    }

    /// Replace the value; equal consecutive values are not re-emitted
    ///
    /// Returns true if the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        let current = &self.value;
        self.subscribers.retain(|tx| tx.send(current.clone()).is_ok());
        true
    }
}
