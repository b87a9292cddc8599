//! Observer registry with symmetric teardown.
//!
//! Subscribing hands back a [`SubscriptionHandle`]; whoever subscribed is
//! expected to unsubscribe with that same handle before the emitting side is
//! torn down, so no callback can fire into a half-dead object graph.

/// Opaque handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

type Callback<E> = Box<dyn Fn(&E) + Send>;

pub struct Observers<E> {
    next_id: u64,
    subscribers: Vec<(u64, Callback<E>)>,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. The returned handle is the only way to remove it.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&E) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        SubscriptionHandle(id)
    }

    /// Remove one subscription. Returns false if the handle was already gone.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(id, _)| *id != handle.0);
        self.subscribers.len() != before
    }

    /// Drop every subscription at once. Returns how many were removed.
    pub fn unsubscribe_all(&mut self) -> usize {
        let count = self.subscribers.len();
        self.subscribers.clear();
        count
    }

    pub fn emit(&self, event: &E) {
        for (_, callback) in &self.subscribers {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn handles_remove_exactly_their_subscription() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut observers = Observers::<u32>::new();

        let a = {
            let hits = hits.clone();
            observers.subscribe(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        let _b = {
            let hits = hits.clone();
            observers.subscribe(move |_| {
                hits.fetch_add(10, Ordering::SeqCst);
            })
        };

        observers.emit(&0);
        assert_eq!(hits.load(Ordering::SeqCst), 11);

        assert!(observers.unsubscribe(a));
        assert!(!observers.unsubscribe(a));

        observers.emit(&0);
        assert_eq!(hits.load(Ordering::SeqCst), 21);
    }

    #[test]
    fn unsubscribe_all_silences_everything() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut observers = Observers::<()>::new();
        for _ in 0..3 {
            let hits = hits.clone();
            observers.subscribe(move |()| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(observers.unsubscribe_all(), 3);
        observers.emit(&());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(observers.is_empty());
    }
}
