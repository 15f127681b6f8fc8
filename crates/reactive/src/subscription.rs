//! Callback registry behind a [`DirtyFlag`](crate::DirtyFlag).
//!
//! Callbacks are keyed by a [`SubscriptionId`] so that whoever registered one
//! (typically a parent chain wiring a child) can remove exactly that one.

use alloc::boxed::Box;
use hashbrown::HashMap;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback invoked with a borrowed event.
pub type Callback<E> = Box<dyn Fn(&E)>;

/// The callbacks subscribed to one event source.
pub struct SubscriptionManager<E> {
    callbacks: HashMap<SubscriptionId, Callback<E>>,
    next_id: SubscriptionId,
}

impl<E> Default for SubscriptionManager<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SubscriptionManager<E> {
    /// Creates an empty manager. IDs start at 1 and are never reused.
    pub fn new() -> Self {
        Self {
            callbacks: HashMap::new(),
            next_id: 1,
        }
    }

    /// Registers a callback and returns its ID.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.insert(id, Box::new(callback));
        id
    }

    /// Removes a callback. Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.callbacks.remove(&id).is_some()
    }

    /// Invokes every callback. Delivery order is unspecified.
    pub fn notify_all(&self, event: &E) {
        for callback in self.callbacks.values() {
            callback(event);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    #[test]
    fn test_subscribe_assigns_increasing_ids() {
        let mut manager: SubscriptionManager<()> = SubscriptionManager::new();
        assert_eq!(manager.subscribe(|_| {}), 1);
        assert_eq!(manager.subscribe(|_| {}), 2);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let mut manager: SubscriptionManager<()> = SubscriptionManager::new();
        let id = manager.subscribe(|_| {});

        assert!(manager.unsubscribe(id));
        assert!(manager.is_empty());
        assert!(!manager.unsubscribe(id));

        // Removed IDs are not handed out again
        assert_eq!(manager.subscribe(|_| {}), 2);
    }

    #[test]
    fn test_notify_all_passes_event() {
        let mut manager = SubscriptionManager::new();
        let total = Rc::new(Cell::new(0));
        let first = total.clone();
        let second = total.clone();

        manager.subscribe(move |n: &i32| first.set(first.get() + *n));
        let id = manager.subscribe(move |n: &i32| second.set(second.get() + *n));

        manager.notify_all(&3);
        assert_eq!(total.get(), 6);

        manager.unsubscribe(id);
        manager.notify_all(&3);
        assert_eq!(total.get(), 9);
    }
}
