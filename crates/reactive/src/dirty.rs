//! Dirty flags with transition notifications.
//!
//! Every view function owns one [`DirtyFlag`]. Marking a clean flag fires
//! [`RegenerationNeeded`] to its subscribers; marking an already dirty flag
//! is silent. Parents chain their own flag to a child's with
//! [`DirtyFlag::forward_to`], so a change anywhere below reaches the top.

use crate::subscription::{SubscriptionId, SubscriptionManager};
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

/// Event fired when a dirty flag goes from clean to dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegenerationNeeded;

/// A shared dirty bit plus the subscribers of its false-to-true transition.
///
/// Callbacks must not subscribe to or unsubscribe from the flag that is
/// currently notifying them; doing so panics on the inner `RefCell`.
pub struct DirtyFlag {
    dirty: Cell<bool>,
    subscribers: RefCell<SubscriptionManager<RegenerationNeeded>>,
}

impl fmt::Debug for DirtyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyFlag")
            .field("dirty", &self.dirty.get())
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

impl DirtyFlag {
    /// Creates a flag in the given state.
    pub fn new(dirty: bool) -> Rc<Self> {
        Rc::new(Self {
            dirty: Cell::new(dirty),
            subscribers: RefCell::new(SubscriptionManager::new()),
        })
    }

    /// Returns true if the flag is set.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.dirty.get()
    }

    /// Sets the flag.
    ///
    /// Returns true only on a clean-to-dirty transition, which is also the
    /// only time subscribers are notified.
    pub fn mark(&self) -> bool {
        if self.dirty.replace(true) {
            return false;
        }
        let subscribers = self.subscribers.borrow();
        log::trace!("dirty flag set, notifying {} subscribers", subscribers.len());
        subscribers.notify_all(&RegenerationNeeded);
        true
    }

    /// Clears the flag without notifying anyone.
    #[inline]
    pub fn clear(&self) {
        self.dirty.set(false);
    }

    /// Subscribes to clean-to-dirty transitions.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RegenerationNeeded) + 'static,
    {
        self.subscribers.borrow_mut().subscribe(callback)
    }

    /// Removes a subscription. Returns true if it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.borrow_mut().unsubscribe(id)
    }

    /// Returns the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Marks `parent` whenever this flag transitions to dirty.
    ///
    /// The subscription holds only a weak reference, so a dropped parent
    /// is never kept alive by its children.
    pub fn forward_to(&self, parent: &Rc<DirtyFlag>) -> SubscriptionId {
        let parent: Weak<DirtyFlag> = Rc::downgrade(parent);
        self.subscribe(move |_| {
            if let Some(parent) = parent.upgrade() {
                parent.mark();
            }
        })
    }
}
