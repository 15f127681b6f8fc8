//! The view function abstraction.
//!
//! A view function turns a source [`View`] into an output view and memoizes
//! the result. It regenerates only when its source handle changed or it has
//! been marked dirty by a parameter change.

use crate::operation::Operation;
use crate::view::View;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use vistas_core::{Error, Result};
use vistas_reactive::{DirtyFlag, RegenerationNeeded, SubscriptionId};

/// A shared, dynamically typed view function.
pub type ViewFunctionRef<T> = Rc<RefCell<dyn ViewFunction<T>>>;

/// Callback for [`RegenerationNeeded`] events.
pub type RegenerationCallback = Box<dyn Fn(&RegenerationNeeded)>;

/// Cache slot and dirty flag owned by every view function.
pub struct ViewState<T> {
    last_source: Option<View<T>>,
    target: Option<View<T>>,
    dirty: Rc<DirtyFlag>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewState<T> {
    /// Creates an empty state. It starts dirty since there is no output yet.
    pub fn new() -> Self {
        Self {
            last_source: None,
            target: None,
            dirty: DirtyFlag::new(true),
        }
    }

    /// The source of the last regeneration.
    #[inline]
    pub fn last_source(&self) -> Option<&View<T>> {
        self.last_source.as_ref()
    }

    /// The output of the last regeneration.
    #[inline]
    pub fn target(&self) -> Option<&View<T>> {
        self.target.as_ref()
    }

    #[inline]
    pub fn dirty(&self) -> &Rc<DirtyFlag> {
        &self.dirty
    }

    /// Returns true if `source` is a different handle than last time.
    pub fn source_changed(&self, source: &View<T>) -> bool {
        !matches!(&self.last_source, Some(last) if last.ptr_eq(source))
    }

    /// Sets the dirty flag. Returns true on a clean-to-dirty transition.
    #[inline]
    pub fn mark_dirty(&self) -> bool {
        self.dirty.mark()
    }

    /// Stores a regeneration result and clears the dirty flag.
    pub fn record(&mut self, source: &View<T>, target: &View<T>) {
        self.last_source = Some(source.clone());
        self.target = Some(target.clone());
        self.dirty.clear();
    }

    /// Drops the cached views and marks the state dirty.
    pub fn reset(&mut self) {
        self.last_source = None;
        self.target = None;
        self.dirty.mark();
    }
}

/// A memoizing transformation from one view to another.
///
/// Implementors provide [`regenerate`](ViewFunction::regenerate) plus access
/// to their [`ViewState`]; caching and notification come for free.
pub trait ViewFunction<T> {
    fn state(&self) -> &ViewState<T>;

    fn state_mut(&mut self) -> &mut ViewState<T>;

    /// Computes a fresh output for `source`.
    ///
    /// Called by [`view`](ViewFunction::view) before the state is updated,
    /// so `self.state()` still describes the previous regeneration.
    fn regenerate(&mut self, source: &View<T>, use_cache: bool) -> View<T>;

    /// Returns the output for `source`.
    ///
    /// With `use_cache`, a clean function given the same source handle as
    /// last time returns the identical output handle without any work.
    fn view(&mut self, source: &View<T>, use_cache: bool) -> View<T> {
        if use_cache && !self.is_dirty() && !self.state().source_changed(source) {
            if let Some(target) = self.state().target() {
                log::trace!("view function: cache hit");
                return target.clone();
            }
        }
        let target = self.regenerate(source, use_cache);
        self.state_mut().record(source, &target);
        target
    }

    /// Returns true if the next `view` call must regenerate.
    fn is_dirty(&self) -> bool {
        self.state().dirty().is_set()
    }

    /// Forces the next `view` call to regenerate.
    fn invalidate(&self) -> bool {
        self.state().mark_dirty()
    }

    /// Subscribes to clean-to-dirty transitions.
    fn subscribe(&self, callback: RegenerationCallback) -> SubscriptionId {
        self.state().dirty().subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state().dirty().unsubscribe(id)
    }

    /// Names of the operations accepted by [`apply`](ViewFunction::apply).
    fn capabilities(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Applies a parameter mutation.
    ///
    /// Returns whether the mutation requires a regeneration, or
    /// `Error::UnsupportedOperation` if this function does not accept it.
    fn apply(&mut self, operation: Operation<T>) -> Result<bool> {
        Err(Error::unsupported_operation(operation.name()))
    }
}
