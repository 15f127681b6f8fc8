//! Window view over the source.

use crate::function::{ViewFunction, ViewState};
use crate::operation::{capability, Operation};
use crate::view::View;
use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use vistas_collection::{ResizeStrategy, SlidingWindow};
use vistas_core::{Error, Metric, Result};

/// Exposes a sliding window of its source.
///
/// The output is a snapshot of the owned [`SlidingWindow`]; a new snapshot
/// is issued on every regeneration, so downstream stages see a window move
/// as a new source.
pub struct Partial<T> {
    state: ViewState<T>,
    window: SlidingWindow<T>,
}

impl<T> Default for Partial<T> {
    fn default() -> Self {
        Self::new(0, 0, ResizeStrategy::default())
    }
}

impl<T> Partial<T> {
    pub fn new(start: usize, end: usize, strategy: ResizeStrategy) -> Self {
        Self {
            state: ViewState::new(),
            window: SlidingWindow::new(start, end, strategy),
        }
    }

    /// Requests a new window. Returns true if the window moved.
    pub fn set_window(&mut self, start: usize, end: usize) -> bool {
        self.moved(|window| window.set_window(start, end))
    }

    /// Moves the window by `amount`. Returns true if the window moved.
    pub fn shift_window(&mut self, amount: isize) -> bool {
        self.moved(|window| window.shift_window(amount))
    }

    /// Changes the resize strategy. Returns true if the window moved.
    pub fn set_resize_strategy(&mut self, strategy: ResizeStrategy) -> bool {
        self.moved(|window| window.set_resize_strategy(strategy))
    }

    fn moved<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut SlidingWindow<T>) -> bool,
    {
        if !f(&mut self.window) {
            return false;
        }
        self.state.mark_dirty();
        true
    }

    #[inline]
    pub fn window(&self) -> (usize, usize) {
        self.window.window()
    }

    #[inline]
    pub fn resize_strategy(&self) -> ResizeStrategy {
        self.window.resize_strategy()
    }

    #[inline]
    pub fn sliding_window(&self) -> &SlidingWindow<T> {
        &self.window
    }

    pub fn window_size(&self) -> Metric<usize> {
        self.window.window_size()
    }

    pub fn num_element_before(&self) -> Metric<usize> {
        self.window.num_element_before()
    }

    pub fn num_element_after(&self) -> Metric<usize> {
        self.window.num_element_after()
    }

    pub fn reached_start(&self) -> Metric<bool> {
        self.window.reached_start()
    }

    pub fn reached_end(&self) -> Metric<bool> {
        self.window.reached_end()
    }

    pub fn is_window_empty(&self) -> Metric<bool> {
        self.window.is_window_empty()
    }

    pub fn is_window_full(&self) -> Metric<bool> {
        self.window.is_window_full()
    }
}

impl<T: Clone + 'static> ViewFunction<T> for Partial<T> {
    fn state(&self) -> &ViewState<T> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState<T> {
        &mut self.state
    }

    fn regenerate(&mut self, source: &View<T>, _use_cache: bool) -> View<T> {
        if self.window.collection().is_none() {
            // first binding keeps the requested indices
            let (start, end) = self.window.window();
            let strategy = self.window.resize_strategy();
            self.window = SlidingWindow::bound(source.clone().into_collection(), start, end, strategy);
        } else if self.state.source_changed(source) {
            self.window.set_collection(source.clone().into_collection());
        }
        View::Window(Rc::new(self.window.clone()))
    }

    fn capabilities(&self) -> Vec<&'static str> {
        vec![
            capability::SET_WINDOW,
            capability::SHIFT_WINDOW,
            capability::SET_RESIZE_STRATEGY,
        ]
    }

    fn apply(&mut self, operation: Operation<T>) -> Result<bool> {
        match operation {
            Operation::SetWindow { start, end } => Ok(self.set_window(start, end)),
            Operation::ShiftWindow { amount } => Ok(self.shift_window(amount)),
            Operation::SetResizeStrategy { strategy } => Ok(self.set_resize_strategy(strategy)),
            other => Err(Error::unsupported_operation(other.name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vistas_collection::Collection;

    fn hundred() -> View<u32> {
        View::from((0..100).collect::<Vec<u32>>())
    }

    #[test]
    fn test_window_output() {
        let mut partial = Partial::new(2, 4, ResizeStrategy::NoAction);
        let out = partial.view(&hundred(), true);
        assert_eq!(out.to_vec(), vec![2, 3, 4]);
        assert!(out.as_window().is_some());
    }

    #[test]
    fn test_shift_window() {
        let mut partial = Partial::new(0, 4, ResizeStrategy::NoAction);
        let source = hundred();
        partial.view(&source, true);

        assert!(partial.shift_window(5));
        assert_eq!(partial.window(), (5, 9));
        assert!(partial.is_dirty());
        assert_eq!(partial.view(&source, true).to_vec(), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_shift_before_start_is_noop() {
        let mut partial: Partial<u32> = Partial::new(0, 4, ResizeStrategy::NoAction);
        partial.view(&hundred(), true);

        assert!(!partial.shift_window(-10));
        assert_eq!(partial.window(), (0, 4));
        assert!(!partial.is_dirty());
    }

    #[test]
    fn test_window_move_issues_new_snapshot() {
        let mut partial = Partial::new(0, 1, ResizeStrategy::NoAction);
        let source = hundred();
        let first = partial.view(&source, true);
        assert!(first.ptr_eq(&partial.view(&source, true)));

        partial.set_window(10, 11);
        let second = partial.view(&source, true);
        assert!(!first.ptr_eq(&second));
        assert_eq!(first.to_vec(), vec![0, 1]);
        assert_eq!(second.to_vec(), vec![10, 11]);
    }

    #[test]
    fn test_new_source_rebinds_at_zero() {
        let mut partial = Partial::new(0, 2, ResizeStrategy::NoAction);
        partial.view(&hundred(), true);
        partial.set_window(50, 52);
        partial.view(&hundred(), true);

        assert_eq!(partial.window(), (0, 2));
    }

    #[test]
    fn test_metrics_on_lazy_source() {
        let mut partial = Partial::new(0, 4, ResizeStrategy::Shrink);
        assert_eq!(partial.window_size(), Metric::Unbound);

        let source = View::Collection(Collection::lazy(0u32..));
        let out = partial.view(&source, true);
        assert_eq!(partial.window_size(), Metric::Ambiguous);
        assert_eq!(partial.reached_start(), Metric::Ambiguous);
        assert_eq!(partial.reached_end(), Metric::Ambiguous);
        assert_eq!(partial.num_element_after(), Metric::Ambiguous);

        assert_eq!(out.get(4), Some(4));
        assert_eq!(partial.is_window_full(), Metric::Ambiguous);
        assert_eq!(partial.is_window_empty(), Metric::Ambiguous);
    }

    #[test]
    fn test_shrink_on_known_source() {
        let mut partial = Partial::new(0, 9, ResizeStrategy::Shrink);
        let source: View<u32> = View::from(vec![1, 2, 3]);
        partial.view(&source, true);

        assert_eq!(partial.window(), (0, 2));
        assert_eq!(partial.reached_end(), Metric::Known(true));
        assert_eq!(partial.num_element_after(), Metric::Known(0));
    }

    #[test]
    fn test_apply() {
        let mut partial: Partial<u32> = Partial::default();
        assert_eq!(partial.apply(Operation::SetWindow { start: 3, end: 1 }), Ok(true));
        assert_eq!(partial.window(), (1, 3));
        assert_eq!(partial.apply(Operation::ShiftWindow { amount: 2 }), Ok(true));
        assert_eq!(partial.window(), (3, 5));
        assert_eq!(
            partial.apply(Operation::SetResizeStrategy { strategy: ResizeStrategy::Shift }),
            Ok(false)
        );
        assert!(partial.apply(Operation::ClearSortingFunction).is_err());
    }
}
