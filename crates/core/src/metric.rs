//! Tri-state values for quantities derived from a partially known sequence.

/// A derived quantity whose answer may not be determinable yet.
///
/// - `Unbound`: there is nothing to derive from (no collection bound).
/// - `Ambiguous`: the answer depends on data that has not been materialized.
/// - `Known(v)`: the answer is `v`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric<T> {
    Unbound,
    Ambiguous,
    Known(T),
}

impl<T> Metric<T> {
    /// Returns true if the value is known.
    #[inline]
    pub fn is_known(&self) -> bool {
        matches!(self, Metric::Known(_))
    }

    /// Returns true if the value cannot be determined without more data.
    #[inline]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Metric::Ambiguous)
    }

    /// Returns true if nothing is bound.
    #[inline]
    pub fn is_unbound(&self) -> bool {
        matches!(self, Metric::Unbound)
    }

    /// Converts to an `Option`, collapsing both unknown states to `None`.
    #[inline]
    pub fn known(self) -> Option<T> {
        match self {
            Metric::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Maps the known value.
    #[inline]
    pub fn map<U, F>(self, f: F) -> Metric<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Metric::Unbound => Metric::Unbound,
            Metric::Ambiguous => Metric::Ambiguous,
            Metric::Known(v) => Metric::Known(f(v)),
        }
    }
}

impl<T> From<Option<T>> for Metric<T> {
    /// `None` maps to `Ambiguous`.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Metric::Known(v),
            None => Metric::Ambiguous,
        }
    }
}
