//! Conditions (the conjecture under test) and weight functions.
//!
//! Plain closures work out of the box:
//!
//! ```rust,ignore
//! let is_even = |x: &u64| x % 2 == 0;
//! let identity = |x: &u64| *x;
//! ```
//!
//! Closures that can fail are wrapped in [`Fallible`] or [`FallibleWeight`]
//! so their errors surface as [`SearchError::PredicateFailure`] and
//! [`SearchError::WeightFailure`]. Neither is ever retried.
use std::cmp::Ordering;
use std::fmt::{Debug, Display};

use crate::errors::{SearchError, SearchResult};

/// A conjecture checked against each candidate
pub trait Condition<T> {
    /// Returns `Ok(false)` when `candidate` is a counterexample
    fn check(&mut self, candidate: &T) -> SearchResult<bool>;
}

impl<T, F> Condition<T> for F
where
    F: FnMut(&T) -> bool,
{
    fn check(&mut self, candidate: &T) -> SearchResult<bool> {
        Ok(self(candidate))
    }
}

/// Adapts a condition that may fail to evaluate
pub struct Fallible<F>(pub F);

impl<T, E, F> Condition<T> for Fallible<F>
where
    F: FnMut(&T) -> Result<bool, E>,
    E: Display,
{
    fn check(&mut self, candidate: &T) -> SearchResult<bool> {
        (self.0)(candidate).map_err(|e| SearchError::predicate_failure(e.to_string()))
    }
}

/// Maps a candidate to a weight used to rank counterexamples
pub trait Weigher<T> {
    type Weight: PartialOrd + Debug;

    fn weigh(&mut self, candidate: &T) -> SearchResult<Self::Weight>;
}

impl<T, W, F> Weigher<T> for F
where
    F: FnMut(&T) -> W,
    W: PartialOrd + Debug,
{
    type Weight = W;

    fn weigh(&mut self, candidate: &T) -> SearchResult<W> {
        Ok(self(candidate))
    }
}

/// Adapts a weight function that may fail to evaluate
pub struct FallibleWeight<F>(pub F);

impl<T, W, E, F> Weigher<T> for FallibleWeight<F>
where
    F: FnMut(&T) -> Result<W, E>,
    W: PartialOrd + Debug,
    E: Display,
{
    type Weight = W;

    fn weigh(&mut self, candidate: &T) -> SearchResult<W> {
        (self.0)(candidate).map_err(|e| SearchError::weight_failure(e.to_string()))
    }
}

/// Compares two weights, rejecting pairs without an order (e.g. NaN)
pub(crate) fn compare_weights<W: PartialOrd + Debug>(a: &W, b: &W) -> SearchResult<Ordering> {
    a.partial_cmp(b).ok_or_else(|| {
        SearchError::incomparable_weight(format!("{:?} and {:?} cannot be ordered", a, b))
    })
}

/// Rejects a weight that is not ordered against itself
pub(crate) fn ensure_comparable<W: PartialOrd + Debug>(weight: &W) -> SearchResult<()> {
    compare_weights(weight, weight).map(|_| ())
}
