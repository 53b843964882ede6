//! Splits a check budget into batches for progress reporting.
//!
//! Batches carry no meaning for the outcome of a search; they only decide how
//! often the progress reporter is ticked. With the default fixed granularity of
//! 100 a budget of `n` checks always yields exactly 100 batches:
//!
//! ```text
//! n = 250  ->  [3, 3, ..., 3, 2, 2, ..., 2]   (50 x 3, then 50 x 2)
//! n = 7    ->  [1, 1, 1, 1, 1, 1, 1, 0, ...]  (7 x 1, then 93 x 0)
//! ```
//!
//! [`Granularity::Adaptive`] caps the batch count at `n`, which avoids the
//! zero-sized batches when the budget is small.
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Number of progress ticks used when nothing else is configured.
pub const DEFAULT_GRANULARITY: usize = 100;

/// Upper bound on the number of batches in one plan.
pub const MAX_GRANULARITY: usize = 1_000_000;

/// How many batches a budget is split into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Always exactly this many batches, zero-sized ones included
    Fixed(NonZeroUsize),
    /// `min(max, n)` batches, so every batch holds at least one check
    Adaptive { max: NonZeroUsize },
}

impl Granularity {
    /// Number of batches this granularity produces for a budget of `n` checks.
    ///
    /// Counts above [`MAX_GRANULARITY`] are clamped to it.
    pub fn batch_count(&self, n: u64) -> usize {
        match *self {
            Granularity::Fixed(count) => count.get().min(MAX_GRANULARITY),
            Granularity::Adaptive { max } => {
                let max = max.get().min(MAX_GRANULARITY);
                usize::try_from(n).map_or(max, |n| n.min(max))
            }
        }
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Fixed(default_granularity())
    }
}

pub(crate) fn default_granularity() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_GRANULARITY).unwrap_or(NonZeroUsize::MIN)
}

/// Splits `n` checks into `count` batches.
///
/// The first `n % count` batches get one extra check, so sizes differ by at
/// most one and the larger ones come first. A `count` of zero is only valid
/// for an empty budget and yields no batches.
pub fn split(n: u64, count: usize) -> Vec<u64> {
    if count == 0 {
        debug_assert_eq!(n, 0, "non-empty budget needs at least one batch");
        return Vec::new();
    }

    let count_u64 = count as u64;
    let base = n / count_u64;
    let remainder = (n % count_u64) as usize;

    let mut sizes = Vec::with_capacity(count);
    sizes.extend(std::iter::repeat(base + 1).take(remainder));
    sizes.extend(std::iter::repeat(base).take(count - remainder));
    sizes
}

/// The ordered batch sizes for one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    sizes: Vec<u64>,
    total: u64,
}

impl BatchPlan {
    /// Plans `n` checks with the given granularity
    pub fn new(n: u64, granularity: Granularity) -> Self {
        Self {
            sizes: split(n, granularity.batch_count(n)),
            total: n,
        }
    }

    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    /// Total number of checks, always the sum of [`BatchPlan::sizes`]
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Number of batches that will actually pull candidates
    pub fn non_empty_batches(&self) -> usize {
        self.sizes.iter().filter(|&&size| size > 0).count()
    }
}

impl<'a> IntoIterator for &'a BatchPlan {
    type Item = &'a u64;
    type IntoIter = std::slice::Iter<'a, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.sizes.iter()
    }
}
