//! The four ways of looking for counterexamples.
//!
//! Every strategy is a per-candidate fold: the driver pulls candidates batch by
//! batch and hands each one to [`SearchStrategy::observe`], which updates the
//! running result and says whether the search may stop. Only [`FindFirst`]
//! ever asks to stop early; the others always see the whole budget.
//!
//! | Strategy                   | Running state             | Outcome                                  |
//! |----------------------------|---------------------------|------------------------------------------|
//! | [`FindFirst`]              | first failure, if any     | `FoundAt` / `NotFound`                   |
//! | [`CountAll`]               | number of failures        | `Count`                                  |
//! | [`FindExtremal`] (min/max) | best `(candidate, weight)` | `Extremal` / `NoCounterexample`          |
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::ops::ControlFlow;

use crate::condition::{compare_weights, ensure_comparable, Condition, Weigher};
use crate::errors::SearchResult;

/// Result of a completed search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SearchOutcome<T, W = ()> {
    /// Find-first saw no counterexample within the budget
    NotFound,
    /// Find-first stopped at this counterexample
    FoundAt(T),
    /// Count-all tallied this many counterexamples
    Count(u64),
    /// Extremal search kept this counterexample and its weight
    Extremal { candidate: T, weight: W },
    /// Extremal search saw no counterexample within the budget
    NoCounterexample,
}

impl<T, W> SearchOutcome<T, W> {
    /// The counterexample carried by the outcome, if any
    pub fn counterexample(&self) -> Option<&T> {
        match self {
            SearchOutcome::FoundAt(candidate) => Some(candidate),
            SearchOutcome::Extremal { candidate, .. } => Some(candidate),
            _ => None,
        }
    }

    /// Whether the conjecture survived every check
    pub fn is_clean(&self) -> bool {
        matches!(
            self,
            SearchOutcome::NotFound | SearchOutcome::NoCounterexample | SearchOutcome::Count(0)
        )
    }
}

/// Which search is being run, used for logging and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FindFirst,
    CountAll,
    FindMin,
    FindMax,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::FindFirst => "find-first",
            Operation::CountAll => "count-all",
            Operation::FindMin => "find-min",
            Operation::FindMax => "find-max",
        };
        f.write_str(name)
    }
}

/// A per-candidate fold driven by [`SearchDriver`](crate::driver::SearchDriver)
pub trait SearchStrategy<T> {
    type Weight;

    fn operation(&self) -> Operation;

    /// Folds one candidate into the running result.
    ///
    /// Returning `ControlFlow::Break` ends the whole search, not just the
    /// current batch.
    fn observe(&mut self, candidate: T) -> SearchResult<ControlFlow<()>>;

    fn into_outcome(self) -> SearchOutcome<T, Self::Weight>;
}

/// Stops at the first counterexample
pub struct FindFirst<T, C> {
    condition: C,
    found: Option<T>,
}

impl<T, C: Condition<T>> FindFirst<T, C> {
    pub fn new(condition: C) -> Self {
        Self {
            condition,
            found: None,
        }
    }
}

impl<T, C: Condition<T>> SearchStrategy<T> for FindFirst<T, C> {
    type Weight = ();

    fn operation(&self) -> Operation {
        Operation::FindFirst
    }

    fn observe(&mut self, candidate: T) -> SearchResult<ControlFlow<()>> {
        if self.condition.check(&candidate)? {
            return Ok(ControlFlow::Continue(()));
        }
        self.found = Some(candidate);
        Ok(ControlFlow::Break(()))
    }

    fn into_outcome(self) -> SearchOutcome<T> {
        match self.found {
            Some(candidate) => SearchOutcome::FoundAt(candidate),
            None => SearchOutcome::NotFound,
        }
    }
}

/// Counts every counterexample in the budget
pub struct CountAll<C> {
    condition: C,
    count: u64,
}

impl<C> CountAll<C> {
    pub fn new(condition: C) -> Self {
        Self {
            condition,
            count: 0,
        }
    }
}

impl<T, C: Condition<T>> SearchStrategy<T> for CountAll<C> {
    type Weight = ();

    fn operation(&self) -> Operation {
        Operation::CountAll
    }

    fn observe(&mut self, candidate: T) -> SearchResult<ControlFlow<()>> {
        if !self.condition.check(&candidate)? {
            self.count += 1;
        }
        Ok(ControlFlow::Continue(()))
    }

    fn into_outcome(self) -> SearchOutcome<T> {
        SearchOutcome::Count(self.count)
    }
}

/// Which end of the weight order an extremal search keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Min,
    Max,
}

impl Direction {
    /// Whether a new weight ordered `ordering` against the current best replaces it.
    /// Equal weights never do: the first counterexample seen wins ties.
    fn prefers(self, ordering: Ordering) -> bool {
        match self {
            Direction::Min => ordering == Ordering::Less,
            Direction::Max => ordering == Ordering::Greater,
        }
    }
}

/// Keeps the lightest or heaviest counterexample
pub struct FindExtremal<T, C, G: Weigher<T>> {
    condition: C,
    weigher: G,
    direction: Direction,
    best: Option<(T, G::Weight)>,
}

impl<T, C: Condition<T>, G: Weigher<T>> FindExtremal<T, C, G> {
    pub fn new(condition: C, weigher: G, direction: Direction) -> Self {
        Self {
            condition,
            weigher,
            direction,
            best: None,
        }
    }

    pub fn min(condition: C, weigher: G) -> Self {
        Self::new(condition, weigher, Direction::Min)
    }

    pub fn max(condition: C, weigher: G) -> Self {
        Self::new(condition, weigher, Direction::Max)
    }
}

impl<T, C: Condition<T>, G: Weigher<T>> SearchStrategy<T> for FindExtremal<T, C, G> {
    type Weight = G::Weight;

    fn operation(&self) -> Operation {
        match self.direction {
            Direction::Min => Operation::FindMin,
            Direction::Max => Operation::FindMax,
        }
    }

    fn observe(&mut self, candidate: T) -> SearchResult<ControlFlow<()>> {
        if self.condition.check(&candidate)? {
            return Ok(ControlFlow::Continue(()));
        }

        let weight = self.weigher.weigh(&candidate)?;
        ensure_comparable(&weight)?;

        let replace = match &self.best {
            None => true,
            Some((_, best_weight)) => self
                .direction
                .prefers(compare_weights(&weight, best_weight)?),
        };
        if replace {
            self.best = Some((candidate, weight));
        }
        Ok(ControlFlow::Continue(()))
    }

    fn into_outcome(self) -> SearchOutcome<T, G::Weight> {
        match self.best {
            Some((candidate, weight)) => SearchOutcome::Extremal { candidate, weight },
            None => SearchOutcome::NoCounterexample,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchError;

    fn fold<T, S: SearchStrategy<T>>(
        mut strategy: S,
        candidates: impl IntoIterator<Item = T>,
    ) -> SearchResult<SearchOutcome<T, S::Weight>> {
        for candidate in candidates {
            if strategy.observe(candidate)?.is_break() {
                break;
            }
        }
        Ok(strategy.into_outcome())
    }

    fn is_even(x: &i64) -> bool {
        x % 2 == 0
    }

    #[test]
    fn test_find_first_stops_at_first_failure() {
        let outcome = fold(FindFirst::new(is_even), 0..10).unwrap();
        assert_eq!(outcome, SearchOutcome::FoundAt(1));
    }

    #[test]
    fn test_count_all_tallies_failures() {
        let outcome = fold(CountAll::new(is_even), 0..10).unwrap();
        assert_eq!(outcome, SearchOutcome::Count(5));
    }

    #[test]
    fn test_extremal_min_and_max() {
        let identity = |x: &i64| *x;
        let min = fold(FindExtremal::min(is_even, identity), 0..10).unwrap();
        assert_eq!(
            min,
            SearchOutcome::Extremal {
                candidate: 1,
                weight: 1
            }
        );

        let max = fold(FindExtremal::max(is_even, identity), 0..10).unwrap();
        assert_eq!(
            max,
            SearchOutcome::Extremal {
                candidate: 9,
                weight: 9
            }
        );
    }

    #[test]
    fn test_extremal_ties_keep_first_seen() {
        // Every odd candidate weighs the same; the first one must survive.
        let constant = |_: &(usize, i64)| 7;
        let failing = |c: &(usize, i64)| c.1 % 2 == 0;
        let candidates = vec![(0, 2), (1, 3), (2, 5), (3, 7)];

        let min = fold(FindExtremal::min(failing, constant), candidates.clone()).unwrap();
        assert_eq!(min.counterexample(), Some(&(1, 3)));

        let max = fold(FindExtremal::max(failing, constant), candidates).unwrap();
        assert_eq!(max.counterexample(), Some(&(1, 3)));
    }

    #[test]
    fn test_extremal_without_failures() {
        let outcome = fold(FindExtremal::min(|_: &i64| true, |x: &i64| *x), 0..5).unwrap();
        assert_eq!(outcome, SearchOutcome::NoCounterexample);
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_extremal_rejects_nan_weight() {
        let weights = [1.0, f64::NAN, 0.5];
        let err = fold(FindExtremal::min(|_: &f64| false, |w: &f64| *w), weights).unwrap_err();
        assert!(matches!(err, SearchError::IncomparableWeight(_)));
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::FindFirst.to_string(), "find-first");
        assert_eq!(
            FindExtremal::<i64, _, _>::max(is_even, |x: &i64| *x).operation(),
            Operation::FindMax
        );
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let outcome: SearchOutcome<i64> = SearchOutcome::FoundAt(3);
        assert_eq!(
            serde_json::to_string(&outcome).unwrap(),
            r#"{"kind":"found_at","value":3}"#
        );

        let outcome: SearchOutcome<i64, i64> = SearchOutcome::Extremal {
            candidate: 9,
            weight: 9,
        };
        assert_eq!(
            serde_json::to_string(&outcome).unwrap(),
            r#"{"kind":"extremal","value":{"candidate":9,"weight":9}}"#
        );

        let outcome: SearchOutcome<i64> = SearchOutcome::NotFound;
        assert_eq!(
            serde_json::to_string(&outcome).unwrap(),
            r#"{"kind":"not_found"}"#
        );
    }
}
