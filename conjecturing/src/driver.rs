//! Runs a strategy over a batched budget of checks.
//!
//! The driver owns everything that lives for exactly one search: the batch
//! plan, the cursor over the candidate source and the progress reporter.
//! Nothing is kept between calls.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──> Running ──┬──> TerminatedEarly       (find-first hit a counterexample)
//!                    ├──> TerminatedExhausted   (last planned check done)
//!                    └──> TerminatedError       (source ran dry, predicate or weight failed)
//! ```
//!
//! Errors are fatal: the search stops at once, the reporter is still finished,
//! and no partial outcome is returned.
use serde::Serialize;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

use crate::batch::{BatchPlan, Granularity};
use crate::condition::{Condition, Weigher};
use crate::config::EngineConfig;
use crate::cursor::SequenceCursor;
use crate::errors::SearchResult;
use crate::reporter::{reporter_for, ProgressReporter};
use crate::strategy::{CountAll, FindExtremal, FindFirst, Operation, SearchOutcome, SearchStrategy};

/// Where a search is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    Idle,
    Running,
    TerminatedEarly,
    TerminatedExhausted,
    TerminatedError,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SearchState::Idle | SearchState::Running)
    }

    fn advance_to(&mut self, next: SearchState) {
        if *self != next {
            debug!("Search state {:?} -> {:?}", self, next);
            *self = next;
        }
    }
}

/// Outcome of a search plus what it took to get there
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport<T, W = ()> {
    pub operation: Operation,
    pub outcome: SearchOutcome<T, W>,
    /// Requested number of checks
    pub budget: u64,
    /// Candidates actually pulled from the source
    pub checks: u64,
    /// Batches processed, the last one possibly cut short
    pub batches: usize,
    pub state: SearchState,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl<T: Serialize, W: Serialize> SearchReport<T, W> {
    /// Renders the report as pretty-printed JSON
    pub fn to_json(&self) -> SearchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Drives strategies over batched candidate pulls
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchDriver {
    granularity: Granularity,
    show_progress: bool,
}

impl SearchDriver {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            show_progress: false,
        }
    }

    /// Builds a driver from the loaded engine configuration
    pub fn from_config(config: &EngineConfig) -> SearchResult<Self> {
        Ok(Self {
            granularity: config.granularity()?,
            show_progress: config.show_progress,
        })
    }

    /// Turns the terminal progress bar on or off
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Runs `strategy` over `n` candidates, reporting to a bar if progress is enabled
    pub fn run<T, S, I>(
        &self,
        n: u64,
        strategy: S,
        source: I,
    ) -> SearchResult<SearchReport<T, S::Weight>>
    where
        S: SearchStrategy<T>,
        I: IntoIterator<Item = T>,
    {
        let mut reporter = reporter_for(self.show_progress, n);
        self.run_with(n, strategy, source, &mut reporter)
    }

    /// Runs `strategy` over `n` candidates with an explicit reporter
    pub fn run_with<T, S, I, R>(
        &self,
        n: u64,
        mut strategy: S,
        source: I,
        reporter: &mut R,
    ) -> SearchResult<SearchReport<T, S::Weight>>
    where
        S: SearchStrategy<T>,
        I: IntoIterator<Item = T>,
        R: ProgressReporter + ?Sized,
    {
        let started = Instant::now();
        let operation = strategy.operation();
        let plan = BatchPlan::new(n, self.granularity);
        let mut cursor = SequenceCursor::new(source, n);
        let mut state = SearchState::Idle;

        info!("Starting {} search over {} checks", operation, n);
        debug!(
            "Planned {} batches ({} non-empty) with {:?}",
            plan.len(),
            plan.non_empty_batches(),
            self.granularity
        );

        let driven = drive(&plan, &mut strategy, &mut cursor, reporter, &mut state);
        reporter.finish();

        let batches = match driven {
            Ok(batches) => batches,
            Err(err) => {
                state.advance_to(SearchState::TerminatedError);
                let culprit = if err.is_evaluation_failure() {
                    "condition or weight"
                } else {
                    "candidate source"
                };
                warn!(
                    "{} search aborted by the {} after {} of {} checks: {}",
                    operation,
                    culprit,
                    cursor.pulled(),
                    cursor.requested(),
                    err
                );
                return Err(err);
            }
        };

        let report = SearchReport {
            operation,
            outcome: strategy.into_outcome(),
            budget: n,
            checks: cursor.pulled(),
            batches,
            state,
            elapsed: started.elapsed(),
        };

        info!(
            "{} search complete: {} checks in {} batches ({:?})",
            operation, report.checks, report.batches, report.state
        );
        Ok(report)
    }

    /// Returns the first counterexample among `n` candidates
    pub fn find_first<T, C, I>(
        &self,
        n: u64,
        condition: C,
        source: I,
    ) -> SearchResult<SearchReport<T>>
    where
        C: Condition<T>,
        I: IntoIterator<Item = T>,
    {
        self.run(n, FindFirst::new(condition), source)
    }

    /// Counts the counterexamples among `n` candidates
    pub fn count_all<T, C, I>(
        &self,
        n: u64,
        condition: C,
        source: I,
    ) -> SearchResult<SearchReport<T>>
    where
        C: Condition<T>,
        I: IntoIterator<Item = T>,
    {
        self.run(n, CountAll::new(condition), source)
    }

    /// Returns the lightest counterexample among `n` candidates
    pub fn find_min<T, C, G, I>(
        &self,
        n: u64,
        condition: C,
        weigher: G,
        source: I,
    ) -> SearchResult<SearchReport<T, G::Weight>>
    where
        C: Condition<T>,
        G: Weigher<T>,
        I: IntoIterator<Item = T>,
    {
        self.run(n, FindExtremal::min(condition, weigher), source)
    }

    /// Returns the heaviest counterexample among `n` candidates
    pub fn find_max<T, C, G, I>(
        &self,
        n: u64,
        condition: C,
        weigher: G,
        source: I,
    ) -> SearchResult<SearchReport<T, G::Weight>>
    where
        C: Condition<T>,
        G: Weigher<T>,
        I: IntoIterator<Item = T>,
    {
        self.run(n, FindExtremal::max(condition, weigher), source)
    }
}

/// The batch loop shared by every strategy. Returns the number of batches touched.
fn drive<T, S, I, R>(
    plan: &BatchPlan,
    strategy: &mut S,
    cursor: &mut SequenceCursor<I>,
    reporter: &mut R,
    state: &mut SearchState,
) -> SearchResult<usize>
where
    S: SearchStrategy<T>,
    I: Iterator<Item = T>,
    R: ProgressReporter + ?Sized,
{
    for (index, &size) in plan.sizes().iter().enumerate() {
        state.advance_to(SearchState::Running);

        let mut processed = 0u64;
        let mut flow = ControlFlow::Continue(());
        while processed < size {
            let candidate = cursor.pull()?;
            processed += 1;
            flow = strategy.observe(candidate)?;
            if flow.is_break() {
                break;
            }
        }

        reporter.advance(processed);
        trace!("Batch {} done: {}/{} checks", index, processed, size);

        if flow.is_break() {
            state.advance_to(SearchState::TerminatedEarly);
            return Ok(index + 1);
        }
    }

    state.advance_to(SearchState::TerminatedExhausted);
    Ok(plan.len())
}

/// Returns the first of `n` candidates failing `condition`.
pub fn find_counterexample<T, C, I>(
    n: u64,
    condition: C,
    source: I,
    show_progress: bool,
) -> SearchResult<SearchOutcome<T>>
where
    C: Condition<T>,
    I: IntoIterator<Item = T>,
{
    SearchDriver::default()
        .with_progress(show_progress)
        .find_first(n, condition, source)
        .map(|report| report.outcome)
}

/// Counts how many of `n` candidates fail `condition`.
pub fn count_counterexamples<T, C, I>(
    n: u64,
    condition: C,
    source: I,
    show_progress: bool,
) -> SearchResult<SearchOutcome<T>>
where
    C: Condition<T>,
    I: IntoIterator<Item = T>,
{
    SearchDriver::default()
        .with_progress(show_progress)
        .count_all(n, condition, source)
        .map(|report| report.outcome)
}

/// Returns the lowest-weight counterexample among `n` candidates.
pub fn smallest_counterexample<T, C, G, I>(
    n: u64,
    condition: C,
    source: I,
    weigher: G,
    show_progress: bool,
) -> SearchResult<SearchOutcome<T, G::Weight>>
where
    C: Condition<T>,
    G: Weigher<T>,
    I: IntoIterator<Item = T>,
{
    SearchDriver::default()
        .with_progress(show_progress)
        .find_min(n, condition, weigher, source)
        .map(|report| report.outcome)
}

/// Returns the highest-weight counterexample among `n` candidates.
pub fn greatest_counterexample<T, C, G, I>(
    n: u64,
    condition: C,
    source: I,
    weigher: G,
    show_progress: bool,
) -> SearchResult<SearchOutcome<T, G::Weight>>
where
    C: Condition<T>,
    G: Weigher<T>,
    I: IntoIterator<Item = T>,
{
    SearchDriver::default()
        .with_progress(show_progress)
        .find_max(n, condition, weigher, source)
        .map(|report| report.outcome)
}
