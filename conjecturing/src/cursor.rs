use tracing::trace;

use crate::errors::{SearchError, SearchResult};

/// Forward-only view over a candidate source.
///
/// A cursor is created for one search and dropped at its end. It cannot peek
/// or rewind; every [`pull`](SequenceCursor::pull) consumes one candidate.
/// Running out of candidates before the budget is spent is reported as
/// [`SearchError::StreamExhausted`] instead of silently ending the search.
///
/// Pass `&mut iter` as the source to keep using the iterator after the search.
#[derive(Debug)]
pub struct SequenceCursor<I> {
    source: I,
    requested: u64,
    pulled: u64,
}

impl<I: Iterator> SequenceCursor<I> {
    /// Wraps `source` for a search that plans `requested` pulls
    pub fn new(source: impl IntoIterator<IntoIter = I>, requested: u64) -> Self {
        Self {
            source: source.into_iter(),
            requested,
            pulled: 0,
        }
    }

    /// Takes the next candidate from the source
    pub fn pull(&mut self) -> SearchResult<I::Item> {
        match self.source.next() {
            Some(candidate) => {
                self.pulled += 1;
                Ok(candidate)
            }
            None => {
                trace!(
                    "Candidate source ran dry after {} of {} pulls",
                    self.pulled,
                    self.requested
                );
                Err(SearchError::stream_exhausted(self.requested, self.pulled))
            }
        }
    }

    /// Number of candidates consumed so far
    pub fn pulled(&self) -> u64 {
        self.pulled
    }

    /// Number of pulls the search was planned with
    pub fn requested(&self) -> u64 {
        self.requested
    }
}
