pub mod batch;
pub mod condition;
pub mod config;
pub mod cursor;
pub mod driver;
pub mod errors;
pub mod reporter;
pub mod strategy;
pub mod summary;

pub use batch::{BatchPlan, Granularity};
pub use condition::{Condition, Fallible, FallibleWeight, Weigher};
pub use config::EngineConfig;
pub use cursor::SequenceCursor;
pub use driver::{
    count_counterexamples, find_counterexample, greatest_counterexample, smallest_counterexample,
    SearchDriver, SearchReport, SearchState,
};
pub use errors::{SearchError, SearchResult};
pub use reporter::{BarReporter, NullReporter, ProgressReporter};
pub use strategy::{
    CountAll, Direction, FindExtremal, FindFirst, Operation, SearchOutcome, SearchStrategy,
};
