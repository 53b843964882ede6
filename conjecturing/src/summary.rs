//! Human-readable text printed around a search.
//!
//! This is a side channel: nothing here influences the outcome, and callers
//! that only want the [`SearchOutcome`] never need it. The layout is
//!
//! ```text
//!   ________________________________
//!   Find counterexample 10 times
//!   - Generator: naturals
//!   - Condition: even
//!   ________________________________
//!
//!   Result: found counterexample!
//!   --> 1
//!   Checked 2 of 10 candidates in 35us
//! ```
use colored::Colorize;
use std::fmt::{Debug, Display};
use std::io::Write;

use crate::driver::SearchReport;
use crate::errors::SearchResult;
use crate::strategy::{Operation, SearchOutcome};

const RULE: &str = "  ________________________________";

/// Names shown in the heading for the pieces of a search
#[derive(Debug, Clone, Default)]
pub struct Labels {
    pub generator: String,
    pub condition: String,
    pub weight: Option<String>,
}

impl Labels {
    pub fn new(generator: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            generator: generator.into(),
            condition: condition.into(),
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }
}

/// Title line for an operation over `n` checks
pub fn title(operation: Operation, n: u64) -> String {
    match operation {
        Operation::FindFirst => format!("Find counterexample {} times", n),
        Operation::CountAll => format!("Count counterexamples {} times", n),
        Operation::FindMin => format!("Find the smallest {} times", n),
        Operation::FindMax => format!("Find the greatest {} times", n),
    }
}

/// Writes the ruled heading that precedes a search
pub fn write_heading<Out: Write + ?Sized>(
    out: &mut Out,
    operation: Operation,
    n: u64,
    labels: &Labels,
) -> SearchResult<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "  {}", title(operation, n).bold())?;
    writeln!(out, "  - Generator: {}", labels.generator)?;
    writeln!(out, "  - Condition: {}", labels.condition)?;
    if let Some(weight) = &labels.weight {
        writeln!(out, "  - Weight:    {}", weight)?;
    }
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    Ok(())
}

/// Writes the closing result lines for a finished search
pub fn write_result<Out, T, W>(out: &mut Out, report: &SearchReport<T, W>) -> SearchResult<()>
where
    Out: Write + ?Sized,
    T: Display,
    W: Debug,
{
    match &report.outcome {
        SearchOutcome::FoundAt(candidate) => {
            writeln!(out, "  {}", "Result: found counterexample!".red())?;
            writeln!(out, "  --> {}", candidate)?;
        }
        SearchOutcome::NotFound => {
            writeln!(out, "  {}", "Result: no concluding.".green())?;
        }
        SearchOutcome::Count(count) => {
            let line = format!("Result: {} counterexamples found!", count);
            if *count == 0 {
                writeln!(out, "  {}", line.green())?;
            } else {
                writeln!(out, "  {}", line.red())?;
            }
        }
        SearchOutcome::Extremal { candidate, weight } => {
            let which = match report.operation {
                Operation::FindMax => "greatest",
                _ => "lowest",
            };
            writeln!(out, "  {}", format!("Result: {} counterexample", which).red())?;
            writeln!(out, "  --> {} (weight {:?})", candidate, weight)?;
        }
        SearchOutcome::NoCounterexample => {
            writeln!(out, "  {}", "Result: no counterexample found.".green())?;
        }
    }

    writeln!(
        out,
        "  Checked {} of {} candidates in {}",
        report.checks,
        report.budget,
        humantime::format_duration(report.elapsed)
    )?;
    Ok(())
}
