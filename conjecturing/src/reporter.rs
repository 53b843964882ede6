use indicatif::{ProgressBar, ProgressStyle};

/// Receives progress from a running search.
///
/// `advance` is called once per batch with the number of candidates that batch
/// actually checked (zero for empty batches, fewer than planned when a search
/// stops early). `finish` is called exactly once when the search ends, whether
/// it succeeded or failed.
pub trait ProgressReporter {
    fn advance(&mut self, count: u64);
    fn finish(&mut self);
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for Box<R> {
    fn advance(&mut self, count: u64) {
        (**self).advance(count)
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for &mut R {
    fn advance(&mut self, count: u64) {
        (**self).advance(count)
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}

/// Reporter that ignores all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn advance(&mut self, _count: u64) {}

    fn finish(&mut self) {}
}

/// Terminal progress bar, cleared once the search ends
#[derive(Debug)]
pub struct BarReporter {
    bar: ProgressBar,
}

const BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} checks ({per_sec}, eta {eta})";

impl BarReporter {
    /// Creates a bar for a search of `total` checks
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar }
    }

    #[cfg(test)]
    fn with_bar(bar: ProgressBar) -> Self {
        Self { bar }
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressReporter for BarReporter {
    fn advance(&mut self, count: u64) {
        self.bar.inc(count);
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Picks the reporter for a search; `show_progress` decides whether anything is drawn
pub fn reporter_for(show_progress: bool, total: u64) -> Box<dyn ProgressReporter> {
    if show_progress {
        Box::new(BarReporter::new(total))
    } else {
        Box::new(NullReporter)
    }
}
