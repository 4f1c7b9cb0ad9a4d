//! Logging setup and the scoped progress bar used while scoring.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::ops::Deref;
use tracing::Level;

const BAR_TEMPLATE: &str = "{msg} [{bar:40}] {pos}/{len}";

/// Installs the global `tracing` subscriber. Safe to call more than once.
pub fn init(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();
}

/// Bar style for per-method scoring progress.
pub fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// A progress bar for one unit of work (one method's data sets).
///
/// Entering resets the bar to `total` steps labelled `label`. Dropping the
/// scope always leaves the bar finished: `complete` finishes it normally,
/// any other exit (an error unwinding through `?`) abandons it in place.
pub struct ProgressScope<'a> {
    bar: &'a ProgressBar,
    completed: bool,
}

impl<'a> ProgressScope<'a> {
    pub fn enter(bar: &'a ProgressBar, label: &str, total: usize) -> Self {
        bar.reset();
        bar.set_length(total as u64);
        bar.set_message(label.to_string());
        Self {
            bar,
            completed: false,
        }
    }

    pub fn complete(mut self) {
        self.completed = true;
        self.bar.finish();
    }
}

impl Deref for ProgressScope<'_> {
    type Target = ProgressBar;

    fn deref(&self) -> &Self::Target {
        self.bar
    }
}

impl Drop for ProgressScope<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.bar.abandon();
        }
    }
}
