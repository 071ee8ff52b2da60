//! User-facing progress output.
//!
//! Long-running phases (rendering, uploading, comparing) show a spinner
//! on stderr; results (report URLs, comparison summaries) print to
//! stdout so CI can capture them. Diagnostics go through `tracing`, not
//! through here.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::VizError;

/// Progress reporter honoring quiet mode.
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Starts a spinner-backed phase.
    #[must_use]
    pub fn task(&self, message: impl Into<String>) -> Task {
        let message = message.into();
        if self.quiet {
            return Task { bar: None, message };
        }
        let bar = ProgressBar::new_spinner().with_message(message.clone());
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Task {
            bar: Some(bar),
            message,
        }
    }

    /// Prints a result line to stdout.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    /// Prints an error to stderr without terminating anything.
    pub fn failure(&self, error: &VizError) {
        eprintln!("{} {error}", style("✗").red().bold());
    }
}

/// One in-flight phase; finishes on success or failure.
pub struct Task {
    bar: Option<ProgressBar>,
    message: String,
}

impl Task {
    /// Completes the phase, leaving a checkmarked line behind.
    pub fn success(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
            eprintln!("{} {}", style("✓").green(), self.message);
        }
    }

    /// Abandons the phase; the caller reports the error itself.
    pub fn fail(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Indents every line of a multi-line summary for display under a
/// heading line.
#[must_use]
pub fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
