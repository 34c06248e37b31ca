//! Progress indicators using indicatif

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner for indeterminate progress.
///
/// # Panics
///
/// Panics if the spinner template string is invalid (it is a compile-time constant and will not panic).
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// A spinner when progress should be shown, a hidden bar otherwise.
#[must_use]
pub fn maybe_spinner(show: bool, msg: &str) -> ProgressBar {
    if show {
        spinner(msg)
    } else {
        ProgressBar::hidden()
    }
}

/// Finish a spinner and erase it.
pub fn finish_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}
