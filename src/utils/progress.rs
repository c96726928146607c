//! Progress spinners using indicatif

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("    {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a spinner with a success message
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

/// Finish a spinner with a failure message
pub fn finish_with_failure(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("❌ {}", message));
}

/// Run `work` behind a spinner and return its result with the elapsed time.
///
/// The spinner ends with `done` on success and with the error text otherwise.
pub fn run_with_spinner<T, E: std::fmt::Display>(
    message: &str,
    done: &str,
    work: impl FnOnce() -> Result<T, E>,
) -> Result<(T, Duration), E> {
    let spinner = create_spinner(message);
    let start = Instant::now();
    match work() {
        Ok(value) => {
            finish_with_success(&spinner, done);
            Ok((value, start.elapsed()))
        }
        Err(err) => {
            finish_with_failure(&spinner, &err.to_string());
            Err(err)
        }
    }
}
