use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::utils::consts::PROGRESS_UPDATE_INTERVAL_MS;

pub mod templates {
    pub const BUSY: &str = "{spinner:.cyan} {msg} [{elapsed}]";
    pub const WRITE: &str = "{spinner:.green} {msg}";
}

/// Spinner that ticks on its own until finished.
pub fn spinner(template: &str, message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(PROGRESS_UPDATE_INTERVAL_MS));
    pb
}

/// Runs `work` while a spinner is shown, then clears it.
pub fn with_spinner<T>(message: &str, work: impl FnOnce() -> T) -> T {
    let pb = spinner(templates::BUSY, message);
    let out = work();
    pb.finish_and_clear();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_spinner_returns_work_result() {
        assert_eq!(with_spinner("adding", || 2 + 2), 4);
    }
}
