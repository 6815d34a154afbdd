//! Stage-based progress reporting for a single graft run

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::time::Duration;

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg:<20} [{bar:30.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static SPINNER_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{msg:<20} {spinner} {elapsed_precise}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Coordinates progress display for the pipeline stages of one graft
///
/// Stages with a known extent get a bar; open-ended stages (the solve) get
/// a ticking spinner.
pub struct ProgressManager {
    multi_progress: MultiProgress,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
        }
    }

    /// Start a bounded stage with a progress bar
    pub fn stage(&self, label: &str, len: u64) -> ProgressBar {
        let bar = ProgressBar::new(len);
        bar.set_style(STAGE_STYLE.clone());
        bar.set_message(label.to_string());
        self.multi_progress.add(bar)
    }

    /// Start an open-ended stage with a spinner
    pub fn spinner(&self, label: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(SPINNER_STYLE.clone());
        spinner.set_message(label.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.multi_progress.add(spinner)
    }

    /// Print a line above the live bars
    pub fn announce(&self, line: &str) {
        // Dropped silently if the draw target is hidden
        let _ = self.multi_progress.println(line);
    }
}
