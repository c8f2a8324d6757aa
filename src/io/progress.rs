//! Progress display for batch passes over many files

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Single progress bar tracking files of one batch pass
///
/// A disabled manager (quiet mode) accepts every call and draws nothing.
pub struct ProgressManager {
    enabled: bool,
    bar: Option<ProgressBar>,
    completed: usize,
}

impl ProgressManager {
    /// Create a manager; `enabled == false` suppresses all output
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bar: None,
            completed: 0,
        }
    }

    /// Start a pass over `file_count` files labelled `stage`
    pub fn initialize(&mut self, stage: &str, file_count: usize) {
        self.completed = 0;
        if !self.enabled {
            return;
        }
        let bar = ProgressBar::new(file_count as u64);
        bar.set_style(BATCH_STYLE.clone());
        bar.set_prefix(stage.to_string());
        self.bar = Some(bar);
    }

    /// Show the file currently being processed
    pub fn start_file(&self, path: &Path) {
        if let Some(ref bar) = self.bar {
            let display_name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            bar.set_message(display_name);
        }
    }

    /// Count one file as done, successful or skipped
    pub fn complete_file(&mut self) {
        self.completed += 1;
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    /// Files counted so far in the current pass
    pub const fn completed(&self) -> usize {
        self.completed
    }

    /// Clear the bar at the end of a pass
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
