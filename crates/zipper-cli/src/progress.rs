//! Progress reporting for the zip command

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar fed by the archive writer's listener
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a reporter for `total` files; a disabled reporter draws nothing
    pub fn new(enabled: bool, total: u64) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar: Some(bar) }
    }

    /// Called right before a file is compressed
    pub fn file_started(&self, name: &str, compressed_so_far: u64) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{} ({} compressed)", name, HumanBytes(compressed_so_far)));
            bar.inc(1);
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message("Complete");
        }
    }

    pub fn abandon(&self) {
        if let Some(bar) = &self.bar {
            bar.abandon();
        }
    }
}
