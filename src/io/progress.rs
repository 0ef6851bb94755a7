//! Progress display for dataset scans

use crate::io::configuration::{PROGRESS_BAR_WIDTH, PROGRESS_REFRESH_RECORDS};
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over the records of a molecule dataset
///
/// Hidden bars accept every call and draw nothing, so scanning code does not
/// branch on whether output is wanted.
#[derive(Clone)]
pub struct ScanProgress {
    bar: ProgressBar,
    pending: usize,
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::hidden()
    }
}

impl ScanProgress {
    /// Create a progress bar that draws to stderr
    pub fn visible() -> Self {
        Self {
            bar: ProgressBar::new(0),
            pending: 0,
        }
    }

    /// Create a progress bar that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            pending: 0,
        }
    }

    fn scan_style() -> ProgressStyle {
        let template = format!(
            "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} ({{per_sec}})"
        );
        ProgressStyle::default_bar()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ")
    }

    /// Reset the bar for a scan over `total` records
    pub fn start(&mut self, total: usize, label: &str) {
        self.pending = 0;
        self.bar.set_style(Self::scan_style());
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message(label.to_string());
    }

    /// Record one scanned record, redrawing in batches
    pub fn advance(&mut self) {
        self.pending += 1;
        if self.pending >= PROGRESS_REFRESH_RECORDS {
            self.bar.inc(self.pending as u64);
            self.pending = 0;
        }
    }

    /// Number of records already reflected in the bar position
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Flush pending records and leave the bar with a closing message
    pub fn finish(&mut self, message: &str) {
        self.bar.inc(self.pending as u64);
        self.pending = 0;
        self.bar.finish_with_message(message.to_string());
    }
}
