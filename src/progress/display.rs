//! Progress bar display for one download.

use crate::error::Result;
use crate::progress::ProgressBarOpts;
use indicatif::ProgressBar;

/// Byte progress bar fed by the aggregated download progress.
///
/// The total length is only known once the size probe returns, so the bar
/// starts empty and takes its length from the first update.
pub struct ProgressDisplay {
    bar: ProgressBar,
    clear: bool,
}

impl ProgressDisplay {
    pub fn new(opts: &ProgressBarOpts) -> Result<Self> {
        Ok(Self {
            bar: opts.to_progress_bar(0)?,
            clear: opts.clears(),
        })
    }

    /// Reflect the cumulative progress.
    pub fn update(&self, downloaded: u64, total: u64) {
        if self.bar.length() != Some(total) {
            self.bar.set_length(total);
        }
        self.bar.set_position(downloaded);
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    /// Finish the bar after a successful download.
    pub fn finish(self) {
        if self.clear {
            self.bar.finish_and_clear();
        } else {
            self.bar.finish();
        }
    }

    /// Leave the bar where it stopped after a failed or cancelled download.
    pub fn abandon(self, message: impl Into<String>) {
        if self.clear {
            self.bar.finish_and_clear();
        } else {
            self.bar.abandon_with_message(message.into());
        }
    }
}
