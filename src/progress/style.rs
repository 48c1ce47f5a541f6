//! Progress bar styling.
//!
//! The bar tracks bytes, so the default template shows transferred and total
//! bytes together with the throughput.
//!
//! ```rust
//! use rangeload::progress::ProgressBarOpts;
//!
//! let opts = ProgressBarOpts::default()
//!     .template(ProgressBarOpts::TEMPLATE_BAR_WITH_POSITION)
//!     .progress_chars(ProgressBarOpts::CHARS_FINE)
//!     .clear(false);
//! assert!(opts.is_enabled());
//! ```

use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};

/// Define the options for the download progress bar.
#[derive(Debug, Clone)]
pub struct ProgressBarOpts {
    /// Progress bar template string.
    template: Option<String>,
    /// Progression characters set.
    ///
    /// There must be at least 3 characters for the following states:
    /// "filled", "current", and "to do".
    progress_chars: Option<String>,
    /// Enable or disable the progress bar.
    enabled: bool,
    /// Clear the progress bar once completed.
    clear: bool,
}

impl Default for ProgressBarOpts {
    fn default() -> Self {
        Self {
            template: Some(Self::TEMPLATE_PIP.into()),
            progress_chars: Some(Self::CHARS_LINE.into()),
            enabled: true,
            clear: true,
        }
    }
}

impl ProgressBarOpts {
    /// Template representing the bar and its position in bytes.
    ///
    /// `███████████████████████████████████████ 11.00 MiB/12.00 MiB (91%) eta 00:00:02`
    pub const TEMPLATE_BAR_WITH_POSITION: &'static str =
        "{bar:40.blue} {bytes:>}/{total_bytes} ({percent}%) eta {eta_precise:.blue}";
    /// Template which looks like the Python package installer pip.
    ///
    /// `━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━ 211.23 KiB/211.23 KiB 1008.31 KiB/s eta 0s`
    pub const TEMPLATE_PIP: &'static str =
        "{bar:40.green/black} {bytes:>11.green}/{total_bytes:<11.green} {bytes_per_sec:>13.red} eta {eta:.blue}";
    /// Use fine blocks as progress characters: `"█▉▊▋▌▍▎▏  "`.
    pub const CHARS_FINE: &'static str = "█▉▊▋▌▍▎▏  ";
    /// Use a line as progress characters: `"━╾─"`.
    pub const CHARS_LINE: &'static str = "━╾╴─";
    /// Use rough blocks as progress characters: `"█  "`.
    pub const CHARS_ROUGH: &'static str = "█  ";

    /// Options which hide the progress bar.
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set the indicatif template.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Set the progression characters.
    pub fn progress_chars(mut self, chars: impl Into<String>) -> Self {
        self.progress_chars = Some(chars.into());
        self
    }

    /// Set to `true` to clear the progress bar upon completion.
    pub fn clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn clears(&self) -> bool {
        self.clear
    }

    /// Create a [`ProgressStyle`] based on the provided options.
    pub fn to_progress_style(&self) -> Result<ProgressStyle> {
        let mut style = ProgressStyle::default_bar();
        if let Some(template) = &self.template {
            style = style
                .template(template)
                .map_err(|e| Error::InvalidConfig(format!("progress template: {}", e)))?;
        }
        if let Some(progress_chars) = &self.progress_chars {
            style = style.progress_chars(progress_chars);
        }
        Ok(style)
    }

    /// Create a [`ProgressBar`] of `len` bytes, hidden if the bar is disabled.
    pub fn to_progress_bar(&self, len: u64) -> Result<ProgressBar> {
        if !self.enabled {
            return Ok(ProgressBar::hidden());
        }
        Ok(ProgressBar::new(len).with_style(self.to_progress_style()?))
    }
}
