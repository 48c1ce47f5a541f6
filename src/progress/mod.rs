//! Progress bar styling and display.
//!
//! - `style` - [`ProgressBarOpts`], the template and characters of the bar
//! - `display` - [`ProgressDisplay`], the bar driven by the download progress
//!
//! # Examples
//!
//! ```rust
//! use rangeload::downloader::DownloaderBuilder;
//! use rangeload::progress::ProgressBarOpts;
//!
//! let downloader = DownloaderBuilder::new()
//!     .progress(ProgressBarOpts::default().clear(false))
//!     .build();
//! ```

pub(crate) mod display;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use style::ProgressBarOpts;
