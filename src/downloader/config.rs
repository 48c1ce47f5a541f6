//! Configuration structures and defaults for the downloader.
//!
//! A [`DownloaderConfig`] together with a [`Download`](crate::download::Download)
//! fully describes one chunked download: where the resource lives, how large
//! the ranges are, how many of them are fetched at once, where progress goes,
//! and which token cancels it.
//!
//! # Examples
//!
//! ```rust
//! use rangeload::downloader::DownloadCallback;
//! use rangeload::download::{Summary, Status};
//! use std::sync::Arc;
//!
//! let callback: Arc<DownloadCallback> = Arc::new(|summary: &Summary| {
//!     match summary.status() {
//!         Status::Success => println!("✓ Downloaded: {}", summary.download().filename),
//!         Status::Fail(msg) => println!("✗ Failed: {} - {}", summary.download().filename, msg),
//!         Status::Cancelled => println!("✗ Cancelled: {}", summary.download().filename),
//!         _ => {}
//!     }
//! });
//! ```

use crate::download::Summary;
use crate::engine::{ProgressCallback, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_PARALLEL_REQUESTS};
use crate::progress::ProgressBarOpts;

use reqwest::header::HeaderMap;
use std::env::current_dir;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Callback type for download completion events
pub type DownloadCallback = dyn Fn(&Summary) + Send + Sync;

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Directory where [`download_to_disk`](super::Downloader::download_to_disk) stores files.
    pub directory: PathBuf,
    /// Size of one range in bytes.
    pub chunk_size: u64,
    /// Maximum number of ranges in flight.
    pub max_parallel_requests: usize,
    /// Transport-level retries of transient request failures.
    pub retries: u32,
    /// Give up on a range after this long.
    pub chunk_timeout: Option<Duration>,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<reqwest::Proxy>,
    /// Use range requests to get content length instead of HEAD requests.
    pub use_range_for_content_length: bool,
    /// Progress bar options.
    pub progress: ProgressBarOpts,
    /// Called with `(downloaded_bytes, total_bytes)` as bytes arrive.
    pub on_progress: Option<Arc<ProgressCallback<'static>>>,
    /// Callback for when each download completes.
    pub on_complete: Option<Arc<DownloadCallback>>,
    /// Force download and overwrite existing files.
    pub overwrite: bool,
    /// Token cancelling every download started by this downloader.
    pub cancellation_token: Option<CancellationToken>,
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("directory", &self.directory)
            .field("chunk_size", &self.chunk_size)
            .field("max_parallel_requests", &self.max_parallel_requests)
            .field("retries", &self.retries)
            .field("chunk_timeout", &self.chunk_timeout)
            .field("headers", &self.headers)
            .field("proxy", &self.proxy)
            .field(
                "use_range_for_content_length",
                &self.use_range_for_content_length,
            )
            .field("progress", &self.progress)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("overwrite", &self.overwrite)
            .field("cancellation_token", &self.cancellation_token.is_some())
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_parallel_requests: DEFAULT_MAX_PARALLEL_REQUESTS,
            retries: 0,
            chunk_timeout: None,
            headers: None,
            proxy: None,
            use_range_for_content_length: false,
            progress: ProgressBarOpts::default(),
            on_progress: None,
            on_complete: None,
            overwrite: false,
            cancellation_token: None,
        }
    }
}
