//! Rangeload downloads a single large HTTP resource as concurrent byte
//! ranges and hands it back as one ordered buffer.
//!
//! The resource length is probed first, then `[0, length)` is split into
//! fixed-size ranges which are fetched under a bounded parallelism window.
//! Progress is aggregated across ranges as bytes arrive, one cancellation
//! token aborts everything in flight, and the ranges are reassembled in offset
//! order no matter which finished first.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rangeload::{Download, DownloaderBuilder, Error};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let iso = Download::try_from("https://example.com/images/disk.iso")?;
//! let downloader = DownloaderBuilder::new()
//!     .chunk_size(8 * 1024 * 1024)
//!     .max_parallel_requests(6)
//!     .build();
//! let bytes = downloader.download(&iso).await?;
//! println!("{} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`engine`] - Size probing, range fetching, the chunk scheduler and reassembly
//! - [`download`] - The `Download` struct and completion summaries
//! - [`downloader`] - The `Downloader` and `DownloaderBuilder`
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - The `Transport` seam and the `reqwest` based client
//! - [`progress`] - Progress bar styling and display
//! - [`utils`] - Header parsing helpers

pub mod download;
pub mod downloader;
pub mod engine;
pub mod error;
pub mod http;
pub mod progress;
pub mod utils;

pub use download::{Download, Status, Summary};
pub use downloader::{Downloader, DownloaderBuilder};
pub use engine::{
    assemble, fetch_resource, probe_size, ChunkRange, ChunkResult, ChunkScheduler,
    DownloadReport, RangeFetcher,
};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig, HttpTransport, Transport};
pub use progress::ProgressBarOpts;
pub use tokio_util::sync::CancellationToken;
