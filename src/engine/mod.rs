//! The chunked-range download engine.
//!
//! The engine turns one remote resource into one ordered byte buffer:
//!
//! 1. [`probe_size`] asks the transport how long the resource is.
//! 2. [`ChunkScheduler`] splits `[0, length)` into [`ChunkRange`]s and keeps a
//!    bounded window of [`RangeFetcher`] calls in flight.
//! 3. [`assemble`] puts the out-of-order [`ChunkResult`]s back in offset order.
//!
//! [`fetch_resource`] chains the three steps. The engine only depends on the
//! [`Transport`] trait, so any transport (or a test double) can drive it.
//!
//! # Example
//!
//! ```rust,no_run
//! use rangeload::engine::{fetch_resource, ChunkScheduler};
//! use rangeload::http::{HttpClientConfig, HttpTransport};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), rangeload::Error> {
//! let transport = HttpTransport::from_config(HttpClientConfig::default(), false)?;
//! let url = reqwest::Url::parse("https://example.com/large.bin").unwrap();
//! let report = fetch_resource(
//!     &transport,
//!     &url,
//!     &ChunkScheduler::default(),
//!     None,
//!     None,
//!     &CancellationToken::new(),
//! )
//! .await?;
//! println!("{} bytes in {} chunks", report.bytes.len(), report.chunks);
//! # Ok(())
//! # }
//! ```

pub mod fetcher;
pub mod probe;
pub mod progress;
pub mod range;
pub mod reassembler;
pub mod scheduler;

pub use fetcher::RangeFetcher;
pub use probe::probe_size;
pub use progress::{ProgressCallback, ProgressState};
pub use range::{ChunkRange, ChunkRanges, ChunkResult};
pub use reassembler::assemble;
pub use scheduler::{
    ChunkScheduler, DownloadReport, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_PARALLEL_REQUESTS,
};

use crate::error::Result;
use crate::http::Transport;

use reqwest::Url;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Probe the length of `url`, then download it range by range.
///
/// No ranged request is issued unless the probe succeeds.
pub async fn fetch_resource<T>(
    transport: &T,
    url: &Url,
    scheduler: &ChunkScheduler,
    chunk_timeout: Option<Duration>,
    on_progress: Option<&ProgressCallback<'_>>,
    token: &CancellationToken,
) -> Result<DownloadReport>
where
    T: Transport + ?Sized,
{
    let total_bytes = probe_size(transport, url, token).await?;
    let fetcher = RangeFetcher::new(transport, url).with_timeout(chunk_timeout);
    scheduler
        .run(&fetcher, total_bytes, on_progress, token)
        .await
}
