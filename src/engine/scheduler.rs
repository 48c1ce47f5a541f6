//! The bounded-window chunk scheduler.
//!
//! A single driver partitions `[0, total_bytes)` into ranges, keeps at most
//! `max_parallel` range fetches in flight, and retires them in whatever order
//! they complete. Every in-flight fetch is keyed by its chunk index, so
//! retirement never depends on comparing futures.
//!
//! ```text
//! Idle -> Admitting <-> Waiting -> Draining -> Completed | Failed | Cancelled
//! ```
//!
//! The first failure wins: the remaining fetches are cancelled through a child
//! of the caller's token and dropped, and already received chunks are
//! discarded.

use super::fetcher::RangeFetcher;
use super::progress::{ProgressCallback, ProgressState};
use super::range::{ChunkRange, ChunkRanges, ChunkResult};
use super::reassembler::assemble;
use crate::error::{Error, Result};
use crate::http::Transport;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Default size of one range, 5 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 5 * 1024 * 1024;

/// Default number of ranges fetched at the same time.
pub const DEFAULT_MAX_PARALLEL_REQUESTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Admitting,
    Waiting,
    Draining,
    Completed,
    Failed,
    Cancelled,
}

/// Outcome of a successful [`ChunkScheduler::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// The reassembled resource.
    pub bytes: Vec<u8>,
    /// Probed length of the resource.
    pub total_bytes: u64,
    /// Number of ranges fetched.
    pub chunks: usize,
    /// Highest number of ranges that were in flight at once.
    pub peak_parallelism: usize,
}

impl DownloadReport {
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

type Completion<'a> = BoxFuture<'a, (usize, Result<ChunkResult>)>;

/// Ranges currently being fetched, keyed by chunk index.
struct InFlightWindow<'a> {
    capacity: usize,
    ranges: BTreeMap<usize, ChunkRange>,
    pending: FuturesUnordered<Completion<'a>>,
    peak: usize,
}

impl<'a> InFlightWindow<'a> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ranges: BTreeMap::new(),
            pending: FuturesUnordered::new(),
            peak: 0,
        }
    }

    fn has_capacity(&self) -> bool {
        self.ranges.len() < self.capacity
    }

    fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    fn len(&self) -> usize {
        self.ranges.len()
    }

    fn admit(&mut self, id: usize, range: ChunkRange, fetch: Completion<'a>) {
        self.ranges.insert(id, range);
        self.pending.push(fetch);
        self.peak = self.peak.max(self.ranges.len());
    }

    /// Wait for any in-flight fetch to resolve and remove it from the window.
    async fn retire_next(&mut self) -> Result<(usize, ChunkRange, Result<ChunkResult>)> {
        let (id, result) = self
            .pending
            .next()
            .await
            .ok_or_else(|| Error::Internal("waited on an empty window".into()))?;
        let range = self
            .ranges
            .remove(&id)
            .ok_or_else(|| Error::Internal(format!("chunk {} is not in flight", id)))?;
        Ok((id, range, result))
    }
}

/// Drives the concurrent range fetches of one download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkScheduler {
    chunk_size: u64,
    max_parallel: usize,
}

impl Default for ChunkScheduler {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_parallel: DEFAULT_MAX_PARALLEL_REQUESTS,
        }
    }
}

impl ChunkScheduler {
    /// Create a scheduler, rejecting a zero chunk size or parallelism cap.
    pub fn new(chunk_size: u64, max_parallel: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk size must be at least 1 byte".into()));
        }
        if max_parallel == 0 {
            return Err(Error::InvalidConfig(
                "at least one parallel request is required".into(),
            ));
        }
        Ok(Self {
            chunk_size,
            max_parallel,
        })
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// The ranges a resource of `total_bytes` is split into, in admission order.
    pub fn ranges(&self, total_bytes: u64) -> ChunkRanges {
        ChunkRanges::new(total_bytes, self.chunk_size)
    }

    /// Fetch every range of a `total_bytes` long resource and reassemble them.
    ///
    /// `on_progress` receives the cumulative number of received bytes after
    /// every body increment, in completion order. Triggering `token` stops
    /// admission, cancels the in-flight fetches and resolves with
    /// [`Error::Cancelled`].
    pub async fn run<T>(
        &self,
        fetcher: &RangeFetcher<'_, T>,
        total_bytes: u64,
        on_progress: Option<&ProgressCallback<'_>>,
        token: &CancellationToken,
    ) -> Result<DownloadReport>
    where
        T: Transport + ?Sized,
    {
        let progress = ProgressState::new(total_bytes, on_progress);
        let fetch_token = token.child_token();
        let mut ranges = self.ranges(total_bytes).enumerate();
        let chunks = ranges.len();
        // Grows with the chunks that arrive, never sized from the advertised length.
        let mut results = Vec::new();
        let mut window = InFlightWindow::new(self.max_parallel);
        let mut phase = Phase::Admitting;

        debug!(
            "Downloading {} in {} chunks of {} bytes, {} at a time",
            fetcher.url(),
            chunks,
            self.chunk_size,
            self.max_parallel
        );

        let outcome = loop {
            if token.is_cancelled() {
                break Err(Error::Cancelled);
            }

            while window.has_capacity() {
                let Some((id, range)) = ranges.next() else {
                    break;
                };
                trace!("Admitting chunk {} ({})", id, range);
                let progress = &progress;
                let fetch = fetcher.fetch_range(range, &fetch_token, move |bytes| {
                    progress.record(bytes);
                });
                window.admit(id, range, async move { (id, fetch.await) }.boxed());
            }

            if window.is_empty() {
                break Ok(());
            }

            let next = if ranges.len() == 0 {
                Phase::Draining
            } else {
                Phase::Waiting
            };
            if next != phase {
                trace!("{:?} -> {:?} with {} in flight", phase, next, window.len());
                phase = next;
            }

            let retired = tokio::select! {
                biased;
                _ = token.cancelled() => break Err(Error::Cancelled),
                retired = window.retire_next() => retired,
            };

            match retired {
                Ok((id, range, Ok(chunk))) => {
                    trace!("Retired chunk {} ({}), {} in flight", id, range, window.len());
                    results.push(chunk);
                }
                Ok((id, range, Err(e))) => {
                    warn!("Chunk {} ({}) failed: {}", id, range, e);
                    break Err(e);
                }
                Err(e) => break Err(e),
            }
        };

        let peak_parallelism = window.peak;
        if outcome.is_err() {
            // Fail fast: stop the siblings before dropping them.
            fetch_token.cancel();
        }
        drop(window);

        if let Err(e) = outcome {
            let (phase, e) = if token.is_cancelled() || e.is_cancelled() {
                (Phase::Cancelled, Error::Cancelled)
            } else {
                (Phase::Failed, e)
            };
            debug!(
                "{:?} after {} of {} bytes, discarding {} chunks",
                phase,
                progress.downloaded(),
                total_bytes,
                results.len()
            );
            return Err(e);
        }

        let bytes = assemble(results, total_bytes)?;
        debug!(
            "{:?}: {} bytes in {} chunks, at most {} in flight",
            Phase::Completed,
            bytes.len(),
            chunks,
            peak_parallelism
        );

        Ok(DownloadReport {
            bytes,
            total_bytes,
            chunks,
            peak_parallelism,
        })
    }
}
