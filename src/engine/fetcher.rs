//! Ranged reads with incremental progress reporting.

use super::range::{ChunkRange, ChunkResult};
use crate::error::{Error, Result};
use crate::http::Transport;

use futures::StreamExt;
use reqwest::Url;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Upper bound of the buffer reserved for a range body before any byte arrives.
const MAX_BODY_PREALLOCATION: u64 = 1024 * 1024;

/// Fetches single [`ChunkRange`]s of one resource.
pub struct RangeFetcher<'a, T: ?Sized> {
    transport: &'a T,
    url: &'a Url,
    timeout: Option<Duration>,
}

impl<'a, T> RangeFetcher<'a, T>
where
    T: Transport + ?Sized,
{
    pub fn new(transport: &'a T, url: &'a Url) -> Self {
        Self {
            transport,
            url,
            timeout: None,
        }
    }

    /// Fail a chunk with [`Error::ChunkFetch`] if it takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &Url {
        self.url
    }

    /// Fetch `range`, calling `on_bytes` with the size of every increment as it
    /// arrives.
    ///
    /// Both `206 Partial Content` and `200 OK` (range ignored, whole body sent)
    /// are accepted. If `token` is triggered the request is dropped and the
    /// call resolves with [`Error::Cancelled`].
    pub async fn fetch_range<F>(
        &self,
        range: ChunkRange,
        token: &CancellationToken,
        on_bytes: F,
    ) -> Result<ChunkResult>
    where
        F: Fn(u64) + Send + Sync,
    {
        let fetch = async {
            match self.timeout {
                Some(limit) => {
                    tokio::time::timeout(limit, self.stream_range(range, &on_bytes))
                        .await
                        .unwrap_or_else(|_| {
                            Err(Error::chunk_fetch(
                                range.start,
                                range.end,
                                format!("timed out after {:?}", limit),
                            ))
                        })
                }
                None => self.stream_range(range, &on_bytes).await,
            }
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                trace!("Range {} cancelled", range);
                Err(Error::Cancelled)
            }
            result = fetch => result,
        }
    }

    async fn stream_range<F>(&self, range: ChunkRange, on_bytes: &F) -> Result<ChunkResult>
    where
        F: Fn(u64) + Send + Sync,
    {
        let response = self
            .transport
            .fetch_range(self.url, range.start, range.end)
            .await
            .map_err(|e| wrap(range, "request failed", e))?;

        if response.is_full() {
            debug!("Server ignored the range {} and sent the whole body", range);
        } else if !response.is_partial() {
            return Err(Error::chunk_fetch(
                range.start,
                range.end,
                format!("unexpected status {}", response.status),
            ));
        }

        let capacity = range.len().min(MAX_BODY_PREALLOCATION);
        let mut bytes = Vec::with_capacity(usize::try_from(capacity).unwrap_or_default());
        let mut body = response.body;
        while let Some(item) = body.next().await {
            let increment = item.map_err(|e| wrap(range, "response body interrupted", e))?;
            bytes.extend_from_slice(&increment);
            on_bytes(increment.len() as u64);
        }

        trace!("Range {} received {} bytes", range, bytes.len());
        Ok(ChunkResult::new(range.start, bytes))
    }
}

fn wrap(range: ChunkRange, message: &str, e: Error) -> Error {
    match e {
        Error::Cancelled => Error::Cancelled,
        e => Error::ChunkFetch {
            start: range.start,
            end: range.end,
            message: message.into(),
            cause: Some(Box::new(e)),
        },
    }
}
