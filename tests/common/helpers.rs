#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use rangeload::http::{RangeResponse, ResourceMetadata, Transport};
use rangeload::{Download, DownloaderBuilder, Error, Result};
use reqwest::{StatusCode, Url};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

// Common test constants
pub const TEST_URL: &str = "http://domain.com/disk.img";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates test content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// Creates a test download from the common test URL
pub fn create_test_download() -> Download {
    Download::try_from(TEST_URL).expect("Failed to create test download")
}

pub fn test_url() -> Url {
    Url::parse(TEST_URL).expect("Invalid test URL")
}

/// A quiet downloader with small ranges
pub fn create_test_downloader_builder(chunk_size: u64, max_parallel: usize) -> DownloaderBuilder {
    DownloaderBuilder::hidden()
        .chunk_size(chunk_size)
        .max_parallel_requests(max_parallel)
}

/// Install a subscriber honoring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// === Mock transport ===

type DelayFn = Box<dyn Fn(u64) -> Duration + Send + Sync>;

#[derive(Default)]
struct Counters {
    probes: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    requests: Mutex<Vec<(u64, u64)>>,
}

/// Keeps a range counted as in flight until its response is dropped.
struct InFlightGuard(Arc<Counters>);

impl InFlightGuard {
    fn new(counters: Arc<Counters>) -> Self {
        let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak.fetch_max(now, Ordering::SeqCst);
        Self(counters)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// In-memory resource served over a scriptable fake transport.
pub struct MockTransport {
    data: Vec<u8>,
    probe_status: StatusCode,
    advertise_length: bool,
    advertised_length: Option<u64>,
    ignore_ranges: bool,
    increment: usize,
    delay: DelayFn,
    statuses: HashMap<u64, StatusCode>,
    broken_bodies: Vec<u64>,
    counters: Arc<Counters>,
}

impl MockTransport {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            probe_status: StatusCode::OK,
            advertise_length: true,
            advertised_length: None,
            ignore_ranges: false,
            increment: 3,
            delay: Box::new(|_| Duration::from_millis(10)),
            statuses: HashMap::new(),
            broken_bodies: Vec::new(),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Answer the metadata request without a length.
    pub fn without_length(mut self) -> Self {
        self.advertise_length = false;
        self
    }

    /// Advertise `length` instead of the real size of the resource.
    pub fn with_advertised_length(mut self, length: u64) -> Self {
        self.advertised_length = Some(length);
        self
    }

    pub fn with_probe_status(mut self, status: StatusCode) -> Self {
        self.probe_status = status;
        self
    }

    /// Answer every range with `200 OK` and the whole body.
    pub fn ignoring_ranges(mut self) -> Self {
        self.ignore_ranges = true;
        self
    }

    /// Size of the body increments.
    pub fn with_increment(mut self, increment: usize) -> Self {
        self.increment = increment.max(1);
        self
    }

    /// Latency of the range starting at a given offset.
    pub fn with_delay<F>(mut self, delay: F) -> Self
    where
        F: Fn(u64) -> Duration + Send + Sync + 'static,
    {
        self.delay = Box::new(delay);
        self
    }

    /// Answer the range starting at `start` with `status` and no body.
    pub fn with_status_at(mut self, start: u64, status: StatusCode) -> Self {
        self.statuses.insert(start, status);
        self
    }

    /// Break the body of the range starting at `start` after its first increment.
    pub fn with_broken_body_at(mut self, start: u64) -> Self {
        self.broken_bodies.push(start);
        self
    }

    pub fn probes(&self) -> usize {
        self.counters.probes.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }

    /// Ranges requested so far, in request order.
    pub fn requests(&self) -> Vec<(u64, u64)> {
        self.counters.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn probe(&self, _url: &Url) -> Result<ResourceMetadata> {
        self.counters.probes.fetch_add(1, Ordering::SeqCst);
        Ok(ResourceMetadata {
            status: self.probe_status,
            content_length: self
                .advertise_length
                .then(|| self.advertised_length.unwrap_or(self.data.len() as u64)),
        })
    }

    async fn fetch_range(&self, _url: &Url, start: u64, end: u64) -> Result<RangeResponse> {
        self.counters.requests.lock().unwrap().push((start, end));
        let guard = InFlightGuard::new(self.counters.clone());

        tokio::time::sleep((self.delay)(start)).await;

        if let Some(status) = self.statuses.get(&start) {
            return Ok(RangeResponse::new(*status, stream::empty().boxed()));
        }

        if !self.ignore_ranges && start >= self.data.len() as u64 {
            return Ok(RangeResponse::new(
                StatusCode::RANGE_NOT_SATISFIABLE,
                stream::empty().boxed(),
            ));
        }

        let (status, slice) = if self.ignore_ranges {
            (StatusCode::OK, &self.data[..])
        } else {
            let end = (end as usize).min(self.data.len() - 1);
            (StatusCode::PARTIAL_CONTENT, &self.data[start as usize..=end])
        };

        let mut pieces: Vec<Result<Bytes>> = slice
            .chunks(self.increment)
            .map(|piece| Ok(Bytes::copy_from_slice(piece)))
            .collect();
        if self.broken_bodies.contains(&start) {
            pieces.truncate(1);
            pieces.push(Err(Error::Internal("connection reset".into())));
        }

        let body = stream::iter(pieces)
            .then(move |piece| {
                let _held = &guard;
                async move {
                    tokio::task::yield_now().await;
                    piece
                }
            })
            .boxed();
        Ok(RangeResponse::new(status, body))
    }
}

/// Collects every progress notification.
#[derive(Clone, Default)]
pub struct ProgressLog(Arc<Mutex<Vec<(u64, u64)>>>);

impl ProgressLog {
    pub fn record(&self, downloaded: u64, total: u64) {
        self.0.lock().unwrap().push((downloaded, total));
    }

    pub fn entries(&self) -> Vec<(u64, u64)> {
        self.0.lock().unwrap().clone()
    }
}

/// Asserts that progress never decreases and ends at `total`.
pub fn assert_monotonic_progress(entries: &[(u64, u64)], total: u64) {
    assert!(!entries.is_empty(), "no progress was reported");
    for pair in entries.windows(2) {
        assert!(pair[0].0 <= pair[1].0, "progress went backwards: {:?}", pair);
    }
    assert!(entries.iter().all(|&(done, t)| t == total && done <= total));
    assert_eq!(entries.last().map(|e| e.0), Some(total));
}
