//! Aggregated progress of one download.

use std::sync::{Mutex, PoisonError};

/// Progress sink, called with `(downloaded_bytes, total_bytes)`.
///
/// The lifetime lets a sink borrow from the caller for the duration of one
/// download; stored callbacks use `ProgressCallback<'static>`.
pub type ProgressCallback<'a> = dyn Fn(u64, u64) + Send + Sync + 'a;

/// Cumulative byte counter shared by every in-flight range of a download.
///
/// The counter and the sink invocation happen under one lock, so the values
/// observed by the sink never decrease even when bodies are driven from
/// different threads. The counter saturates at `total`.
pub struct ProgressState<'a> {
    downloaded: Mutex<u64>,
    total: u64,
    sink: Option<&'a ProgressCallback<'a>>,
}

impl<'a> ProgressState<'a> {
    pub fn new(total: u64, sink: Option<&'a ProgressCallback<'a>>) -> Self {
        Self {
            downloaded: Mutex::new(0),
            total,
            sink,
        }
    }

    /// Add `bytes` to the counter and notify the sink. Returns the new total.
    pub fn record(&self, bytes: u64) -> u64 {
        let mut downloaded = self
            .downloaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if bytes == 0 {
            return *downloaded;
        }
        *downloaded = downloaded.saturating_add(bytes).min(self.total);
        if let Some(sink) = self.sink {
            sink(*downloaded, self.total);
        }
        *downloaded
    }

    pub fn downloaded(&self) -> u64 {
        *self
            .downloaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}
