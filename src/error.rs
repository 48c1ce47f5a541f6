//! Error handling for the rangeload library.
//!
//! This module provides centralized error handling for every stage of a
//! chunked download: probing the resource size, fetching byte ranges,
//! cancellation, and reassembling the ranges into the final buffer.
//!
//! The four domain kinds ([`Error::SizeProbe`], [`Error::ChunkFetch`],
//! [`Error::Cancelled`] and [`Error::Reassembly`]) are distinct variants so
//! callers can special-case cancellation versus a genuine failure.

use std::io;
use thiserror::Error;

/// Boxed error used to keep the underlying transport failure as a source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can happen when using rangeload.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    ///
    /// This variant captures internal errors that don't fit into other categories,
    /// typically representing unexpected system-level failures.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The downloader was configured with values it cannot work with,
    /// such as a zero chunk size.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O Error.
    ///
    /// Raised when the assembled resource cannot be written to disk.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the HTTP middleware stack (retry, tracing).
    #[error("Middleware Error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// The total length of the resource could not be determined.
    ///
    /// Either the metadata request failed or the response carried no usable
    /// length. Chunking never starts without a known length.
    #[error("Unable to determine the size of {url}: {message}")]
    SizeProbe {
        url: String,
        message: String,
        #[source]
        cause: Option<BoxError>,
    },

    /// A ranged read failed or was answered with an unacceptable status.
    #[error("Failed to fetch bytes {start}-{end}: {message}")]
    ChunkFetch {
        start: u64,
        end: u64,
        message: String,
        #[source]
        cause: Option<BoxError>,
    },

    /// The download was aborted through its cancellation token.
    #[error("Download cancelled")]
    Cancelled,

    /// The reassembled buffer does not match the probed length.
    #[error("Reassembled {actual} bytes but the resource is {expected} bytes long")]
    Reassembly { expected: u64, actual: u64 },
}

impl Error {
    /// Returns `true` if the operation was aborted through cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    pub(crate) fn size_probe(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::SizeProbe {
            url: url.into(),
            message: message.into(),
            cause: None,
        }
    }

    pub(crate) fn chunk_fetch(start: u64, end: u64, message: impl Into<String>) -> Self {
        Error::ChunkFetch {
            start,
            end,
            message: message.into(),
            cause: None,
        }
    }
}

/// Result type alias for operations that can fail with a rangeload error.
pub type Result<T> = std::result::Result<T, Error>;
