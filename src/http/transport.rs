//! The transport seam between the download engine and the network.
//!
//! The engine never talks to `reqwest` directly. It needs two capabilities:
//! a metadata request telling it how long the resource is, and a ranged read
//! whose body can be consumed incrementally. [`Transport`] captures exactly
//! that, and [`HttpTransport`] implements it over a middleware-enabled
//! `reqwest` client.

use crate::error::{Error, Result};
use crate::http::client::{create_http_client, HttpClientConfig};
use crate::utils::content_length::{content_length_from_headers, resource_length};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use reqwest::{header::RANGE, StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use tracing::trace;

/// Incrementally readable response body.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Answer to a metadata request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceMetadata {
    /// Status of the metadata request.
    pub status: StatusCode,
    /// Total length of the resource, when the server advertised it.
    pub content_length: Option<u64>,
}

/// Answer to a ranged read.
pub struct RangeResponse {
    /// `206` when the range was honored, `200` when the whole body was sent.
    pub status: StatusCode,
    /// Response body.
    pub body: ByteStream,
}

impl RangeResponse {
    /// Build a response from a status and a body stream.
    pub fn new(status: StatusCode, body: ByteStream) -> Self {
        Self { status, body }
    }

    /// The server honored the requested range.
    pub fn is_partial(&self) -> bool {
        self.status == StatusCode::PARTIAL_CONTENT
    }

    /// The server ignored the range and returned the whole resource.
    pub fn is_full(&self) -> bool {
        self.status == StatusCode::OK
    }
}

impl fmt::Debug for RangeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Capability used by the engine to reach a remote resource.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a metadata-only request against `url`.
    async fn probe(&self, url: &Url) -> Result<ResourceMetadata>;

    /// Request the inclusive byte range `[start, end]` of `url`.
    async fn fetch_range(&self, url: &Url, start: u64, end: u64) -> Result<RangeResponse>;
}

/// [`Transport`] backed by `reqwest` with the tracing/retry middleware stack.
#[derive(Clone)]
pub struct HttpTransport {
    client: ClientWithMiddleware,
    use_range_for_content_length: bool,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field(
                "use_range_for_content_length",
                &self.use_range_for_content_length,
            )
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Wrap an existing client.
    ///
    /// When `use_range_for_content_length` is set, the size is probed with a
    /// `Range: bytes=0-0` GET and read from `Content-Range`, which helps with
    /// servers that omit `Content-Length` on HEAD responses.
    pub fn new(client: ClientWithMiddleware, use_range_for_content_length: bool) -> Self {
        Self {
            client,
            use_range_for_content_length,
        }
    }

    /// Build the client from `config` and wrap it.
    pub fn from_config(
        config: HttpClientConfig,
        use_range_for_content_length: bool,
    ) -> Result<Self> {
        let client = create_http_client(config)?;
        Ok(Self::new(client, use_range_for_content_length))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn probe(&self, url: &Url) -> Result<ResourceMetadata> {
        if self.use_range_for_content_length {
            trace!("Probing {} with a one byte range request", url);
            let res = self
                .client
                .get(url.clone())
                .header(RANGE, "bytes=0-0")
                .send()
                .await?;
            let status = res.status();
            Ok(ResourceMetadata {
                status,
                content_length: resource_length(status, res.headers()),
            })
        } else {
            trace!("Probing {} with a HEAD request", url);
            let res = self.client.head(url.clone()).send().await?;
            Ok(ResourceMetadata {
                status: res.status(),
                content_length: content_length_from_headers(res.headers()),
            })
        }
    }

    async fn fetch_range(&self, url: &Url, start: u64, end: u64) -> Result<RangeResponse> {
        let res = self
            .client
            .get(url.clone())
            .header(RANGE, format!("bytes={}-{}", start, end))
            .send()
            .await?;
        let status = res.status();
        let body = res.bytes_stream().map_err(Error::from).boxed();
        Ok(RangeResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[test]
    fn test_range_response_status_helpers() {
        let partial = RangeResponse::new(StatusCode::PARTIAL_CONTENT, stream::empty().boxed());
        assert!(partial.is_partial());
        assert!(!partial.is_full());

        let full = RangeResponse::new(StatusCode::OK, stream::empty().boxed());
        assert!(full.is_full());
        assert!(!full.is_partial());

        let missing = RangeResponse::new(StatusCode::NOT_FOUND, stream::empty().boxed());
        assert!(!missing.is_full() && !missing.is_partial());
        assert!(format!("{:?}", missing).contains("404"));
    }

    #[test]
    fn test_http_transport_from_default_config() {
        let transport = HttpTransport::from_config(HttpClientConfig::default(), true);
        assert!(transport.is_ok());
        assert!(format!("{:?}", transport.unwrap()).contains("use_range_for_content_length: true"));
    }
}
