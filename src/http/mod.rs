//! HTTP module containing the client and the transport used by the engine.
//!
//! - [`client`] - HTTP client creation and middleware configuration
//! - [`transport`] - The [`Transport`] trait and its `reqwest` implementation
//!
//! # Examples
//!
//! ```rust
//! use rangeload::http::{HttpClientConfig, HttpTransport};
//!
//! # fn example() -> Result<(), rangeload::Error> {
//! let transport = HttpTransport::from_config(HttpClientConfig::default(), false)?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod transport;

pub use client::{create_http_client, HttpClientConfig};
pub use transport::{ByteStream, HttpTransport, RangeResponse, ResourceMetadata, Transport};
