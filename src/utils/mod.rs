//! Shared utility functions.
//!
//! This module contains helpers used by the transport and the size prober to
//! read resource lengths out of HTTP response headers.
//!
//! # Examples
//!
//! ## Parsing Content-Range Headers
//!
//! ```rust
//! use rangeload::utils::parse_content_range_total;
//!
//! // Extract total size from a Content-Range header
//! let header_value = "bytes 0-1023/2048";
//! if let Some(total_size) = parse_content_range_total(header_value) {
//!     println!("Total file size: {} bytes", total_size);
//! }
//! ```

pub mod content_length;

// Re-export commonly used utilities
pub use content_length::{content_length_from_headers, parse_content_range_total, resource_length};
