//! Content length extraction utilities.
//!
//! This module reads the total length of a resource from response headers,
//! supporting both the `Content-Range` header (ranged responses) and the
//! `Content-Length` header (plain responses).

use reqwest::{
    header::{HeaderMap, CONTENT_LENGTH, CONTENT_RANGE},
    StatusCode,
};

/// Extract the total resource length from a set of response headers.
///
/// A `206 Partial Content` response describes only a slice of the resource, so
/// its total is read from the `Content-Range` header. Any other response is
/// expected to carry the full length in `Content-Length`.
///
/// # Example
///
/// ```rust
/// use reqwest::{header::{HeaderMap, HeaderValue, CONTENT_RANGE}, StatusCode};
/// use rangeload::utils::resource_length;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CONTENT_RANGE, HeaderValue::from_static("bytes 0-0/2048"));
/// assert_eq!(resource_length(StatusCode::PARTIAL_CONTENT, &headers), Some(2048));
/// ```
pub fn resource_length(status: StatusCode, headers: &HeaderMap) -> Option<u64> {
    if status == StatusCode::PARTIAL_CONTENT {
        headers
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total)
    } else {
        content_length_from_headers(headers)
    }
}

/// Read the `Content-Length` header.
///
/// Returns `None` if the header is missing or if its value is not an u64.
pub fn content_length_from_headers(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

/// Parse Content-Range header to extract total size.
///
/// Content-Range header format: "bytes start-end/total". An unknown total
/// (`*`) yields `None`.
///
/// # Example
///
/// ```rust
/// use rangeload::utils::parse_content_range_total;
///
/// let total = parse_content_range_total("bytes 0-1023/2048");
/// assert_eq!(total, Some(2048));
/// assert_eq!(parse_content_range_total("bytes 0-1023/*"), None);
/// ```
pub fn parse_content_range_total(content_range: &str) -> Option<u64> {
    let (_, total) = content_range.split_once('/')?;
    total.trim().parse::<u64>().ok()
}
