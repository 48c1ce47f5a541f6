//! Size probing: the total length is a hard precondition for chunking.

use crate::error::{Error, Result};
use crate::http::Transport;

use reqwest::Url;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Determine the total length of the resource at `url`.
///
/// Fails with [`Error::SizeProbe`] if the metadata request fails, answers with
/// a non-success status, or carries no length. Resolves with
/// [`Error::Cancelled`] if `token` is triggered first.
pub async fn probe_size<T>(transport: &T, url: &Url, token: &CancellationToken) -> Result<u64>
where
    T: Transport + ?Sized,
{
    let metadata = tokio::select! {
        biased;
        _ = token.cancelled() => return Err(Error::Cancelled),
        metadata = transport.probe(url) => metadata,
    };

    let metadata = metadata.map_err(|e| match e {
        Error::Cancelled => Error::Cancelled,
        e => Error::SizeProbe {
            url: url.to_string(),
            message: "metadata request failed".into(),
            cause: Some(Box::new(e)),
        },
    })?;

    if !metadata.status.is_success() {
        return Err(Error::size_probe(
            url.as_str(),
            format!("unexpected status {}", metadata.status),
        ));
    }

    let total = metadata.content_length.ok_or_else(|| {
        Error::size_probe(url.as_str(), "the response does not advertise a length")
    })?;
    debug!("{} is {} bytes long", url, total);
    Ok(total)
}
