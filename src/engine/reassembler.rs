//! Reassembly of out-of-order chunk results.

use super::range::ChunkResult;
use crate::error::{Error, Result};

/// Concatenate `results` in ascending offset order.
///
/// Fails with [`Error::Reassembly`] if the combined length differs from
/// `total_bytes`, which happens when a transport returns ranges of the wrong
/// size (for example a server answering every range with the whole body).
///
/// ```rust
/// use rangeload::engine::{assemble, ChunkResult};
///
/// let results = vec![
///     ChunkResult::new(4, b"4567".to_vec()),
///     ChunkResult::new(0, b"0123".to_vec()),
/// ];
/// assert_eq!(assemble(results, 8).unwrap(), b"01234567");
/// ```
pub fn assemble(mut results: Vec<ChunkResult>, total_bytes: u64) -> Result<Vec<u8>> {
    results.sort_unstable_by_key(|chunk| chunk.start);

    let actual: u64 = results.iter().map(|chunk| chunk.bytes.len() as u64).sum();
    if actual != total_bytes {
        return Err(Error::Reassembly {
            expected: total_bytes,
            actual,
        });
    }

    let mut output = Vec::with_capacity(usize::try_from(actual).unwrap_or_default());
    for chunk in results {
        output.extend_from_slice(&chunk.bytes);
    }
    Ok(output)
}
