//! Byte ranges and the results fetched for them.

use std::fmt;

/// One contiguous, inclusive byte-offset interval of the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkRange {
    /// First byte offset, inclusive.
    pub start: u64,
    /// Last byte offset, inclusive.
    pub end: u64,
}

impl ChunkRange {
    /// Create a new range covering `[start, end]`.
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end, "empty chunk range {}-{}", start, end);
        Self { start, end }
    }

    /// Number of bytes covered by the range.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

impl fmt::Display for ChunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Bytes received for one [`ChunkRange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    /// Offset of the first byte in the resource.
    pub start: u64,
    /// Received bytes, in arrival order.
    pub bytes: Vec<u8>,
}

impl ChunkResult {
    pub fn new(start: u64, bytes: Vec<u8>) -> Self {
        Self { start, bytes }
    }
}

/// Iterator partitioning `[0, total)` into ranges of at most `chunk_size`
/// bytes, in increasing offset order.
///
/// ```rust
/// use rangeload::engine::{ChunkRange, ChunkRanges};
///
/// let ranges: Vec<_> = ChunkRanges::new(10, 4).collect();
/// assert_eq!(
///     ranges,
///     vec![ChunkRange::new(0, 3), ChunkRange::new(4, 7), ChunkRange::new(8, 9)]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ChunkRanges {
    next: u64,
    total: u64,
    chunk_size: u64,
}

impl ChunkRanges {
    /// A `chunk_size` of zero is treated as one byte.
    pub fn new(total: u64, chunk_size: u64) -> Self {
        Self {
            next: 0,
            total,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Start offset of the next range that has not been handed out yet.
    pub fn next_offset(&self) -> u64 {
        self.next
    }
}

impl Iterator for ChunkRanges {
    type Item = ChunkRange;

    fn next(&mut self) -> Option<ChunkRange> {
        if self.next >= self.total {
            return None;
        }
        let start = self.next;
        let end = start
            .saturating_add(self.chunk_size - 1)
            .min(self.total - 1);
        self.next = end + 1;
        Some(ChunkRange::new(start, end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.next.min(self.total)).div_ceil(self.chunk_size);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkRanges {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partition(total: u64, chunk_size: u64) {
        let ranges: Vec<_> = ChunkRanges::new(total, chunk_size).collect();
        if total == 0 {
            assert!(ranges.is_empty());
            return;
        }
        assert_eq!(ranges.first().map(|r| r.start), Some(0));
        assert_eq!(ranges.last().map(|r| r.end), Some(total - 1));
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end + 1, pair[1].start, "gap or overlap in {:?}", pair);
        }
        assert!(ranges.iter().all(|r| r.len() <= chunk_size));
        assert_eq!(ranges.iter().map(ChunkRange::len).sum::<u64>(), total);
    }

    #[test]
    fn test_ranges_partition_exactly() {
        for total in 0..64 {
            for chunk_size in 1..20 {
                assert_partition(total, chunk_size);
            }
        }
        assert_partition(5 * 1024 * 1024 * 3 + 17, 5 * 1024 * 1024);
    }

    #[test]
    fn test_ten_bytes_in_chunks_of_four() {
        let ranges: Vec<_> = ChunkRanges::new(10, 4).collect();
        assert_eq!(
            ranges,
            vec![
                ChunkRange::new(0, 3),
                ChunkRange::new(4, 7),
                ChunkRange::new(8, 9)
            ]
        );
    }

    #[test]
    fn test_single_range_when_chunk_exceeds_total() {
        let ranges: Vec<_> = ChunkRanges::new(3, 1024).collect();
        assert_eq!(ranges, vec![ChunkRange::new(0, 2)]);
    }

    #[test]
    fn test_len_tracks_remaining_ranges() {
        let mut ranges = ChunkRanges::new(10, 4);
        assert_eq!(ranges.len(), 3);
        ranges.next();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges.next_offset(), 4);
        ranges.next();
        ranges.next();
        assert_eq!(ranges.len(), 0);
        assert_eq!(ranges.next(), None);
    }

    #[test]
    fn test_huge_chunk_size_does_not_overflow() {
        let ranges: Vec<_> = ChunkRanges::new(u64::MAX, u64::MAX).collect();
        assert_eq!(ranges, vec![ChunkRange::new(0, u64::MAX - 1)]);
    }

    #[test]
    fn test_zero_chunk_size_is_one_byte() {
        assert_eq!(ChunkRanges::new(3, 0).count(), 3);
    }

    #[test]
    fn test_range_display() {
        assert_eq!(ChunkRange::new(4, 7).to_string(), "4-7");
        assert_eq!(ChunkRange::new(4, 7).len(), 4);
    }
}
