//! Trailing data detection.
//!
//! Container formats end with a well-known marker. Bytes after the last
//! occurrence of such a marker are a classic hiding place for an appended
//! archive or payload.

use crate::signatures::END_MARKERS;
use memchr::memmem;
use serde::{Deserialize, Serialize};

/// Tail data following one end-of-format marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingData {
    /// Format whose marker delimited the tail.
    pub format: String,
    /// Offset of the first byte after the marker.
    pub offset: usize,
    /// Number of bytes from `offset` to the end of the stream.
    pub size: usize,
}

/// Longest tail found across all markers, if any marker has bytes after it.
pub fn detect_trailing(data: &[u8]) -> Option<TrailingData> {
    let mut best: Option<TrailingData> = None;
    for (marker, format) in END_MARKERS {
        let Some(idx) = memmem::rfind(data, marker) else {
            continue;
        };
        let end = idx + marker.len();
        if data.len() <= end {
            continue;
        }
        let size = data.len() - end;
        if best.as_ref().is_none_or(|b| size > b.size) {
            best = Some(TrailingData {
                format: format.to_string(),
                offset: end,
                size,
            });
        }
    }
    best
}

/// Bytes following the last recognized end-of-format marker (0 if none).
pub fn trailing_bytes(data: &[u8]) -> usize {
    detect_trailing(data).map(|t| t.size).unwrap_or(0)
}
