//! Chunked entropy distribution analysis.
//!
//! Walks the stream in fixed, non-overlapping windows from offset 0 (the
//! last window may be short) and folds per-window entropy into running
//! statistics, so no per-window list is ever materialized.

use crate::config::ChunkConfig;
use crate::entropy::core::shannon_entropy;
use serde::{Deserialize, Serialize};

/// Aggregate statistics over all windows of one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkStats {
    /// Number of windows visited.
    pub windows: usize,
    /// Mean window entropy.
    pub mean: f64,
    /// Population standard deviation of window entropy.
    pub std_dev: f64,
    /// Windows strictly above the high threshold.
    pub high: usize,
    /// Windows strictly below the low threshold.
    pub low: usize,
}

impl ChunkStats {
    /// Fraction of windows classified high (0 when there are none).
    pub fn high_ratio(&self) -> f64 {
        self.high as f64 / self.windows.max(1) as f64
    }
}

/// Single pass over `data` using the window size and bounds in `cfg`.
pub fn analyze_chunks(data: &[u8], cfg: &ChunkConfig) -> ChunkStats {
    let window = cfg.window_size.max(1);
    let mut stats = ChunkStats::default();
    // Welford accumulators
    let mut mean = 0.0f64;
    let mut m2 = 0.0f64;

    for chunk in data.chunks(window) {
        let h = shannon_entropy(chunk);
        stats.windows += 1;
        let delta = h - mean;
        mean += delta / stats.windows as f64;
        m2 += delta * (h - mean);

        if h > cfg.high {
            stats.high += 1;
        } else if h < cfg.low {
            stats.low += 1;
        }
    }

    if stats.windows > 0 {
        stats.mean = mean;
        stats.std_dev = (m2 / stats.windows as f64).max(0.0).sqrt();
    }
    stats
}

/// Standard deviation of window entropy and the high-window fraction.
///
/// Returns `(0.0, 0.0)` for an empty stream.
pub fn entropy_variance(data: &[u8], cfg: &ChunkConfig) -> (f64, f64) {
    let stats = analyze_chunks(data, cfg);
    if stats.windows == 0 {
        return (0.0, 0.0);
    }
    (stats.std_dev, stats.high_ratio())
}

/// Fraction of windows whose entropy exceeds `cfg.high`.
pub fn high_entropy_ratio(data: &[u8], cfg: &ChunkConfig) -> f64 {
    analyze_chunks(data, cfg).high_ratio()
}
