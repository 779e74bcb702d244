//! Core entropy and byte-distribution primitives.

/// Number of buckets in a byte histogram.
pub const BYTE_ALPHABET: usize = 256;

/// Divisor that maps the raw chi-square sum onto a [0, 1] divergence proxy.
const CHI_SQUARE_SCALE: f64 = 1000.0;

/// Calculates the Shannon entropy of a byte slice.
///
/// Returns a value between 0.0 and 8.0, where:
/// - 0.0 represents no randomness (e.g., all bytes are the same)
/// - 8.0 represents maximum randomness (uniform distribution)
#[inline]
pub fn shannon_entropy(data: &[u8]) -> f64 {
    Histogram::from_bytes(data).entropy()
}

/// Byte frequency histogram.
#[derive(Debug, Clone)]
pub struct Histogram {
    counts: [usize; BYTE_ALPHABET],
    total: usize,
}

impl Histogram {
    /// Creates a new empty histogram.
    #[inline]
    pub fn new() -> Self {
        Self {
            counts: [0; BYTE_ALPHABET],
            total: 0,
        }
    }

    /// Creates a histogram from a byte slice.
    #[inline]
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hist = Self::new();
        for &byte in data {
            hist.add(byte);
        }
        hist
    }

    /// Adds a byte to the histogram.
    #[inline]
    pub fn add(&mut self, byte: u8) {
        self.counts[byte as usize] += 1;
        self.total += 1;
    }

    /// Calculates the entropy of the current histogram.
    #[inline]
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        let total = self.total as f64;
        let mut entropy = 0.0;

        for &count in &self.counts {
            if count == 0 {
                continue;
            }
            let p = (count as f64) / total;
            entropy -= p * p.log2();
        }

        // -0.0 for single-symbol input; keep the report tidy
        entropy.clamp(0.0, 8.0)
    }

    /// Pearson chi-square statistic against a uniform byte distribution.
    pub fn chi_square(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let expected = self.total as f64 / BYTE_ALPHABET as f64;
        self.counts
            .iter()
            .map(|&observed| {
                let d = observed as f64 - expected;
                d * d / expected
            })
            .sum()
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarse divergence of the byte distribution from uniform, in [0, 1].
///
/// The chi-square sum is divided by 1000 and clamped. This is not a
/// calibrated hypothesis test; streams shorter than 256 bytes yield 0.
pub fn chi_square_divergence(data: &[u8]) -> f64 {
    if data.len() < BYTE_ALPHABET {
        return 0.0;
    }
    (Histogram::from_bytes(data).chi_square() / CHI_SQUARE_SCALE).clamp(0.0, 1.0)
}
