//! Embedded-archive pattern scan.
//!
//! Looks for compressed-archive signatures, archive prefixes in the second
//! half of the stream, an excess of null bytes, and a low-to-high entropy
//! split between the two halves. Every hit becomes a [`Contribution`].

use crate::config::PatternConfig;
use crate::entropy::shannon_entropy;
use crate::score::{Contribution, SuspicionScore};
use crate::signatures::{ArchiveSignature, ARCHIVE_SIGNATURES, TAIL_MARKERS};
use memchr::memmem;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A signature occurrence in the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureMatch {
    pub signature: &'static ArchiveSignature,
    pub offset: usize,
}

impl SignatureMatch {
    /// Strictly past the midpoint of a stream of `len` bytes.
    pub fn in_tail(&self, len: usize) -> bool {
        self.offset * 2 > len
    }
}

/// Outcome of the pattern scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub anomalies: Vec<String>,
    pub score: SuspicionScore,
}

/// Offsets of every non-overlapping occurrence of `magic` in `data`.
pub fn occurrences(data: &[u8], magic: &[u8]) -> Vec<usize> {
    let finder = memmem::Finder::new(magic);
    let mut offsets = Vec::new();
    let mut pos = 0usize;
    while let Some(idx) = finder.find(&data[pos..]) {
        let offset = pos + idx;
        offsets.push(offset);
        pos = offset + magic.len();
    }
    offsets
}

/// All occurrences of every archive signature, by table order then offset.
pub fn find_signatures(data: &[u8]) -> Vec<SignatureMatch> {
    ARCHIVE_SIGNATURES
        .iter()
        .flat_map(|signature| {
            occurrences(data, signature.magic)
                .into_iter()
                .map(move |offset| SignatureMatch { signature, offset })
        })
        .collect()
}

/// Fraction of the stream made of `0x00` bytes.
pub fn null_ratio(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    bytecount_zero(data) as f64 / data.len() as f64
}

fn bytecount_zero(data: &[u8]) -> usize {
    memchr::memchr_iter(0, data).count()
}

/// Every weighted hit, in the order signatures, tail markers, nulls, entropy split.
pub fn contributions(data: &[u8], cfg: &PatternConfig) -> Vec<Contribution> {
    let len = data.len();
    let mut out = Vec::new();

    let matches = find_signatures(data);
    for signature in ARCHIVE_SIGNATURES {
        let own: Vec<&SignatureMatch> = matches
            .iter()
            .filter(|m| m.signature == signature)
            .collect();
        for m in own.iter().filter(|m| m.in_tail(len)) {
            out.push(Contribution::new(
                signature.weight,
                format!("{} at offset {} (in tail data)", signature.label, m.offset),
            ));
        }
        if own.len() > 1 {
            out.push(Contribution::new(
                cfg.repeat_bonus,
                format!("{} found {} times", signature.label, own.len()),
            ));
        }
    }

    let tail = &data[len / 2..];
    for (marker, name) in TAIL_MARKERS {
        if memmem::find(tail, marker).is_some() {
            out.push(Contribution::new(
                cfg.tail_marker_weight,
                format!("{} archive in second half of file (tail data injection)", name),
            ));
        }
    }

    let nulls = null_ratio(data);
    if nulls > cfg.null_ratio_threshold {
        out.push(Contribution::new(
            cfg.null_ratio_weight,
            format!("Suspicious NULL byte ratio: {:.2}%", nulls * 100.0),
        ));
    }

    let head_entropy = shannon_entropy(&data[..len / 2]);
    let tail_entropy = shannon_entropy(tail);
    if tail_entropy > cfg.jump_tail_min && head_entropy < cfg.jump_head_max {
        out.push(Contribution::new(
            cfg.jump_weight,
            format!(
                "Entropy jump: {:.2} -> {:.2} (steg pattern)",
                head_entropy, tail_entropy
            ),
        ));
    }

    out
}

/// Run the full pattern scan and fold it into a score.
pub fn detect_steganographic_patterns(data: &[u8], cfg: &PatternConfig) -> PatternAnalysis {
    let parts = contributions(data, cfg);
    let score = SuspicionScore::from_contributions(&parts);
    debug!(hits = parts.len(), score = score.value(), "pattern scan");
    PatternAnalysis {
        anomalies: parts.into_iter().map(|c| c.anomaly).collect(),
        score,
    }
}
