//! Structural validation keyed on the file extension.
//!
//! Checks the header and footer invariants of JPEG, PNG and GIF files and
//! folds in the chunked entropy signals. Unknown extensions only get the
//! entropy checks.

use crate::config::EntropyConfig;
use crate::entropy::{entropy_variance, high_entropy_ratio};
use crate::signatures::{GIF87A, GIF89A, GIF_TRAILER, JPEG_EOI, JPEG_SOI, PNG_FOOTER, PNG_HEADER};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Container formats with structural checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Format implied by the path's extension, compared case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Header/footer violations for this format, in header-then-footer order.
    pub fn check(self, data: &[u8]) -> Vec<String> {
        let mut anomalies = Vec::new();
        match self {
            ImageFormat::Jpeg => {
                if !data.starts_with(JPEG_SOI) {
                    anomalies.push("JPEG header missing or invalid".to_string());
                }
                if !data.ends_with(JPEG_EOI) {
                    anomalies.push("JPEG footer missing or corrupted".to_string());
                }
            }
            ImageFormat::Png => {
                if !data.starts_with(PNG_HEADER) {
                    anomalies.push("PNG header missing or invalid".to_string());
                }
                if !data.ends_with(PNG_FOOTER) {
                    anomalies.push("PNG footer missing or corrupted".to_string());
                }
            }
            ImageFormat::Gif => {
                if !(data.starts_with(GIF87A) || data.starts_with(GIF89A)) {
                    anomalies.push("GIF header missing or invalid".to_string());
                }
                if !data.ends_with(GIF_TRAILER) {
                    anomalies.push("GIF footer missing".to_string());
                }
            }
        }
        anomalies
    }
}

/// All structural anomalies for `data` stored under `path`.
pub fn detect_anomalies(data: &[u8], path: &Path, cfg: &EntropyConfig) -> Vec<String> {
    let mut anomalies = match ImageFormat::from_path(path) {
        Some(format) => {
            debug!(?format, "structural checks");
            format.check(data)
        }
        None => Vec::new(),
    };

    let ratio = high_entropy_ratio(data, &cfg.ratio);
    if ratio > cfg.very_high_ratio {
        anomalies.push(format!("Very high entropy ratio: {:.2}%", ratio * 100.0));
    }

    let (std_dev, high_ratio) = entropy_variance(data, &cfg.variance);
    if std_dev > cfg.abnormal_std_dev {
        anomalies.push(format!("Abnormal entropy variance detected: {:.2}", std_dev));
    }
    if high_ratio > cfg.high_chunk_ratio {
        anomalies.push(format!(
            "Too many high-entropy chunks: {:.2}%",
            high_ratio * 100.0
        ));
    }

    anomalies
}
