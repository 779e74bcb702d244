//! Least-significant-bit distribution analysis.
//!
//! Encrypted or compressed payloads written into the low bits of pixel
//! channels push the ones-ratio of those bits towards an even 50/50 split.
//! The analyzer samples decoded RGB pixels when an image decoder is
//! available and the stream decodes; otherwise it samples raw bytes with a
//! tighter tolerance.

use crate::config::LsbConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Decoded raster as packed RGB triples, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbRaster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbRaster {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Capability to turn arbitrary bytes into an RGB raster.
pub trait ImageDecoder {
    fn decode_rgb(&self, data: &[u8]) -> Result<RgbRaster>;
}

/// Decoder backed by the `image` crate.
#[cfg(feature = "image-decode")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateDecoder;

#[cfg(feature = "image-decode")]
impl ImageDecoder for ImageCrateDecoder {
    fn decode_rgb(&self, data: &[u8]) -> Result<RgbRaster> {
        use crate::error::StegError;
        use std::io::Cursor;

        let reader = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| StegError::Decode(e.to_string()))?;
        let img = reader
            .decode()
            .map_err(|e| StegError::Decode(e.to_string()))?
            .to_rgb8();
        let (width, height) = img.dimensions();
        Ok(RgbRaster {
            width,
            height,
            pixels: img.into_raw(),
        })
    }
}

/// Sampling path that produced an [`LsbAnalysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LsbMethod {
    DecodedRgb,
    ByteStream,
}

/// Running tally of sampled low bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitTally {
    pub ones: u64,
    pub bits: u64,
}

impl BitTally {
    #[inline]
    pub fn push(&mut self, value: u8) {
        self.ones += u64::from(value & 1);
        self.bits += 1;
    }

    /// Ones-ratio, 0 when nothing was sampled.
    pub fn ratio(&self) -> f64 {
        if self.bits == 0 {
            0.0
        } else {
            self.ones as f64 / self.bits as f64
        }
    }

    /// Enough bits and a ratio strictly within `tolerance` of one half.
    pub fn near_uniform(&self, min_bits: u64, tolerance: f64) -> bool {
        self.bits > 0 && self.bits >= min_bits && (self.ratio() - 0.5).abs() < tolerance
    }
}

/// Per-channel result on the decoded path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub channel: String,
    pub ratio: f64,
    pub bits: u64,
    pub suspicious: bool,
}

/// Result of the LSB analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LsbAnalysis {
    pub supported: bool,
    pub method: LsbMethod,
    pub ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixels_sampled: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_sampled: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rgb_channels: Vec<ChannelStats>,
    pub rgb_conversion: bool,
    pub suspicious: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Sample the decoded raster. `None` for an empty raster.
pub fn analyze_raster(raster: &RgbRaster, cfg: &LsbConfig) -> Option<LsbAnalysis> {
    let total_pixels = raster.pixel_count().min(raster.pixels.len() / 3);
    if total_pixels == 0 {
        return None;
    }
    let step = (total_pixels / cfg.max_pixels.max(1)).max(1);

    let mut global = BitTally::default();
    let mut channels = [BitTally::default(); 3];
    let sampled = raster.pixels.chunks_exact(3).take(total_pixels);
    for px in sampled.step_by(step) {
        for (tally, &value) in channels.iter_mut().zip(px) {
            tally.push(value);
            global.push(value);
        }
    }

    let rgb_channels: Vec<ChannelStats> = ["R", "G", "B"]
        .iter()
        .zip(channels.iter())
        .map(|(label, tally)| ChannelStats {
            channel: label.to_string(),
            ratio: tally.ratio(),
            bits: tally.bits,
            suspicious: tally.near_uniform(cfg.min_channel_bits, cfg.channel_tolerance),
        })
        .collect();
    let channel_alert = rgb_channels.iter().any(|c| c.suspicious);
    let suspicious = global.near_uniform(cfg.min_bits, cfg.pixel_tolerance) || channel_alert;

    Some(LsbAnalysis {
        supported: true,
        method: LsbMethod::DecodedRgb,
        ratio: global.ratio(),
        pixels_sampled: Some(global.bits / 3),
        bytes_sampled: None,
        rgb_channels,
        rgb_conversion: true,
        suspicious,
        width: Some(raster.width),
        height: Some(raster.height),
    })
}

/// Sample the raw byte stream.
pub fn analyze_bytes(data: &[u8], cfg: &LsbConfig) -> LsbAnalysis {
    let step = (data.len() / cfg.max_bytes.max(1)).max(1);
    let mut tally = BitTally::default();
    for &b in data.iter().step_by(step) {
        tally.push(b);
    }
    LsbAnalysis {
        supported: tally.bits > 0,
        method: LsbMethod::ByteStream,
        ratio: tally.ratio(),
        pixels_sampled: None,
        bytes_sampled: Some(tally.bits),
        rgb_channels: Vec::new(),
        rgb_conversion: false,
        suspicious: tally.near_uniform(cfg.min_bits, cfg.byte_tolerance),
        width: None,
        height: None,
    }
}

/// Decoded-pixel analysis when possible, raw bytes otherwise.
///
/// Decode failures are the one place the engine recovers locally: they are
/// logged and the byte path runs instead.
pub fn analyze_lsb(
    data: &[u8],
    decoder: Option<&dyn ImageDecoder>,
    cfg: &LsbConfig,
) -> LsbAnalysis {
    if let Some(decoder) = decoder {
        match decoder.decode_rgb(data) {
            Ok(raster) => {
                if let Some(analysis) = analyze_raster(&raster, cfg) {
                    return analysis;
                }
                debug!("decoded raster is empty; sampling raw bytes");
            }
            Err(e) => debug!(error = %e, "image decode failed; sampling raw bytes"),
        }
    }
    analyze_bytes(data, cfg)
}
