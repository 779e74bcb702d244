//! Configuration for the detection engine.
//!
//! Every threshold the engine uses lives here with its canonical value as the
//! `Default`. The verdict policy has two named presets; operators pick one
//! through the environment, or load a full/partial JSON document.

use crate::error::{Result, StegError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV: &str = "STEGSCAN_CONFIG";

/// Environment variable selecting a policy preset (`aggressive` or `lenient`).
pub const POLICY_ENV: &str = "STEGSCAN_POLICY";

/// Master configuration for a scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Verdict policy thresholds.
    pub policy: PolicyConfig,
    /// Chunked entropy analysis configuration.
    pub entropy: EntropyConfig,
    /// Signature and tail pattern weights.
    pub patterns: PatternConfig,
    /// LSB sampling configuration.
    pub lsb: LsbConfig,
    /// External collaborator configuration.
    pub probes: ProbeConfig,
}

impl ScanConfig {
    /// Build the configuration from `STEGSCAN_CONFIG` and `STEGSCAN_POLICY`.
    ///
    /// Neither variable set yields the defaults. The policy variable is applied
    /// after the file, so it wins over the file's `policy` block.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV);
        Self::load(path.as_deref().map(Path::new))
    }

    /// Like [`ScanConfig::from_env`], but with an explicit file in place of
    /// `STEGSCAN_CONFIG`. `STEGSCAN_POLICY` still applies.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        if let Ok(name) = std::env::var(POLICY_ENV) {
            let preset: PolicyPreset = name.parse()?;
            info!(policy = %preset, "policy preset selected from environment");
            config.policy = preset.config();
        }
        config.validate()?;
        Ok(config)
    }

    /// Load a (possibly partial) configuration document.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading configuration");
        let text = std::fs::read_to_string(path)
            .map_err(|e| StegError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| StegError::Config(format!("invalid configuration JSON: {}", e)))
    }

    /// Reject values that would make an analyzer meaningless.
    pub fn validate(&self) -> Result<()> {
        for (name, chunk) in [
            ("entropy.variance", &self.entropy.variance),
            ("entropy.ratio", &self.entropy.ratio),
        ] {
            if chunk.window_size == 0 {
                return Err(StegError::Config(format!("{name}.window_size must be > 0")));
            }
        }
        if !(0.0..=1.0).contains(&self.policy.steg_score_threshold) {
            return Err(StegError::Config(
                "policy.steg_score_threshold must be within [0, 1]".to_string(),
            ));
        }
        if self.lsb.max_pixels == 0 || self.lsb.max_bytes == 0 {
            return Err(StegError::Config("lsb sample caps must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Named verdict policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPreset {
    /// Any trailing byte, a low score, any scanner hit or any structural anomaly.
    Aggressive,
    /// Tolerates small tails, needs a higher score, and lets LSB/probe verdicts count.
    Lenient,
}

impl PolicyPreset {
    pub fn config(self) -> PolicyConfig {
        match self {
            PolicyPreset::Aggressive => PolicyConfig::aggressive(),
            PolicyPreset::Lenient => PolicyConfig::lenient(),
        }
    }
}

impl FromStr for PolicyPreset {
    type Err = StegError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aggressive" => Ok(PolicyPreset::Aggressive),
            "lenient" => Ok(PolicyPreset::Lenient),
            other => Err(StegError::Config(format!("unknown policy '{}'", other))),
        }
    }
}

impl std::fmt::Display for PolicyPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyPreset::Aggressive => f.write_str("aggressive"),
            PolicyPreset::Lenient => f.write_str("lenient"),
        }
    }
}

/// Thresholds that turn analyzer output into verdict indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Tail is suspicious when `tail_bytes` exceeds this (aggressive: 0, lenient: 512).
    pub tail_bytes_threshold: u64,
    /// Score is suspicious when `steg_score` exceeds this (aggressive: 0.25, lenient: 0.35).
    pub steg_score_threshold: f64,
    /// Scanner findings must lie strictly beyond this offset (aggressive: 512, lenient: 0).
    pub scanner_min_offset: u64,
    /// Let the LSB and passphrase-probe verdicts join the disjunction.
    pub auxiliary_signals: bool,
}

impl PolicyConfig {
    pub fn aggressive() -> Self {
        Self {
            tail_bytes_threshold: 0,
            steg_score_threshold: 0.25,
            scanner_min_offset: 512,
            auxiliary_signals: false,
        }
    }

    pub fn lenient() -> Self {
        Self {
            tail_bytes_threshold: 512,
            steg_score_threshold: 0.35,
            scanner_min_offset: 0,
            auxiliary_signals: true,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::aggressive()
    }
}

/// Window size and classification bounds for one chunked pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Window length in bytes.
    pub window_size: usize,
    /// Windows above this entropy count as high.
    pub high: f64,
    /// Windows below this entropy count as low.
    pub low: f64,
}

/// Chunked entropy analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntropyConfig {
    /// Variance pass (default: 256-byte windows, high > 7.6, low < 2.5).
    pub variance: ChunkConfig,
    /// Ratio pass (default: 512-byte windows, high > 7.5, low < 3.0).
    pub ratio: ChunkConfig,
    /// Ratio-pass high fraction above which a structural anomaly is raised.
    pub very_high_ratio: f64,
    /// Variance-pass standard deviation above which a structural anomaly is raised.
    pub abnormal_std_dev: f64,
    /// Variance-pass high fraction above which a structural anomaly is raised.
    pub high_chunk_ratio: f64,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            variance: ChunkConfig {
                window_size: 256,
                high: 7.6,
                low: 2.5,
            },
            ratio: ChunkConfig {
                window_size: 512,
                high: 7.5,
                low: 3.0,
            },
            very_high_ratio: 0.8,
            abnormal_std_dev: 3.5,
            high_chunk_ratio: 0.7,
        }
    }
}

/// Weights and limits for the pattern scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Added once per signature that occurs more than once.
    pub repeat_bonus: f64,
    /// Added per short archive marker present in the second half.
    pub tail_marker_weight: f64,
    /// Null-byte fraction above which the stream is flagged.
    pub null_ratio_threshold: f64,
    pub null_ratio_weight: f64,
    /// Second-half entropy must exceed this for an entropy jump.
    pub jump_tail_min: f64,
    /// First-half entropy must stay below this for an entropy jump.
    pub jump_head_max: f64,
    pub jump_weight: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            repeat_bonus: 0.25,
            tail_marker_weight: 0.35,
            null_ratio_threshold: 0.30,
            null_ratio_weight: 0.25,
            jump_tail_min: 7.2,
            jump_head_max: 7.0,
            jump_weight: 0.30,
        }
    }
}

/// LSB sampling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsbConfig {
    /// Approximate cap on decoded pixels inspected.
    pub max_pixels: usize,
    /// Approximate cap on raw bytes inspected by the fallback.
    pub max_bytes: usize,
    /// Minimum global sample, in bits, before a verdict is drawn.
    pub min_bits: u64,
    /// Minimum per-channel sample, in bits.
    pub min_channel_bits: u64,
    /// Global tolerance around 0.5 on the pixel path.
    pub pixel_tolerance: f64,
    /// Per-channel tolerance around 0.5.
    pub channel_tolerance: f64,
    /// Tolerance around 0.5 on the raw byte path.
    pub byte_tolerance: f64,
}

impl Default for LsbConfig {
    fn default() -> Self {
        Self {
            max_pixels: 400_000,
            max_bytes: 500_000,
            min_bits: 5000,
            min_channel_bits: 1500,
            pixel_tolerance: 0.02,
            channel_tolerance: 0.018,
            byte_tolerance: 0.015,
        }
    }
}

/// External collaborator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Signature scanner executable, resolved through `PATH`.
    pub scanner_binary: String,
    pub scanner_timeout_secs: u64,
    /// Terms a scanner description must contain to be kept, matched case-insensitively.
    pub scanner_keywords: Vec<String>,
    /// Passphrase probe executable, resolved through `PATH`.
    pub probe_binary: String,
    pub probe_timeout_secs: u64,
    /// Characters of probe output kept in the report.
    pub output_limit: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            scanner_binary: "binwalk".to_string(),
            scanner_timeout_secs: crate::timeout::SCANNER_TIMEOUT_SECONDS,
            scanner_keywords: ["zip", "rar", "7-zip", "gzip", "bzip2", "xz", "encrypted"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            probe_binary: "steghide".to_string(),
            probe_timeout_secs: crate::timeout::PROBE_TIMEOUT_SECONDS,
            output_limit: 2000,
        }
    }
}
