//! The JSON report written once per run.

use crate::config::PolicyConfig;
use crate::error::{Result, StegError};
use crate::lsb::LsbAnalysis;
use crate::probes::{Finding, SteghideProbe};
use crate::score::{Evidence, SuspicionScore, Verdict};
use serde::{Deserialize, Serialize};

/// Input errors reported in-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportError {
    MissingPath,
    MissingFile,
}

/// Everything the analyzers produced, before the verdict is applied.
#[derive(Debug, Clone, Default)]
pub struct ReportParts {
    pub scanner_supported: bool,
    pub findings: Vec<Finding>,
    pub tail_bytes: u64,
    pub structural_anomalies: Vec<String>,
    pub pattern_anomalies: Vec<String>,
    pub steg_score: SuspicionScore,
    pub entropy: f64,
    pub chi_square: f64,
    pub lsb_analysis: Option<LsbAnalysis>,
    pub steghide_probe: Option<SteghideProbe>,
}

/// Final analysis report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Whether the signature scanner ran.
    pub supported: bool,
    pub suspicious: bool,
    pub findings: Vec<Finding>,
    pub tail_bytes: u64,
    /// Structural anomalies first, then pattern anomalies.
    pub anomalies: Vec<String>,
    pub steg_score: SuspicionScore,
    pub entropy: f64,
    pub indicators_count: u8,
    /// Diagnostic only; never read by the verdict.
    pub chi_square: f64,
    /// Number of leading entries of `anomalies` that came from the structural validator.
    pub structural_anomalies_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lsb_analysis: Option<LsbAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steghide_probe: Option<SteghideProbe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReportError>,
}

impl Report {
    /// Apply the verdict rule to `parts` under `policy`.
    pub fn assemble(parts: ReportParts, policy: &PolicyConfig) -> Self {
        let structural_anomalies_count = parts.structural_anomalies.len();
        let evidence = Evidence {
            tail_bytes: parts.tail_bytes,
            steg_score: parts.steg_score,
            finding_count: parts.findings.len(),
            structural_anomalies: structural_anomalies_count,
            lsb_suspicious: parts.lsb_analysis.as_ref().is_some_and(|l| l.suspicious),
            probe_suspicious: parts.steghide_probe.as_ref().is_some_and(|p| p.suspicious),
        };
        let verdict = Verdict::decide(&evidence, policy);

        let mut anomalies = parts.structural_anomalies;
        anomalies.extend(parts.pattern_anomalies);

        Self {
            supported: parts.scanner_supported,
            suspicious: verdict.suspicious,
            findings: parts.findings,
            tail_bytes: parts.tail_bytes,
            anomalies,
            steg_score: parts.steg_score,
            entropy: parts.entropy,
            indicators_count: verdict.indicators.count(),
            chi_square: parts.chi_square,
            structural_anomalies_count,
            lsb_analysis: parts.lsb_analysis,
            steghide_probe: parts.steghide_probe,
            error: None,
        }
    }

    /// Report for an input error: everything empty or zero.
    pub fn error(kind: ReportError) -> Self {
        Self {
            supported: false,
            suspicious: false,
            findings: Vec::new(),
            tail_bytes: 0,
            anomalies: Vec::new(),
            steg_score: SuspicionScore::ZERO,
            entropy: 0.0,
            indicators_count: 0,
            chi_square: 0.0,
            structural_anomalies_count: 0,
            lsb_analysis: None,
            steghide_probe: None,
            error: Some(kind),
        }
    }

    /// The evidence the verdict was computed from.
    pub fn evidence(&self) -> Evidence {
        Evidence {
            tail_bytes: self.tail_bytes,
            steg_score: self.steg_score,
            finding_count: self.findings.len(),
            structural_anomalies: self.structural_anomalies_count,
            lsb_suspicious: self.lsb_analysis.as_ref().is_some_and(|l| l.suspicious),
            probe_suspicious: self.steghide_probe.as_ref().is_some_and(|p| p.suspicious),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| StegError::Serialization(format!("JSON serialization error: {}", e)))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StegError::Serialization(format!("JSON serialization error: {}", e)))
    }
}
