//! Suspicion scoring and the verdict rule.
//!
//! Scores are a pure fold over independent weighted contributions; the
//! verdict is a pure function of report evidence and the active policy.

use crate::config::PolicyConfig;
use serde::{Deserialize, Serialize};

/// One weighted piece of evidence and the anomaly text that explains it.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub weight: f64,
    pub anomaly: String,
}

impl Contribution {
    pub fn new(weight: f64, anomaly: impl Into<String>) -> Self {
        Self {
            weight,
            anomaly: anomaly.into(),
        }
    }
}

/// Accumulated suspicion, always within [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuspicionScore(f64);

impl SuspicionScore {
    pub const ZERO: SuspicionScore = SuspicionScore(0.0);

    /// Sum the weights of `contributions`, clamped to 1.0.
    ///
    /// Negative weights are ignored so the score can only grow.
    pub fn from_contributions<'a, I>(contributions: I) -> Self
    where
        I: IntoIterator<Item = &'a Contribution>,
    {
        let raw: f64 = contributions
            .into_iter()
            .map(|c| c.weight.max(0.0))
            .sum();
        SuspicionScore(raw.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn exceeds(self, threshold: f64) -> bool {
        self.0 > threshold
    }
}

/// Evidence the verdict rule reads.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Evidence {
    pub tail_bytes: u64,
    pub steg_score: SuspicionScore,
    pub finding_count: usize,
    pub structural_anomalies: usize,
    pub lsb_suspicious: bool,
    pub probe_suspicious: bool,
}

/// The four counted indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicators {
    pub tail: bool,
    pub score: bool,
    pub scanner: bool,
    pub structure: bool,
}

impl Indicators {
    pub fn evaluate(evidence: &Evidence, policy: &PolicyConfig) -> Self {
        Self {
            tail: evidence.tail_bytes > policy.tail_bytes_threshold,
            score: evidence.steg_score.exceeds(policy.steg_score_threshold),
            scanner: evidence.finding_count > 0,
            structure: evidence.structural_anomalies > 0,
        }
    }

    /// Number of indicators raised (0 to 4).
    pub fn count(&self) -> u8 {
        [self.tail, self.score, self.scanner, self.structure]
            .iter()
            .filter(|&&b| b)
            .count() as u8
    }

    pub fn any(&self) -> bool {
        self.count() > 0
    }
}

/// Final decision derived from [`Evidence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub indicators: Indicators,
    pub suspicious: bool,
}

impl Verdict {
    pub fn decide(evidence: &Evidence, policy: &PolicyConfig) -> Self {
        let indicators = Indicators::evaluate(evidence, policy);
        let auxiliary = policy.auxiliary_signals
            && (evidence.lsb_suspicious || evidence.probe_suspicious);
        Self {
            indicators,
            suspicious: indicators.any() || auxiliary,
        }
    }
}
