//! The detection pipeline.
//!
//! One run reads the file once, runs every analyzer in sequence and folds
//! the results into a [`Report`]. Collaborators are resolved ahead of time
//! so the run itself never searches the environment.

use crate::config::ScanConfig;
use crate::entropy::{chi_square_divergence, shannon_entropy};
use crate::error::Result;
use crate::lsb::{analyze_lsb, ImageDecoder};
use crate::overlay::trailing_bytes;
use crate::patterns::detect_steganographic_patterns;
use crate::probes::{
    probe_passphrase, scan_signatures, BinwalkCli, Capability, PassphraseProbe, SignatureScanner,
    SteghideCli,
};
use crate::report::{Report, ReportError, ReportParts};
use crate::structure::detect_anomalies;
use std::path::Path;
use tracing::{debug, info};

/// External collaborators available to the engine.
pub struct Collaborators {
    pub scanner: Capability<Box<dyn SignatureScanner>>,
    pub probe: Capability<Box<dyn PassphraseProbe>>,
    pub decoder: Capability<Box<dyn ImageDecoder>>,
}

impl Collaborators {
    /// Look up the scanner and probe binaries and pick the built-in decoder.
    pub fn discover(cfg: &ScanConfig) -> Self {
        let scanner = BinwalkCli::discover(&cfg.probes)
            .map(|s| Box::new(s) as Box<dyn SignatureScanner>);
        let probe = SteghideCli::discover(&cfg.probes)
            .map(|p| Box::new(p) as Box<dyn PassphraseProbe>);
        let collaborators = Self {
            scanner,
            probe,
            decoder: default_decoder(),
        };
        debug!(
            scanner = collaborators.scanner.is_available(),
            probe = collaborators.probe.is_available(),
            decoder = collaborators.decoder.is_available(),
            "collaborators resolved"
        );
        collaborators
    }

    /// No external tools; the built-in decoder only.
    pub fn offline() -> Self {
        Self {
            scanner: Capability::Unavailable("disabled".to_string()),
            probe: Capability::Unavailable("disabled".to_string()),
            decoder: default_decoder(),
        }
    }

    pub fn with_scanner(mut self, scanner: Box<dyn SignatureScanner>) -> Self {
        self.scanner = Capability::Available(scanner);
        self
    }

    pub fn with_probe(mut self, probe: Box<dyn PassphraseProbe>) -> Self {
        self.probe = Capability::Available(probe);
        self
    }

    pub fn with_decoder(mut self, decoder: Capability<Box<dyn ImageDecoder>>) -> Self {
        self.decoder = decoder;
        self
    }
}

#[cfg(feature = "image-decode")]
fn default_decoder() -> Capability<Box<dyn ImageDecoder>> {
    Capability::Available(Box::new(crate::lsb::ImageCrateDecoder))
}

#[cfg(not(feature = "image-decode"))]
fn default_decoder() -> Capability<Box<dyn ImageDecoder>> {
    Capability::Unavailable("built without image-decode".to_string())
}

/// Configured detection engine.
pub struct Engine {
    config: ScanConfig,
    collaborators: Collaborators,
}

impl Engine {
    pub fn new(config: ScanConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    /// Engine with collaborators discovered from the environment.
    pub fn discover(config: ScanConfig) -> Self {
        let collaborators = Collaborators::discover(&config);
        Self::new(config, collaborators)
    }

    /// Analyze the file named on the command line.
    ///
    /// Missing inputs yield an error report. A file that exists but cannot
    /// be read is returned as `Err`.
    pub fn run(&self, path: Option<&Path>) -> Result<Report> {
        let Some(path) = path else {
            return Ok(Report::error(ReportError::MissingPath));
        };
        if !path.exists() {
            debug!(path = %path.display(), "input does not exist");
            return Ok(Report::error(ReportError::MissingFile));
        }
        self.analyze_path(path)
    }

    /// Read `path` once and analyze it.
    pub fn analyze_path(&self, path: &Path) -> Result<Report> {
        let data = std::fs::read(path)?;
        Ok(self.analyze_bytes(&data, path))
    }

    /// Analyze `data` as the content of `path`.
    ///
    /// `path` selects the structural checks and is handed to the external
    /// collaborators, which read the file themselves.
    pub fn analyze_bytes(&self, data: &[u8], path: &Path) -> Report {
        let span = tracing::info_span!(
            "scan",
            path = %path.display(),
            size_bytes = data.len()
        );
        let _g = span.enter();
        info!("start");
        let cfg = &self.config;

        debug!(phase = "entropy", "overall entropy");
        let entropy = shannon_entropy(data);
        let chi_square = chi_square_divergence(data);

        debug!(phase = "scanner", "signature scan");
        let scanner = scan_signatures(
            path,
            self.collaborators.scanner.available().map(|s| s.as_ref()),
            &cfg.probes,
            cfg.policy.scanner_min_offset,
        );

        debug!(phase = "tail", "trailing bytes");
        let tail_bytes = trailing_bytes(data) as u64;

        debug!(phase = "structure", "structural validation");
        let structural_anomalies = detect_anomalies(data, path, &cfg.entropy);

        debug!(phase = "patterns", "signature and tail patterns");
        let patterns = detect_steganographic_patterns(data, &cfg.patterns);

        debug!(phase = "lsb", "low-bit distribution");
        let lsb = analyze_lsb(
            data,
            self.collaborators.decoder.available().map(|d| d.as_ref()),
            &cfg.lsb,
        );

        debug!(phase = "probe", "passphrase probe");
        let probe = probe_passphrase(
            path,
            self.collaborators.probe.available().map(|p| p.as_ref()),
        );

        let report = Report::assemble(
            ReportParts {
                scanner_supported: scanner.supported,
                findings: scanner.findings,
                tail_bytes,
                structural_anomalies,
                pattern_anomalies: patterns.anomalies,
                steg_score: patterns.score,
                entropy,
                chi_square,
                lsb_analysis: Some(lsb),
                steghide_probe: Some(probe),
            },
            &cfg.policy,
        );
        info!(
            suspicious = report.suspicious,
            indicators = report.indicators_count,
            tail_bytes = report.tail_bytes,
            steg_score = report.steg_score.value(),
            "complete"
        );
        report
    }
}
