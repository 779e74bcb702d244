//! Signature scanner adapter.
//!
//! The scanner walks a file and reports every embedded format it
//! recognizes. Only archive-like findings deep enough into the file are
//! kept; a scanner that is missing or fails leaves an unsupported report.

use super::{discover_binary, run_bounded, Capability, ProcessOutcome};
use crate::config::ProbeConfig;
use crate::error::{Result, StegError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One scanner result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub offset: u64,
    pub description: String,
}

/// Results grouped by the scanner module that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanModule {
    pub name: String,
    pub results: Vec<Finding>,
}

/// Anything that can list embedded signatures of a file on disk.
pub trait SignatureScanner {
    fn name(&self) -> &str;
    fn scan(&self, path: &Path) -> Result<Vec<ScanModule>>;
}

/// Scanner sub-report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerReport {
    pub supported: bool,
    pub suspicious: bool,
    pub findings: Vec<Finding>,
}

impl ScannerReport {
    pub fn unsupported() -> Self {
        Self::default()
    }
}

// DECIMAL  HEXADECIMAL  DESCRIPTION
static RESULT_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s+0x[0-9A-Fa-f]+\s+(.+?)\s*$").expect("valid scanner row regex")
});

/// `binwalk` command line, signature mode.
#[derive(Debug, Clone)]
pub struct BinwalkCli {
    binary: PathBuf,
    timeout_secs: u64,
}

impl BinwalkCli {
    pub fn new(binary: PathBuf, timeout_secs: u64) -> Self {
        Self {
            binary,
            timeout_secs,
        }
    }

    pub fn discover(cfg: &ProbeConfig) -> Capability<Self> {
        discover_binary(&cfg.scanner_binary).map(|path| Self::new(path, cfg.scanner_timeout_secs))
    }

    /// Rows of the scanner's result table; headers and banners are skipped.
    pub fn parse_output(text: &str) -> Vec<Finding> {
        text.lines()
            .filter_map(|line| {
                let caps = RESULT_ROW.captures(line)?;
                let offset = caps[1].parse::<u64>().ok()?;
                Some(Finding {
                    offset,
                    description: caps[2].to_string(),
                })
            })
            .collect()
    }
}

impl SignatureScanner for BinwalkCli {
    fn name(&self) -> &str {
        "binwalk"
    }

    fn scan(&self, path: &Path) -> Result<Vec<ScanModule>> {
        let args = [path.as_os_str()];
        match run_bounded(&self.binary, args, self.timeout_secs, "binwalk") {
            ProcessOutcome::Completed {
                exit_code: Some(0),
                stdout,
                ..
            } => Ok(vec![ScanModule {
                name: "signature".to_string(),
                results: Self::parse_output(&stdout),
            }]),
            ProcessOutcome::Completed {
                exit_code, stderr, ..
            } => Err(StegError::collaborator(
                "binwalk",
                format!("exit code {:?}: {}", exit_code, stderr.trim()),
            )),
            ProcessOutcome::TimedOut { seconds } => Err(StegError::Timeout {
                operation: "binwalk".to_string(),
                seconds,
            }),
            ProcessOutcome::Failed(message) => Err(StegError::collaborator("binwalk", message)),
            ProcessOutcome::BinaryAbsent => {
                Err(StegError::collaborator("binwalk", "binary not found"))
            }
        }
    }
}

fn is_archive_like(description: &str, keywords: &[String]) -> bool {
    let lowered = description.to_lowercase();
    keywords
        .iter()
        .any(|k| lowered.contains(k.to_lowercase().as_str()))
}

/// Scan `path` and keep archive-like findings past `min_offset`.
pub fn scan_signatures(
    path: &Path,
    scanner: Option<&dyn SignatureScanner>,
    cfg: &ProbeConfig,
    min_offset: u64,
) -> ScannerReport {
    let Some(scanner) = scanner else {
        debug!("signature scanner unavailable");
        return ScannerReport::unsupported();
    };

    let modules = match scanner.scan(path) {
        Ok(modules) => modules,
        Err(e) => {
            warn!(scanner = scanner.name(), error = %e, "signature scan failed");
            return ScannerReport::unsupported();
        }
    };

    let findings: Vec<Finding> = modules
        .into_iter()
        .flat_map(|m| m.results)
        .filter(|f| f.offset > min_offset && is_archive_like(&f.description, &cfg.scanner_keywords))
        .collect();
    debug!(
        scanner = scanner.name(),
        kept = findings.len(),
        "signature scan complete"
    );

    ScannerReport {
        supported: true,
        suspicious: !findings.is_empty(),
        findings,
    }
}
