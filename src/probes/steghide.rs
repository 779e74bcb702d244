//! Passphrase probe adapter.
//!
//! Asks `steghide` to describe the file with an empty passphrase and
//! classifies what it prints. Launch failures and timeouts become an
//! `error` status; nothing here aborts the run.

use super::{discover_binary, run_bounded, Capability, ProcessOutcome};
use crate::config::ProbeConfig;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const WRONG_PASSPHRASE: &str = "could not extract any data with that passphrase";

/// Classified probe result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Missing,
    Error,
    PasswordRequired,
    EmbeddedData,
    PossiblyEncrypted,
    NoData,
}

impl ProbeStatus {
    pub fn hint(self) -> &'static str {
        match self {
            ProbeStatus::PasswordRequired => {
                "A container that needs a passphrase to extract was detected."
            }
            ProbeStatus::EmbeddedData => "steghide reported embedded data.",
            ProbeStatus::PossiblyEncrypted => {
                "steghide output suggests encryption or a passphrase."
            }
            ProbeStatus::Missing | ProbeStatus::Error | ProbeStatus::NoData => "",
        }
    }
}

/// Probe sub-report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteghideProbe {
    pub supported: bool,
    pub available: bool,
    pub suspicious: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_password: Option<bool>,
    pub status: ProbeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SteghideProbe {
    pub fn missing() -> Self {
        Self {
            supported: false,
            available: false,
            suspicious: false,
            requires_password: None,
            status: ProbeStatus::Missing,
            hint: None,
            output: None,
            error: None,
        }
    }

    /// The tool exists but could not be run to completion.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            supported: false,
            available: true,
            status: ProbeStatus::Error,
            error: Some(message.into()),
            ..Self::missing()
        }
    }

    /// Classify a completed run from its exit code and captured streams.
    pub fn classify(
        exit_code: Option<i32>,
        stdout: &str,
        stderr: &str,
        output_limit: usize,
    ) -> Self {
        let combined = format!("{stdout}\n{stderr}");
        let combined = combined.trim();
        let normalized = combined.to_lowercase();
        let mentions_passphrase = normalized.contains("passphrase");

        let (status, requires_password) = if normalized.contains(WRONG_PASSPHRASE) {
            (ProbeStatus::PasswordRequired, true)
        } else if normalized.contains("embedded data") && exit_code == Some(0) {
            (ProbeStatus::EmbeddedData, false)
        } else if normalized.contains("encryption algorithm") || mentions_passphrase {
            (ProbeStatus::PossiblyEncrypted, mentions_passphrase)
        } else if exit_code != Some(0) {
            (ProbeStatus::Error, false)
        } else {
            (ProbeStatus::NoData, false)
        };

        let suspicious = matches!(
            status,
            ProbeStatus::PasswordRequired
                | ProbeStatus::EmbeddedData
                | ProbeStatus::PossiblyEncrypted
        );

        Self {
            supported: true,
            available: true,
            suspicious,
            requires_password: Some(requires_password),
            status,
            hint: Some(status.hint().to_string()),
            output: Some(combined.chars().take(output_limit).collect()),
            error: None,
        }
    }
}

/// Anything that can probe a file for passphrase-protected content.
pub trait PassphraseProbe {
    fn probe(&self, path: &Path) -> SteghideProbe;
}

/// `steghide info <path> -p ""`.
#[derive(Debug, Clone)]
pub struct SteghideCli {
    binary: PathBuf,
    timeout_secs: u64,
    output_limit: usize,
}

impl SteghideCli {
    pub fn new(binary: PathBuf, timeout_secs: u64, output_limit: usize) -> Self {
        Self {
            binary,
            timeout_secs,
            output_limit,
        }
    }

    pub fn discover(cfg: &ProbeConfig) -> Capability<Self> {
        discover_binary(&cfg.probe_binary)
            .map(|path| Self::new(path, cfg.probe_timeout_secs, cfg.output_limit))
    }
}

impl PassphraseProbe for SteghideCli {
    fn probe(&self, path: &Path) -> SteghideProbe {
        let args = [
            OsStr::new("info"),
            path.as_os_str(),
            OsStr::new("-p"),
            OsStr::new(""),
        ];
        match run_bounded(&self.binary, args, self.timeout_secs, "steghide") {
            ProcessOutcome::Completed {
                exit_code,
                stdout,
                stderr,
            } => SteghideProbe::classify(exit_code, &stdout, &stderr, self.output_limit),
            ProcessOutcome::TimedOut { seconds } => {
                warn!(seconds, "steghide timed out");
                SteghideProbe::failed(format!("steghide timed out after {seconds}s"))
            }
            ProcessOutcome::Failed(message) => {
                warn!(error = %message, "steghide failed to run");
                SteghideProbe::failed(message)
            }
            ProcessOutcome::BinaryAbsent => SteghideProbe::missing(),
        }
    }
}

/// Probe `path` if the capability is present.
pub fn probe_passphrase(path: &Path, probe: Option<&dyn PassphraseProbe>) -> SteghideProbe {
    match probe {
        Some(probe) => {
            let result = probe.probe(path);
            debug!(status = ?result.status, suspicious = result.suspicious, "passphrase probe");
            result
        }
        None => SteghideProbe::missing(),
    }
}
