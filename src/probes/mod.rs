//! External collaborators: the signature scanner and the passphrase probe.
//!
//! Availability is resolved once, up front, into a [`Capability`]. Running a
//! collaborator never fails the analysis: every failure mode is folded into
//! the sub-report the adapter returns.

pub mod scanner;
pub mod steghide;

use crate::error::StegError;
use crate::timeout::{block_on_with_timeout, TimeoutConfig};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, warn};

pub use scanner::{
    scan_signatures, BinwalkCli, Finding, ScanModule, ScannerReport, SignatureScanner,
};
pub use steghide::{probe_passphrase, PassphraseProbe, ProbeStatus, SteghideCli, SteghideProbe};

/// A collaborator that is either usable or known to be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability<T> {
    Available(T),
    Unavailable(String),
}

impl<T> Capability<T> {
    pub fn available(&self) -> Option<&T> {
        match self {
            Capability::Available(handle) => Some(handle),
            Capability::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    /// Why the collaborator is missing, if it is.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Capability::Available(_) => None,
            Capability::Unavailable(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Capability<U> {
        match self {
            Capability::Available(handle) => Capability::Available(f(handle)),
            Capability::Unavailable(reason) => Capability::Unavailable(reason),
        }
    }
}

/// Resolve `binary` the way a shell would: explicit paths are taken as-is,
/// bare names are searched for in `PATH`.
pub fn find_in_path(binary: &str) -> Option<PathBuf> {
    if binary.is_empty() {
        return None;
    }
    let candidate = Path::new(binary);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(binary))
        .find(|p| is_executable(p))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Capability for an executable located through [`find_in_path`].
pub fn discover_binary(binary: &str) -> Capability<PathBuf> {
    match find_in_path(binary) {
        Some(path) => {
            debug!(binary, path = %path.display(), "collaborator found");
            Capability::Available(path)
        }
        None => {
            debug!(binary, "collaborator not on PATH");
            Capability::Unavailable(format!("{binary} not found in PATH"))
        }
    }
}

/// How a bounded external process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Completed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    TimedOut {
        seconds: u64,
    },
    Failed(String),
    BinaryAbsent,
}

impl ProcessOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, ProcessOutcome::Completed { exit_code: Some(0), .. })
    }
}

/// Run `program` with `args`, killing it once `seconds` have elapsed.
///
/// Stdin is closed so tools that prompt for input fail fast instead of
/// hanging until the time box expires.
pub fn run_bounded<I, S>(program: &Path, args: I, seconds: u64, operation: &str) -> ProcessOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = tokio::process::Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let result = block_on_with_timeout(TimeoutConfig::new(seconds, operation), async move {
        Ok::<_, StegError>(command.output().await?)
    });

    match result {
        Ok(output) => ProcessOutcome::Completed {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Err(StegError::Timeout { seconds, .. }) => ProcessOutcome::TimedOut { seconds },
        Err(StegError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(program = %program.display(), "binary vanished before launch");
            ProcessOutcome::BinaryAbsent
        }
        Err(e) => ProcessOutcome::Failed(e.to_string()),
    }
}

/// Write an executable shell script named `name` into `dir`.
#[cfg(all(test, unix))]
pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let perms = std::fs::Permissions::from_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_accessors() {
        let cap: Capability<u8> = Capability::Available(3);
        assert!(cap.is_available());
        assert_eq!(cap.available(), Some(&3));
        assert_eq!(cap.reason(), None);

        let missing: Capability<u8> = Capability::Unavailable("gone".into());
        assert!(!missing.is_available());
        assert_eq!(missing.available(), None);
        assert_eq!(missing.reason(), Some("gone"));
        assert_eq!(missing.map(|v| v * 2), Capability::Unavailable("gone".into()));
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let cap = discover_binary("stegscan-no-such-tool-0xdeadbeef");
        assert!(!cap.is_available());
        assert!(cap.reason().unwrap().contains("not found"));
        assert!(find_in_path("").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn explicit_path_is_checked_directly() {
        let dir = tempfile::tempdir().unwrap();
        let tool = write_script(dir.path(), "tool", "exit 0");
        assert_eq!(find_in_path(tool.to_str().unwrap()), Some(tool.clone()));
        assert!(find_in_path(dir.path().join("absent").to_str().unwrap()).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("steghide");
        std::fs::write(&plain, b"#!/bin/sh\n").unwrap();
        assert!(find_in_path(plain.to_str().unwrap()).is_none());
        assert!(!discover_binary(plain.to_str().unwrap()).is_available());
        assert!(find_in_path(dir.path().to_str().unwrap()).is_none());
    }

    #[test]
    fn absent_program_reports_binary_absent() {
        let outcome = run_bounded(
            Path::new("/nonexistent/stegscan-tool"),
            ["--version"],
            1,
            "absent",
        );
        assert_eq!(outcome, ProcessOutcome::BinaryAbsent);
        assert!(!outcome.succeeded());
    }

    #[cfg(unix)]
    #[test]
    fn completed_process_captures_output() {
        let Some(sh) = find_in_path("sh") else {
            return;
        };
        let outcome = run_bounded(&sh, ["-c", "echo out; echo err >&2; exit 3"], 5, "sh");
        match outcome {
            ProcessOutcome::Completed {
                exit_code,
                stdout,
                stderr,
            } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stdout.trim(), "out");
                assert_eq!(stderr.trim(), "err");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn slow_process_times_out() {
        let Some(sh) = find_in_path("sh") else {
            return;
        };
        let outcome = run_bounded(&sh, ["-c", "sleep 5"], 1, "sleepy");
        assert_eq!(outcome, ProcessOutcome::TimedOut { seconds: 1 });
    }
}
