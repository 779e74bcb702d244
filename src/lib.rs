//! Heuristic detection of steganographic payloads and appended archives.
//!
//! A single file is run through a fixed set of independent analyzers
//! (entropy, archive signatures, trailing data, structural checks, LSB
//! distribution and two optional external tools) and the evidence is folded
//! into one JSON [`report::Report`] with a `suspicious` verdict.

/// Configuration and policy presets
pub mod config;
/// Detection pipeline
pub mod engine;
/// Entropy and chunked distribution analysis
pub mod entropy;
/// Error types
pub mod error;
/// Logging and tracing initialization
pub mod logging;
/// Least-significant-bit distribution analysis
pub mod lsb;
/// Trailing data after end-of-format markers
pub mod overlay;
/// Embedded archive patterns
pub mod patterns;
/// External collaborator adapters
pub mod probes;
/// Report model
pub mod report;
/// Scoring and verdict
pub mod score;
/// Byte signature tables
pub mod signatures;
/// Structural validation of image containers
pub mod structure;
/// Time boxes for external processes
pub mod timeout;

pub use config::{PolicyConfig, PolicyPreset, ScanConfig};
pub use engine::{Collaborators, Engine};
pub use error::{Result, StegError};
pub use report::{Report, ReportError};
