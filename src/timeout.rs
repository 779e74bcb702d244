//! Time boxes for external collaborators.
//!
//! The engine itself is synchronous. External processes are driven on a
//! throwaway current-thread runtime so that a hung tool can be abandoned
//! (and killed) once its budget is spent.

use crate::error::{Result, StegError};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Hard limit for the passphrase probe.
pub const PROBE_TIMEOUT_SECONDS: u64 = 15;

/// Limit for the signature scanner.
pub const SCANNER_TIMEOUT_SECONDS: u64 = 60;

/// Timeout configuration for a bounded operation
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Maximum duration for the operation
    pub duration: Duration,
    /// Operation name for logging
    pub operation_name: String,
}

impl TimeoutConfig {
    /// Create a new timeout configuration
    pub fn new(seconds: u64, operation: impl Into<String>) -> Self {
        Self {
            duration: Duration::from_secs(seconds),
            operation_name: operation.into(),
        }
    }
}

/// Execute an async operation with a timeout
pub async fn with_timeout<T, F>(config: TimeoutConfig, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    debug!(
        "Starting operation '{}' with timeout of {}s",
        config.operation_name,
        config.duration.as_secs()
    );

    match timeout(config.duration, future).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                "Operation '{}' timed out after {}s",
                config.operation_name,
                config.duration.as_secs()
            );
            Err(StegError::Timeout {
                operation: config.operation_name,
                seconds: config.duration.as_secs(),
            })
        }
    }
}

/// Run `future` to completion under `config` on a private current-thread runtime.
pub fn block_on_with_timeout<T, F>(config: TimeoutConfig, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(with_timeout(config, future))
}
