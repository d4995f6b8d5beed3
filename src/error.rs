use std::time::Duration;
use thiserror::Error;

/// Errors that stop a scan. Per-port failures are never errors; they are
/// recorded as a [`PortStatus`](crate::types::PortStatus).
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("port {0} is out of range (1-65535)")]
    InvalidPort(u16),

    #[error("start port {start} cannot be greater than end port {end}")]
    InvalidRange { start: u16, end: u16 },

    #[error("timeout must be greater than 0 (got {0:?})")]
    InvalidTimeout(Duration),

    #[error("concurrency must be greater than 0")]
    InvalidConcurrency,

    #[error("cannot resolve host {host}: {reason}")]
    Resolve { host: String, reason: String },

    #[error("scan interrupted")]
    Interrupted,
}

impl ScanError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ScanError::Interrupted)
    }
}
