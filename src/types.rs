use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::ops::RangeInclusive;
use std::time::Duration;

pub const DEFAULT_START_PORT: u16 = 1;
pub const DEFAULT_END_PORT: u16 = 65535;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_CONCURRENCY: usize = 1000;

/// Parameters of one scan invocation. Not mutated once the scan begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub host: String,
    pub start_port: u16,
    pub end_port: u16,
    pub timeout: Duration,
    pub concurrency: usize,
}

impl ScanRequest {
    pub fn new(
        host: impl Into<String>,
        start_port: u16,
        end_port: u16,
        timeout: Duration,
        concurrency: usize,
    ) -> Self {
        Self {
            host: host.into(),
            start_port,
            end_port,
            timeout,
            concurrency,
        }
    }

    /// Inclusive port range covered by this request.
    pub fn ports(&self) -> RangeInclusive<u16> {
        self.start_port..=self.end_port
    }

    /// Number of ports in the range; zero when the bounds are inverted.
    pub fn total(&self) -> u64 {
        if self.start_port > self.end_port {
            0
        } else {
            u64::from(self.end_port - self.start_port) + 1
        }
    }
}

/// Classified result of a single connect attempt.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum PortStatus {
    Open,
    Closed,
    TimedOut,
    Error(String),
}

impl PortStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, PortStatus::Open)
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortStatus::Open => write!(f, "open"),
            PortStatus::Closed => write!(f, "closed"),
            PortStatus::TimedOut => write!(f, "timed out"),
            PortStatus::Error(detail) => write!(f, "error: {detail}"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PortOutcome {
    pub port: u16,
    pub status: PortStatus,
}

/// Emitted once per resolved port; `completed` climbs from 1 to `total`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub completed: u64,
    pub total: u64,
}

/// Counts of the non-open outcomes, kept for diagnostics only.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub open: u64,
    pub closed: u64,
    pub timed_out: u64,
    pub errors: u64,
}

impl ScanSummary {
    pub fn record(&mut self, status: &PortStatus) {
        match status {
            PortStatus::Open => self.open += 1,
            PortStatus::Closed => self.closed += 1,
            PortStatus::TimedOut => self.timed_out += 1,
            PortStatus::Error(_) => self.errors += 1,
        }
    }
}

/// Final result of a completed scan. `open_ports` is strictly ascending.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub host: String,
    pub address: IpAddr,
    pub total: u64,
    pub open_ports: Vec<u16>,
    pub summary: ScanSummary,
    pub elapsed_ms: u64,
    pub finished_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_counts_inclusive_range() {
        let req = ScanRequest::new("localhost", 1, 10, DEFAULT_TIMEOUT, 5);
        assert_eq!(req.total(), 10);
        assert_eq!(req.ports().count(), 10);

        let full = ScanRequest::new("localhost", 1, 65535, DEFAULT_TIMEOUT, 5);
        assert_eq!(full.total(), 65535);
    }

    #[test]
    fn inverted_range_has_no_ports() {
        let req = ScanRequest::new("localhost", 100, 1, DEFAULT_TIMEOUT, 5);
        assert_eq!(req.total(), 0);
    }

    #[test]
    fn only_open_counts_as_open() {
        assert!(PortStatus::Open.is_open());
        assert!(!PortStatus::Closed.is_open());
        assert!(!PortStatus::TimedOut.is_open());
        assert!(!PortStatus::Error("unreachable".into()).is_open());
    }

    #[test]
    fn summary_records_each_status() {
        let mut summary = ScanSummary::default();
        summary.record(&PortStatus::Open);
        summary.record(&PortStatus::Closed);
        summary.record(&PortStatus::Closed);
        summary.record(&PortStatus::TimedOut);
        summary.record(&PortStatus::Error("x".into()));
        assert_eq!(
            summary,
            ScanSummary { open: 1, closed: 2, timed_out: 1, errors: 1 }
        );
    }
}
