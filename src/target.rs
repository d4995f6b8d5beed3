use crate::error::ScanError;
use crate::types::ScanRequest;
use std::net::IpAddr;
use tokio::net::lookup_host;

/// Check the request bounds before any network activity.
///
/// - ports must lie in 1..=65535 and `start_port <= end_port`
/// - timeout and concurrency must be non-zero
pub fn validate(req: &ScanRequest) -> Result<(), ScanError> {
    for port in [req.start_port, req.end_port] {
        if port == 0 {
            return Err(ScanError::InvalidPort(port));
        }
    }
    if req.start_port > req.end_port {
        return Err(ScanError::InvalidRange {
            start: req.start_port,
            end: req.end_port,
        });
    }
    if req.timeout.is_zero() {
        return Err(ScanError::InvalidTimeout(req.timeout));
    }
    if req.concurrency == 0 {
        return Err(ScanError::InvalidConcurrency);
    }
    Ok(())
}

/// Resolve a hostname or IP literal to a single address, preferring IPv4.
pub async fn resolve_host(host: &str) -> Result<IpAddr, ScanError> {
    let host = host.trim();
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let resolve_err = |reason: String| ScanError::Resolve {
        host: host.to_string(),
        reason,
    };
    if host.is_empty() {
        return Err(resolve_err("empty host".into()));
    }

    let addrs: Vec<IpAddr> = lookup_host((host, 0))
        .await
        .map_err(|e| resolve_err(e.to_string()))?
        .map(|sa| sa.ip())
        .collect();

    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| resolve_err("no addresses returned".into()))
}
