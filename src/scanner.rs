use crate::error::ScanError;
use crate::probe::probe_addr;
use crate::target::{resolve_host, validate};
use crate::types::{PortOutcome, PortStatus, ProgressEvent, ScanRequest, ScanResult, ScanSummary};
use ::time::{format_description::well_known, OffsetDateTime};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Scan every port of `request` on its host with asynchronous TCP connects.
///
/// - Validates the request and resolves the host once before any probe runs.
/// - Limits concurrent connect attempts using a `Semaphore`.
/// - Calls `on_progress` once per resolved port.
/// - Returns the open ports sorted ascending.
pub async fn scan<P>(request: &ScanRequest, on_progress: P) -> Result<ScanResult, ScanError>
where
    P: FnMut(ProgressEvent),
{
    scan_with_cancel(request, CancellationToken::new(), on_progress).await
}

/// Variant that accepts a `CancellationToken` to allow external cancellation.
///
/// A cancelled scan returns [`ScanError::Interrupted`] and no partial result.
pub async fn scan_with_cancel<P>(
    request: &ScanRequest,
    cancel: CancellationToken,
    on_progress: P,
) -> Result<ScanResult, ScanError>
where
    P: FnMut(ProgressEvent),
{
    validate(request)?;
    let address = resolve_host(&request.host).await?;
    scan_with_prober(request, address, cancel, probe_addr, on_progress).await
}

/// Core scheduler, generic over the connect attempt.
///
/// Completions are drained on the calling task, so the progress counter and
/// the open-port set are only ever touched by one consumer.
pub async fn scan_with_prober<F, Fut, P>(
    request: &ScanRequest,
    address: IpAddr,
    cancel: CancellationToken,
    prober: F,
    mut on_progress: P,
) -> Result<ScanResult, ScanError>
where
    F: Fn(SocketAddr, Duration) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PortStatus> + Send + 'static,
    P: FnMut(ProgressEvent),
{
    validate(request)?;

    let total = request.total();
    let timeout = request.timeout;
    let started = Instant::now();
    info!(
        host = %request.host,
        %address,
        start = request.start_port,
        end = request.end_port,
        concurrency = request.concurrency,
        timeout_ms = timeout.as_millis() as u64,
        "starting scan"
    );

    // A gate wider than the range never becomes the bottleneck.
    let permits = request.concurrency.min(total as usize);
    let sem = Arc::new(Semaphore::new(permits));
    let prober = Arc::new(prober);
    let mut set: JoinSet<PortOutcome> = JoinSet::new();

    let mut ports = request.ports();
    let mut next = ports.next();
    let mut completed = 0u64;
    let mut open_ports: Vec<u16> = Vec::new();
    let mut summary = ScanSummary::default();

    while next.is_some() || !set.is_empty() {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                // Abort in-flight connects and wait for their sockets to drop.
                set.shutdown().await;
                info!(completed, total, "scan interrupted");
                return Err(ScanError::Interrupted);
            }

            Some(joined) = set.join_next(), if !set.is_empty() => {
                let outcome = match joined {
                    Ok(outcome) => outcome,
                    Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                    Err(e) => {
                        warn!(error = %e, "probe task ended without an outcome");
                        continue;
                    }
                };

                summary.record(&outcome.status);
                match &outcome.status {
                    PortStatus::Open => {
                        debug!(port = outcome.port, "port open");
                        open_ports.push(outcome.port);
                    }
                    status => debug!(port = outcome.port, %status, "port not open"),
                }

                completed += 1;
                on_progress(ProgressEvent { completed, total });
            }

            Ok(permit) = sem.clone().acquire_owned(), if next.is_some() => {
                if let Some(port) = next.take() {
                    let prober = prober.clone();
                    set.spawn(async move {
                        let _permit = permit; // keep permit until the probe resolves
                        let status = (*prober)(SocketAddr::new(address, port), timeout).await;
                        PortOutcome { port, status }
                    });
                    next = ports.next();
                }
            }
        }
    }

    open_ports.sort_unstable();
    open_ports.dedup();

    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        total,
        open = summary.open,
        closed = summary.closed,
        timed_out = summary.timed_out,
        errors = summary.errors,
        elapsed_ms,
        "scan finished"
    );

    Ok(ScanResult {
        host: request.host.clone(),
        address,
        total,
        open_ports,
        summary,
        elapsed_ms,
        finished_at: now_rfc3339(),
    })
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    async fn open_on_even(addr: SocketAddr, _timeout: Duration) -> PortStatus {
        if addr.port() % 2 == 0 {
            PortStatus::Open
        } else {
            PortStatus::Closed
        }
    }

    #[tokio::test]
    async fn collects_even_ports_in_order() {
        let req = ScanRequest::new("127.0.0.1", 1, 20, Duration::from_millis(50), 3);
        let res = scan_with_prober(&req, LOCALHOST, CancellationToken::new(), open_on_even, |_| {})
            .await
            .unwrap();
        assert_eq!(res.open_ports, vec![2, 4, 6, 8, 10, 12, 14, 16, 18, 20]);
        assert_eq!(res.summary.open, 10);
        assert_eq!(res.summary.closed, 10);
        assert_eq!(res.total, 20);
    }

    #[tokio::test]
    async fn concurrency_above_range_size_still_completes() {
        let req = ScanRequest::new("127.0.0.1", 5, 7, Duration::from_millis(50), 10_000);
        let mut events = Vec::new();
        let res = scan_with_prober(&req, LOCALHOST, CancellationToken::new(), open_on_even, |e| {
            events.push(e)
        })
        .await
        .unwrap();
        assert_eq!(res.open_ports, vec![6]);
        assert_eq!(events.len(), 3);
        assert_eq!(events.last().copied(), Some(ProgressEvent { completed: 3, total: 3 }));
    }

    #[tokio::test]
    async fn already_cancelled_scan_returns_interrupted() {
        let req = ScanRequest::new("127.0.0.1", 1, 100, Duration::from_millis(50), 10);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = scan_with_prober(&req, LOCALHOST, cancel, open_on_even, |_| {})
            .await
            .unwrap_err();
        assert!(err.is_interrupted());
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let ts = now_rfc3339();
        assert!(ts.contains('T'));
        assert!(ts.ends_with('Z'));
    }
}
