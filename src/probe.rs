use crate::types::{PortOutcome, PortStatus};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;

/// One TCP connect attempt to `host:port` bounded by `timeout`.
///
/// The host is resolved as part of the attempt, so a lookup failure comes
/// back as [`PortStatus::Error`]. The engine resolves once up front and calls
/// [`probe_addr`] instead.
pub async fn probe(host: &str, port: u16, timeout: Duration) -> PortOutcome {
    let status = match time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(res) => classify(res),
        Err(_elapsed) => PortStatus::TimedOut,
    };
    PortOutcome { port, status }
}

/// Connect attempt against an already resolved address.
///
/// On success the stream is dropped right away; nothing is sent or read and
/// close failures are not observable.
pub async fn probe_addr(addr: SocketAddr, timeout: Duration) -> PortStatus {
    match time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(res) => classify(res),
        Err(_elapsed) => PortStatus::TimedOut,
    }
}

fn classify(res: io::Result<TcpStream>) -> PortStatus {
    match res {
        Ok(stream) => {
            drop(stream);
            PortStatus::Open
        }
        Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => PortStatus::Closed,
        Err(e) if e.kind() == io::ErrorKind::TimedOut => PortStatus::TimedOut,
        Err(e) => PortStatus::Error(e.to_string()),
    }
}
