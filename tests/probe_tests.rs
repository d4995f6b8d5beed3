use host_scan_rs::probe::{probe, probe_addr};
use host_scan_rs::types::PortStatus;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

#[tokio::test]
async fn listening_port_is_open() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let outcome = probe("127.0.0.1", port, Duration::from_millis(500)).await;
    assert_eq!(outcome.port, port);
    assert_eq!(outcome.status, PortStatus::Open);
}

#[tokio::test]
async fn released_port_is_closed() {
    let addr: SocketAddr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let status = probe_addr(addr, Duration::from_millis(500)).await;
    assert_eq!(status, PortStatus::Closed);
}

#[tokio::test]
async fn unresolvable_host_is_not_open() {
    let outcome = probe("no-such-host.invalid", 80, Duration::from_secs(2)).await;
    assert!(matches!(
        outcome.status,
        PortStatus::Error(_) | PortStatus::TimedOut
    ));
}

#[tokio::test]
#[ignore]
async fn blackholed_address_times_out() {
    let addr: SocketAddr = "10.255.255.1:80".parse().unwrap();
    let status = probe_addr(addr, Duration::from_millis(200)).await;
    assert_eq!(status, PortStatus::TimedOut);
}
