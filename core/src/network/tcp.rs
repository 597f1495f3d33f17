use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use portr_common::error::ProbeError;
use portr_common::models::ProbeOutcome;
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout};

use crate::scanner::Prober;

/// Full TCP connect probe. Needs no privileges.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProber;

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: IpAddr, port: u16, probe_timeout: Duration) -> ProbeOutcome {
        handshake_probe(SocketAddr::new(addr, port), probe_timeout).await
    }
}

/// Attempts one handshake with `socket_addr` and classifies the result.
///
/// The stream, if any, is dropped before returning, so the socket is closed
/// on every path.
pub async fn handshake_probe(socket_addr: SocketAddr, probe_timeout: Duration) -> ProbeOutcome {
    let port: u16 = socket_addr.port();
    let started: Instant = Instant::now();

    match timeout(probe_timeout, TcpStream::connect(socket_addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            ProbeOutcome::open(port, started.elapsed())
        }
        Ok(Err(err)) => classify_error(port, err, started.elapsed(), probe_timeout),
        Err(_elapsed) => ProbeOutcome::filtered(
            port,
            started.elapsed(),
            ProbeError::Timeout {
                after: probe_timeout,
            },
        ),
    }
}

fn classify_error(port: u16, err: io::Error, latency: Duration, probe_timeout: Duration) -> ProbeOutcome {
    match err.kind() {
        // An RST in reply to our SYN
        io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => {
            ProbeOutcome::closed(port, latency)
        }
        io::ErrorKind::TimedOut => ProbeOutcome::filtered(
            port,
            latency,
            ProbeError::Timeout {
                after: probe_timeout,
            },
        ),
        _ => ProbeOutcome::filtered(port, latency, ProbeError::from(err)),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
