use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use portr_common::error::ProbeError;
use portr_common::models::{PortState, ProbeOutcome};
use portr_core::scanner::Prober;
use tokio::net::TcpListener;

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Binds a loopback listener on an ephemeral port.
pub async fn open_port() -> (TcpListener, u16) {
    let listener: TcpListener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let port: u16 = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A loopback port that was just released, so connecting to it is refused.
pub async fn closed_port() -> u16 {
    let (_listener, port) = open_port().await;
    port
}

/// Prober with scripted answers, per-port delays and in-flight accounting.
#[derive(Default)]
pub struct SimulatedProber {
    states: HashMap<u16, PortState>,
    delays: HashMap<u16, Duration>,
    default_delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl SimulatedProber {
    /// Ports not listed answer `closed`.
    pub fn with_states(mut self, states: impl IntoIterator<Item = (u16, PortState)>) -> Self {
        self.states.extend(states);
        self
    }

    pub fn with_delays(mut self, delays: impl IntoIterator<Item = (u16, Duration)>) -> Self {
        self.delays.extend(delays);
        self
    }

    /// Delay for every port without its own entry.
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    /// Probes currently running. Zero once every probe finished or was dropped.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Prober for SimulatedProber {
    async fn probe(&self, _addr: IpAddr, port: u16, timeout: Duration) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now: usize = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay: Option<Duration> = self.delays.get(&port).copied().or(self.default_delay);
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        match self.states.get(&port).copied().unwrap_or(PortState::Closed) {
            PortState::Open => ProbeOutcome::open(port, Duration::ZERO),
            PortState::Closed => ProbeOutcome::closed(port, Duration::ZERO),
            PortState::Filtered => {
                ProbeOutcome::filtered(port, Duration::ZERO, ProbeError::Timeout { after: timeout })
            }
        }
    }
}
