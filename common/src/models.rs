//! # Scan Models
//!
//! The values that flow through a scan: the request coming in, one
//! [`ProbeOutcome`] per port, and the final [`ScanResult`].

use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProbeError;
use crate::network::ports::DEFAULT_PORT_RANGE;
use crate::network::service;

/// Classification of a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// The handshake completed.
    Open,
    /// The peer explicitly refused the connection.
    Closed,
    /// No definitive answer (timeout, silent drop, unreachable).
    Filtered,
}

impl PortState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Filtered => "filtered",
        }
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// What a scan was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub target: String,
    pub port_range: String,
}

impl ScanRequest {
    pub fn new(target: impl Into<String>, port_range: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            port_range: port_range.into(),
        }
    }

    /// A request over [`DEFAULT_PORT_RANGE`].
    pub fn with_default_range(target: impl Into<String>) -> Self {
        Self::new(target, DEFAULT_PORT_RANGE)
    }
}

/// The classified result of probing one port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub port: u16,
    pub state: PortState,
    pub service: String,
    pub latency: Duration,
    pub error: Option<ProbeError>,
}

impl ProbeOutcome {
    pub fn open(port: u16, latency: Duration) -> Self {
        Self::new(port, PortState::Open, latency, None)
    }

    pub fn closed(port: u16, latency: Duration) -> Self {
        Self::new(port, PortState::Closed, latency, None)
    }

    pub fn filtered(port: u16, latency: Duration, error: ProbeError) -> Self {
        Self::new(port, PortState::Filtered, latency, Some(error))
    }

    fn new(port: u16, state: PortState, latency: Duration, error: Option<ProbeError>) -> Self {
        Self {
            port,
            state,
            service: service::lookup(port).to_string(),
            latency,
            error,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == PortState::Open
    }
}

/// The terminal artifact of a scan. `results` is ascending by port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub target: String,
    pub address: IpAddr,
    pub results: Vec<ProbeOutcome>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl ScanResult {
    pub fn open_ports(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.results.iter().filter(|outcome| outcome.is_open())
    }

    pub fn count(&self, state: PortState) -> usize {
        self.results.iter().filter(|o| o.state == state).count()
    }

    pub fn elapsed(&self) -> Duration {
        (self.completed_at - self.started_at)
            .to_std()
            .unwrap_or_default()
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
