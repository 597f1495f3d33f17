//! The central **abstraction** for port scanning operations.
//!
//! This module defines the [`Prober`] seam that concrete transports (such as
//! the TCP connect prober in [`crate::network::tcp`]) implement, and the
//! [`ScanEngine`] facade that front-ends call.
//!
//! **Architectural Note:**
//! Front-ends should depend on [`ScanEngine`] only. The engine validates the
//! request, hands the port set to the [`ScanScheduler`] and stamps the
//! result; it never retries anything itself.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portr_common::config::ScanConfig;
use portr_common::error::EngineError;
use portr_common::models::{PortState, ProbeOutcome, ScanRequest, ScanResult};
use portr_common::network::ports::PortSpec;
use portr_common::network::target::Target;
use tokio::time::Instant;
use tracing::info;

use crate::network::tcp::TcpProber;

mod progress;
mod resolver;
mod scheduler;

pub use progress::ScanProgress;
pub use scheduler::ScanScheduler;

/// Defines the strategy for probing one transport-layer port.
///
/// Implementations must settle within `timeout` where they can, release any
/// socket they open before returning, and never panic on network errors:
/// every failure is expressed through the returned [`ProbeOutcome`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: IpAddr, port: u16, timeout: Duration) -> ProbeOutcome;
}

/// Entry point for running scans.
pub struct ScanEngine {
    scheduler: ScanScheduler,
}

impl ScanEngine {
    /// An engine probing with full TCP handshakes.
    pub fn new(config: ScanConfig) -> Self {
        Self::with_prober(config, Arc::new(TcpProber))
    }

    pub fn with_prober(config: ScanConfig, prober: Arc<dyn Prober>) -> Self {
        Self {
            scheduler: ScanScheduler::new(config, prober),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        self.scheduler.config()
    }

    pub async fn scan(&self, request: &ScanRequest) -> Result<ScanResult, EngineError> {
        self.scan_with_progress(request, &ScanProgress::new()).await
    }

    /// Like [`ScanEngine::scan`], reporting into a caller-owned `progress`.
    pub async fn scan_with_progress(
        &self,
        request: &ScanRequest,
        progress: &ScanProgress,
    ) -> Result<ScanResult, EngineError> {
        if request.target.trim().is_empty() {
            return Err(EngineError::InvalidInput("target is required".into()));
        }
        let target: Target = request
            .target
            .parse()
            .map_err(|e| EngineError::InvalidInput(format!("invalid target: {e}")))?;
        let ports: PortSpec = request.port_range.parse()?;

        let started_at: DateTime<Utc> = Utc::now();
        let deadline: Option<Instant> = self.scheduler.deadline();
        let addr: IpAddr = self.scheduler.prepare(&target.host(), &ports, deadline).await?;
        info!("Scanning {} ports on {target} ({addr})", ports.len());

        let results: Vec<ProbeOutcome> =
            self.scheduler.sweep(addr, &ports, deadline, progress).await;
        let completed_at: DateTime<Utc> = Utc::now();

        let result = ScanResult {
            target: target.to_string(),
            address: addr,
            results,
            started_at,
            completed_at,
        };
        info!(
            "Scan of {target} finished: {} open, {} closed, {} filtered",
            result.count(PortState::Open),
            result.count(PortState::Closed),
            result.count(PortState::Filtered)
        );
        Ok(result)
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

#[cfg(test)]
mod tests {
    use super::*;
    use portr_common::error::{EngineErrorKind, ParseErrorReason, ProbeError};

    /// 80 accepts, 81 refuses, everything else hangs.
    struct FixtureProber;

    #[async_trait]
    impl Prober for FixtureProber {
        async fn probe(&self, _addr: IpAddr, port: u16, timeout: Duration) -> ProbeOutcome {
            match port {
                80 => ProbeOutcome::open(port, Duration::from_millis(1)),
                81 => ProbeOutcome::closed(port, Duration::from_millis(1)),
                _ => {
                    tokio::time::sleep(timeout).await;
                    ProbeOutcome::filtered(port, timeout, ProbeError::Timeout { after: timeout })
                }
            }
        }
    }

    fn engine() -> ScanEngine {
        let config = ScanConfig::default().with_probe_timeout(Duration::from_millis(20));
        ScanEngine::with_prober(config, Arc::new(FixtureProber))
    }

    fn summary(result: &ScanResult) -> Vec<(u16, PortState, &str)> {
        result
            .results
            .iter()
            .map(|o| (o.port, o.state, o.service.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn classifies_open_closed_filtered() {
        let request = ScanRequest::new("127.0.0.1", "80-82");
        let result: ScanResult = engine().scan(&request).await.unwrap();

        assert_eq!(
            summary(&result),
            vec![
                (80, PortState::Open, "http"),
                (81, PortState::Closed, "unknown"),
                (82, PortState::Filtered, "unknown"),
            ]
        );
        assert!(result.results[2].error.as_ref().is_some_and(ProbeError::is_timeout));
        assert_eq!(result.target, "127.0.0.1");
        assert!(result.address.is_loopback());
        assert!(result.started_at <= result.completed_at);
    }

    #[tokio::test]
    async fn repeated_scans_agree() {
        let engine: ScanEngine = engine();
        let request = ScanRequest::new("127.0.0.1", "79-83");
        let first: ScanResult = engine.scan(&request).await.unwrap();
        let second: ScanResult = engine.scan(&request).await.unwrap();
        assert_eq!(summary(&first), summary(&second));
    }

    #[tokio::test]
    async fn rejects_missing_target() {
        let err: EngineError = engine()
            .scan(&ScanRequest::new("  ", "80"))
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidInput("target is required".into()));
        assert_eq!(err.kind(), EngineErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn rejects_malformed_target() {
        let err: EngineError = engine()
            .scan(&ScanRequest::new("not a host", "80"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), EngineErrorKind::InvalidInput);
        assert!(err.detail().starts_with("invalid target"));
    }

    #[tokio::test]
    async fn rejects_bad_port_range() {
        for expr in ["", "0", "70000", "10-5", "abc"] {
            let err: EngineError = engine()
                .scan(&ScanRequest::new("127.0.0.1", expr))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), EngineErrorKind::InvalidInput, "expr {expr:?}");
        }

        let err: EngineError = engine()
            .scan(&ScanRequest::new("127.0.0.1", "10-5"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Parse(ref p) if p.reason == ParseErrorReason::ReversedRange
        ));
    }

    #[tokio::test]
    async fn unresolvable_target_fails_the_scan() {
        let err: EngineError = engine()
            .scan(&ScanRequest::new("no-such-host.invalid", "80"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), EngineErrorKind::ScanFailed);
    }

    #[tokio::test]
    async fn global_timeout_covers_resolution() {
        let config = ScanConfig::default()
            .with_resolve_timeout(Duration::from_secs(5))
            .with_global_timeout(Some(Duration::from_millis(50)));
        let engine = ScanEngine::with_prober(config, Arc::new(FixtureProber));
        assert_eq!(engine.config().resolve_timeout, Duration::from_secs(5));

        let started = std::time::Instant::now();
        let err: EngineError = engine
            .scan(&ScanRequest::new("no-such-host.invalid", "80"))
            .await
            .unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(err.kind(), EngineErrorKind::ScanFailed);
    }

    #[tokio::test]
    async fn bracketed_ipv6_target_is_scanned() {
        let result: ScanResult = engine()
            .scan(&ScanRequest::new("[::1]", "80"))
            .await
            .unwrap();
        assert_eq!(result.target, "::1");
        assert_eq!(result.address, IpAddr::V6(std::net::Ipv6Addr::LOCALHOST));
        assert_eq!(result.results[0].state, PortState::Open);
    }
}
