use std::time::Duration;

use portr_common::config::ScanConfig;
use portr_common::error::{EngineError, EngineErrorKind};
use portr_common::models::{PortState, ProbeOutcome, ScanRequest, ScanResult};
use portr_common::wire::{ErrorResponse, ScanRequestBody, ScanResponse};
use portr_core::scanner::{ScanEngine, ScanProgress};

use crate::util::{self, LOCALHOST};

fn engine() -> ScanEngine {
    ScanEngine::new(ScanConfig::default().with_probe_timeout(Duration::from_secs(2)))
}

fn states(result: &ScanResult) -> Vec<(u16, PortState)> {
    result.results.iter().map(|o| (o.port, o.state)).collect()
}

/// Real TCP handshakes against listeners bound on 127.0.0.1.
#[tokio::test]
async fn scan_loopback_open_and_closed() {
    let (_first, open_a) = util::open_port().await;
    let (_second, open_b) = util::open_port().await;
    let closed: u16 = util::closed_port().await;

    let expr: String = format!("{open_a},{open_b},{closed}");
    let result: ScanResult = engine()
        .scan(&ScanRequest::new("127.0.0.1", expr))
        .await
        .unwrap();

    assert_eq!(result.results.len(), 3);
    assert!(result.results.windows(2).all(|w| w[0].port < w[1].port));
    let state_of = |port: u16| -> PortState {
        result
            .results
            .iter()
            .find(|o| o.port == port)
            .map(|o| o.state)
            .unwrap()
    };
    assert_eq!(state_of(open_a), PortState::Open);
    assert_eq!(state_of(open_b), PortState::Open);
    assert_eq!(state_of(closed), PortState::Closed);
    assert_eq!(result.address, LOCALHOST);
}

#[tokio::test]
async fn scan_loopback_by_hostname() {
    let (_listener, port) = util::open_port().await;
    let result: ScanResult = engine()
        .scan(&ScanRequest::new("localhost", port.to_string()))
        .await
        .unwrap();

    assert_eq!(result.target, "localhost");
    assert!(result.address.is_loopback());
    assert_eq!(result.results.len(), 1);
}

#[tokio::test]
async fn loopback_scans_are_idempotent() {
    let (_listener, open) = util::open_port().await;
    let closed: u16 = util::closed_port().await;
    let request = ScanRequest::new("127.0.0.1", format!("{open},{closed}"));

    let engine: ScanEngine = engine();
    let first: ScanResult = engine.scan(&request).await.unwrap();
    let second: ScanResult = engine.scan(&request).await.unwrap();
    assert_eq!(states(&first), states(&second));
    assert_eq!(
        first.results.iter().map(|o| &o.service).collect::<Vec<_>>(),
        second.results.iter().map(|o| &o.service).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn independent_scans_run_side_by_side() {
    let (_listener, open) = util::open_port().await;
    let engine: ScanEngine = engine();

    let left = ScanRequest::new("127.0.0.1", open.to_string());
    let right = ScanRequest::new("127.0.0.1", format!("{open},{}", util::closed_port().await));
    let left_progress = ScanProgress::new();
    let right_progress = ScanProgress::new();

    let (a, b) = tokio::join!(
        engine.scan_with_progress(&left, &left_progress),
        engine.scan_with_progress(&right, &right_progress)
    );
    assert_eq!(a.unwrap().results.len(), 1);
    assert_eq!(b.unwrap().results.len(), 2);
    assert_eq!(left_progress.completed(), 1);
    assert_eq!(right_progress.completed(), 2);
    assert_eq!(left_progress.open(), 1);
    assert_eq!(right_progress.open(), 1);
}

#[tokio::test]
async fn wire_round_trip_through_engine() {
    let (_listener, open) = util::open_port().await;
    let body = ScanRequestBody {
        target: "127.0.0.1".into(),
        port_range: Some(open.to_string()),
    };

    let result: ScanResult = engine().scan(&body.into()).await.unwrap();
    let response = ScanResponse::from(&result);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].port, open);
    assert_eq!(response.results[0].state, PortState::Open);
}

#[tokio::test]
async fn wire_errors_carry_detail() {
    let body = ScanRequestBody {
        target: String::new(),
        port_range: None,
    };
    let err: EngineError = engine().scan(&body.into()).await.unwrap_err();
    assert_eq!(err.kind(), EngineErrorKind::InvalidInput);

    let response = ErrorResponse::from(&err);
    assert_eq!(response.status(), 400);
    assert_eq!(response.error, "target is required");
}

#[tokio::test]
async fn every_requested_port_is_reported() {
    let engine: ScanEngine = ScanEngine::new(
        ScanConfig::default()
            .with_concurrency(64)
            .with_probe_timeout(Duration::from_millis(500)),
    );
    for expr in ["1-5", "10,20,30", "1000-1100,1050-1150"] {
        let expected: usize = expr.parse::<portr_common::network::ports::PortSpec>().unwrap().len();
        let result: ScanResult = engine
            .scan(&ScanRequest::new("127.0.0.1", expr))
            .await
            .unwrap();
        assert_eq!(result.results.len(), expected, "expr {expr}");
        assert!(
            result
                .results
                .iter()
                .all(|o: &ProbeOutcome| o.state != PortState::Open || o.error.is_none())
        );
    }
}
