use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use portr_common::config::ScanConfig;
use portr_common::error::ProbeError;
use portr_common::models::{PortState, ScanRequest, ScanResult};
use portr_core::scanner::ScanEngine;

use crate::util::SimulatedProber;

fn engine_with(config: ScanConfig, prober: Arc<SimulatedProber>) -> ScanEngine {
    ScanEngine::with_prober(config, prober)
}

#[tokio::test]
async fn open_closed_filtered_scenario() {
    let prober = Arc::new(
        SimulatedProber::default()
            .with_states([(80, PortState::Open), (82, PortState::Filtered)])
            .with_delays([(82, Duration::from_secs(5))]),
    );
    let config = ScanConfig::default().with_probe_timeout(Duration::from_millis(100));

    let result: ScanResult = engine_with(config, prober)
        .scan(&ScanRequest::new("127.0.0.1", "80-82"))
        .await
        .unwrap();

    let rows: Vec<(u16, PortState, &str)> = result
        .results
        .iter()
        .map(|o| (o.port, o.state, o.service.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (80, PortState::Open, "http"),
            (81, PortState::Closed, "unknown"),
            (82, PortState::Filtered, "unknown"),
        ]
    );
    assert_eq!(
        result.results[2].error,
        Some(ProbeError::Timeout {
            after: Duration::from_millis(100)
        })
    );
}

#[tokio::test]
async fn output_order_ignores_completion_order() {
    let delays: HashMap<u16, Duration> = (1..=40u16)
        .map(|port| (port, Duration::from_millis(2 * u64::from(41 - port))))
        .collect();
    let prober = Arc::new(SimulatedProber::default().with_delays(delays));

    let result: ScanResult = engine_with(ScanConfig::default().with_concurrency(40), prober)
        .scan(&ScanRequest::new("127.0.0.1", "1-40"))
        .await
        .unwrap();
    let ports: Vec<u16> = result.results.iter().map(|o| o.port).collect();
    assert_eq!(ports, (1..=40).collect::<Vec<u16>>());
}

#[tokio::test]
async fn in_flight_probes_stay_within_budget() {
    let prober =
        Arc::new(SimulatedProber::default().with_default_delay(Duration::from_millis(1)));
    let config = ScanConfig::default()
        .with_concurrency(25)
        .with_randomized_order(true);

    let result: ScanResult = engine_with(config, prober.clone())
        .scan(&ScanRequest::new("127.0.0.1", "1-1000"))
        .await
        .unwrap();
    assert_eq!(result.results.len(), 1000);
    assert_eq!(prober.calls(), 1000);
    assert!(prober.peak() <= 25, "peak in flight was {}", prober.peak());
    assert_eq!(prober.in_flight(), 0);
}

#[tokio::test]
async fn global_timeout_bounds_the_scan() {
    let prober = Arc::new(SimulatedProber::default().with_default_delay(Duration::from_secs(5)));
    let config = ScanConfig::default()
        .with_concurrency(10)
        .with_probe_timeout(Duration::from_secs(10))
        .with_global_timeout(Some(Duration::from_millis(50)));

    let started: Instant = Instant::now();
    let result: ScanResult = engine_with(config, prober.clone())
        .scan(&ScanRequest::new("127.0.0.1", "1-100"))
        .await
        .unwrap();
    let elapsed: Duration = started.elapsed();

    assert!(elapsed < Duration::from_millis(1000), "scan took {elapsed:?}");
    assert_eq!(result.results.len(), 100);
    assert!(result.results.iter().all(|o| o.state == PortState::Filtered));
    assert!(
        result
            .results
            .iter()
            .all(|o| o.error == Some(ProbeError::DeadlineExceeded))
    );
    // Only the first wave was ever dispatched, and it was torn down.
    assert!(prober.calls() <= 10);
    assert_eq!(prober.in_flight(), 0);
}
