//! # Scan Scheduler
//!
//! Fans a [`PortSpec`] out over a fixed pool of workers.
//!
//! Each worker pulls the next port from a shared cursor, probes it under the
//! per-probe timeout and sends the outcome to a single collector. The
//! collector owns the port → outcome map, so no locking is needed. When the
//! global deadline passes the pool is aborted, dropping any in-flight
//! connection, and every unsettled port is reported as `filtered`.
//!
//! The deadline is taken before the target is resolved, so a slow resolver
//! eats into the same budget as the probes.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use portr_common::config::ScanConfig;
use portr_common::error::{ProbeError, ScanError};
use portr_common::models::{PortState, ProbeOutcome};
use portr_common::network::ports::PortSpec;
use rand::seq::SliceRandom;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, warn};

use super::Prober;
use super::progress::ScanProgress;
use super::resolver;

pub struct ScanScheduler {
    config: ScanConfig,
    prober: Arc<dyn Prober>,
}

impl ScanScheduler {
    pub fn new(config: ScanConfig, prober: Arc<dyn Prober>) -> Self {
        Self { config, prober }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The instant a scan starting now must be finished by, if it is bounded.
    pub fn deadline(&self) -> Option<Instant> {
        self.config.global_timeout.map(|limit| Instant::now() + limit)
    }

    /// Resolves `host` and probes every port in `ports`.
    ///
    /// Returns exactly one outcome per port, ascending by port.
    pub async fn run(&self, host: &str, ports: &PortSpec) -> Result<Vec<ProbeOutcome>, ScanError> {
        let deadline: Option<Instant> = self.deadline();
        let addr: IpAddr = self.prepare(host, ports, deadline).await?;
        Ok(self.sweep(addr, ports, deadline, &ScanProgress::new()).await)
    }

    /// Checks the configuration and the scan size, then resolves `host`.
    ///
    /// The lookup gets whichever is shorter: the resolve timeout or what is
    /// left until `deadline`.
    pub async fn prepare(
        &self,
        host: &str,
        ports: &PortSpec,
        deadline: Option<Instant>,
    ) -> Result<IpAddr, ScanError> {
        self.config.validate()?;
        if ports.is_empty() {
            return Err(ScanError::NoPorts);
        }
        if let Some(limit) = self.config.max_ports
            && ports.len() > limit
        {
            return Err(ScanError::TooManyPorts {
                requested: ports.len(),
                limit,
            });
        }
        let limit: Duration = match deadline {
            Some(deadline) => self
                .config
                .resolve_timeout
                .min(deadline.saturating_duration_since(Instant::now())),
            None => self.config.resolve_timeout,
        };
        resolver::resolve_target(host, limit).await
    }

    /// Probes every port of `ports` on `addr`. Never fails: ports that could
    /// not be settled come back `filtered` with the reason attached.
    pub async fn sweep(
        &self,
        addr: IpAddr,
        ports: &PortSpec,
        deadline: Option<Instant>,
        progress: &ScanProgress,
    ) -> Vec<ProbeOutcome> {
        let started: Instant = Instant::now();
        progress.start(ports.len());

        if ports.is_empty() {
            return Vec::new();
        }

        let mut order: Vec<u16> = ports.as_slice().to_vec();
        if self.config.randomize_order {
            order.shuffle(&mut rand::rng());
        }

        let queue: Arc<WorkQueue> = Arc::new(WorkQueue::new(order));
        let worker_count: usize = self.config.concurrency.clamp(1, ports.len());
        let (tx, mut rx) = mpsc::channel::<ProbeOutcome>(worker_count);

        let mut workers: JoinSet<()> = JoinSet::new();
        for _ in 0..worker_count {
            let worker = Worker {
                addr,
                queue: queue.clone(),
                prober: self.prober.clone(),
                probe_timeout: self.config.per_probe_timeout,
                retries: self.config.retries,
                tx: tx.clone(),
            };
            workers.spawn(worker.run());
        }
        drop(tx);
        debug!("Dispatching {} ports to {addr} over {worker_count} workers", ports.len());

        let mut slots: BTreeMap<u16, ProbeOutcome> = BTreeMap::new();
        let collect = async {
            while let Some(outcome) = rx.recv().await {
                store(&mut slots, ports, outcome, progress);
            }
        };

        let deadline_hit: bool = match deadline {
            Some(deadline) => timeout_at(deadline, collect).await.is_err(),
            None => {
                collect.await;
                false
            }
        };

        workers.shutdown().await;
        // Outcomes that were queued before the pool went down still count.
        while let Ok(outcome) = rx.try_recv() {
            store(&mut slots, ports, outcome, progress);
        }

        let missing: usize = ports.len() - slots.len();
        if missing > 0 {
            let elapsed: Duration = started.elapsed();
            let reason: ProbeError = if deadline_hit {
                warn!(
                    "Scan deadline reached after {}ms, {missing} ports left unsettled",
                    elapsed.as_millis()
                );
                ProbeError::DeadlineExceeded
            } else {
                warn!("{missing} ports were lost by failed workers");
                ProbeError::Io {
                    kind: "Other".into(),
                    message: "probe worker stopped unexpectedly".into(),
                }
            };
            for port in ports {
                if !slots.contains_key(&port) {
                    let outcome = ProbeOutcome::filtered(port, elapsed, reason.clone());
                    store(&mut slots, ports, outcome, progress);
                }
            }
        }

        slots.into_values().collect()
    }
}

/// Writes `outcome` into its port's slot. First write wins.
fn store(
    slots: &mut BTreeMap<u16, ProbeOutcome>,
    ports: &PortSpec,
    outcome: ProbeOutcome,
    progress: &ScanProgress,
) {
    if !ports.contains(outcome.port) || slots.contains_key(&outcome.port) {
        debug!("Discarding stray outcome for port {}", outcome.port);
        return;
    }
    progress.record(&outcome);
    slots.insert(outcome.port, outcome);
}

/// Ports waiting to be probed, handed out one at a time.
struct WorkQueue {
    ports: Vec<u16>,
    cursor: AtomicUsize,
}

impl WorkQueue {
    fn new(ports: Vec<u16>) -> Self {
        Self {
            ports,
            cursor: AtomicUsize::new(0),
        }
    }

    fn next(&self) -> Option<u16> {
        let idx: usize = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.ports.get(idx).copied()
    }
}

struct Worker {
    addr: IpAddr,
    queue: Arc<WorkQueue>,
    prober: Arc<dyn Prober>,
    probe_timeout: Duration,
    retries: u32,
    tx: mpsc::Sender<ProbeOutcome>,
}

impl Worker {
    async fn run(self) {
        while let Some(port) = self.queue.next() {
            let outcome: ProbeOutcome = self.probe_with_retries(port).await;
            if self.tx.send(outcome).await.is_err() {
                break;
            }
        }
    }

    async fn probe_with_retries(&self, port: u16) -> ProbeOutcome {
        let mut outcome: ProbeOutcome = self.probe_once(port).await;
        let mut attempt: u32 = 0;
        while outcome.state == PortState::Filtered && attempt < self.retries {
            attempt += 1;
            debug!("Retrying port {port} (attempt {attempt} of {})", self.retries);
            outcome = self.probe_once(port).await;
        }
        outcome
    }

    /// The prober is trusted to honour the timeout, but is also cut off here.
    async fn probe_once(&self, port: u16) -> ProbeOutcome {
        let started: Instant = Instant::now();
        let probe = self.prober.probe(self.addr, port, self.probe_timeout);
        let outcome: ProbeOutcome = match timeout(self.probe_timeout, probe).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => ProbeOutcome::filtered(
                port,
                started.elapsed(),
                ProbeError::Timeout {
                    after: self.probe_timeout,
                },
            ),
        };
        debug!(
            "{}:{port} is {} ({}ms)",
            self.addr,
            outcome.state,
            outcome.latency.as_millis()
        );
        outcome
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
