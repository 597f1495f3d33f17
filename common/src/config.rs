use std::time::Duration;

use crate::error::ScanError;

pub const DEFAULT_CONCURRENCY: usize = 100;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Presentation flags for front-ends.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// 0 prints everything, 1 drops banners and headers, 2 prints results only.
    pub quiet: u8,
    /// Emit the JSON wire format instead of the table.
    pub json: bool,
    /// Also list closed and filtered ports.
    pub show_all: bool,
    pub no_banner: bool,
}

/// Tuning knobs for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Maximum number of probes in flight at any time.
    pub concurrency: usize,
    /// Upper bound for a single connection attempt.
    pub per_probe_timeout: Duration,
    /// Upper bound for the whole scan. Ports not settled by then are `filtered`.
    pub global_timeout: Option<Duration>,
    /// Upper bound for resolving the target hostname.
    pub resolve_timeout: Duration,
    /// Refuse scans larger than this. `None` allows the full port space.
    pub max_ports: Option<usize>,
    /// Extra attempts for a port that came back `filtered`.
    pub retries: u32,
    /// Dispatch ports in random order. Output stays sorted.
    pub randomize_order: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            per_probe_timeout: DEFAULT_PROBE_TIMEOUT,
            global_timeout: None,
            resolve_timeout: DEFAULT_RESOLVE_TIMEOUT,
            max_ports: None,
            retries: 0,
            randomize_order: false,
        }
    }
}

impl ScanConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.per_probe_timeout = timeout;
        self
    }

    pub fn with_global_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.global_timeout = timeout;
        self
    }

    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    pub fn with_max_ports(mut self, max_ports: Option<usize>) -> Self {
        self.max_ports = max_ports;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_randomized_order(mut self, randomize: bool) -> Self {
        self.randomize_order = randomize;
        self
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 {
            return Err(ScanError::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.per_probe_timeout.is_zero() {
            return Err(ScanError::InvalidConfig(
                "probe timeout must be greater than zero".into(),
            ));
        }
        if self.global_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ScanError::InvalidConfig(
                "global timeout must be greater than zero".into(),
            ));
        }
        Ok(())
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

    #[test]
    fn defaults() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.concurrency, 100);
        assert_eq!(cfg.per_probe_timeout, Duration::from_secs(1));
        assert_eq!(cfg.global_timeout, None);
        assert_eq!(cfg.retries, 0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_values() {
        assert!(ScanConfig::default().with_concurrency(0).validate().is_err());
        assert!(
            ScanConfig::default()
                .with_probe_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(
            ScanConfig::default()
                .with_global_timeout(Some(Duration::ZERO))
                .validate()
                .is_err()
        );
    }
}
