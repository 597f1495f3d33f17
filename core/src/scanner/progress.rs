use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use portr_common::models::ProbeOutcome;

type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Counters for a single scan.
///
/// Cloning shares the counters, so a front-end can keep one handle while the
/// scheduler updates another. Each scan should get its own instance.
#[derive(Clone, Default)]
pub struct ScanProgress {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    total: AtomicUsize,
    completed: AtomicUsize,
    open: AtomicUsize,
    on_progress: Option<ProgressCallback>,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls `callback(completed, total)` after every settled port.
    pub fn with_callback<F>(callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                on_progress: Some(Box::new(callback)),
                ..Inner::default()
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.inner.total.load(Ordering::Relaxed)
    }

    pub fn completed(&self) -> usize {
        self.inner.completed.load(Ordering::Relaxed)
    }

    pub fn open(&self) -> usize {
        self.inner.open.load(Ordering::Relaxed)
    }

    pub(crate) fn start(&self, total: usize) {
        self.inner.total.store(total, Ordering::Relaxed);
        self.inner.completed.store(0, Ordering::Relaxed);
        self.inner.open.store(0, Ordering::Relaxed);
    }

    pub(crate) fn record(&self, outcome: &ProbeOutcome) {
        if outcome.is_open() {
            self.inner.open.fetch_add(1, Ordering::Relaxed);
        }
        let completed: usize = self.inner.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(callback) = &self.inner.on_progress {
            callback(completed, self.total());
        }
    }
}

impl fmt::Debug for ScanProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanProgress")
            .field("total", &self.total())
            .field("completed", &self.completed())
            .field("open", &self.open())
            .finish()
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
