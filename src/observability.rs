//! Tracing setup and in-process request counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over `default_directive` when set. Calling this twice is
/// harmless; the second install is ignored.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Counters for request outcomes
#[derive(Debug, Default)]
pub struct Metrics {
    writes_accepted: AtomicU64,
    reads_served: AtomicU64,
    client_errors: AtomicU64,
    server_errors: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_accepted(&self) {
        self.writes_accepted.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "writes_accepted", "Metric incremented");
    }

    pub fn read_served(&self) {
        self.reads_served.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "reads_served", "Metric incremented");
    }

    pub fn client_error(&self) {
        self.client_errors.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "client_errors", "Metric incremented");
    }

    pub fn server_error(&self) {
        self.server_errors.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "server_errors", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            writes_accepted: self.writes_accepted.load(Ordering::Relaxed),
            reads_served: self.reads_served.load(Ordering::Relaxed),
            client_errors: self.client_errors.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub writes_accepted: u64,
    pub reads_served: u64,
    pub client_errors: u64,
    pub server_errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_increments() {
        let metrics = Metrics::new();
        metrics.write_accepted();
        metrics.write_accepted();
        metrics.client_error();
        metrics.read_served();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.writes_accepted, 2);
        assert_eq!(snapshot.reads_served, 1);
        assert_eq!(snapshot.client_errors, 1);
        assert_eq!(snapshot.server_errors, 0);
    }
}
