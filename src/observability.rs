//! Logging setup and in-process counters

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    events_received: AtomicU64,
    searches_served: AtomicU64,
    tracks_queued: AtomicU64,
    failures_rendered: AtomicU64,
    replies_sent: AtomicU64,
    replies_failed: AtomicU64,
    authorizations: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "events_received", "Metric incremented");
    }

    pub fn search_served(&self) {
        self.searches_served.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "searches_served", "Metric incremented");
    }

    pub fn track_queued(&self) {
        self.tracks_queued.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "tracks_queued", "Metric incremented");
    }

    pub fn failure_rendered(&self) {
        self.failures_rendered.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "failures_rendered", "Metric incremented");
    }

    pub fn reply_sent(&self) {
        self.replies_sent.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "replies_sent", "Metric incremented");
    }

    pub fn reply_failed(&self) {
        self.replies_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "replies_failed", "Metric incremented");
    }

    pub fn authorization_completed(&self) {
        self.authorizations.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "authorizations", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            searches_served: self.searches_served.load(Ordering::Relaxed),
            tracks_queued: self.tracks_queued.load(Ordering::Relaxed),
            failures_rendered: self.failures_rendered.load(Ordering::Relaxed),
            replies_sent: self.replies_sent.load(Ordering::Relaxed),
            replies_failed: self.replies_failed.load(Ordering::Relaxed),
            authorizations: self.authorizations.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub events_received: u64,
    pub searches_served: u64,
    pub tracks_queued: u64,
    pub failures_rendered: u64,
    pub replies_sent: u64,
    pub replies_failed: u64,
    pub authorizations: u64,
}
