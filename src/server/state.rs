use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::config::IdentityConfig;
use crate::server::debug::DebugReport;

/// State shared by every connection of one server instance.
///
/// Identity fields never change after construction. The request counter is
/// the only mutable part and is updated with atomic adds, so handlers never
/// block each other to bump or read it.
#[derive(Debug)]
pub struct ServerState {
    name: String,
    owners: Vec<String>,
    started_at: Instant,
    request_count: AtomicU64,
}

impl ServerState {
    pub fn new(name: impl Into<String>, owners: Vec<String>) -> Self {
        Self {
            name: name.into(),
            owners,
            started_at: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    pub fn from_config(identity: &IdentityConfig) -> Self {
        Self::new(identity.name.clone(), identity.owners.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    /// Counts one parsed request and returns the new total.
    pub fn record_request(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn snapshot(&self) -> DebugReport {
        DebugReport::from_state(self)
    }
}
