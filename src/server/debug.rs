//! The `/debug` diagnostics document.

use serde::Serialize;

use crate::server::state::ServerState;

/// Point-in-time view of a running server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugReport {
    pub name: String,
    /// Parsed requests seen so far, this one included
    pub connections: u64,
    /// Whole seconds since the server started
    pub uptime: u64,
    pub owners: Vec<String>,
}

impl DebugReport {
    pub fn from_state(state: &ServerState) -> Self {
        Self {
            name: state.name().to_string(),
            connections: state.request_count(),
            uptime: state.uptime().as_secs(),
            owners: state.owners().to_vec(),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
