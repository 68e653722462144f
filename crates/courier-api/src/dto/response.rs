//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Fixed liveness payload: `{"ok": true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always true when the process is serving.
    pub ok: bool,
}

/// Extended health payload with relay counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Always true when the process is serving.
    pub ok: bool,
    /// Server version.
    pub version: String,
    /// Active WebSocket connections.
    pub connections: usize,
    /// Usernames currently reachable.
    pub online_users: usize,
    /// Messages relayed since startup.
    pub logged_messages: usize,
}
