//! Presence registry — single source of truth for "is user X reachable now".

use dashmap::DashMap;

use crate::connection::handle::ConnectionId;

/// Maps usernames to their active connection.
///
/// At most one connection per username at any instant; last writer wins
/// when the same username identifies from a second connection. Absence
/// means "not reachable".
#[derive(Debug)]
pub struct PresenceRegistry {
    /// Username → connection ID.
    online: DashMap<String, ConnectionId>,
}

impl PresenceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            online: DashMap::new(),
        }
    }

    /// Registers or overwrites the mapping for a username.
    ///
    /// If this connection was previously bound under a different username,
    /// that old entry is left dangling until its own unbind.
    pub fn bind(&self, username: String, conn_id: ConnectionId) {
        self.online.insert(username, conn_id);
    }

    /// Returns the connection currently bound to a username, if any.
    pub fn lookup(&self, username: &str) -> Option<ConnectionId> {
        self.online.get(username).map(|entry| *entry.value())
    }

    /// Removes the mapping for a username, but only when it still points
    /// at the given connection.
    ///
    /// A late disconnect of an old connection must not evict a binding a
    /// newer connection has since claimed for the same username.
    pub fn unbind(&self, username: &str, conn_id: &ConnectionId) {
        self.online.remove_if(username, |_, bound| bound == conn_id);
    }

    /// Returns the number of usernames currently bound.
    pub fn online_count(&self) -> usize {
        self.online.len()
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
