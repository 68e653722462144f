//! Per-connection session state.

/// The identification state of a single connection.
///
/// Every connection starts `Anonymous` and becomes `Identified` on the
/// first valid identify event. A connection owns its session value; the
/// presence registry is never scanned to recover a connection's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// No username bound yet; send events are ignored in this state.
    Anonymous,
    /// A username is bound to this connection.
    Identified {
        /// The bound username (trimmed, at most 32 characters).
        username: String,
    },
}

impl Session {
    /// Returns the bound username, if identified.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Identified { username } => Some(username),
        }
    }

    /// Returns true if a username is bound.
    pub fn is_identified(&self) -> bool {
        matches!(self, Self::Identified { .. })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::Anonymous
    }
}
