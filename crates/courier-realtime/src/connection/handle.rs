//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::message::types::ServerEvent;

use super::session::Session;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A handle to a single WebSocket connection.
///
/// Holds the sender channel for pushing events to the client, plus the
/// connection's own session state.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Sender for outbound events
    pub sender: mpsc::Sender<ServerEvent>,
    /// Session state owned by this connection
    pub session: tokio::sync::RwLock<Session>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Whether the connection is still alive
    pub alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new anonymous connection handle
    pub fn new(sender: mpsc::Sender<ServerEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            session: tokio::sync::RwLock::new(Session::Anonymous),
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        }
    }

    /// Send an event to this connection
    pub async fn send(&self, event: ServerEvent) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(event) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Connection {} send buffer full, dropping event", self.id);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Bind a username to this connection's session
    pub async fn set_identified(&self, username: String) {
        let mut session = self.session.write().await;
        *session = Session::Identified { username };
    }

    /// Returns the bound username, if any
    pub async fn username(&self) -> Option<String> {
        self.session.read().await.username().map(str::to_owned)
    }
}
