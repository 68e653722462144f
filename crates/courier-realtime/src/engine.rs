//! Top-level relay engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use courier_core::config::relay::RelayConfig;

use crate::connection::pool::ConnectionPool;
use crate::log::store::MessageLog;
use crate::presence::registry::PresenceRegistry;
use crate::router::RelayRouter;

/// Central relay engine owning the pool, registry, log, and router.
#[derive(Clone)]
pub struct RelayEngine {
    /// Connection pool.
    pool: Arc<ConnectionPool>,
    /// Presence registry.
    presence: Arc<PresenceRegistry>,
    /// Message log.
    log: Arc<MessageLog>,
    /// Event router.
    router: Arc<RelayRouter>,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RelayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayEngine").finish()
    }
}

impl RelayEngine {
    /// Creates a new relay engine with all subsystems.
    pub fn new(config: RelayConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let pool = Arc::new(ConnectionPool::new());
        let presence = Arc::new(PresenceRegistry::new());
        let log = Arc::new(MessageLog::new());
        let router = Arc::new(RelayRouter::new(
            config,
            pool.clone(),
            presence.clone(),
            log.clone(),
        ));

        info!("Relay engine initialized");

        Self {
            pool,
            presence,
            log,
            router,
            shutdown_tx,
        }
    }

    /// Returns the event router.
    pub fn router(&self) -> &Arc<RelayRouter> {
        &self.router
    }

    /// Returns the total active connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of usernames currently reachable.
    pub fn online_users(&self) -> usize {
        self.presence.online_count()
    }

    /// Returns the total number of logged messages.
    pub async fn message_count(&self) -> usize {
        self.log.len().await
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown of the relay engine.
    pub fn shutdown(&self) {
        info!("Shutting down relay engine");
        let _ = self.shutdown_tx.send(());
    }
}
