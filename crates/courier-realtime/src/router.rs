//! Relay router — handles connection lifecycle and routes client events.
//!
//! Each connection's inbound frames are processed one at a time by its
//! socket task, so per-connection send order equals log append order.
//! Malformed or invalid input is dropped silently: the requested action
//! simply does not happen, and no error event is sent back.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use courier_core::config::relay::RelayConfig;

use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::connection::pool::ConnectionPool;
use crate::log::store::MessageLog;
use crate::message::types::{ClientEvent, Message, ServerEvent};
use crate::message::validator::{normalize_text, normalize_username};
use crate::presence::registry::PresenceRegistry;

/// Routes identify, send, and disconnect events for all connections.
#[derive(Debug)]
pub struct RelayRouter {
    /// Connection pool.
    pool: Arc<ConnectionPool>,
    /// Presence registry.
    presence: Arc<PresenceRegistry>,
    /// Message log.
    log: Arc<MessageLog>,
    /// Configuration.
    config: RelayConfig,
}

impl RelayRouter {
    /// Creates a new router over shared pool, registry, and log.
    pub fn new(
        config: RelayConfig,
        pool: Arc<ConnectionPool>,
        presence: Arc<PresenceRegistry>,
        log: Arc<MessageLog>,
    ) -> Self {
        Self {
            pool,
            presence,
            log,
            config,
        }
    }

    /// Registers a new connection.
    ///
    /// Returns the connection handle and a receiver for outbound events.
    /// The connection starts anonymous; it cannot send or receive direct
    /// messages until it identifies.
    pub fn register(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(tx));
        self.pool.add(handle.clone());

        info!(conn_id = %handle.id, "WebSocket connection registered");

        (handle, rx)
    }

    /// Unregisters a connection and releases its presence entry.
    ///
    /// The unbind uses the connection's own recorded username, never a
    /// registry scan, and only removes the entry still bound to this
    /// connection.
    pub async fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_dead();
            let connected_secs = (Utc::now() - handle.connected_at).num_seconds();

            if let Some(username) = handle.username().await {
                self.presence.unbind(&username, conn_id);
                info!(
                    conn_id = %conn_id,
                    username = %username,
                    connected_secs,
                    "Connection unregistered"
                );
            } else {
                info!(conn_id = %conn_id, connected_secs, "Anonymous connection unregistered");
            }
        }
    }

    /// Processes one inbound frame from a client.
    pub async fn handle_frame(&self, conn_id: &ConnectionId, raw: &str) {
        let handle = match self.pool.get(conn_id) {
            Some(h) => h,
            None => {
                warn!(conn_id = %conn_id, "Frame from unknown connection");
                return;
            }
        };

        let event: ClientEvent = match serde_json::from_str(raw) {
            Ok(event) => event,
            Err(e) => {
                debug!(conn_id = %conn_id, error = %e, "Dropping malformed frame");
                return;
            }
        };

        match event {
            ClientEvent::Identify { username } => {
                self.handle_identify(&handle, &username).await;
            }
            ClientEvent::SendMessage { to, text } => {
                self.handle_send(&handle, &to, &text).await;
            }
        }
    }

    /// Binds a username to the connection and delivers its history snapshot.
    ///
    /// Re-identifying is the same path: the registry entry is rebound
    /// (any entry under a previous name is left dangling) and a fresh
    /// snapshot is delivered.
    async fn handle_identify(&self, handle: &ConnectionHandle, raw_username: &str) {
        let Some(username) = normalize_username(raw_username, self.config.max_username_chars)
        else {
            debug!(conn_id = %handle.id, "Ignoring identify with empty username");
            return;
        };

        handle.set_identified(username.clone()).await;
        self.presence.bind(username.clone(), handle.id);

        let messages = self
            .log
            .history_for(&username, self.config.history_limit)
            .await;

        info!(
            conn_id = %handle.id,
            username = %username,
            history = messages.len(),
            "Connection identified"
        );

        handle.send(ServerEvent::History { messages }).await;
    }

    /// Validates, logs, and delivers one direct message.
    ///
    /// Delivery to sender and recipient happens only after the append and
    /// each is independent: an offline recipient never blocks the echo.
    async fn handle_send(&self, handle: &ConnectionHandle, to: &str, text: &str) {
        let Some(from) = handle.username().await else {
            debug!(conn_id = %handle.id, "Ignoring send from anonymous connection");
            return;
        };

        let Some(to) = normalize_username(to, self.config.max_username_chars) else {
            debug!(conn_id = %handle.id, "Ignoring send with empty recipient");
            return;
        };

        let Some(text) = normalize_text(text, self.config.max_text_chars) else {
            debug!(conn_id = %handle.id, "Ignoring send with invalid text");
            return;
        };

        let message = Message::new(from, to.clone(), text);
        self.log.append(message.clone()).await;

        debug!(
            conn_id = %handle.id,
            message_id = %message.id,
            to = %to,
            "Message relayed"
        );

        // Echo to the sender.
        handle
            .send(ServerEvent::NewMessage {
                message: message.clone(),
            })
            .await;

        // Forward to the recipient if currently reachable.
        if let Some(recipient_id) = self.presence.lookup(&to) {
            if let Some(recipient) = self.pool.get(&recipient_id) {
                recipient.send(ServerEvent::NewMessage { message }).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::Receiver;

    fn router() -> RelayRouter {
        RelayRouter::new(
            RelayConfig::default(),
            Arc::new(ConnectionPool::new()),
            Arc::new(PresenceRegistry::new()),
            Arc::new(MessageLog::new()),
        )
    }

    async fn identify(router: &RelayRouter, handle: &ConnectionHandle, username: &str) {
        let frame = serde_json::json!({ "type": "identify", "username": username });
        router.handle_frame(&handle.id, &frame.to_string()).await;
    }

    async fn send(router: &RelayRouter, handle: &ConnectionHandle, to: &str, text: &str) {
        let frame = serde_json::json!({ "type": "send_message", "to": to, "text": text });
        router.handle_frame(&handle.id, &frame.to_string()).await;
    }

    fn expect_history(rx: &mut Receiver<ServerEvent>) -> Vec<Message> {
        match rx.try_recv().expect("expected history event") {
            ServerEvent::History { messages } => messages,
            other => panic!("expected history, got {other:?}"),
        }
    }

    fn expect_new_message(rx: &mut Receiver<ServerEvent>) -> Message {
        match rx.try_recv().expect("expected new_message event") {
            ServerEvent::NewMessage { message } => message,
            other => panic!("expected new_message, got {other:?}"),
        }
    }

    fn expect_silence(rx: &mut Receiver<ServerEvent>) {
        assert!(rx.try_recv().is_err(), "expected no event");
    }

    #[tokio::test]
    async fn test_identify_binds_presence_and_delivers_history() {
        let router = router();
        let (handle, mut rx) = router.register();

        identify(&router, &handle, "alice").await;

        assert_eq!(router.presence.lookup("alice"), Some(handle.id));
        assert!(expect_history(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_identify_trims_and_truncates_username() {
        let router = router();
        let (handle, mut rx) = router.register();

        let long = format!("  {}  ", "a".repeat(33));
        identify(&router, &handle, &long).await;

        let expected = "a".repeat(32);
        assert_eq!(router.presence.lookup(&expected), Some(handle.id));
        assert_eq!(handle.username().await, Some(expected));
        expect_history(&mut rx);
    }

    #[tokio::test]
    async fn test_identify_empty_username_ignored() {
        let router = router();
        let (handle, mut rx) = router.register();

        identify(&router, &handle, "   ").await;

        assert_eq!(handle.username().await, None);
        expect_silence(&mut rx);
    }

    #[tokio::test]
    async fn test_send_echoes_and_logs() {
        let router = router();
        let (alice, mut alice_rx) = router.register();
        identify(&router, &alice, "alice").await;
        expect_history(&mut alice_rx);

        send(&router, &alice, "bob", "  hi  ").await;

        let echo = expect_new_message(&mut alice_rx);
        assert_eq!(echo.from, "alice");
        assert_eq!(echo.to, "bob");
        assert_eq!(echo.text, "hi");
        assert_eq!(router.log.len().await, 1);
        expect_silence(&mut alice_rx);
    }

    #[tokio::test]
    async fn test_send_forwards_to_online_recipient() {
        let router = router();
        let (alice, mut alice_rx) = router.register();
        let (bob, mut bob_rx) = router.register();
        identify(&router, &alice, "alice").await;
        identify(&router, &bob, "bob").await;
        expect_history(&mut alice_rx);
        expect_history(&mut bob_rx);

        send(&router, &alice, "bob", "yo").await;

        let echo = expect_new_message(&mut alice_rx);
        let forwarded = expect_new_message(&mut bob_rx);
        assert_eq!(echo.id, forwarded.id);
        assert_eq!(forwarded.text, "yo");
    }

    #[tokio::test]
    async fn test_self_send_delivered_twice() {
        let router = router();
        let (alice, mut alice_rx) = router.register();
        identify(&router, &alice, "alice").await;
        expect_history(&mut alice_rx);

        send(&router, &alice, "alice", "note to self").await;

        // Echo plus forward: the sender is also the online recipient.
        let echo = expect_new_message(&mut alice_rx);
        let forwarded = expect_new_message(&mut alice_rx);
        assert_eq!(echo.id, forwarded.id);
        assert_eq!(router.log.len().await, 1);
        expect_silence(&mut alice_rx);
    }

    #[tokio::test]
    async fn test_send_from_anonymous_ignored() {
        let router = router();
        let (handle, mut rx) = router.register();

        send(&router, &handle, "bob", "hi").await;

        assert_eq!(router.log.len().await, 0);
        expect_silence(&mut rx);
    }

    #[tokio::test]
    async fn test_send_empty_recipient_ignored() {
        let router = router();
        let (alice, mut alice_rx) = router.register();
        identify(&router, &alice, "alice").await;
        expect_history(&mut alice_rx);

        send(&router, &alice, "", "hi").await;

        assert_eq!(router.log.len().await, 0);
        expect_silence(&mut alice_rx);
    }

    #[tokio::test]
    async fn test_send_text_length_boundary() {
        let router = router();
        let (alice, mut alice_rx) = router.register();
        identify(&router, &alice, "alice").await;
        expect_history(&mut alice_rx);

        send(&router, &alice, "bob", &"x".repeat(2000)).await;
        assert_eq!(router.log.len().await, 1);
        expect_new_message(&mut alice_rx);

        send(&router, &alice, "bob", &"x".repeat(2001)).await;
        assert_eq!(router.log.len().await, 1);
        expect_silence(&mut alice_rx);
    }

    #[tokio::test]
    async fn test_malformed_frame_dropped_silently() {
        let router = router();
        let (handle, mut rx) = router.register();

        router.handle_frame(&handle.id, "not json").await;
        router.handle_frame(&handle.id, r#"{"type":"unknown"}"#).await;
        router
            .handle_frame(&handle.id, r#"{"type":"send_message"}"#)
            .await;

        expect_silence(&mut rx);
    }

    #[tokio::test]
    async fn test_reidentify_delivers_fresh_snapshot() {
        let router = router();
        let (alice, mut alice_rx) = router.register();
        identify(&router, &alice, "alice").await;
        expect_history(&mut alice_rx);

        send(&router, &alice, "bob", "hi").await;
        expect_new_message(&mut alice_rx);

        identify(&router, &alice, "alice").await;
        let history = expect_history(&mut alice_rx);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "hi");
    }

    #[tokio::test]
    async fn test_reidentify_leaves_old_registry_entry_dangling() {
        let router = router();
        let (handle, mut rx) = router.register();
        identify(&router, &handle, "alice").await;
        expect_history(&mut rx);

        identify(&router, &handle, "alicia").await;
        expect_history(&mut rx);

        // Old slot still points at this connection; no automatic cleanup.
        assert_eq!(router.presence.lookup("alice"), Some(handle.id));
        assert_eq!(router.presence.lookup("alicia"), Some(handle.id));
        assert_eq!(handle.username().await, Some("alicia".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_releases_only_own_binding() {
        let router = router();
        let (old, mut old_rx) = router.register();
        identify(&router, &old, "alice").await;
        expect_history(&mut old_rx);

        let (new, mut new_rx) = router.register();
        identify(&router, &new, "alice").await;
        expect_history(&mut new_rx);

        // The old connection disconnects after the rebind.
        router.unregister(&old.id).await;
        assert_eq!(router.presence.lookup("alice"), Some(new.id));

        router.unregister(&new.id).await;
        assert_eq!(router.presence.lookup("alice"), None);
    }

    #[tokio::test]
    async fn test_offline_recipient_then_history_then_live_delivery() {
        let router = router();

        // C1 identifies as alice and messages the absent bob.
        let (c1, mut c1_rx) = router.register();
        identify(&router, &c1, "alice").await;
        expect_history(&mut c1_rx);

        send(&router, &c1, "bob", "hi").await;
        let echo = expect_new_message(&mut c1_rx);
        assert_eq!(echo.from, "alice");
        assert_eq!(echo.to, "bob");

        // C2 identifies as bob and receives the message in history.
        let (c2, mut c2_rx) = router.register();
        identify(&router, &c2, "bob").await;
        let history = expect_history(&mut c2_rx);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "hi");

        // Now both sides receive new messages live.
        send(&router, &c1, "bob", "yo").await;
        assert_eq!(expect_new_message(&mut c1_rx).text, "yo");
        assert_eq!(expect_new_message(&mut c2_rx).text, "yo");
    }

    #[tokio::test]
    async fn test_history_capped_at_limit() {
        let router = router();
        let (alice, mut alice_rx) = router.register();
        identify(&router, &alice, "alice").await;
        expect_history(&mut alice_rx);

        for i in 0..55 {
            send(&router, &alice, "bob", &format!("m{i}")).await;
            expect_new_message(&mut alice_rx);
        }

        identify(&router, &alice, "alice").await;
        let history = expect_history(&mut alice_rx);
        assert_eq!(history.len(), 50);
        assert_eq!(history.last().map(|m| m.text.as_str()), Some("m54"));
    }
}
