//! Client and server WebSocket event type definitions.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A relayed direct message. Immutable once created; owned by the message log.
///
/// Sender and recipient are referenced by username string only — neither
/// needs to have ever been registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique, unpredictable message ID.
    pub id: Uuid,
    /// Sender username.
    pub from: String,
    /// Recipient username.
    pub to: String,
    /// Message body (trimmed, 1–2000 characters).
    pub text: String,
    /// Wall-clock creation time in milliseconds since epoch.
    /// Monotonicity is not guaranteed.
    pub ts: i64,
}

impl Message {
    /// Creates a message with a fresh ID and the current timestamp.
    pub fn new(from: String, to: String, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            text,
            ts: Utc::now().timestamp_millis(),
        }
    }
}

/// Events sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Bind a username to this connection.
    Identify {
        /// Requested username.
        username: String,
    },
    /// Send a direct message to another username.
    SendMessage {
        /// Recipient username.
        to: String,
        /// Message body.
        text: String,
    },
}

/// Events sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// History snapshot delivered to an identifying connection.
    History {
        /// Up to the configured limit of relevant messages, most-recent-last.
        messages: Vec<Message>,
    },
    /// A newly relayed message, delivered to sender (echo) and recipient.
    NewMessage {
        /// The message record.
        message: Message,
    },
}
