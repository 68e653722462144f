//! Message log store — the process-wide record of every relayed message.

use tokio::sync::RwLock;

use crate::message::types::Message;

/// Unbounded, append-only, ordered sequence of messages.
///
/// Insertion order equals send order. Lives for the process's entire run;
/// no eviction, no persistence. `append` is the single mutation point.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: RwLock<Vec<Message>>,
}

impl MessageLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message. Strictly serialized behind the write lock.
    pub async fn append(&self, message: Message) {
        self.entries.write().await.push(message);
    }

    /// Returns the last `limit` messages sent by or addressed to a
    /// username, in send order (most-recent-last).
    pub async fn history_for(&self, username: &str, limit: usize) -> Vec<Message> {
        let entries = self.entries.read().await;
        let relevant: Vec<Message> = entries
            .iter()
            .filter(|m| m.from == username || m.to == username)
            .cloned()
            .collect();

        let skip = relevant.len().saturating_sub(limit);
        relevant.into_iter().skip(skip).collect()
    }

    /// Returns the total number of logged messages.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true when no messages have been logged.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
