//! Relay engine configuration.

use serde::{Deserialize, Serialize};

/// Relay engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Outbound channel buffer size per connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Maximum number of messages returned in a history snapshot.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Maximum username length in characters; longer names are truncated.
    #[serde(default = "default_max_username_chars")]
    pub max_username_chars: usize,
    /// Maximum message text length in characters after trimming.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            history_limit: default_history_limit(),
            max_username_chars: default_max_username_chars(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_history_limit() -> usize {
    50
}

fn default_max_username_chars() -> usize {
    32
}

fn default_max_text_chars() -> usize {
    2000
}
