//! # courier-realtime
//!
//! Real-time relay engine for Courier. Provides:
//!
//! - WebSocket connection lifecycle management
//! - Per-connection session state (anonymous/identified)
//! - Presence registry mapping usernames to live connections
//! - An append-only in-memory message log with history retrieval
//! - Direct-message routing with sender echo

pub mod connection;
pub mod engine;
pub mod log;
pub mod message;
pub mod presence;
pub mod router;

pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use connection::pool::ConnectionPool;
pub use connection::session::Session;
pub use engine::RelayEngine;
pub use log::store::MessageLog;
pub use message::types::{ClientEvent, Message, ServerEvent};
pub use presence::registry::PresenceRegistry;
pub use router::RelayRouter;
