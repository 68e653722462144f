//! Append-only in-memory message log.

pub mod store;
