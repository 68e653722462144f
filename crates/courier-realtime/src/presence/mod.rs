//! Presence tracking: username → live connection mapping.

pub mod registry;
