//! Tower middleware for the HTTP surface.

pub mod cors;
pub mod logging;
