//! Data transfer objects for the HTTP surface.

pub mod response;
