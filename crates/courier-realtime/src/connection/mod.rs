//! Connection lifecycle: handles, pool, and session state.

pub mod handle;
pub mod pool;
pub mod session;
