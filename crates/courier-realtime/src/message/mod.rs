//! Wire event types and input validation.

pub mod types;
pub mod validator;
