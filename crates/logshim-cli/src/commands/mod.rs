//! CLI command implementations.

pub mod check;
pub mod log;
pub mod resolve;
pub mod version;
