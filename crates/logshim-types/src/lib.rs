//! # logshim types
//!
//! Core types, traits, and enums shared across all logshim crates.
//!
//! This crate provides the fundamental building blocks of the logging
//! front-end, including:
//!
//! - The ordered severity [`Level`]
//! - The [`LogEvent`] handed to targets and the [`Target`] capability
//! - Error types and result aliases
//! - Serde descriptions of a configuration file
//!
//! ## Example
//!
//! ```
//! use logshim_types::{Level, config::LoggingConfig};
//!
//! let config: LoggingConfig = serde_yaml::from_str(
//!     "rules:\n  - { logger: '*', min_level: info, write_to: [console] }\n",
//! ).unwrap();
//! assert_eq!(config.rules[0].min_level, Level::Info);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod level;
pub mod event;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{LogShimError, Result};
pub use level::{Level, LEVEL_COUNT};
pub use event::LogEvent;
pub use traits::Target;
