//! # logshim core
//!
//! A leveled logging front-end. Loggers are looked up by name, messages are
//! printf-style templates formatted only when some target wants them, and
//! the routing configuration can be replaced atomically while other threads
//! keep logging.
//!
//! ## Example
//!
//! ```
//! use logshim_core::{Configuration, Level, LogFactory};
//! use logshim_core::layout::Layout;
//! use logshim_core::rule::Rule;
//! use logshim_core::targets::MemoryTarget;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryTarget::new("mem", Layout::parse("${level}: ${message}")));
//! let config = Configuration::builder()
//!     .target(memory.clone())
//!     .rule(Rule::new("App.*", Level::Info).unwrap().write_to("mem"))
//!     .build()
//!     .unwrap();
//!
//! let factory = LogFactory::with_configuration(config);
//! let logger = factory.get_logger("App.Net");
//! logger.info("connected to %s:%d", &["localhost".into(), 8080.into()]);
//! logger.debug("not routed", &[]);
//!
//! assert_eq!(memory.logs(), vec!["Info: connected to localhost:8080"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod configuration;
pub mod diagnostics;
pub mod dispatcher;
pub mod engine;
pub mod factory;
pub mod format;
pub mod layout;
pub mod loader;
pub mod logger;
pub mod manager;
pub mod rule;
pub mod targets;

pub use configuration::{Configuration, ConfigurationBuilder};
pub use engine::{Engine, ResourceLocator};
pub use factory::LogFactory;
pub use format::{format_message, FormatArg, MAX_MESSAGE_LEN};
pub use logger::Logger;
pub use manager::LogManager;
pub use logshim_types::{Level, LogEvent, LogShimError, Result, Target};
