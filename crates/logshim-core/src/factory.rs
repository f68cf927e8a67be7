//! Logger registry and the active configuration.

use crate::configuration::Configuration;
use crate::diagnostics;
use crate::loader;
use crate::logger::Logger;
use dashmap::DashMap;
use arc_swap::ArcSwap;
use logshim_types::Result;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Publication point of the current configuration snapshot.
///
/// Readers do a single atomic load and never wait on a writer. Writers are
/// serialized among themselves.
#[derive(Debug)]
pub struct ActiveConfiguration {
    current: ArcSwap<Configuration>,
    writer: Mutex<()>,
}

impl ActiveConfiguration {
    /// Start with `initial` active.
    pub fn new(initial: Configuration) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            writer: Mutex::new(()),
        }
    }

    /// Snapshot of the current configuration.
    pub fn load(&self) -> Arc<Configuration> {
        self.current.load_full()
    }

    /// Install `next`, returning the snapshot it replaced.
    pub fn store(&self, next: Arc<Configuration>) -> Arc<Configuration> {
        let _guard = self.writer.lock();
        self.current.swap(next)
    }
}

/// Owns the logger registry and the active configuration.
///
/// ```
/// use logshim_core::{LogFactory, Level};
///
/// let factory = LogFactory::new();
/// let logger = factory.get_logger("App");
/// assert!(!logger.is_enabled(Level::Fatal));
/// ```
#[derive(Debug)]
pub struct LogFactory {
    active: Arc<ActiveConfiguration>,
    loggers: DashMap<String, Logger>,
}

impl Default for LogFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFactory {
    /// A factory with the empty configuration: nothing is logged.
    pub fn new() -> Self {
        Self::with_configuration(Configuration::empty())
    }

    /// A factory with `config` active.
    pub fn with_configuration(config: Configuration) -> Self {
        Self {
            active: Arc::new(ActiveConfiguration::new(config)),
            loggers: DashMap::new(),
        }
    }

    /// Logger for `name`. Repeated calls return handles to the same logger.
    pub fn get_logger(&self, name: &str) -> Logger {
        if let Some(logger) = self.loggers.get(name) {
            return logger.clone();
        }
        self.loggers
            .entry(name.to_string())
            .or_insert_with(|| Logger::new(name, self.active.clone()))
            .clone()
    }

    /// Number of distinct loggers handed out.
    pub fn logger_count(&self) -> usize {
        self.loggers.len()
    }

    /// The active configuration.
    pub fn configuration(&self) -> Arc<Configuration> {
        self.active.load()
    }

    /// Atomically replace the active configuration.
    ///
    /// Calls already in progress finish on the snapshot they started with.
    /// The replaced snapshot is flushed and returned.
    pub fn set_configuration(&self, config: Configuration) -> Arc<Configuration> {
        let (version, targets, rules) = (config.version(), config.targets().len(), config.rules().len());
        let previous = self.active.store(Arc::new(config));
        diagnostics::configuration_installed(version, targets, rules);
        previous.flush();
        previous
    }

    /// Load, validate and install a configuration file.
    ///
    /// On any error the active configuration is left untouched.
    pub fn load_configuration_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match loader::load_configuration(path) {
            Ok(config) => {
                self.set_configuration(config);
                Ok(())
            }
            Err(e) => {
                diagnostics::configuration_rejected(&path.display().to_string(), &e);
                Err(e)
            }
        }
    }

    /// Flush every target of the active configuration.
    pub fn flush(&self) {
        self.active.load().flush();
    }

    /// Install the empty configuration, releasing all targets once no call
    /// uses them anymore.
    pub fn shutdown(&self) {
        self.set_configuration(Configuration::empty());
    }
}
