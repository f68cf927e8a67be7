//! Process-wide logging state.

use crate::configuration::Configuration;
use crate::engine::{Engine, ResourceLocator};
use crate::factory::LogFactory;
use crate::logger::Logger;
use logshim_types::Result;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static FACTORY: Lazy<LogFactory> = Lazy::new(LogFactory::new);
static ENGINE: Lazy<Engine> = Lazy::new(Engine::new);

/// Entry point to the process-wide [`LogFactory`] and [`Engine`].
///
/// Until a configuration is loaded every logger is disabled.
pub struct LogManager;

impl LogManager {
    /// The process-wide factory.
    pub fn factory() -> &'static LogFactory {
        &FACTORY
    }

    /// The process-wide engine.
    pub fn engine() -> &'static Engine {
        &ENGINE
    }

    /// See [`LogFactory::get_logger`].
    pub fn get_logger(name: &str) -> Logger {
        FACTORY.get_logger(name)
    }

    /// See [`LogFactory::configuration`].
    pub fn configuration() -> Arc<Configuration> {
        FACTORY.configuration()
    }

    /// See [`LogFactory::set_configuration`].
    pub fn set_configuration(config: Configuration) -> Arc<Configuration> {
        FACTORY.set_configuration(config)
    }

    /// See [`LogFactory::load_configuration_from_file`].
    pub fn load_configuration_from_file(path: impl AsRef<Path>) -> Result<()> {
        FACTORY.load_configuration_from_file(path)
    }

    /// See [`Engine::initialize`].
    pub fn initialize(locator: &ResourceLocator) -> Result<PathBuf> {
        ENGINE.initialize(&FACTORY, locator)
    }

    /// See [`LogFactory::flush`].
    pub fn flush() {
        FACTORY.flush()
    }

    /// See [`LogFactory::shutdown`].
    pub fn shutdown() {
        FACTORY.shutdown()
    }
}
