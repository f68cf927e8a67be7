//! Flat call surface over the process-wide [`LogManager`].
//!
//! Narrow functions take UTF-8 strings, the `_wide` ones UTF-16 code units.
//! Status-returning functions report `true` on success and never fail in
//! any other way.

use crate::engine::ResourceLocator;
use crate::format::FormatArg;
use crate::manager::LogManager;
use logshim_types::Level;
use std::path::PathBuf;

fn decode(wide: &[u16]) -> String {
    String::from_utf16_lossy(wide)
}

/// Log through the logger named `logger`.
pub fn log(level: Level, logger: &str, template: &str, args: &[FormatArg<'_>]) {
    LogManager::get_logger(logger).log(level, template, args)
}

/// [`log`] with UTF-16 strings.
pub fn log_wide(level: Level, logger: &[u16], template: &[u16], args: &[FormatArg<'_>]) {
    LogManager::get_logger(&decode(logger)).log_wide(level, template, args)
}

/// Whether the logger named `logger` has a target at `level`.
pub fn is_enabled(level: Level, logger: &str) -> bool {
    LogManager::get_logger(logger).is_enabled(level)
}

/// [`is_enabled`] with a UTF-16 logger name.
pub fn is_enabled_wide(level: Level, logger: &[u16]) -> bool {
    is_enabled(level, &decode(logger))
}

/// Replace the active configuration with the file at `path`.
///
/// Returns `false` and keeps the active configuration on any failure.
pub fn load_configuration_from_file(path: &str) -> bool {
    LogManager::load_configuration_from_file(path).is_ok()
}

/// [`load_configuration_from_file`] with a UTF-16 path.
pub fn load_configuration_from_file_wide(path: &[u16]) -> bool {
    load_configuration_from_file(&decode(path))
}

/// Initialize the engine from the resource at `path`.
pub fn initialize(path: &str) -> bool {
    initialize_with(&ResourceLocator::Path(PathBuf::from(path)))
}

/// [`initialize`] with a UTF-16 path.
pub fn initialize_wide(path: &[u16]) -> bool {
    initialize(&decode(path))
}

/// Initialize the engine from `logshim.yaml` next to the executable.
pub fn initialize_local() -> bool {
    initialize_with(&ResourceLocator::local())
}

/// Initialize the engine through any locator.
pub fn initialize_with(locator: &ResourceLocator) -> bool {
    LogManager::initialize(locator).is_ok()
}

macro_rules! level_functions {
    ($($level:ident => $narrow:ident, $wide:ident;)*) => {$(
        #[doc = concat!("[`log`] at `", stringify!($level), "`.")]
        pub fn $narrow(logger: &str, template: &str, args: &[FormatArg<'_>]) {
            log(Level::$level, logger, template, args)
        }

        #[doc = concat!("[`log_wide`] at `", stringify!($level), "`.")]
        pub fn $wide(logger: &[u16], template: &[u16], args: &[FormatArg<'_>]) {
            log_wide(Level::$level, logger, template, args)
        }
    )*};
}

level_functions! {
    Trace => trace, trace_wide;
    Debug => debug, debug_wide;
    Info => info, info_wide;
    Warn => warn, warn_wide;
    Error => error, error_wide;
    Fatal => fatal, fatal_wide;
}
