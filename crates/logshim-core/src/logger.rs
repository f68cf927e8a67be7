//! Named loggers.

use crate::dispatcher::{self, LoggerRoutes};
use crate::factory::ActiveConfiguration;
use crate::format::{format_message, format_wide, FormatArg};
use crate::configuration::Configuration;
use arc_swap::ArcSwapOption;
use logshim_types::{Level, LogEvent};
use std::fmt;
use std::sync::Arc;

struct LoggerInner {
    name: Arc<str>,
    active: Arc<ActiveConfiguration>,
    routes: ArcSwapOption<LoggerRoutes>,
}

/// A handle to a named logger.
///
/// Handles are cheap to clone and every handle for a name shares the same
/// route cache. Routes are resolved once per configuration version.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("name", &self.inner.name).finish()
    }
}

impl Logger {
    pub(crate) fn new(name: &str, active: Arc<ActiveConfiguration>) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                name: Arc::from(name),
                active,
                routes: ArcSwapOption::empty(),
            }),
        }
    }

    /// Logger name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether both handles refer to the same logger.
    pub fn same_as(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn routes_for(&self, config: &Configuration) -> Arc<LoggerRoutes> {
        let cached = self.inner.routes.load();
        if let Some(routes) = &*cached {
            if routes.version() == config.version() {
                return routes.clone();
            }
        }

        // Versions order builds, not installs: any mismatch with the
        // snapshot in hand replaces the entry.
        let fresh = Arc::new(dispatcher::routes(config, &self.inner.name));
        self.inner.routes.store(Some(fresh.clone()));
        fresh
    }

    /// Whether a message at `level` would reach any target.
    pub fn is_enabled(&self, level: Level) -> bool {
        let config = self.inner.active.load();
        self.routes_for(&config).is_enabled(level)
    }

    /// Format and dispatch a message.
    ///
    /// Nothing is formatted unless some target receives `level`. A template
    /// without `%` reaches the targets unchanged.
    pub fn log(&self, level: Level, template: &str, args: &[FormatArg<'_>]) {
        let config = self.inner.active.load();
        let routes = self.routes_for(&config);
        let targets = routes.targets(level);
        if targets.is_empty() {
            return;
        }
        let message = format_message(template, args);
        let event = LogEvent::new(level, self.inner.name.clone(), message);
        dispatcher::dispatch(targets, &event);
    }

    /// [`log`](Self::log) with a UTF-16 template.
    pub fn log_wide(&self, level: Level, template: &[u16], args: &[FormatArg<'_>]) {
        let config = self.inner.active.load();
        let routes = self.routes_for(&config);
        let targets = routes.targets(level);
        if targets.is_empty() {
            return;
        }
        let event = LogEvent::new(level, self.inner.name.clone(), format_wide(template, args));
        dispatcher::dispatch(targets, &event);
    }
}

macro_rules! level_shorthands {
    ($($level:ident => $narrow:ident, $wide:ident;)*) => {
        impl Logger {
            $(
                #[doc = concat!("Log at `", stringify!($level), "`.")]
                pub fn $narrow(&self, template: &str, args: &[FormatArg<'_>]) {
                    self.log(Level::$level, template, args)
                }

                #[doc = concat!("Log at `", stringify!($level), "` with a UTF-16 template.")]
                pub fn $wide(&self, template: &[u16], args: &[FormatArg<'_>]) {
                    self.log_wide(Level::$level, template, args)
                }
            )*
        }
    };
}

level_shorthands! {
    Trace => trace, trace_wide;
    Debug => debug, debug_wide;
    Info => info, info_wide;
    Warn => warn, warn_wide;
    Error => error, error_wide;
    Fatal => fatal, fatal_wide;
}

/// Log through a [`Logger`], evaluating the arguments only if the level is
/// enabled.
///
/// ```
/// use logshim_core::{shim_log, LogFactory, Level};
///
/// let logger = LogFactory::new().get_logger("doc");
/// let mut evaluated = false;
/// shim_log!(logger, Level::Info, "value=%d", { evaluated = true; 42 });
/// assert!(!evaluated);
/// ```
#[macro_export]
macro_rules! shim_log {
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, $template, &[$($crate::FormatArg::from($arg)),*]);
        }
    }};
}

/// [`shim_log!`] at `Trace`.
#[macro_export]
macro_rules! shim_trace {
    ($logger:expr, $($rest:tt)+) => { $crate::shim_log!($logger, $crate::Level::Trace, $($rest)+) };
}

/// [`shim_log!`] at `Debug`.
#[macro_export]
macro_rules! shim_debug {
    ($logger:expr, $($rest:tt)+) => { $crate::shim_log!($logger, $crate::Level::Debug, $($rest)+) };
}

/// [`shim_log!`] at `Info`.
#[macro_export]
macro_rules! shim_info {
    ($logger:expr, $($rest:tt)+) => { $crate::shim_log!($logger, $crate::Level::Info, $($rest)+) };
}

/// [`shim_log!`] at `Warn`.
#[macro_export]
macro_rules! shim_warn {
    ($logger:expr, $($rest:tt)+) => { $crate::shim_log!($logger, $crate::Level::Warn, $($rest)+) };
}

/// [`shim_log!`] at `Error`.
#[macro_export]
macro_rules! shim_error {
    ($logger:expr, $($rest:tt)+) => { $crate::shim_log!($logger, $crate::Level::Error, $($rest)+) };
}

/// [`shim_log!`] at `Fatal`.
#[macro_export]
macro_rules! shim_fatal {
    ($logger:expr, $($rest:tt)+) => { $crate::shim_log!($logger, $crate::Level::Fatal, $($rest)+) };
}
