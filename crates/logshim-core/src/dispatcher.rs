//! Rule resolution and event delivery.

use crate::configuration::Configuration;
use crate::diagnostics;
use logshim_types::{Level, LogEvent, Target, LEVEL_COUNT};
use std::fmt;
use std::sync::Arc;

/// Resolved targets of one logger for every level, under one configuration.
pub struct LoggerRoutes {
    version: u64,
    by_level: [Vec<Arc<dyn Target>>; LEVEL_COUNT],
}

impl LoggerRoutes {
    /// Version of the configuration these routes were resolved against.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Targets for `level`.
    pub fn targets(&self, level: Level) -> &[Arc<dyn Target>] {
        &self.by_level[level.ordinal()]
    }

    /// Whether any target receives `level`.
    pub fn is_enabled(&self, level: Level) -> bool {
        !self.by_level[level.ordinal()].is_empty()
    }
}

impl fmt::Debug for LoggerRoutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for level in Level::ALL {
            let names: Vec<&str> = self.targets(level).iter().map(|t| t.name()).collect();
            map.entry(&level.as_str(), &names);
        }
        map.finish()?;
        write!(f, " @v{}", self.version)
    }
}

/// Targets for an event from `logger` at `level`.
///
/// Applicable rules accumulate in rule order without de-duplication; a
/// final rule ends the evaluation once it applies.
pub fn resolve(config: &Configuration, logger: &str, level: Level) -> Vec<Arc<dyn Target>> {
    let mut targets = Vec::new();
    if level < config.threshold() {
        return targets;
    }
    for compiled in config.rules() {
        let rule = compiled.rule();
        if !rule.applies(logger, level) {
            continue;
        }
        targets.extend(compiled.targets().iter().cloned());
        if rule.is_final() {
            break;
        }
    }
    targets
}

/// Resolve all levels at once.
pub fn routes(config: &Configuration, logger: &str) -> LoggerRoutes {
    LoggerRoutes {
        version: config.version(),
        by_level: Level::ALL.map(|level| resolve(config, logger, level)),
    }
}

/// Write an event to each target in order.
///
/// A failing target is reported on the diagnostic channel and does not stop
/// the remaining targets.
pub fn dispatch(targets: &[Arc<dyn Target>], event: &LogEvent) {
    for target in targets {
        if let Err(e) = target.write(event) {
            diagnostics::sink_failure(target.name(), &e);
        }
    }
}
