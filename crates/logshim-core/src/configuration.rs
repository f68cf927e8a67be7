//! Immutable configuration snapshots.

use crate::dispatcher::{self, LoggerRoutes};
use crate::rule::Rule;
use crate::targets::build_target;
use crate::diagnostics;
use logshim_types::config::LoggingConfig;
use logshim_types::{bail, Level, Result, Target};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// A rule together with the targets its names resolved to.
pub struct CompiledRule {
    rule: Rule,
    targets: Vec<Arc<dyn Target>>,
}

impl CompiledRule {
    /// The rule.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Resolved targets, in the order the rule names them.
    pub fn targets(&self) -> &[Arc<dyn Target>] {
        &self.targets
    }
}

/// A validated, immutable set of targets and rules.
///
/// Snapshots are shared through `Arc`; a snapshot that is replaced stays
/// alive until the last call that loaded it finishes.
pub struct Configuration {
    version: u64,
    threshold: Level,
    targets: Vec<Arc<dyn Target>>,
    by_name: HashMap<String, Arc<dyn Target>>,
    rules: Vec<CompiledRule>,
}

impl Configuration {
    /// Start building a configuration.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// A configuration with no targets: every level is disabled.
    pub fn empty() -> Self {
        Self {
            version: next_version(),
            threshold: Level::Trace,
            targets: Vec::new(),
            by_name: HashMap::new(),
            rules: Vec::new(),
        }
    }

    /// Build live targets and rules from a parsed description.
    ///
    /// Relative file paths are resolved against `base_dir`.
    pub fn from_description(description: &LoggingConfig, base_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Configuration::builder();
        if let Some(threshold) = description.threshold {
            builder = builder.threshold(threshold);
        }

        for declaration in &description.targets {
            let mut built = Vec::new();
            let target = build_target(declaration, base_dir, &mut |t: Arc<dyn Target>| {
                built.push(t);
                Ok(())
            })?;
            // The declared target itself is registered last.
            built.pop();
            builder = builder.target(target);
            for child in built {
                builder = builder.register(child);
            }
        }

        for declared in &description.rules {
            let mut rule = Rule::new(&declared.logger, declared.min_level)?;
            if let Some(max) = declared.max_level {
                rule = rule.max_level(max);
            }
            for name in &declared.write_to {
                rule = rule.write_to(name.as_str());
            }
            if declared.is_final {
                rule = rule.final_rule();
            }
            builder = builder.rule(rule);
        }

        builder.build()
    }

    /// Unique, increasing snapshot number.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Global threshold.
    pub fn threshold(&self) -> Level {
        self.threshold
    }

    /// Top-level targets in declaration order.
    pub fn targets(&self) -> &[Arc<dyn Target>] {
        &self.targets
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Any target by name, group children included.
    pub fn find_target(&self, name: &str) -> Option<Arc<dyn Target>> {
        self.by_name.get(name).cloned()
    }

    /// Targets an event from `logger` at `level` goes to.
    pub fn resolve(&self, logger: &str, level: Level) -> Vec<Arc<dyn Target>> {
        dispatcher::resolve(self, logger, level)
    }

    /// Targets for every level at once.
    pub fn routes(&self, logger: &str) -> LoggerRoutes {
        dispatcher::routes(self, logger)
    }

    /// Flush every top-level target, reporting failures internally.
    pub fn flush(&self) {
        for target in &self.targets {
            if let Err(e) = target.flush() {
                diagnostics::sink_failure(target.name(), &e);
            }
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("version", &self.version)
            .field("threshold", &self.threshold)
            .field(
                "targets",
                &self.targets.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field(
                "rules",
                &self.rules.iter().map(|r| r.rule.pattern().to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn next_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// Collects targets and rules and validates them into a [`Configuration`].
///
/// ```
/// use logshim_core::{Configuration, Level};
/// use logshim_core::layout::Layout;
/// use logshim_core::rule::Rule;
/// use logshim_core::targets::MemoryTarget;
/// use std::sync::Arc;
///
/// let config = Configuration::builder()
///     .target(Arc::new(MemoryTarget::new("mem", Layout::default())))
///     .rule(Rule::new("*", Level::Info).unwrap().write_to("mem"))
///     .build()
///     .unwrap();
/// assert_eq!(config.resolve("any", Level::Warn).len(), 1);
/// assert!(config.resolve("any", Level::Debug).is_empty());
/// ```
#[derive(Default)]
pub struct ConfigurationBuilder {
    threshold: Option<Level>,
    top_level: Vec<Arc<dyn Target>>,
    named: Vec<Arc<dyn Target>>,
    rules: Vec<Rule>,
}

impl ConfigurationBuilder {
    /// Drop everything below `level`.
    pub fn threshold(mut self, level: Level) -> Self {
        self.threshold = Some(level);
        self
    }

    /// Add a top-level target.
    pub fn target(mut self, target: Arc<dyn Target>) -> Self {
        self.named.push(target.clone());
        self.top_level.push(target);
        self
    }

    /// Make a target findable by name without adding it at the top level,
    /// e.g. a child of a group added with [`target`](Self::target).
    pub fn register(mut self, target: Arc<dyn Target>) -> Self {
        self.named.push(target);
        self
    }

    /// Append a rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<Configuration> {
        let mut by_name: HashMap<String, Arc<dyn Target>> = HashMap::new();
        for target in self.named {
            let name = target.name().to_string();
            if by_name.contains_key(&name) {
                bail!(Validation, "Duplicate target name '{}'", name);
            }
            by_name.insert(name, target);
        }

        let mut rules = Vec::with_capacity(self.rules.len());
        for rule in self.rules {
            if let Some(max) = rule.max() {
                if max < rule.min() {
                    bail!(
                        Validation,
                        "Rule '{}' has max_level {} below min_level {}",
                        rule.pattern(),
                        max,
                        rule.min()
                    );
                }
            }

            let mut targets = Vec::with_capacity(rule.target_names().len());
            for name in rule.target_names() {
                match by_name.get(name) {
                    Some(target) => targets.push(target.clone()),
                    None => bail!(
                        Validation,
                        "Rule '{}' writes to unknown target '{}'",
                        rule.pattern(),
                        name
                    ),
                }
            }
            rules.push(CompiledRule { rule, targets });
        }

        Ok(Configuration {
            version: next_version(),
            threshold: self.threshold.unwrap_or(Level::Trace),
            targets: self.top_level,
            by_name,
            rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::targets::{MemoryTarget, NullTarget};
    use logshim_types::{LogEvent, LogShimError};

    fn memory(name: &str) -> Arc<dyn Target> {
        Arc::new(MemoryTarget::new(name, Layout::default()))
    }

    #[test]
    fn test_versions_are_unique() {
        let a = Configuration::empty();
        let b = Configuration::builder().build().unwrap();
        assert_ne!(a.version(), b.version());
        assert!(b.version() > a.version());
    }

    #[test]
    fn test_duplicate_target_names_are_rejected() {
        let result = Configuration::builder()
            .target(memory("m"))
            .target(Arc::new(NullTarget::new("m")))
            .build();
        assert!(matches!(result, Err(LogShimError::Validation(msg)) if msg.contains("Duplicate")));
    }

    #[test]
    fn test_unknown_rule_target_is_rejected() {
        let result = Configuration::builder()
            .target(memory("m"))
            .rule(Rule::new("*", Level::Info).unwrap().write_to("missing"))
            .build();
        assert!(matches!(result, Err(LogShimError::Validation(msg)) if msg.contains("missing")));
    }

    #[test]
    fn test_inverted_level_window_is_rejected() {
        let result = Configuration::builder()
            .target(memory("m"))
            .rule(Rule::new("*", Level::Error).unwrap().max_level(Level::Info).write_to("m"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_description_registers_group_children() {
        let description: LoggingConfig = serde_yaml::from_str(
            r#"
targets:
  - name: rr
    type: round-robin
    targets:
      - { name: d1, type: memory }
      - { name: d2, type: memory }
      - { name: d3, type: memory }
      - { name: d4, type: memory }
rules:
  - { logger: "*", write_to: rr }
  - { logger: "Direct", write_to: d3 }
"#,
        )
        .unwrap();
        let config = Configuration::from_description(&description, None).unwrap();

        assert_eq!(config.targets().len(), 1);
        for name in ["rr", "d1", "d2", "d3", "d4"] {
            assert_eq!(config.find_target(name).unwrap().name(), name);
        }
        assert_eq!(config.find_target("rr").unwrap().kind(), "round-robin");
        assert!(config.find_target("d5").is_none());
        assert_eq!(config.resolve("Direct", Level::Info).len(), 2);
    }

    #[test]
    fn test_from_description_registers_wrapped_targets() {
        let dir = tempfile::TempDir::new().unwrap();
        let description: LoggingConfig = serde_yaml::from_str(
            r#"
targets:
  - name: b
    type: buffering
    bufferSize: 19
    target:
      name: a
      type: buffering
      buffer_size: 1
      target: { name: c, type: file, path: c.log, layout: "${message}" }
rules:
  - { logger: "*", write_to: b }
"#,
        )
        .unwrap();
        let config = Configuration::from_description(&description, Some(dir.path())).unwrap();

        assert_eq!(config.targets().len(), 1);
        assert_eq!(config.find_target("b").unwrap().kind(), "buffering");
        assert_eq!(config.find_target("a").unwrap().kind(), "buffering");
        assert_eq!(config.find_target("c").unwrap().kind(), "file");

        let targets = config.resolve("App", Level::Info);
        assert_eq!(targets.len(), 1);
        let event = |i: usize| LogEvent::new(Level::Info, "App".into(), i.to_string());
        for i in 0..18 {
            targets[0].write(&event(i)).unwrap();
        }
        let log = dir.path().join("c.log");
        assert!(!log.exists());

        targets[0].write(&event(18)).unwrap();
        let written = std::fs::read_to_string(&log).unwrap();
        assert_eq!(written.lines().count(), 19);
        assert!(written.starts_with("0\n1\n"));
    }

    #[test]
    fn test_from_description_rejects_duplicate_child_names() {
        let description: LoggingConfig = serde_yaml::from_str(
            r#"
targets:
  - { name: a, type: memory }
  - name: g
    type: split
    targets:
      - { name: a, type: "null" }
rules: []
"#,
        )
        .unwrap();
        assert!(Configuration::from_description(&description, None).is_err());
    }

    #[test]
    fn test_debug_lists_names() {
        let config = Configuration::builder()
            .target(memory("mem"))
            .rule(Rule::new("App.*", Level::Info).unwrap().write_to("mem"))
            .build()
            .unwrap();
        let text = format!("{config:?}");
        assert!(text.contains("mem"));
        assert!(text.contains("App.*"));
    }
}
