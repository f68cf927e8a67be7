//! Configuration description types.
//!
//! These are the parsed, not yet validated, shape of a configuration file.
//! `logshim-core` turns a [`LoggingConfig`] into an immutable configuration
//! snapshot with live targets.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use crate::Level;

/// Top-level configuration description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Events below this level are dropped regardless of the rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Level>,
    /// Target declarations
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
    /// Routing rules, evaluated in order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Console stream selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    /// Standard output
    #[default]
    Stdout,
    /// Standard error
    Stderr,
}

/// Target declaration, tagged by its `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TargetConfig {
    /// Discards every event
    Null {
        /// Target name
        name: String,
    },
    /// Writes to stdout or stderr
    Console {
        /// Target name
        name: String,
        /// Output stream
        #[serde(default)]
        stream: ConsoleStream,
        /// Colour lines by level
        #[serde(default)]
        colored: bool,
        /// Layout text, defaults to the standard layout
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layout: Option<String>,
    },
    /// Appends to a file
    File {
        /// Target name
        name: String,
        /// File path, relative paths are resolved against the configuration file
        path: PathBuf,
        /// Layout text, defaults to the standard layout
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layout: Option<String>,
        /// Flush after every event
        #[serde(default = "default_auto_flush")]
        auto_flush: bool,
    },
    /// Keeps rendered lines in memory
    Memory {
        /// Target name
        name: String,
        /// Layout text, defaults to the standard layout
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layout: Option<String>,
    },
    /// Writes every event to all children
    Split {
        /// Target name
        name: String,
        /// Child targets, also registered by their own names
        targets: Vec<TargetConfig>,
    },
    /// Writes each event to the next child in turn
    RoundRobin {
        /// Target name
        name: String,
        /// Child targets, also registered by their own names
        targets: Vec<TargetConfig>,
    },
    /// Holds events and writes them to the wrapped target in batches
    Buffering {
        /// Target name
        name: String,
        /// Events held before they are written
        #[serde(default = "default_buffer_size", alias = "bufferSize")]
        buffer_size: usize,
        /// Wrapped target, also registered by its own name
        target: Box<TargetConfig>,
    },
}

fn default_auto_flush() -> bool {
    true
}

fn default_buffer_size() -> usize {
    100
}

impl TargetConfig {
    /// Name of the declared target.
    pub fn name(&self) -> &str {
        match self {
            TargetConfig::Null { name }
            | TargetConfig::Console { name, .. }
            | TargetConfig::File { name, .. }
            | TargetConfig::Memory { name, .. }
            | TargetConfig::Split { name, .. }
            | TargetConfig::RoundRobin { name, .. }
            | TargetConfig::Buffering { name, .. } => name,
        }
    }

    /// Child declarations of a group or wrapper target.
    pub fn children(&self) -> &[TargetConfig] {
        match self {
            TargetConfig::Split { targets, .. } | TargetConfig::RoundRobin { targets, .. } => {
                targets
            }
            TargetConfig::Buffering { target, .. } => std::slice::from_ref(target.as_ref()),
            _ => &[],
        }
    }
}

/// Routing rule declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Logger name pattern (`*`, `name`, `prefix*`, `*suffix`, `*part*`)
    #[serde(alias = "name")]
    pub logger: String,
    /// Lowest level the rule applies to
    #[serde(default = "default_min_level", alias = "level")]
    pub min_level: Level,
    /// Highest level the rule applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_level: Option<Level>,
    /// Target names, as a list or a comma separated string
    #[serde(deserialize_with = "comma_list", alias = "writeTo")]
    pub write_to: Vec<String>,
    /// Stop evaluating later rules for the levels this rule applies to
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

fn default_min_level() -> Level {
    Level::Trace
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

fn comma_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = match StringOrList::deserialize(deserializer)? {
        StringOrList::One(joined) => joined.split(',').map(str::to_string).collect(),
        StringOrList::Many(names) => names,
    };
    Ok(names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_description() {
        let yaml = r#"
threshold: debug
targets:
  - name: console
    type: console
    stream: stderr
    colored: true
  - name: app
    type: file
    path: logs/app.log
  - name: rr
    type: round-robin
    targets:
      - { name: d1, type: memory, layout: "${message}1" }
      - { name: d2, type: memory, layout: "${message}2" }
rules:
  - logger: "App.*"
    min_level: info
    write_to: "console, app"
    final: true
  - logger: "*"
    write_to: [rr]
"#;
        let config: LoggingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.threshold, Some(Level::Debug));
        assert_eq!(config.targets.len(), 3);
        assert_eq!(config.targets[2].name(), "rr");
        assert_eq!(config.targets[2].children().len(), 2);

        match &config.targets[1] {
            TargetConfig::File { auto_flush, layout, .. } => {
                assert!(*auto_flush);
                assert!(layout.is_none());
            }
            other => panic!("unexpected target: {other:?}"),
        }

        assert_eq!(config.rules[0].write_to, vec!["console", "app"]);
        assert!(config.rules[0].is_final);
        assert_eq!(config.rules[0].min_level, Level::Info);
        assert_eq!(config.rules[1].min_level, Level::Trace);
        assert_eq!(config.rules[1].write_to, vec!["rr"]);
    }

    #[test]
    fn test_parse_buffering_wrapper() {
        let yaml = r#"
targets:
  - name: b
    type: buffering
    bufferSize: 19
    target: { name: c, type: memory, layout: "${message}" }
  - name: d
    type: buffering
    target: { name: e, type: "null" }
"#;
        let config: LoggingConfig = serde_yaml::from_str(yaml).unwrap();
        match &config.targets[0] {
            TargetConfig::Buffering { buffer_size, target, .. } => {
                assert_eq!(*buffer_size, 19);
                assert_eq!(target.name(), "c");
            }
            other => panic!("unexpected target: {other:?}"),
        }
        assert_eq!(config.targets[0].children()[0].name(), "c");
        assert_eq!(config.targets[1].children().len(), 1);
        assert!(config.targets[1].children()[0].children().is_empty());
        assert!(matches!(config.targets[1], TargetConfig::Buffering { buffer_size: 100, .. }));
    }

    #[test]
    fn test_unknown_target_type_is_rejected() {
        let yaml = "targets:\n  - { name: x, type: carrier-pigeon }\n";
        assert!(serde_yaml::from_str::<LoggingConfig>(yaml).is_err());
    }

    #[test]
    fn test_empty_description() {
        let config: LoggingConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, LoggingConfig::default());
    }
}
