//! Routing rules: which loggers and levels go to which targets.

use logshim_types::{bail, Level, Result};
use std::fmt;

/// Compiled logger name pattern.
///
/// A pattern may hold a `*` at the start, at the end, at both ends or be a
/// lone `*`. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePattern {
    /// `*`
    All,
    /// `name`
    Exact(String),
    /// `prefix*`
    Prefix(String),
    /// `*suffix`
    Suffix(String),
    /// `*part*`
    Contains(String),
}

impl NamePattern {
    /// Compile a pattern. Surrounding whitespace is part of the name.
    ///
    /// ```
    /// use logshim_core::rule::NamePattern;
    ///
    /// let p = NamePattern::parse("App.*").unwrap();
    /// assert!(p.matches("App.Network"));
    /// assert!(!p.matches("Other"));
    /// assert!(NamePattern::parse("a*b").is_err());
    /// ```
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern == "*" {
            return Ok(NamePattern::All);
        }

        let leading = pattern.starts_with('*');
        let trailing = pattern.len() > 1 && pattern.ends_with('*');
        let inner = &pattern[usize::from(leading)..pattern.len() - usize::from(trailing)];

        if inner.contains('*') {
            bail!(Validation, "Unsupported wildcard in logger pattern '{}'", pattern);
        }

        let inner = inner.to_string();
        Ok(match (leading, trailing) {
            (true, true) => NamePattern::Contains(inner),
            (true, false) => NamePattern::Suffix(inner),
            (false, true) => NamePattern::Prefix(inner),
            (false, false) => NamePattern::Exact(inner),
        })
    }

    /// Whether `name` matches.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::All => true,
            NamePattern::Exact(exact) => name == exact,
            NamePattern::Prefix(prefix) => name.starts_with(prefix.as_str()),
            NamePattern::Suffix(suffix) => name.ends_with(suffix.as_str()),
            NamePattern::Contains(part) => name.contains(part.as_str()),
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePattern::All => write!(f, "*"),
            NamePattern::Exact(s) => write!(f, "{s}"),
            NamePattern::Prefix(s) => write!(f, "{s}*"),
            NamePattern::Suffix(s) => write!(f, "*{s}"),
            NamePattern::Contains(s) => write!(f, "*{s}*"),
        }
    }
}

/// A routing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pattern: NamePattern,
    min_level: Level,
    max_level: Option<Level>,
    target_names: Vec<String>,
    is_final: bool,
}

impl Rule {
    /// Rule for loggers matching `pattern` at `min_level` and above.
    pub fn new(pattern: &str, min_level: Level) -> Result<Self> {
        Ok(Self {
            pattern: NamePattern::parse(pattern)?,
            min_level,
            max_level: None,
            target_names: Vec::new(),
            is_final: false,
        })
    }

    /// Limit the rule to levels up to and including `level`.
    pub fn max_level(mut self, level: Level) -> Self {
        self.max_level = Some(level);
        self
    }

    /// Add a target by name.
    pub fn write_to(mut self, target: impl Into<String>) -> Self {
        self.target_names.push(target.into());
        self
    }

    /// Stop evaluating later rules once this one applies.
    pub fn final_rule(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Compiled name pattern.
    pub fn pattern(&self) -> &NamePattern {
        &self.pattern
    }

    /// Lowest level.
    pub fn min(&self) -> Level {
        self.min_level
    }

    /// Highest level, if bounded.
    pub fn max(&self) -> Option<Level> {
        self.max_level
    }

    /// Target names in declaration order.
    pub fn target_names(&self) -> &[String] {
        &self.target_names
    }

    /// Whether the rule is final.
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Whether the rule applies to `name` at `level`.
    pub fn applies(&self, name: &str, level: Level) -> bool {
        self.covers(level) && self.pattern.matches(name)
    }

    fn covers(&self, level: Level) -> bool {
        level >= self.min_level && self.max_level.map_or(true, |max| level <= max)
    }
}
