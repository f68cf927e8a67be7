//! Severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{LogShimError, Result};

/// Number of severity levels.
pub const LEVEL_COUNT: usize = 6;

/// Message severity, ordered from least to most important.
///
/// The ordering is fixed: `Trace < Debug < Info < Warn < Error < Fatal`.
/// Configurations only choose thresholds on it, they never reorder it.
///
/// # Example
///
/// ```
/// use logshim_types::Level;
///
/// let level: Level = "warning".parse().unwrap();
/// assert_eq!(level, Level::Warn);
/// assert!(Level::Debug < level);
/// assert_eq!(Level::from_ordinal(5), Some(Level::Fatal));
/// assert_eq!(Level::from_ordinal(6), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Level {
    /// Very detailed tracing output
    Trace = 0,
    /// Debugging output
    Debug = 1,
    /// Informational messages
    Info = 2,
    /// Warnings
    Warn = 3,
    /// Errors the application survives
    Error = 4,
    /// Errors the application does not survive
    Fatal = 5,
}

impl Level {
    /// All levels in ascending order.
    pub const ALL: [Level; LEVEL_COUNT] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Convert a native ordinal (`0` = trace ... `5` = fatal).
    ///
    /// Any other value is not a level; callers treat it as "never enabled".
    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Position of this level in [`Level::ALL`].
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Level name as rendered by `${level}`.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "Trace",
            Level::Debug => "Debug",
            Level::Info => "Info",
            Level::Warn => "Warn",
            Level::Error => "Error",
            Level::Fatal => "Fatal",
        }
    }
}

impl FromStr for Level {
    type Err = LogShimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "FATAL" => Ok(Level::Fatal),
            _ => Err(LogShimError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

impl TryFrom<String> for Level {
    type Error = LogShimError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_lowercase()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_ordering_is_fixed() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(Level::ALL.len(), LEVEL_COUNT);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("TRACE".parse::<Level>().unwrap(), Level::Trace);
        assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!(" Info ".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("Warning".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("fatal".parse::<Level>().unwrap(), Level::Fatal);
        assert!("off".parse::<Level>().is_err());
        assert!("".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_ordinals() {
        for (i, level) in Level::ALL.iter().enumerate() {
            assert_eq!(level.ordinal(), i);
            assert_eq!(Level::from_ordinal(i as i32), Some(*level));
        }
        assert_eq!(Level::from_ordinal(-1), None);
        assert_eq!(Level::from_ordinal(42), None);
    }

    #[test]
    fn test_level_serde_roundtrip_is_case_insensitive() {
        let level: Level = serde_yaml::from_str("WARN").unwrap();
        assert_eq!(level, Level::Warn);
        assert_eq!(serde_yaml::to_string(&Level::Error).unwrap().trim(), "error");
        assert!(serde_yaml::from_str::<Level>("loud").is_err());
    }

    proptest! {
        #[test]
        fn prop_names_parse_back_in_any_case(i in 0usize..LEVEL_COUNT, upper in any::<bool>()) {
            let level = Level::ALL[i];
            let name = if upper { level.as_str().to_uppercase() } else { level.as_str().to_lowercase() };
            prop_assert_eq!(name.parse::<Level>().unwrap(), level);
        }

        #[test]
        fn prop_out_of_range_ordinals_are_rejected(v in any::<i32>()) {
            prop_assert_eq!(Level::from_ordinal(v).is_some(), (0..6).contains(&v));
        }
    }
}
