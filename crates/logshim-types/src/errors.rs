//! Error types for logshim operations.

use thiserror::Error;

/// The main error type for logshim operations.
///
/// Every variant is recovered at the boundary closest to its cause: loaders
/// turn errors into "configuration unchanged", the dispatcher turns sink
/// failures into internal diagnostics, and the native call surface turns
/// everything into `0` return codes. None of them ever reach a caller of
/// `Logger::log`.
#[derive(Error, Debug)]
pub enum LogShimError {
    /// The configuration source was unreadable, malformed or inconsistent
    #[error("Configuration load error: {0}")]
    ConfigurationLoad(String),

    /// The logging engine resource could not be located or activated
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// A target failed to write or flush
    #[error("Write to target '{target}' failed: {source}")]
    SinkWrite {
        /// Name of the failing target
        target: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Validation error (bad level name, bad pattern, bad rule)
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl LogShimError {
    /// Wrap an I/O failure of the named target.
    pub fn sink(target: impl Into<String>, source: std::io::Error) -> Self {
        LogShimError::SinkWrite {
            target: target.into(),
            source,
        }
    }

    /// Re-label any error as a load failure of `source`, keeping its message.
    pub fn into_load_error(self, source: impl std::fmt::Display) -> Self {
        match self {
            LogShimError::ConfigurationLoad(msg) => {
                LogShimError::ConfigurationLoad(format!("{source}: {msg}"))
            }
            other => LogShimError::ConfigurationLoad(format!("{source}: {other}")),
        }
    }
}

/// A specialized Result type for logshim operations.
pub type Result<T> = std::result::Result<T, LogShimError>;

/// Helper macro to bail out with a LogShimError
///
/// This is used for expected error conditions.
///
/// # Example
///
/// ```ignore
/// if names.contains(name) {
///     bail!(Validation, "Duplicate target name '{}'", name);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::LogShimError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogShimError::$variant(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_load_error_keeps_message() {
        let err = LogShimError::Validation("bad level".to_string()).into_load_error("app.yaml");
        match err {
            LogShimError::ConfigurationLoad(msg) => {
                assert!(msg.starts_with("app.yaml: "));
                assert!(msg.contains("bad level"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let nested = LogShimError::ConfigurationLoad("empty".to_string()).into_load_error("b.json");
        assert_eq!(nested.to_string(), "Configuration load error: b.json: empty");
    }

    #[test]
    fn test_sink_error_display() {
        let err = LogShimError::sink(
            "app",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Write to target 'app' failed: denied");
    }
}
