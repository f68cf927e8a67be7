//! Reading configuration files.

use crate::configuration::Configuration;
use logshim_types::config::LoggingConfig;
use logshim_types::{LogShimError, Result};
use std::fs;
use std::path::Path;

/// Parse a YAML description.
pub fn parse_description(content: &str) -> Result<LoggingConfig> {
    serde_yaml::from_str(content).map_err(LogShimError::Yaml)
}

/// Read a description from disk. `.json` files are parsed as JSON,
/// everything else as YAML.
pub fn load_description(path: impl AsRef<Path>) -> Result<LoggingConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        parse_description(&content)
    }
}

/// Read, build and validate a configuration file.
///
/// Every failure is reported as [`LogShimError::ConfigurationLoad`] naming
/// the file. Relative file target paths resolve against the file's
/// directory.
pub fn load_configuration(path: impl AsRef<Path>) -> Result<Configuration> {
    let path = path.as_ref();
    let labelled = |e: LogShimError| e.into_load_error(path.display());
    let description = load_description(path).map_err(labelled)?;
    Configuration::from_description(&description, path.parent()).map_err(labelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logshim_types::Level;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_and_json_descriptions() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("a.yaml");
        fs::write(&yaml, "threshold: info\n").unwrap();
        assert_eq!(load_description(&yaml).unwrap().threshold, Some(Level::Info));

        let json = dir.path().join("a.JSON");
        fs::write(
            &json,
            r#"{"targets":[{"name":"n","type":"null"}],"rules":[{"logger":"*","write_to":"n"}]}"#,
        )
        .unwrap();
        let description = load_description(&json).unwrap();
        assert_eq!(description.targets.len(), 1);
        assert_eq!(description.rules[0].write_to, vec!["n"]);
    }

    #[test]
    fn test_errors_become_load_errors() {
        let dir = TempDir::new().unwrap();

        let missing = load_configuration(dir.path().join("none.yaml"));
        assert!(matches!(missing, Err(LogShimError::ConfigurationLoad(msg)) if msg.contains("none.yaml")));

        let malformed = dir.path().join("bad.yaml");
        fs::write(&malformed, "targets: [ {").unwrap();
        assert!(matches!(load_configuration(&malformed), Err(LogShimError::ConfigurationLoad(_))));

        let bad_level = dir.path().join("level.yaml");
        fs::write(&bad_level, "threshold: loud\n").unwrap();
        assert!(matches!(load_configuration(&bad_level), Err(LogShimError::ConfigurationLoad(_))));

        let bad_pattern = dir.path().join("pattern.yaml");
        fs::write(
            &bad_pattern,
            "targets: [{ name: n, type: 'null' }]\nrules: [{ logger: 'a*b', write_to: n }]\n",
        )
        .unwrap();
        assert!(matches!(load_configuration(&bad_pattern), Err(LogShimError::ConfigurationLoad(msg)) if msg.contains("a*b")));
    }

    #[test]
    fn test_relative_file_paths_follow_the_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logshim.yaml");
        fs::write(
            &path,
            "targets: [{ name: f, type: file, path: logs/x.log, layout: '${message}' }]\nrules: [{ logger: '*', write_to: f }]\n",
        )
        .unwrap();
        let config = load_configuration(&path).unwrap();
        let target = config.find_target("f").unwrap();
        let event = logshim_types::LogEvent::new(Level::Info, "r".into(), "here");
        target.write(&event).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("logs/x.log")).unwrap(), "here\n");
    }
}
