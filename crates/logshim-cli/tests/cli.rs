//! End-to-end tests of the `logshim` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
targets:
  - { name: out, type: file, path: out.log, layout: "${level}|${logger}|${message}" }
  - name: pair
    type: split
    targets:
      - { name: sink-a, type: "null" }
      - { name: sink-b, type: "null" }
rules:
  - { logger: "App.*", min_level: warn, write_to: [out, pair], final: true }
  - { logger: "*", min_level: info, write_to: out }
"#;

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logshim.yaml");
    fs::write(&path, CONFIG).unwrap();
    (dir, path)
}

fn logshim() -> Command {
    Command::cargo_bin("logshim").unwrap()
}

#[test]
fn test_check_lists_targets_and_rules() {
    let (_dir, path) = setup();
    logshim()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("out"))
        .stdout(predicate::str::contains("pair"))
        .stdout(predicate::str::contains("(final)"));
}

#[test]
fn test_check_rejects_invalid_configuration() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "rules: [{ logger: '*', write_to: ghost }]\n").unwrap();
    logshim()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_resolve_shows_final_rule() {
    let (_dir, path) = setup();
    logshim()
        .arg("resolve")
        .arg(&path)
        .arg("App.Net")
        .assert()
        .success()
        .stdout(predicate::str::contains("out, pair"));
}

#[test]
fn test_log_writes_formatted_message() {
    let (dir, path) = setup();
    logshim()
        .arg("log")
        .arg(&path)
        .args(["--level", "error", "--logger", "Lib", "%s=%d", "answer", "42"])
        .assert()
        .success();
    let written = fs::read_to_string(dir.path().join("out.log")).unwrap();
    assert_eq!(written, "Error|Lib|answer=42\n");
}

#[test]
fn test_version() {
    logshim()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_verbose_lists_defaults() {
    logshim()
        .args(["version", "--verbose"])
        .env_remove("LOGSHIM_LOG")
        .assert()
        .success()
        .stdout(predicate::str::contains("logshim.yaml"))
        .stdout(predicate::str::contains("${longdate}"))
        .stdout(predicate::str::contains("logshim=warn"))
        .stdout(predicate::str::contains("8192 bytes"));
}
