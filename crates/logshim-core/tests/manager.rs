//! Process-wide manager and flat call surface.

use logshim_core::{api, shim_info, FormatArg, Level, LogManager};
use parking_lot::Mutex;
use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::thread;
use tempfile::TempDir;

// Every test here changes the one process-wide configuration.
static SERIAL: Mutex<()> = Mutex::new(());

const FILE_CONFIG: &str = r#"
targets:
  - { name: file, type: file, path: out.log, layout: "${level}|${logger}|${message}" }
rules:
  - { logger: "*", min_level: info, write_to: file }
"#;

fn write_config(dir: &TempDir, file: &str, body: &str) -> PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, body).unwrap();
    path
}

fn read_log(dir: &TempDir) -> Vec<String> {
    LogManager::flush();
    fs::read_to_string(dir.path().join("out.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

#[test]
fn test_unconfigured_logging_is_a_no_op() {
    let _guard = SERIAL.lock();
    LogManager::shutdown();

    for level in Level::ALL {
        assert!(!api::is_enabled(level, "Anything"));
    }
    api::fatal("Anything", "dropped %d", &[1.into()]);
    assert!(LogManager::configuration().targets().is_empty());
}

#[test]
fn test_load_and_log_through_api() {
    let _guard = SERIAL.lock();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "logshim.yaml", FILE_CONFIG);

    assert!(api::load_configuration_from_file(&path.display().to_string()));
    assert!(api::is_enabled(Level::Info, "App"));
    assert!(!api::is_enabled(Level::Debug, "App"));

    api::info("App", "value=%d", &[42.into()]);
    api::debug("App", "suppressed", &[]);
    api::warn_wide(&wide("Wide"), &wide("%s!"), &[FormatArg::Str("hi")]);
    api::log(Level::Error, "App", "100% literal", &[]);

    assert_eq!(
        read_log(&dir),
        vec!["Info|App|value=42", "Warn|Wide|hi!", "Error|App|100% literal"]
    );
    LogManager::shutdown();
}

#[test]
fn test_failed_load_keeps_previous_configuration() {
    let _guard = SERIAL.lock();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "logshim.yaml", FILE_CONFIG);
    assert!(api::load_configuration_from_file_wide(&wide(&path.display().to_string())));
    let version = LogManager::configuration().version();

    let missing = dir.path().join("does-not-exist.yaml");
    assert!(!api::load_configuration_from_file(&missing.display().to_string()));
    let broken = write_config(&dir, "broken.yaml", "rules: [{ logger: 'a*b', write_to: x }]\n");
    assert!(!api::load_configuration_from_file(&broken.display().to_string()));

    assert_eq!(LogManager::configuration().version(), version);
    api::error("App", "still routed", &[]);
    assert_eq!(read_log(&dir), vec!["Error|App|still routed"]);
    LogManager::shutdown();
}

#[test]
fn test_handles_for_one_name_behave_identically() {
    let _guard = SERIAL.lock();
    let dir = TempDir::new().unwrap();
    LogManager::load_configuration_from_file(write_config(&dir, "c.yaml", FILE_CONFIG)).unwrap();

    let first = LogManager::get_logger("X");
    let second = LogManager::get_logger("X");
    assert!(first.same_as(&second));
    for level in Level::ALL {
        assert_eq!(first.is_enabled(level), second.is_enabled(level));
    }
    first.info("one", &[]);
    second.info("two", &[]);
    assert_eq!(read_log(&dir), vec!["Info|X|one", "Info|X|two"]);
    LogManager::shutdown();
}

#[test]
fn test_concurrent_callers_lose_nothing() {
    const THREADS: usize = 6;
    const CALLS: usize = 200;
    let _guard = SERIAL.lock();
    let dir = TempDir::new().unwrap();
    LogManager::load_configuration_from_file(write_config(&dir, "c.yaml", FILE_CONFIG)).unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            thread::spawn(move || {
                for i in 0..CALLS {
                    api::info("Worker", "t=%d i=%d", &[t.into(), i.into()]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(read_log(&dir).len(), THREADS * CALLS);
    LogManager::shutdown();
}

#[test]
fn test_macro_defers_arguments_on_global_logger() {
    let _guard = SERIAL.lock();
    LogManager::shutdown();
    let logger = LogManager::get_logger("Lazy");
    let evaluated = Cell::new(false);
    shim_info!(logger, "%d", {
        evaluated.set(true);
        1
    });
    assert!(!evaluated.get());
}
