//! One-time engine initialization.
//!
//! The engine resource is a configuration file found through a
//! [`ResourceLocator`]. The first successful [`Engine::initialize`] installs
//! it; later calls do nothing and report success. A failed attempt leaves
//! the engine uninitialized, so it may be retried.

use crate::diagnostics;
use crate::factory::LogFactory;
use logshim_types::{bail, LogShimError, Result};
use once_cell::sync::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default resource file name for [`ResourceLocator::local`].
pub const DEFAULT_RESOURCE: &str = "logshim.yaml";

type DiscoverFn = Box<dyn Fn() -> Option<PathBuf> + Send + Sync>;

/// Where to find the engine resource.
pub enum ResourceLocator {
    /// An explicit path
    Path(PathBuf),
    /// A file name next to the running executable
    ExecutableDir(String),
    /// A discovery function; `None` means nothing was found
    Discover(DiscoverFn),
}

impl ResourceLocator {
    /// `logshim.yaml` next to the running executable.
    pub fn local() -> Self {
        ResourceLocator::ExecutableDir(DEFAULT_RESOURCE.to_string())
    }

    /// Locator backed by a discovery function.
    pub fn discover<F>(f: F) -> Self
    where
        F: Fn() -> Option<PathBuf> + Send + Sync + 'static,
    {
        ResourceLocator::Discover(Box::new(f))
    }

    /// Resolve to an existing file.
    pub fn locate(&self) -> Result<PathBuf> {
        let path = match self {
            ResourceLocator::Path(path) => path.clone(),
            ResourceLocator::ExecutableDir(file_name) => executable_dir()?.join(file_name),
            ResourceLocator::Discover(discover) => match discover() {
                Some(path) => path,
                None => bail!(Initialization, "Discovery found no engine resource"),
            },
        };
        if !path.is_file() {
            bail!(Initialization, "Engine resource not found at {}", path.display());
        }
        Ok(path)
    }
}

impl From<PathBuf> for ResourceLocator {
    fn from(path: PathBuf) -> Self {
        ResourceLocator::Path(path)
    }
}

impl From<&Path> for ResourceLocator {
    fn from(path: &Path) -> Self {
        ResourceLocator::Path(path.to_path_buf())
    }
}

impl fmt::Debug for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLocator::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ResourceLocator::ExecutableDir(name) => f.debug_tuple("ExecutableDir").field(name).finish(),
            ResourceLocator::Discover(_) => f.write_str("Discover(..)"),
        }
    }
}

fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| LogShimError::Initialization(format!("Cannot locate executable: {e}")))?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| LogShimError::Initialization("Executable has no parent directory".to_string()))
}

/// Tracks whether the engine resource has been installed.
#[derive(Debug, Default)]
pub struct Engine {
    initialized: OnceCell<PathBuf>,
}

impl Engine {
    /// An uninitialized engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locate and install the engine resource into `factory`.
    ///
    /// Only the first success has an effect. Returns the resource in use.
    pub fn initialize(&self, factory: &LogFactory, locator: &ResourceLocator) -> Result<PathBuf> {
        let result = self.initialized.get_or_try_init(|| {
            let path = locator.locate()?;
            factory
                .load_configuration_from_file(&path)
                .map_err(|e| LogShimError::Initialization(e.to_string()))?;
            Ok::<_, LogShimError>(path)
        });
        match result {
            Ok(path) => Ok(path.clone()),
            Err(e) => {
                diagnostics::initialization_failed(&e);
                Err(e)
            }
        }
    }

    /// Whether an initialization has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized.get().is_some()
    }

    /// Resource installed by the successful initialization, if any.
    pub fn resource(&self) -> Option<&Path> {
        self.initialized.get().map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logshim_types::Level;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    const CONFIG: &str = "targets: [{ name: m, type: memory }]\nrules: [{ logger: '*', write_to: m }]\n";

    #[test]
    fn test_missing_then_success_then_no_op() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("engine.yaml");
        let factory = LogFactory::new();
        let engine = Engine::new();
        let locator = ResourceLocator::Path(path.clone());

        assert!(matches!(
            engine.initialize(&factory, &locator),
            Err(LogShimError::Initialization(_))
        ));
        assert!(!engine.is_initialized());
        assert!(!factory.get_logger("x").is_enabled(Level::Fatal));

        fs::write(&path, CONFIG).unwrap();
        assert_eq!(engine.initialize(&factory, &locator).unwrap(), path);
        assert!(engine.is_initialized());
        let version = factory.configuration().version();
        assert!(factory.get_logger("x").is_enabled(Level::Trace));

        // A later call keeps the installed configuration, even with another resource.
        let other = ResourceLocator::Path(dir.path().join("other.yaml"));
        assert_eq!(engine.initialize(&factory, &other).unwrap(), path);
        assert_eq!(factory.configuration().version(), version);
        assert_eq!(engine.resource(), Some(path.as_path()));
    }

    #[test]
    fn test_invalid_resource_leaves_engine_uninitialized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "rules: [{ logger: '*', write_to: ghost }]\n").unwrap();
        let factory = LogFactory::new();
        let engine = Engine::new();

        assert!(engine.initialize(&factory, &path.as_path().into()).is_err());
        assert!(!engine.is_initialized());
    }

    #[test]
    fn test_discovery_is_consulted_until_success() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("found.yaml");
        fs::write(&path, CONFIG).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let answer = {
            let calls = calls.clone();
            let path = path.clone();
            ResourceLocator::discover(move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                (n > 0).then(|| path.clone())
            })
        };
        let factory = LogFactory::new();
        let engine = Engine::new();

        assert!(engine.initialize(&factory, &answer).is_err());
        assert!(engine.initialize(&factory, &answer).is_ok());
        assert!(engine.initialize(&factory, &answer).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_local_locator_looks_next_to_executable() {
        let locator = ResourceLocator::local();
        assert!(matches!(&locator, ResourceLocator::ExecutableDir(name) if name == DEFAULT_RESOURCE));
        // Test binaries ship without a resource file.
        assert!(matches!(locator.locate(), Err(LogShimError::Initialization(_))));
    }
}
