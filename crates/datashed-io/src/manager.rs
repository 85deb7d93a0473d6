//! Named-directory manager over a format registry.

use std::fmt;
use std::ops::Index;
use std::path::{Path, PathBuf};

use datashed_core::Value;
use indexmap::IndexMap;

use crate::error::{IoError, Result};
use crate::registry::{FormatRegistry, ReadOptions, WriteOptions};

/// Pairs named directories with format-dispatched load/dump.
///
/// A manager owns a [`FormatRegistry`] plus a table of logical directory
/// names, so pipeline code addresses files as `("output",
/// "model/params.json")` instead of building paths by hand. Directory
/// paths are stored as given and never checked for existence; a missing
/// directory surfaces as the underlying not-found error when a file is
/// actually read.
///
/// ```no_run
/// use datashed_io::{IoManager, ReadOptions, WriteOptions};
///
/// # fn main() -> datashed_io::Result<()> {
/// let iom = IoManager::new()
///     .with_dir("raw", "/data/raw")
///     .with_dir("output", "/data/output");
///
/// let config = iom.load("raw", "run.yaml", &ReadOptions::new())?;
/// iom.dump(&config, "output", "run/config.json", &WriteOptions::new())?;
/// # Ok(())
/// # }
/// ```
pub struct IoManager {
    registry: FormatRegistry,
    dirs: IndexMap<String, PathBuf>,
}

impl Default for IoManager {
    fn default() -> Self {
        Self::new()
    }
}

impl IoManager {
    /// Create a manager over the default registry (all built-in formats).
    pub fn new() -> Self {
        Self::with_registry(FormatRegistry::with_defaults())
    }

    /// Create a manager over a custom registry.
    pub fn with_registry(registry: FormatRegistry) -> Self {
        Self {
            registry,
            dirs: IndexMap::new(),
        }
    }

    /// Add a named directory, replacing any existing entry with that name.
    pub fn add_dir(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.dirs.insert(name.into(), path.into());
    }

    /// Builder form of [`add_dir`](Self::add_dir).
    pub fn with_dir(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.add_dir(name, path);
        self
    }

    /// Remove a named directory, returning its path if it was present.
    pub fn remove_dir(&mut self, name: &str) -> Option<PathBuf> {
        self.dirs.shift_remove(name)
    }

    /// The directory registered under `name`.
    pub fn dir(&self, name: &str) -> Result<&Path> {
        self.dirs
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| IoError::UnknownDirectory(name.to_string()))
    }

    /// Join a registered directory with a relative path.
    pub fn path(&self, name: &str, sub_path: impl AsRef<Path>) -> Result<PathBuf> {
        Ok(self.dir(name)?.join(sub_path))
    }

    /// Load a file from a registered directory, dispatching on its
    /// extension.
    pub fn load(
        &self,
        name: &str,
        sub_path: impl AsRef<Path>,
        options: &ReadOptions,
    ) -> Result<Value> {
        let path = self.path(name, sub_path)?;
        self.registry.load(path, options)
    }

    /// Dump a value into a registered directory, dispatching on the
    /// extension and the value's kind. Missing parent directories are
    /// created unless `options.mkdir` is cleared.
    pub fn dump(
        &self,
        value: &Value,
        name: &str,
        sub_path: impl AsRef<Path>,
        options: &WriteOptions,
    ) -> Result<()> {
        let path = self.path(name, sub_path)?;
        self.registry.dump(value, path, options)
    }

    /// Registered directory names, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dirs.keys().map(String::as_str)
    }

    /// Number of registered directories.
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Whether no directories are registered.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// The underlying format registry.
    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Mutable access to the registry, e.g. for registering custom
    /// formats after construction.
    pub fn registry_mut(&mut self) -> &mut FormatRegistry {
        &mut self.registry
    }
}

impl Index<&str> for IoManager {
    type Output = Path;

    /// Bracket access to a registered directory.
    ///
    /// Panics if `name` is not registered; use [`dir`](IoManager::dir) for
    /// a fallible lookup.
    fn index(&self, name: &str) -> &Path {
        match self.dir(name) {
            Ok(path) => path,
            Err(_) => panic!("no directory registered under {name:?}"),
        }
    }
}

impl fmt::Debug for IoManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoManager")
            .field("dirs", &self.dirs)
            .finish_non_exhaustive()
    }
}
