//! Loader and dumper traits, and the option structs passed through to them.

use std::fmt;
use std::path::Path;

use datashed_core::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Trait for format loaders.
///
/// Implement this trait to add support for reading a new file format.
/// Plain functions and closures with the matching signature also qualify
/// through the blanket impl.
pub trait Loader: Send + Sync {
    /// Read the file at `path` and convert it to a [`Value`].
    fn load(&self, path: &Path, options: &ReadOptions) -> Result<Value>;
}

impl<F> Loader for F
where
    F: Fn(&Path, &ReadOptions) -> Result<Value> + Send + Sync,
{
    fn load(&self, path: &Path, options: &ReadOptions) -> Result<Value> {
        self(path, options)
    }
}

impl fmt::Debug for dyn Loader + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Loader")
    }
}

/// Trait for format dumpers.
///
/// Implement this trait to add support for writing a new file format, or
/// register a matching function/closure directly.
pub trait Dumper: Send + Sync {
    /// Write `value` to the file at `path`.
    fn dump(&self, value: &Value, path: &Path, options: &WriteOptions) -> Result<()>;
}

impl<F> Dumper for F
where
    F: Fn(&Value, &Path, &WriteOptions) -> Result<()> + Send + Sync,
{
    fn dump(&self, value: &Value, path: &Path, options: &WriteOptions) -> Result<()> {
        self(value, path, options)
    }
}

/// Options for loading files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Format-specific options forwarded to the loader (e.g. `delimiter`
    /// for CSV).
    pub format_options: IndexMap<String, String>,
}

impl ReadOptions {
    /// Create default read options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a format-specific option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.format_options.insert(key.into(), value.into());
        self
    }
}

/// Options for dumping files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Create missing parent directories before writing. Defaults to true.
    pub mkdir: bool,
    /// Pretty-print text formats.
    pub pretty: bool,
    /// Format-specific options forwarded to the dumper.
    pub format_options: IndexMap<String, String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            mkdir: true,
            pretty: false,
            format_options: IndexMap::new(),
        }
    }
}

impl WriteOptions {
    /// Create default write options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-print output.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Fail instead of creating missing parent directories.
    pub fn no_mkdir(mut self) -> Self {
        self.mkdir = false;
        self
    }

    /// Set a format-specific option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.format_options.insert(key.into(), value.into());
        self
    }
}
