//! datashed-io: extension-dispatched file I/O for data pipelines.
//!
//! One call loads or saves a file regardless of its format. Formats are
//! looked up by file extension in a [`FormatRegistry`]; custom formats
//! plug in by registering a [`Loader`] or [`Dumper`]. The [`IoManager`]
//! layers named directories on top, so pipeline code addresses files by a
//! logical key plus a relative path.
//!
//! # Supported formats
//!
//! | Suffix | Loads | Dumps | Backed by |
//! |--------|-------|-------|-----------|
//! | `.csv` | table | table | `csv` |
//! | `.parquet` | table | table | `parquet` |
//! | `.json` | any | any (tables as row records) | `serde_json` |
//! | `.yaml`, `.yml` | any | any except tables | `serde_yaml` |
//! | `.toml` | mapping | mapping | `toml` |
//! | `.bin`, `.bincode` | any | any | `bincode` |
//!
//! # Quick start
//!
//! ```no_run
//! use datashed_io::{dump, load};
//!
//! # fn main() -> datashed_io::Result<()> {
//! let data = load("input/config.yaml")?;
//! dump(&data, "output/config.json")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! All formats convert to and from a common [`Value`] representation:
//!
//! ```text
//! CSV  ─┐              ┌─> CSV
//! JSON ─┼─> Value ─────┼─> JSON
//! YAML ─┤              ├─> YAML
//! ...  ─┘              └─> ...
//! ```
//!
//! Dumpers are additionally selected by the value's kind, so one suffix
//! can carry a generic handler plus specialized ones (`.json` writes
//! tables as row records through a dedicated dumper).
//!
//! # Custom formats
//!
//! ```
//! use datashed_io::{FormatRegistry, ReadOptions, Result, Value};
//! use std::path::Path;
//!
//! fn load_lines(path: &Path, _options: &ReadOptions) -> Result<Value> {
//!     let text = std::fs::read_to_string(path)?;
//!     Ok(Value::Array(text.lines().map(Value::from).collect()))
//! }
//!
//! let mut registry = FormatRegistry::with_defaults();
//! registry.register_loader(".txt", load_lines);
//! ```

pub mod error;
pub mod formats;
pub mod manager;
pub mod registry;

pub use error::{IoError, Result};
pub use manager::IoManager;
pub use registry::{Dumper, FormatRegistry, Loader, ReadOptions, WriteOptions};

// Re-export the value model types.
pub use datashed_core::{Suffix, Table, TableError, Value, ValueKind};

use std::path::Path;

/// Load a file through a fresh default registry.
///
/// Convenience for one-off calls; pipelines that load many files should
/// build a [`FormatRegistry`] (or [`IoManager`]) once and reuse it.
pub fn load(path: impl AsRef<Path>) -> Result<Value> {
    load_with(path, &ReadOptions::default())
}

/// Load a file through a fresh default registry, with options.
pub fn load_with(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Value> {
    FormatRegistry::with_defaults().load(path, options)
}

/// Dump a value through a fresh default registry.
pub fn dump(value: &Value, path: impl AsRef<Path>) -> Result<()> {
    dump_with(value, path, &WriteOptions::default())
}

/// Dump a value through a fresh default registry, with options.
pub fn dump_with(value: &Value, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
    FormatRegistry::with_defaults().dump(value, path, options)
}
