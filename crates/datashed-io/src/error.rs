//! Error types for datashed-io.

use std::path::PathBuf;

use datashed_core::{Suffix, TableError, ValueKind};
use thiserror::Error;

/// Result type for datashed-io operations.
pub type Result<T> = std::result::Result<T, IoError>;

/// Errors that can occur during registry lookup and file I/O.
///
/// Failures from the underlying format crates convert in via `#[from]` and
/// keep their source chain; nothing is retried or silently recovered.
#[derive(Debug, Error)]
pub enum IoError {
    /// No loader registered for the suffix.
    #[error("no loader registered for {0}")]
    NoLoader(Suffix),

    /// No dumper registered for the suffix and value kind.
    #[error("no dumper registered for {suffix} and {kind} values")]
    NoDumper { suffix: Suffix, kind: ValueKind },

    /// The path has no extension to dispatch on.
    #[error("cannot infer format: {} has no extension", .0.display())]
    MissingSuffix(PathBuf),

    /// Directory name not present in the manager.
    #[error("unknown directory key {0:?}")]
    UnknownDirectory(String),

    /// Alias registration would create a chain or cycle.
    #[error("invalid suffix alias: {0}")]
    InvalidAlias(String),

    /// A value the target format cannot represent.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Malformed tabular data.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Error from the storage layer.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "yaml")]
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[cfg(feature = "toml")]
    #[error("toml parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[cfg(feature = "toml")]
    #[error("toml write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[cfg(feature = "csv")]
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "bincode")]
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[cfg(feature = "parquet")]
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[cfg(feature = "parquet")]
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
