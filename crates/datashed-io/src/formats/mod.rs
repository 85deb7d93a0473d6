//! Built-in format handlers.
//!
//! Each module pairs a loader with one or more dumpers for a single
//! on-disk format. Modules are feature-gated together with the format
//! crate they wrap; `FormatRegistry::with_defaults` registers whatever is
//! enabled.

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "yaml")]
pub mod yaml;

#[cfg(feature = "toml")]
pub mod toml;

#[cfg(feature = "csv")]
pub mod csv;

#[cfg(feature = "bincode")]
pub mod bincode;

#[cfg(feature = "parquet")]
pub mod parquet;
