//! Core types for the datashed I/O toolkit.
//!
//! This crate provides the foundational types used by `datashed-io`:
//! - [`Value`]: the common in-memory representation all formats convert to and from
//! - [`ValueKind`]: the coarse runtime category of a value, used for dumper dispatch
//! - [`Table`]: a minimal column-oriented tabular value
//! - [`Suffix`]: normalized file-extension dispatch key

pub mod suffix;
pub mod table;
pub mod value;

pub use suffix::*;
pub use table::*;
pub use value::*;
