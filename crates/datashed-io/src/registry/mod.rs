//! Format registry and handler traits.

mod registry;
mod traits;

pub use registry::FormatRegistry;
pub use traits::{Dumper, Loader, ReadOptions, WriteOptions};
