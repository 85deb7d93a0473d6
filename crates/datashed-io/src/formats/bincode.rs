//! Binary loader and dumper backed by bincode.
//!
//! `.bin` (alias `.bincode`) round-trips any [`Value`] through bincode's
//! compact representation, including tables. This is the catch-all binary
//! format for intermediate pipeline state.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use datashed_core::Value;

use crate::error::Result;
use crate::registry::{Dumper, Loader, ReadOptions, WriteOptions};

/// Loader for `.bin` files.
pub struct BincodeLoader;

impl Loader for BincodeLoader {
    fn load(&self, path: &Path, _options: &ReadOptions) -> Result<Value> {
        let file = File::open(path)?;
        Ok(bincode::deserialize_from(BufReader::new(file))?)
    }
}

/// Dumper for `.bin` files.
pub struct BincodeDumper;

impl Dumper for BincodeDumper {
    fn dump(&self, value: &Value, path: &Path, _options: &WriteOptions) -> Result<()> {
        let file = File::create(path)?;
        bincode::serialize_into(BufWriter::new(file), value)?;
        Ok(())
    }
}
