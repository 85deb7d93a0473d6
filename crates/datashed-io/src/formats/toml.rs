//! TOML loader and dumper.
//!
//! TOML documents are tables at the top level, so the loader returns a
//! mapping and the dumper is registered for mappings only. TOML has no
//! null; `Value::Null` anywhere in the tree is rejected. Datetimes load
//! as their string form.

use std::fs;
use std::path::Path;

use datashed_core::Value;
use indexmap::IndexMap;
use toml::value::Table as TomlTable;
use toml::Value as TomlValue;

use crate::error::{IoError, Result};
use crate::registry::{Dumper, Loader, ReadOptions, WriteOptions};

/// Loader for `.toml` files; produces a mapping.
pub struct TomlLoader;

impl Loader for TomlLoader {
    fn load(&self, path: &Path, _options: &ReadOptions) -> Result<Value> {
        let text = fs::read_to_string(path)?;
        let table: TomlTable = toml::from_str(&text)?;
        table_to_map(table)
    }
}

/// Dumper for `.toml` files; accepts mappings only.
pub struct TomlDumper;

impl Dumper for TomlDumper {
    fn dump(&self, value: &Value, path: &Path, options: &WriteOptions) -> Result<()> {
        let map = value.as_map().ok_or_else(|| {
            IoError::InvalidData(format!("expected a mapping, found {}", value.kind()))
        })?;
        let table = map_to_table(map)?;
        let text = if options.pretty {
            toml::to_string_pretty(&table)?
        } else {
            toml::to_string(&table)?
        };
        fs::write(path, text)?;
        Ok(())
    }
}

fn table_to_map(table: TomlTable) -> Result<Value> {
    let mut map = IndexMap::with_capacity(table.len());
    for (key, item) in table {
        map.insert(key, from_toml(item)?);
    }
    Ok(Value::Map(map))
}

fn from_toml(toml: TomlValue) -> Result<Value> {
    Ok(match toml {
        TomlValue::String(s) => Value::String(s),
        TomlValue::Integer(i) => Value::Int(i),
        TomlValue::Float(f) => Value::Float(f),
        TomlValue::Boolean(b) => Value::Bool(b),
        TomlValue::Datetime(dt) => Value::String(dt.to_string()),
        TomlValue::Array(items) => Value::Array(
            items
                .into_iter()
                .map(from_toml)
                .collect::<Result<Vec<_>>>()?,
        ),
        TomlValue::Table(table) => table_to_map(table)?,
    })
}

fn to_toml(value: &Value) -> Result<TomlValue> {
    Ok(match value {
        Value::Null => {
            return Err(IoError::InvalidData("TOML has no null value".into()))
        }
        Value::Bool(b) => TomlValue::Boolean(*b),
        Value::Int(i) => TomlValue::Integer(*i),
        Value::Float(f) => TomlValue::Float(*f),
        Value::String(s) => TomlValue::String(s.clone()),
        Value::Array(items) => TomlValue::Array(
            items.iter().map(to_toml).collect::<Result<Vec<_>>>()?,
        ),
        Value::Map(map) => TomlValue::Table(map_to_table(map)?),
        Value::Table(_) => {
            return Err(IoError::InvalidData(
                "tables have no TOML form; dump them to a tabular format".into(),
            ))
        }
    })
}

fn map_to_table(map: &IndexMap<String, Value>) -> Result<TomlTable> {
    let mut table = TomlTable::new();
    for (key, item) in map {
        table.insert(key.clone(), to_toml(item)?);
    }
    Ok(table)
}
