//! JSON loader and dumpers.
//!
//! Values map directly onto the JSON data model. Tables get a dedicated
//! dumper that writes an array of row objects, so `.json` serves both
//! generic values and tabular data without the caller choosing.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use datashed_core::{Table, Value};
use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::error::{IoError, Result};
use crate::registry::{Dumper, Loader, ReadOptions, WriteOptions};

/// Loader for `.json` files.
pub struct JsonLoader;

impl Loader for JsonLoader {
    fn load(&self, path: &Path, _options: &ReadOptions) -> Result<Value> {
        let file = File::open(path)?;
        let json: JsonValue = serde_json::from_reader(BufReader::new(file))?;
        from_json(json)
    }
}

/// Generic dumper for `.json` files.
pub struct JsonDumper;

impl Dumper for JsonDumper {
    fn dump(&self, value: &Value, path: &Path, options: &WriteOptions) -> Result<()> {
        let json = to_json(value)?;
        write_json(&json, path, options)
    }
}

/// Tabular dumper for `.json` files: one object per row.
pub struct JsonTableDumper;

impl Dumper for JsonTableDumper {
    fn dump(&self, value: &Value, path: &Path, options: &WriteOptions) -> Result<()> {
        let table = value.as_table().ok_or_else(|| {
            IoError::InvalidData(format!("expected a table, found {}", value.kind()))
        })?;
        let json = table_to_records(table)?;
        write_json(&json, path, options)
    }
}

fn write_json(json: &JsonValue, path: &Path, options: &WriteOptions) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    if options.pretty {
        serde_json::to_writer_pretty(writer, json)?;
    } else {
        serde_json::to_writer(writer, json)?;
    }
    Ok(())
}

fn from_json(json: JsonValue) -> Result<Value> {
    Ok(match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                return Err(IoError::InvalidData(format!("unrepresentable number {n}")));
            }
        }
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(items) => Value::Array(
            items
                .into_iter()
                .map(from_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        JsonValue::Object(entries) => {
            let mut map = IndexMap::with_capacity(entries.len());
            for (key, item) in entries {
                map.insert(key, from_json(item)?);
            }
            Value::Map(map)
        }
    })
}

fn to_json(value: &Value) -> Result<JsonValue> {
    Ok(match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .ok_or_else(|| IoError::InvalidData(format!("non-finite float {f}")))?,
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Array(items) => JsonValue::Array(
            items.iter().map(to_json).collect::<Result<Vec<_>>>()?,
        ),
        Value::Map(map) => {
            let mut entries = JsonMap::new();
            for (key, item) in map {
                entries.insert(key.clone(), to_json(item)?);
            }
            JsonValue::Object(entries)
        }
        Value::Table(_) => {
            return Err(IoError::InvalidData(
                "nested tables have no JSON form; top-level tables go through the tabular dumper"
                    .into(),
            ))
        }
    })
}

fn table_to_records(table: &Table) -> Result<JsonValue> {
    let names: Vec<&str> = table.column_names().collect();
    let mut records = Vec::with_capacity(table.num_rows());
    for row in table.rows() {
        let mut record = JsonMap::new();
        for (name, cell) in names.iter().zip(row) {
            record.insert((*name).to_string(), to_json(cell)?);
        }
        records.push(JsonValue::Object(record));
    }
    Ok(JsonValue::Array(records))
}
