//! YAML loader and dumper.
//!
//! Tagged values load as their untagged payload; mapping keys must be
//! strings. Tables have no YAML form and are rejected.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use datashed_core::Value;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Number as YamlNumber, Value as YamlValue};

use crate::error::{IoError, Result};
use crate::registry::{Dumper, Loader, ReadOptions, WriteOptions};

/// Loader for `.yaml` / `.yml` files.
pub struct YamlLoader;

impl Loader for YamlLoader {
    fn load(&self, path: &Path, _options: &ReadOptions) -> Result<Value> {
        let file = File::open(path)?;
        let yaml: YamlValue = serde_yaml::from_reader(BufReader::new(file))?;
        from_yaml(yaml)
    }
}

/// Dumper for `.yaml` / `.yml` files.
pub struct YamlDumper;

impl Dumper for YamlDumper {
    fn dump(&self, value: &Value, path: &Path, _options: &WriteOptions) -> Result<()> {
        let yaml = to_yaml(value)?;
        let writer = BufWriter::new(File::create(path)?);
        serde_yaml::to_writer(writer, &yaml)?;
        Ok(())
    }
}

fn from_yaml(yaml: YamlValue) -> Result<Value> {
    Ok(match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                return Err(IoError::InvalidData(format!("unrepresentable number {n:?}")));
            }
        }
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<Vec<_>>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut map = IndexMap::with_capacity(mapping.len());
            for (key, item) in mapping {
                let key = match key {
                    YamlValue::String(s) => s,
                    other => {
                        return Err(IoError::InvalidData(format!(
                            "mapping keys must be strings, found {other:?}"
                        )))
                    }
                };
                map.insert(key, from_yaml(item)?);
            }
            Value::Map(map)
        }
        YamlValue::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn to_yaml(value: &Value) -> Result<YamlValue> {
    Ok(match value {
        Value::Null => YamlValue::Null,
        Value::Bool(b) => YamlValue::Bool(*b),
        Value::Int(i) => YamlValue::Number(YamlNumber::from(*i)),
        Value::Float(f) => YamlValue::Number(YamlNumber::from(*f)),
        Value::String(s) => YamlValue::String(s.clone()),
        Value::Array(items) => YamlValue::Sequence(
            items.iter().map(to_yaml).collect::<Result<Vec<_>>>()?,
        ),
        Value::Map(map) => {
            let mut mapping = Mapping::new();
            for (key, item) in map {
                mapping.insert(YamlValue::String(key.clone()), to_yaml(item)?);
            }
            YamlValue::Mapping(mapping)
        }
        Value::Table(_) => {
            return Err(IoError::InvalidData(
                "tables have no YAML form; dump them to a tabular format".into(),
            ))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn round_trips_generic_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut map = IndexMap::new();
        map.insert("name".to_string(), Value::from("etl"));
        map.insert("retries".to_string(), Value::from(2i64));
        map.insert("rate".to_string(), Value::from(0.25));
        map.insert(
            "stages".to_string(),
            Value::Array(vec![Value::from("extract"), Value::from("load")]),
        );
        let value = Value::Map(map);

        YamlDumper
            .dump(&value, &path, &WriteOptions::new())
            .unwrap();
        let loaded = YamlLoader.load(&path, &ReadOptions::new()).unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn loads_handwritten_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(&path, "answer: 42\nempty: null\n").unwrap();

        let value = YamlLoader.load(&path, &ReadOptions::new()).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map["answer"], Value::Int(42));
        assert!(map["empty"].is_null());
    }

    #[test]
    fn non_string_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(&path, "1: one\n").unwrap();

        let err = YamlLoader.load(&path, &ReadOptions::new()).unwrap_err();
        assert!(matches!(err, IoError::InvalidData(_)));
    }

    #[test]
    fn tables_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.yaml");

        let err = YamlDumper
            .dump(
                &Value::Table(datashed_core::Table::new()),
                &path,
                &WriteOptions::new(),
            )
            .unwrap_err();
        assert!(matches!(err, IoError::InvalidData(_)));
    }
}
