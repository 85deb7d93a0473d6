//! CSV loader and dumper.
//!
//! CSV carries no type information, so the loader re-infers each cell:
//! empty → null, then int, float, bool, and finally string. The
//! `delimiter` format option selects a single-byte delimiter in both
//! directions.

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use datashed_core::{Table, Value};
use indexmap::IndexMap;

use crate::error::{IoError, Result};
use crate::registry::{Dumper, Loader, ReadOptions, WriteOptions};

/// Loader for `.csv` files; produces a [`Table`].
pub struct CsvLoader;

impl Loader for CsvLoader {
    fn load(&self, path: &Path, options: &ReadOptions) -> Result<Value> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter(&options.format_options)?)
            .from_path(path)?;
        let names: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut table =
            Table::from_columns(names.into_iter().map(|name| (name, Vec::new())))?;
        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(parse_cell).collect())?;
        }
        Ok(Value::Table(table))
    }
}

/// Dumper for `.csv` files; accepts tables.
pub struct CsvDumper;

impl Dumper for CsvDumper {
    fn dump(&self, value: &Value, path: &Path, options: &WriteOptions) -> Result<()> {
        let table = value.as_table().ok_or_else(|| {
            IoError::InvalidData(format!("expected a table, found {}", value.kind()))
        })?;
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter(&options.format_options)?)
            .from_path(path)?;
        writer.write_record(table.column_names())?;
        for row in table.rows() {
            let cells: Vec<String> = row.into_iter().map(format_cell).collect();
            writer.write_record(&cells)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn delimiter(options: &IndexMap<String, String>) -> Result<u8> {
    match options.get("delimiter") {
        None => Ok(b','),
        Some(d) if d.len() == 1 => Ok(d.as_bytes()[0]),
        Some(d) => Err(IoError::InvalidData(format!(
            "delimiter must be a single byte, got {d:?}"
        ))),
    }
}

fn parse_cell(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

fn format_cell(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        // Table cells are scalar by construction.
        other => other.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_table() -> Table {
        Table::from_rows(
            vec!["city", "population", "density", "coastal"],
            vec![
                vec![
                    Value::from("porto"),
                    Value::from(231000i64),
                    Value::from(5736.4),
                    Value::from(true),
                ],
                vec![
                    Value::from("leeds"),
                    Value::from(789000i64),
                    Value::Null,
                    Value::from(false),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn round_trips_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.csv");

        let table = sample_table();
        CsvDumper
            .dump(&Value::Table(table.clone()), &path, &WriteOptions::new())
            .unwrap();
        let loaded = CsvLoader.load(&path, &ReadOptions::new()).unwrap();
        assert_eq!(loaded, Value::Table(table));
    }

    #[test]
    fn writes_headers_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.csv");

        CsvDumper
            .dump(&Value::Table(sample_table()), &path, &WriteOptions::new())
            .unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("city,population,density,coastal"));
        assert_eq!(lines.next(), Some("porto,231000,5736.4,true"));
        assert_eq!(lines.next(), Some("leeds,789000,,false"));
    }

    #[test]
    fn custom_delimiter_applies_both_ways() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.csv");

        let write = WriteOptions::new().with_option("delimiter", ";");
        CsvDumper
            .dump(&Value::Table(sample_table()), &path, &write)
            .unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("city;population;density;coastal"));

        let read = ReadOptions::new().with_option("delimiter", ";");
        let loaded = CsvLoader.load(&path, &read).unwrap();
        assert_eq!(loaded, Value::Table(sample_table()));
    }

    #[test]
    fn bad_delimiter_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.csv");

        let err = CsvDumper
            .dump(
                &Value::Table(sample_table()),
                &path,
                &WriteOptions::new().with_option("delimiter", "||"),
            )
            .unwrap_err();
        assert!(matches!(err, IoError::InvalidData(_)));
    }

    #[test]
    fn cell_inference_covers_scalars() {
        assert_eq!(parse_cell(""), Value::Null);
        assert_eq!(parse_cell("3"), Value::Int(3));
        assert_eq!(parse_cell("3.5"), Value::Float(3.5));
        assert_eq!(parse_cell("true"), Value::Bool(true));
        assert_eq!(parse_cell("porto"), Value::from("porto"));
    }

    #[test]
    fn non_tables_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");

        let err = CsvDumper
            .dump(&Value::from("text"), &path, &WriteOptions::new())
            .unwrap_err();
        assert!(matches!(err, IoError::InvalidData(_)));
    }
}
