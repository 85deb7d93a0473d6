//! Parquet loader and dumper.
//!
//! Tables map to single-row-group Parquet files through Arrow record
//! batches. Column types are inferred from the cells: Int64, Float64,
//! Boolean, or Utf8, with a column mixing ints and floats widening to
//! Float64. Anything else is rejected rather than guessed at.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use datashed_core::{Table, Value};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;

use crate::error::{IoError, Result};
use crate::registry::{Dumper, Loader, ReadOptions, WriteOptions};

/// Loader for `.parquet` files; produces a [`Table`].
pub struct ParquetLoader;

impl Loader for ParquetLoader {
    fn load(&self, path: &Path, _options: &ReadOptions) -> Result<Value> {
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let names: Vec<String> = builder
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().to_string())
            .collect();

        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
        for batch in builder.build()? {
            let batch = batch?;
            for (index, column) in batch.columns().iter().enumerate() {
                append_column(&mut columns[index], column)?;
            }
        }

        let table = Table::from_columns(names.into_iter().zip(columns))?;
        Ok(Value::Table(table))
    }
}

/// Dumper for `.parquet` files; accepts tables.
pub struct ParquetDumper;

impl Dumper for ParquetDumper {
    fn dump(&self, value: &Value, path: &Path, _options: &WriteOptions) -> Result<()> {
        let table = value.as_table().ok_or_else(|| {
            IoError::InvalidData(format!("expected a table, found {}", value.kind()))
        })?;
        if table.num_columns() == 0 {
            return Err(IoError::InvalidData(
                "cannot write a table with no columns".into(),
            ));
        }

        let mut fields = Vec::with_capacity(table.num_columns());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.num_columns());
        for name in table.column_names() {
            // column_names() only yields present columns
            let cells = table.column(name).unwrap_or(&[]);
            let (data_type, array) = build_column(cells)?;
            fields.push(Field::new(name, data_type, true));
            arrays.push(array);
        }

        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), arrays)?;
        let file = File::create(path)?;
        let mut writer = ArrowWriter::try_new(file, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }
}

fn append_column(cells: &mut Vec<Value>, array: &ArrayRef) -> Result<()> {
    match array.data_type() {
        DataType::Int64 => {
            let array = downcast::<Int64Array>(array)?;
            for index in 0..array.len() {
                cells.push(if array.is_null(index) {
                    Value::Null
                } else {
                    Value::Int(array.value(index))
                });
            }
        }
        DataType::Float64 => {
            let array = downcast::<Float64Array>(array)?;
            for index in 0..array.len() {
                cells.push(if array.is_null(index) {
                    Value::Null
                } else {
                    Value::Float(array.value(index))
                });
            }
        }
        DataType::Boolean => {
            let array = downcast::<BooleanArray>(array)?;
            for index in 0..array.len() {
                cells.push(if array.is_null(index) {
                    Value::Null
                } else {
                    Value::Bool(array.value(index))
                });
            }
        }
        DataType::Utf8 => {
            let array = downcast::<StringArray>(array)?;
            for index in 0..array.len() {
                cells.push(if array.is_null(index) {
                    Value::Null
                } else {
                    Value::String(array.value(index).to_string())
                });
            }
        }
        other => {
            return Err(IoError::InvalidData(format!(
                "unsupported parquet column type {other:?}"
            )))
        }
    }
    Ok(())
}

fn downcast<T: 'static>(array: &ArrayRef) -> Result<&T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| IoError::InvalidData("column data does not match its type".into()))
}

fn build_column(cells: &[Value]) -> Result<(DataType, ArrayRef)> {
    let mut has_int = false;
    let mut has_float = false;
    let mut has_bool = false;
    let mut has_string = false;
    for cell in cells {
        match cell {
            Value::Null => {}
            Value::Int(_) => has_int = true,
            Value::Float(_) => has_float = true,
            Value::Bool(_) => has_bool = true,
            Value::String(_) => has_string = true,
            other => {
                return Err(IoError::InvalidData(format!(
                    "parquet cells must be scalar, found {}",
                    other.kind()
                )))
            }
        }
    }

    let numeric = has_int || has_float;
    if (has_string && (numeric || has_bool)) || (has_bool && numeric) {
        return Err(IoError::InvalidData(
            "parquet columns must hold one scalar type".into(),
        ));
    }

    if has_float {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| match cell {
                Value::Int(i) => Some(*i as f64),
                Value::Float(f) => Some(*f),
                _ => None,
            })
            .collect();
        Ok((
            DataType::Float64,
            Arc::new(Float64Array::from(values)) as ArrayRef,
        ))
    } else if has_int {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|cell| match cell {
                Value::Int(i) => Some(*i),
                _ => None,
            })
            .collect();
        Ok((
            DataType::Int64,
            Arc::new(Int64Array::from(values)) as ArrayRef,
        ))
    } else if has_bool {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| match cell {
                Value::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Ok((
            DataType::Boolean,
            Arc::new(BooleanArray::from(values)) as ArrayRef,
        ))
    } else {
        // string column, or all nulls
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|cell| match cell {
                Value::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect();
        Ok((
            DataType::Utf8,
            Arc::new(StringArray::from(values)) as ArrayRef,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::from_rows(
            vec!["id", "score", "label", "active"],
            vec![
                vec![
                    Value::from(1i64),
                    Value::from(0.25),
                    Value::from("a"),
                    Value::from(true),
                ],
                vec![
                    Value::from(2i64),
                    Value::Null,
                    Value::from("b"),
                    Value::from(false),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn round_trips_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");

        let table = sample_table();
        ParquetDumper
            .dump(&Value::Table(table.clone()), &path, &WriteOptions::new())
            .unwrap();
        let loaded = ParquetLoader.load(&path, &ReadOptions::new()).unwrap();
        assert_eq!(loaded, Value::Table(table));
    }

    #[test]
    fn int_column_mixed_with_float_widens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");

        let table = Table::from_rows(
            vec!["x"],
            vec![vec![Value::from(1i64)], vec![Value::from(2.5)]],
        )
        .unwrap();
        ParquetDumper
            .dump(&Value::Table(table), &path, &WriteOptions::new())
            .unwrap();

        let loaded = ParquetLoader.load(&path, &ReadOptions::new()).unwrap();
        let expected = Table::from_rows(
            vec!["x"],
            vec![vec![Value::from(1.0)], vec![Value::from(2.5)]],
        )
        .unwrap();
        assert_eq!(loaded, Value::Table(expected));
    }

    #[test]
    fn mixed_incompatible_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.parquet");

        let table = Table::from_rows(
            vec!["x"],
            vec![vec![Value::from("a")], vec![Value::from(1i64)]],
        )
        .unwrap();
        let err = ParquetDumper
            .dump(&Value::Table(table), &path, &WriteOptions::new())
            .unwrap_err();
        assert!(matches!(err, IoError::InvalidData(_)));
    }

    #[test]
    fn non_tables_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.parquet");

        let err = ParquetDumper
            .dump(&Value::from(1i64), &path, &WriteOptions::new())
            .unwrap_err();
        assert!(matches!(err, IoError::InvalidData(_)));
    }
}
