//! Minimal column-oriented tabular values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::{Value, ValueKind};

/// Errors from malformed table construction.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("column {name:?} has length {len}, expected {expected}")]
    ColumnLength {
        name: String,
        len: usize,
        expected: usize,
    },

    #[error("duplicate column {0:?}")]
    DuplicateColumn(String),

    #[error("row has {len} cells, expected {expected}")]
    RowLength { len: usize, expected: usize },

    #[error("table cells must be scalar, found {0}")]
    NonScalarCell(ValueKind),
}

/// A column-oriented table of scalar values.
///
/// Columns keep insertion order and share a single length; cells are scalar
/// [`Value`]s with `Value::Null` marking a missing entry. This is the
/// "tabular object" the CSV and Parquet handlers read and write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: IndexMap<String, Vec<Value>>,
}

impl Table {
    /// Create an empty table with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns of equal length.
    pub fn from_columns<N, C>(columns: C) -> Result<Self, TableError>
    where
        N: Into<String>,
        C: IntoIterator<Item = (N, Vec<Value>)>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.insert_column(name, values)?;
        }
        Ok(table)
    }

    /// Build a table from a header row plus data rows.
    pub fn from_rows<N>(names: Vec<N>, rows: Vec<Vec<Value>>) -> Result<Self, TableError>
    where
        N: Into<String>,
    {
        let mut table = Self::from_columns(
            names.into_iter().map(|name| (name, Vec::new())),
        )?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a column. Fails on duplicate names, length mismatches, and
    /// non-scalar cells.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && values.len() != self.num_rows() {
            return Err(TableError::ColumnLength {
                name,
                len: values.len(),
                expected: self.num_rows(),
            });
        }
        for cell in &values {
            check_scalar(cell)?;
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Append a row, one cell per column in column order.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.num_columns() {
            return Err(TableError::RowLength {
                len: row.len(),
                expected: self.num_columns(),
            });
        }
        for cell in &row {
            check_scalar(cell)?;
        }
        for (column, cell) in self.columns.values_mut().zip(row) {
            column.push(cell);
        }
        Ok(())
    }

    /// The cells of the named column, if present.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Row-major view of the cells.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.num_rows()).map(move |index| {
            self.columns.values().map(|column| &column[index]).collect()
        })
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.columns
            .first()
            .map(|(_, column)| column.len())
            .unwrap_or(0)
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table holds no cells.
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }
}

fn check_scalar(cell: &Value) -> Result<(), TableError> {
    match cell {
        Value::Null
        | Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::String(_) => Ok(()),
        other => Err(TableError::NonScalarCell(other.kind())),
    }
}
