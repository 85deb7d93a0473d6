//! The common value representation and its kind hierarchy.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::table::Table;

/// The common in-memory representation for format interchange.
///
/// Every loader produces a `Value` and every dumper consumes one, so data
/// loaded from any format can be dumped to any other format able to
/// represent it. Map entries keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(IndexMap<String, Value>),
    Table(Table),
}

impl Value {
    /// The runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Sequence,
            Value::Map(_) => ValueKind::Mapping,
            Value::Table(_) => ValueKind::Table,
        }
    }

    /// Whether this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float payload; integers coerce losslessly enough for pipeline
    /// arithmetic.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The array payload, if any.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The map payload, if any.
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The table payload, if any.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Table> for Value {
    fn from(table: Table) -> Self {
        Value::Table(table)
    }
}

/// Coarse runtime categories of [`Value`], arranged in a single-parent
/// hierarchy used for dumper dispatch.
///
/// ```text
///                  Any
///      ┌───────┬────┴────┬────────┐
///   Scalar  Sequence  Mapping  Table
///      │
///  ┌───┼────┬─────┬──────┐
/// Null Bool Int Float String
/// ```
///
/// A dumper registered for a kind also handles every kind below it, unless
/// something more specific is registered. The tree is closed; custom
/// formats extend the system by handling new suffixes, not new kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Any,
    Scalar,
    Null,
    Bool,
    Int,
    Float,
    String,
    Sequence,
    Mapping,
    Table,
}

impl ValueKind {
    /// The parent kind, or `None` for the root.
    pub fn parent(self) -> Option<ValueKind> {
        match self {
            ValueKind::Any => None,
            ValueKind::Scalar
            | ValueKind::Sequence
            | ValueKind::Mapping
            | ValueKind::Table => Some(ValueKind::Any),
            ValueKind::Null
            | ValueKind::Bool
            | ValueKind::Int
            | ValueKind::Float
            | ValueKind::String => Some(ValueKind::Scalar),
        }
    }

    /// The kind followed by its ancestors, most specific first, ending at
    /// [`ValueKind::Any`].
    pub fn ancestors(self) -> impl Iterator<Item = ValueKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Any => "any",
            ValueKind::Scalar => "scalar",
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
            ValueKind::Table => "table",
        };
        f.write_str(name)
    }
}
