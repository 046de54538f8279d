//! Tabular query results.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tiberius::{ColumnData, FromSql};

use error::{DatabaseError, Result};

/// A single cell value.
///
/// Serialized with an explicit `type` tag so temporal values survive a
/// round trip instead of collapsing into text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Value {
    /// True for SQL `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text of a `Text` cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value of an `Int` cell.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value of a `Float` or `Int` cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Convert a driver cell. Types without a dedicated variant fall back
    /// to their debug text.
    pub fn from_column_data(data: ColumnData<'static>) -> Result<Self> {
        let value = match data {
            ColumnData::U8(v) => v.map(|v| Value::Int(v.into())),
            ColumnData::I16(v) => v.map(|v| Value::Int(v.into())),
            ColumnData::I32(v) => v.map(|v| Value::Int(v.into())),
            ColumnData::I64(v) => v.map(Value::Int),
            ColumnData::F32(v) => v.map(|v| Value::Float(v.into())),
            ColumnData::F64(v) => v.map(Value::Float),
            ColumnData::Bit(v) => v.map(Value::Bool),
            ColumnData::String(v) => v.map(|s| Value::Text(s.into_owned())),
            ColumnData::Guid(v) => v.map(|g| Value::Text(g.to_string())),
            ColumnData::Binary(v) => v.map(|b| Value::Bytes(b.into_owned())),
            ColumnData::Numeric(v) => {
                v.map(|n| Value::Float(n.value() as f64 / 10f64.powi(i32::from(n.scale()))))
            }
            data @ (ColumnData::DateTime(_)
            | ColumnData::SmallDateTime(_)
            | ColumnData::DateTime2(_)) => {
                NaiveDateTime::from_sql(&data).map_err(decode)?.map(Value::Timestamp)
            }
            data @ ColumnData::Date(_) => NaiveDate::from_sql(&data).map_err(decode)?.map(Value::Date),
            data @ ColumnData::Time(_) => NaiveTime::from_sql(&data).map_err(decode)?.map(Value::Time),
            other => Some(Value::Text(format!("{other:?}"))),
        };
        Ok(value.unwrap_or(Value::Null))
    }
}

fn decode(e: tiberius::error::Error) -> DatabaseError {
    DatabaseError::QueryFailed(format!("decode: {e}"))
}

/// Column names plus row-major cells, as loaded by [`crate::Engine::read_frame`].
///
/// Deserializing checks that every row is as wide as the column list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FrameParts")]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct FrameParts {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl TryFrom<FrameParts> for Frame {
    type Error = DatabaseError;

    fn try_from(parts: FrameParts) -> Result<Self> {
        let mut frame = Frame::new(parts.columns);
        for row in parts.rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }
}

impl Frame {
    /// Create an empty frame with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row; its width must match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(DatabaseError::UnexpectedResult(format!(
                "row has {} cells, frame has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, matched case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    /// All values of one column, top to bottom. `None` when the column is
    /// unknown or a row is too short to hold it.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        self.rows.iter().map(|row| row.get(idx)).collect()
    }
}
