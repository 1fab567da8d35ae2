//! Row decoding.

use crate::error::{TableError, TableResult};
use crate::value::Value;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Type};

/// One fetched row: column values in projection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(pub Vec<Value>);

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.0.get(idx)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }

    /// First column, consuming the row.
    pub fn into_first(self) -> Option<Value> {
        self.0.into_iter().next()
    }

    /// Decode a tokio-postgres row column by column.
    pub fn from_pg_row(row: &Row) -> TableResult<Self> {
        (0..row.len())
            .map(|idx| decode_column(row, idx))
            .collect::<TableResult<Vec<_>>>()
            .map(Self)
    }
}

impl From<Vec<Value>> for Record {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl IntoIterator for Record {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn try_get<'a, T>(row: &'a Row, idx: usize) -> TableResult<Option<T>>
where
    T: FromSql<'a>,
{
    row.try_get::<_, Option<T>>(idx)
        .map_err(|e| TableError::decode(row.columns()[idx].name(), e.to_string()))
}

fn decode_column(row: &Row, idx: usize) -> TableResult<Value> {
    let column = &row.columns()[idx];
    let value = match *column.type_() {
        Type::BOOL => try_get::<bool>(row, idx)?.map(Value::Bool),
        Type::INT2 => try_get::<i16>(row, idx)?.map(Value::from),
        Type::INT4 => try_get::<i32>(row, idx)?.map(Value::from),
        Type::INT8 => try_get::<i64>(row, idx)?.map(Value::Int),
        Type::FLOAT4 => try_get::<f32>(row, idx)?.map(Value::from),
        Type::FLOAT8 => try_get::<f64>(row, idx)?.map(Value::Float),
        Type::NUMERIC => try_get::<Decimal>(row, idx)?.map(|d| Value::Text(d.to_string())),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            try_get::<String>(row, idx)?.map(Value::Text)
        }
        ref other => {
            return Err(TableError::decode(
                column.name(),
                format!("unsupported column type {other}"),
            ));
        }
    };
    Ok(value.unwrap_or(Value::Null))
}
