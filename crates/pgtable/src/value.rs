//! Scalar column values.
//!
//! [`Value`] is what filters, mutations and fetched rows are made of. It binds
//! to PostgreSQL parameters through [`ToSql`] and can also be rendered as a
//! single-quoted literal for the literal statement mode.

use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType};

/// A scalar column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Render as a quoted SQL literal (`'text'`, `'42'`, `NULL`).
    ///
    /// Quote characters inside the value are **not** escaped. Returns `None`
    /// when the rendering would contain a `'`, i.e. when it would corrupt the
    /// surrounding statement.
    pub fn to_literal(&self) -> Option<String> {
        if self.is_null() {
            return Some("NULL".to_string());
        }
        let text = self.to_string();
        if text.contains('\'') {
            return None;
        }
        Some(format!("'{text}'"))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// ─── ToSql ──────────────────────────────────────────────────────────────────

type BoxError = Box<dyn Error + Sync + Send>;

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Some(true),
        "f" | "false" | "n" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl Value {
    fn coerce_i64(&self, ty: &Type) -> Result<i64, BoxError> {
        match self {
            Self::Int(n) => Ok(*n),
            other => other
                .to_string()
                .trim()
                .parse()
                .map_err(|_| format!("invalid input for {ty}: {other}").into()),
        }
    }

    fn coerce_f64(&self, ty: &Type) -> Result<f64, BoxError> {
        match self {
            Self::Int(n) => Ok(*n as f64),
            Self::Float(x) => Ok(*x),
            other => other
                .to_string()
                .trim()
                .parse()
                .map_err(|_| format!("invalid input for {ty}: {other}").into()),
        }
    }
}

/// Values bind the way their quoted-text rendering would be coerced by
/// PostgreSQL: any scalar goes into a text column as its display form, and
/// text goes into a numeric or boolean column if it parses as one.
impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        if self.is_null() {
            return Ok(IsNull::Yes);
        }
        if <String as ToSql>::accepts(ty) {
            return match self {
                Self::Text(s) => s.to_sql(ty, out),
                other => other.to_string().to_sql(ty, out),
            };
        }
        match *ty {
            Type::BOOL => {
                let b = match self {
                    Self::Bool(b) => *b,
                    other => parse_bool(&other.to_string())
                        .ok_or_else(|| format!("invalid input for {ty}: {other}"))?,
                };
                b.to_sql(ty, out)
            }
            Type::INT2 => i16::try_from(self.coerce_i64(ty)?)?.to_sql(ty, out),
            Type::INT4 => i32::try_from(self.coerce_i64(ty)?)?.to_sql(ty, out),
            Type::INT8 => self.coerce_i64(ty)?.to_sql(ty, out),
            Type::FLOAT4 => (self.coerce_f64(ty)? as f32).to_sql(ty, out),
            Type::FLOAT8 => self.coerce_f64(ty)?.to_sql(ty, out),
            Type::NUMERIC => {
                let text = self.to_string();
                let d = Decimal::from_str(text.trim())
                    .map_err(|e| format!("invalid input for {ty}: {text}: {e}"))?;
                d.to_sql(ty, out)
            }
            _ => Err(Box::new(WrongType::new::<Value>(ty.clone()))),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <String as ToSql>::accepts(ty)
            || <bool as ToSql>::accepts(ty)
            || <i16 as ToSql>::accepts(ty)
            || <i32 as ToSql>::accepts(ty)
            || <i64 as ToSql>::accepts(ty)
            || <f32 as ToSql>::accepts(ty)
            || <f64 as ToSql>::accepts(ty)
            || <Decimal as ToSql>::accepts(ty)
    }

    tokio_postgres::types::to_sql_checked!();
}
