//! Owned SQL value used for relation keys, bound parameters and row cells.

use std::fmt;

use crate::error::RelataError;

/// Represents a SQL value (owned version)
#[derive(Debug, Clone, PartialEq, PartialOrd, Default)]
pub enum OwnedValue {
    /// Integer value (i64)
    Integer(i64),
    /// Real value (f64)
    Real(f64),
    /// Text value (owned string)
    Text(String),
    /// Blob value (owned binary data)
    Blob(Box<[u8]>),
    /// NULL value
    #[default]
    Null,
}

impl OwnedValue {
    /// Returns `true` for SQL NULL.
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, OwnedValue::Null)
    }

    /// Name of the storage class, used in mapping errors.
    pub const fn type_name(&self) -> &'static str {
        match self {
            OwnedValue::Integer(_) => "integer",
            OwnedValue::Real(_) => "real",
            OwnedValue::Text(_) => "text",
            OwnedValue::Blob(_) => "blob",
            OwnedValue::Null => "null",
        }
    }

    fn mismatch(&self, expected: &str) -> RelataError {
        RelataError::Mapping(format!("expected {expected}, found {}", self.type_name()))
    }
}

impl fmt::Display for OwnedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnedValue::Integer(i) => write!(f, "{i}"),
            OwnedValue::Real(r) => write!(f, "{r}"),
            OwnedValue::Text(s) => f.write_str(s),
            OwnedValue::Blob(b) => f.write_str(&String::from_utf8_lossy(b)),
            OwnedValue::Null => Ok(()),
        }
    }
}

//------------------------------------------------------------------------------
// Conversions into OwnedValue
//------------------------------------------------------------------------------

macro_rules! impl_from_integer {
    ($($ty:ty),*) => { $(
        impl From<$ty> for OwnedValue {
            fn from(value: $ty) -> Self {
                OwnedValue::Integer(i64::from(value))
            }
        }
    )* }
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, bool);

impl From<f64> for OwnedValue {
    fn from(value: f64) -> Self {
        OwnedValue::Real(value)
    }
}

impl From<String> for OwnedValue {
    fn from(value: String) -> Self {
        OwnedValue::Text(value)
    }
}

impl From<&str> for OwnedValue {
    fn from(value: &str) -> Self {
        OwnedValue::Text(value.to_owned())
    }
}

impl From<Vec<u8>> for OwnedValue {
    fn from(value: Vec<u8>) -> Self {
        OwnedValue::Blob(value.into_boxed_slice())
    }
}

impl From<&[u8]> for OwnedValue {
    fn from(value: &[u8]) -> Self {
        OwnedValue::Blob(value.into())
    }
}

impl<T: Into<OwnedValue>> From<Option<T>> for OwnedValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(OwnedValue::Null, Into::into)
    }
}

//------------------------------------------------------------------------------
// Conversions out of OwnedValue
//------------------------------------------------------------------------------

impl TryFrom<&OwnedValue> for i64 {
    type Error = RelataError;

    fn try_from(value: &OwnedValue) -> Result<Self, Self::Error> {
        match value {
            OwnedValue::Integer(i) => Ok(*i),
            other => Err(other.mismatch("integer")),
        }
    }
}

impl TryFrom<&OwnedValue> for i32 {
    type Error = RelataError;

    fn try_from(value: &OwnedValue) -> Result<Self, Self::Error> {
        let wide = i64::try_from(value)?;
        i32::try_from(wide).map_err(|e| RelataError::Mapping(e.to_string()))
    }
}

impl TryFrom<&OwnedValue> for bool {
    type Error = RelataError;

    fn try_from(value: &OwnedValue) -> Result<Self, Self::Error> {
        match value {
            OwnedValue::Integer(0) => Ok(false),
            OwnedValue::Integer(_) => Ok(true),
            other => Err(other.mismatch("boolean")),
        }
    }
}

impl TryFrom<&OwnedValue> for f64 {
    type Error = RelataError;

    fn try_from(value: &OwnedValue) -> Result<Self, Self::Error> {
        match value {
            OwnedValue::Real(r) => Ok(*r),
            #[allow(clippy::cast_precision_loss)]
            OwnedValue::Integer(i) => Ok(*i as f64),
            other => Err(other.mismatch("real")),
        }
    }
}

impl TryFrom<&OwnedValue> for String {
    type Error = RelataError;

    fn try_from(value: &OwnedValue) -> Result<Self, Self::Error> {
        match value {
            OwnedValue::Text(s) => Ok(s.clone()),
            other => Err(other.mismatch("text")),
        }
    }
}

impl TryFrom<&OwnedValue> for Vec<u8> {
    type Error = RelataError;

    fn try_from(value: &OwnedValue) -> Result<Self, Self::Error> {
        match value {
            OwnedValue::Blob(b) => Ok(b.to_vec()),
            OwnedValue::Text(s) => Ok(s.as_bytes().to_vec()),
            other => Err(other.mismatch("blob")),
        }
    }
}

//------------------------------------------------------------------------------
// Database Driver Implementations
//------------------------------------------------------------------------------

#[cfg(feature = "rusqlite")]
impl rusqlite::ToSql for OwnedValue {
    fn to_sql(&self) -> ::rusqlite::Result<::rusqlite::types::ToSqlOutput<'_>> {
        use rusqlite::types::{ToSqlOutput, Value, ValueRef};

        Ok(match self {
            OwnedValue::Null => ToSqlOutput::Owned(Value::Null),
            OwnedValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            OwnedValue::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            OwnedValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            OwnedValue::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b.as_ref())),
        })
    }
}

#[cfg(feature = "rusqlite")]
impl rusqlite::types::FromSql for OwnedValue {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        use rusqlite::types::ValueRef;

        Ok(match value {
            ValueRef::Null => OwnedValue::Null,
            ValueRef::Integer(i) => OwnedValue::Integer(i),
            ValueRef::Real(r) => OwnedValue::Real(r),
            ValueRef::Text(items) => OwnedValue::Text(String::from_utf8_lossy(items).into_owned()),
            ValueRef::Blob(items) => OwnedValue::Blob(items.into()),
        })
    }
}
