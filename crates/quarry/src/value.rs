//! SQL values and parameter conversion.
//!
//! Every bound parameter and every materialized result cell passes through
//! [`SqlValue`]. Values are always bound through placeholders; the inline
//! rendering exists only for previews and logging.

use crate::error::{Error, Result};

/// A SQL value, bound as a statement parameter or read from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Renders the value for preview and log output.
    ///
    /// Never used to build executable SQL; execution always binds through
    /// `?` placeholders.
    #[must_use]
    pub fn render_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    /// Short name of the value's variant, for mapping error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

/// Conversion into a [`SqlValue`] parameter.
pub trait ToSqlValue {
    /// Converts the value.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! impl_to_sql_int {
    ($($ty:ty),+) => {
        $(impl ToSqlValue for $ty {
            fn to_sql_value(self) -> SqlValue {
                SqlValue::Int(i64::from(self))
            }
        })+
    };
}

impl_to_sql_int!(i8, i16, i32, i64, u8, u16, u32);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

/// Conversion out of a [`SqlValue`] result cell, used when populating
/// entity attributes from rows.
///
/// Fails with a mapping error on a type mismatch. `Null` converts only
/// through the [`Option`] impl.
pub trait FromSqlValue: Sized {
    /// Converts the value.
    ///
    /// # Errors
    ///
    /// [`Error::Mapping`] on a variant mismatch or an out-of-range integer.
    fn from_sql_value(value: SqlValue) -> Result<Self>;
}

fn mismatch(expected: &str, value: &SqlValue) -> Error {
    Error::Mapping(format!(
        "cannot read {} value as {expected}",
        value.kind()
    ))
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        Ok(value)
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        // Engines without a boolean affinity return 0/1 integers.
        match value {
            SqlValue::Bool(b) => Ok(b),
            SqlValue::Int(0) => Ok(false),
            SqlValue::Int(1) => Ok(true),
            other => Err(mismatch("boolean", &other)),
        }
    }
}

impl FromSqlValue for i64 {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Int(n) => Ok(n),
            other => Err(mismatch("integer", &other)),
        }
    }
}

macro_rules! impl_from_sql_int {
    ($($ty:ty),+) => {
        $(impl FromSqlValue for $ty {
            fn from_sql_value(value: SqlValue) -> Result<Self> {
                match value {
                    SqlValue::Int(n) => Self::try_from(n)
                        .map_err(|_| Error::Mapping(format!("integer {n} out of range"))),
                    other => Err(mismatch("integer", &other)),
                }
            }
        })+
    };
}

impl_from_sql_int!(i8, i16, i32, u8, u16, u32);

impl FromSqlValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Float(f) => Ok(f),
            SqlValue::Int(n) => Ok(n as Self),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl FromSqlValue for f32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Float(f) => Ok(f as Self),
            SqlValue::Int(n) => Ok(n as Self),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Blob(b) => Ok(b),
            other => Err(mismatch("blob", &other)),
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_inline() {
        assert_eq!(SqlValue::Null.render_inline(), "NULL");
        assert_eq!(SqlValue::Bool(true).render_inline(), "TRUE");
        assert_eq!(SqlValue::Int(-7).render_inline(), "-7");
        assert_eq!(
            SqlValue::Text(String::from("O'Brien")).render_inline(),
            "'O''Brien'"
        );
        assert_eq!(SqlValue::Blob(vec![0xAB, 0x01]).render_inline(), "X'AB01'");
    }

    #[test]
    fn test_to_sql_value() {
        assert_eq!(true.to_sql_value(), SqlValue::Bool(true));
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!("hi".to_sql_value(), SqlValue::Text(String::from("hi")));
        assert_eq!(None::<i64>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some(1.5_f64).to_sql_value(), SqlValue::Float(1.5));
    }

    #[test]
    fn test_from_sql_value_round_trips() {
        assert_eq!(i64::from_sql_value(SqlValue::Int(9)).unwrap(), 9);
        assert_eq!(
            String::from_sql_value(SqlValue::Text(String::from("a"))).unwrap(),
            "a"
        );
        assert_eq!(
            Option::<String>::from_sql_value(SqlValue::Null).unwrap(),
            None
        );
        assert!(bool::from_sql_value(SqlValue::Int(1)).unwrap());
    }

    #[test]
    fn test_from_sql_value_mismatch() {
        let err = i64::from_sql_value(SqlValue::Text(String::from("x"))).unwrap_err();
        assert!(matches!(err, Error::Mapping(_)));

        let err = String::from_sql_value(SqlValue::Null).unwrap_err();
        assert!(matches!(err, Error::Mapping(_)));
    }

    #[test]
    fn test_from_sql_value_narrowing() {
        assert_eq!(i32::from_sql_value(SqlValue::Int(7)).unwrap(), 7);
        assert!(i32::from_sql_value(SqlValue::Int(i64::MAX)).is_err());
    }

    #[test]
    fn test_from_sql_value_all_integer_widths_narrow_checked() {
        assert_eq!(i8::from_sql_value(SqlValue::Int(-128)).unwrap(), -128);
        assert!(i8::from_sql_value(SqlValue::Int(128)).is_err());
        assert_eq!(i16::from_sql_value(SqlValue::Int(300)).unwrap(), 300);
        assert_eq!(u8::from_sql_value(SqlValue::Int(255)).unwrap(), 255);
        assert!(u8::from_sql_value(SqlValue::Int(-1)).is_err());
        assert_eq!(u16::from_sql_value(SqlValue::Int(40_000)).unwrap(), 40_000);
        assert_eq!(
            u32::from_sql_value(SqlValue::Int(4_000_000_000)).unwrap(),
            4_000_000_000
        );
        assert!(u32::from_sql_value(SqlValue::Int(i64::MAX)).is_err());
    }

    #[test]
    fn test_from_sql_value_f32() {
        assert!((f32::from_sql_value(SqlValue::Float(1.5)).unwrap() - 1.5).abs() < f32::EPSILON);
        assert!((f32::from_sql_value(SqlValue::Int(2)).unwrap() - 2.0).abs() < f32::EPSILON);
        assert!(f32::from_sql_value(SqlValue::Text(String::from("x"))).is_err());
    }
}
