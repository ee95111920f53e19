//! Scalar values accepted in conditions, SET lists and inserts.

use crate::error::{QbError, QbResult};
use crate::escape::quote_literal;
use std::fmt;

/// A scalar that can be spliced into SQL text.
///
/// Every non-null value renders as a quoted string literal (`'42'`, `'true'`),
/// leaving type resolution to the server, the same way untyped literals behave
/// in hand-written SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render as a SQL literal: `NULL` or an escaped single-quoted string.
    pub fn to_literal(&self) -> QbResult<String> {
        match self {
            Value::Null => Ok("NULL".to_string()),
            Value::Bool(b) => Ok(if *b { "'true'" } else { "'false'" }.to_string()),
            Value::Int(i) => Ok(format!("'{i}'")),
            Value::Float(f) => float_literal(*f),
            Value::Text(s) => quote_literal(s),
        }
    }

    /// Convert a JSON scalar. Arrays and objects are not scalars and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value as Json;
        match value {
            Json::Null => Some(Value::Null),
            Json::Bool(b) => Some(Value::Bool(*b)),
            Json::Number(n) => Some(if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
                Value::Float(f)
            } else {
                // u64 above i64::MAX
                Value::Text(n.to_string())
            }),
            Json::String(s) => Some(Value::Text(s.clone())),
            Json::Array(_) | Json::Object(_) => None,
        }
    }
}

fn float_literal(f: f64) -> QbResult<String> {
    if f.is_nan() {
        Ok("'NaN'".to_string())
    } else if f.is_infinite() {
        Ok(if f > 0.0 { "'Infinity'" } else { "'-Infinity'" }.to_string())
    } else {
        Ok(format!("'{f}'"))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Text(v.to_string()),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.hyphenated().to_string())
    }
}

impl From<chrono::NaiveDate> for Value {
    fn from(v: chrono::NaiveDate) -> Self {
        Value::Text(v.format("%Y-%m-%d").to_string())
    }
}

impl From<chrono::NaiveDateTime> for Value {
    fn from(v: chrono::NaiveDateTime) -> Self {
        Value::Text(v.format("%Y-%m-%d %H:%M:%S%.f").to_string())
    }
}

impl<Tz: chrono::TimeZone> From<chrono::DateTime<Tz>> for Value {
    fn from(v: chrono::DateTime<Tz>) -> Self {
        Value::Text(v.to_utc().to_rfc3339())
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = QbError;

    fn try_from(value: &serde_json::Value) -> QbResult<Self> {
        Value::from_json(value)
            .ok_or_else(|| QbError::InvalidValue(format!("expected a scalar, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literals_are_quoted() {
        assert_eq!(Value::from(1).to_literal().unwrap(), "'1'");
        assert_eq!(Value::from(-7i64).to_literal().unwrap(), "'-7'");
        assert_eq!(Value::from(true).to_literal().unwrap(), "'true'");
        assert_eq!(Value::from(1.5).to_literal().unwrap(), "'1.5'");
        assert_eq!(Value::from("x'y").to_literal().unwrap(), "'x''y'");
        assert_eq!(Value::Null.to_literal().unwrap(), "NULL");
    }

    #[test]
    fn float_specials() {
        assert_eq!(Value::from(f64::NAN).to_literal().unwrap(), "'NaN'");
        assert_eq!(
            Value::from(f64::NEG_INFINITY).to_literal().unwrap(),
            "'-Infinity'"
        );
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::Text("a".into()));
    }

    #[test]
    fn json_scalars() {
        assert_eq!(Value::from_json(&json!(3)), Some(Value::Int(3)));
        assert_eq!(Value::from_json(&json!(2.5)), Some(Value::Float(2.5)));
        assert_eq!(Value::from_json(&json!("s")), Some(Value::Text("s".into())));
        assert_eq!(Value::from_json(&json!(null)), Some(Value::Null));
        assert_eq!(
            Value::from_json(&json!(u64::MAX)),
            Some(Value::Text(u64::MAX.to_string()))
        );
        assert_eq!(Value::from_json(&json!([1])), None);
        assert!(Value::try_from(&json!({"a": 1})).is_err());
    }

    #[test]
    fn uuid_and_dates_render_as_text() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            Value::from(id),
            Value::Text("00000000-0000-0000-0000-000000000000".into())
        );
        let d = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Value::from(d), Value::Text("2024-02-29".into()));
    }
}
