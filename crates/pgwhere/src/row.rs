//! Result rows.

use crate::error::{QbError, QbResult};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::str::FromStr;
use tokio_postgres::SimpleQueryRow;

/// One result row: column names mapped to their text values, in column order.
///
/// Values arrive in the server's text format; `None` is SQL `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    columns: Vec<String>,
    values: Vec<Option<String>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Builder-style, mainly for tests and custom executors.
    pub fn with(mut self, column: impl Into<String>, value: Option<&str>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.map(str::to_string));
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Text value of `column`. `None` when the column is missing or NULL.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.position(column)
            .and_then(|i| self.values[i].as_deref())
    }

    /// Parse the value of a column that must be present and non-null.
    pub fn get_as<T>(&self, column: &str) -> QbResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.try_get_as(column)?
            .ok_or_else(|| QbError::decode(column, "unexpected NULL"))
    }

    /// Parse the value of a column that may be NULL.
    pub fn try_get_as<T>(&self, column: &str) -> QbResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let i = self
            .position(column)
            .ok_or_else(|| QbError::decode(column, "no such column"))?;
        match self.values[i].as_deref() {
            None => Ok(None),
            Some(text) => text
                .parse::<T>()
                .map(Some)
                .map_err(|e| QbError::decode(column, e.to_string())),
        }
    }

    /// Iterate `(column, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.columns
            .iter()
            .zip(&self.values)
            .map(|(c, v)| (c.as_str(), v.as_deref()))
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

impl From<&SimpleQueryRow> for Record {
    fn from(row: &SimpleQueryRow) -> Self {
        let columns: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
        let values = (0..columns.len())
            .map(|i| row.get(i).map(str::to_string))
            .collect();
        Self { columns, values }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}

/// Map a [`Record`] into a Rust type.
///
/// # Example
/// ```
/// use pgwhere::{FromRecord, QbResult, Record};
///
/// struct User {
///     id: i64,
///     name: String,
///     email: Option<String>,
/// }
///
/// impl FromRecord for User {
///     fn from_record(r: &Record) -> QbResult<Self> {
///         Ok(Self {
///             id: r.get_as("id")?,
///             name: r.get_as("name")?,
///             email: r.try_get_as("email")?,
///         })
///     }
/// }
///
/// let row = Record::new().with("id", Some("1")).with("name", Some("ann")).with("email", None);
/// let user = User::from_record(&row)?;
/// assert_eq!(user.id, 1);
/// assert_eq!(user.email, None);
/// # Ok::<(), pgwhere::QbError>(())
/// ```
pub trait FromRecord: Sized {
    fn from_record(record: &Record) -> QbResult<Self>;
}

impl FromRecord for Record {
    fn from_record(record: &Record) -> QbResult<Self> {
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::new()
            .with("id", Some("42"))
            .with("name", Some("alice"))
            .with("email", None)
    }

    #[test]
    fn get_by_name() {
        let r = sample();
        assert_eq!(r.get("name"), Some("alice"));
        assert_eq!(r.get("email"), None);
        assert_eq!(r.get("missing"), None);
        assert!(r.contains("email"));
        assert_eq!(r.columns().collect::<Vec<_>>(), ["id", "name", "email"]);
    }

    #[test]
    fn typed_access() {
        let r = sample();
        assert_eq!(r.get_as::<i64>("id").unwrap(), 42);
        assert_eq!(r.try_get_as::<String>("email").unwrap(), None);
        assert!(matches!(
            r.get_as::<String>("email"),
            Err(QbError::Decode { .. })
        ));
        assert!(matches!(
            r.get_as::<i64>("name"),
            Err(QbError::Decode { .. })
        ));
        assert!(r.get_as::<i64>("nope").is_err());
    }

    #[test]
    fn serializes_as_object() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"id":"42","name":"alice","email":null}"#);
    }
}
