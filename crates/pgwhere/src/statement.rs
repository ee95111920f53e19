//! Statement text for the four supported statement kinds.
//!
//! These functions only build SQL; running it is the job of
//! [`QueryBuilder`](crate::QueryBuilder).

use crate::compile::{compile_set, compile_where};
use crate::condition::Condition;
use crate::error::{QbError, QbResult};
use crate::escape::{quote_ident, write_ident};
use crate::value::Value;

/// Column list of a SELECT.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Columns {
    /// `*`
    #[default]
    All,
    /// Explicit column names, validated as identifiers.
    List(Vec<String>),
}

impl Columns {
    pub fn list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Columns::List(names.into_iter().map(Into::into).collect())
    }

    fn to_sql(&self) -> QbResult<String> {
        match self {
            Columns::All => Ok("*".to_string()),
            Columns::List(names) if names.is_empty() => Ok("*".to_string()),
            Columns::List(names) => {
                let mut out = String::new();
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_ident(name, &mut out)?;
                }
                Ok(out)
            }
        }
    }
}

impl From<&str> for Columns {
    /// `"*"` selects everything, otherwise a comma-separated list.
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s == "*" {
            return Columns::All;
        }
        Columns::list(s.split(',').map(str::trim).filter(|c| !c.is_empty()))
    }
}

impl From<Vec<String>> for Columns {
    fn from(names: Vec<String>) -> Self {
        Columns::List(names)
    }
}

impl<const N: usize> From<[&str; N]> for Columns {
    fn from(names: [&str; N]) -> Self {
        Columns::list(names)
    }
}

/// Column/value pairs of an INSERT, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, Value)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value. Setting a column twice replaces the earlier value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let column = column.into();
        let value = value.into();
        match self.0.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.0.push((column, value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Parse a JSON object of scalars.
    pub fn from_json(value: &serde_json::Value) -> QbResult<Self> {
        let Some(map) = value.as_object() else {
            return Err(QbError::InvalidValue(format!(
                "insert fields must be an object, got {value}"
            )));
        };
        let mut fields = Fields::new();
        for (column, v) in map {
            fields = fields.set(column.clone(), Value::try_from(v)?);
        }
        Ok(fields)
    }

    /// View these fields as equality terms, e.g. to use them as a SET list.
    pub fn to_condition(&self) -> Condition {
        self.0
            .iter()
            .fold(Condition::new(), |cond, (c, v)| cond.eq(c.clone(), v.clone()))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Fields::new(), |fields, (k, v)| fields.set(k, v))
    }
}

/// `SELECT <columns> FROM <table>[ WHERE <condition>]`
pub fn select_sql(table: &str, columns: &Columns, condition: &Condition) -> QbResult<String> {
    let mut sql = format!("SELECT {} FROM {}", columns.to_sql()?, quote_ident(table)?);
    let clause = compile_where(condition)?;
    if !clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }
    Ok(sql)
}

/// `INSERT INTO <table> (...) VALUES (...) RETURNING <returning>`
///
/// With no fields, emits `DEFAULT VALUES`.
pub fn insert_sql(table: &str, fields: &Fields, returning: &str) -> QbResult<String> {
    insert_returning_sql(table, fields, &Columns::list([returning]))
}

/// Like [`insert_sql`] with any column list after `RETURNING`.
pub fn insert_returning_sql(table: &str, fields: &Fields, returning: &Columns) -> QbResult<String> {
    let mut sql = format!("INSERT INTO {}", quote_ident(table)?);
    if fields.is_empty() {
        sql.push_str(" DEFAULT VALUES");
    } else {
        let mut columns = String::new();
        let mut values = String::new();
        for (i, (column, value)) in fields.iter().enumerate() {
            if i > 0 {
                columns.push_str(", ");
                values.push_str(", ");
            }
            write_ident(column, &mut columns)?;
            values.push_str(&value.to_literal()?);
        }
        sql.push_str(&format!(" ({columns}) VALUES ({values})"));
    }
    sql.push_str(" RETURNING ");
    sql.push_str(&returning.to_sql()?);
    Ok(sql)
}

/// `UPDATE <table> SET <values> WHERE <condition>`
///
/// Both the SET list and the condition must compile to something.
pub fn update_sql(table: &str, values: &Condition, condition: &Condition) -> QbResult<String> {
    let table = quote_ident(table)?;
    let set = compile_set(values)?;
    if set.is_empty() {
        return Err(QbError::invalid_condition(format!(
            "UPDATE {table} has nothing to SET"
        )));
    }
    let clause = require_where("UPDATE", &table, condition)?;
    Ok(format!("UPDATE {table} SET {set} WHERE {clause}"))
}

/// `DELETE FROM <table> WHERE <condition>`
pub fn delete_sql(table: &str, condition: &Condition) -> QbResult<String> {
    let table = quote_ident(table)?;
    let clause = require_where("DELETE", &table, condition)?;
    Ok(format!("DELETE FROM {table} WHERE {clause}"))
}

fn require_where(kind: &str, table: &str, condition: &Condition) -> QbResult<String> {
    let clause = compile_where(condition)?;
    if clause.trim().is_empty() {
        return Err(QbError::invalid_condition(format!(
            "{kind} on {table} requires a non-empty condition"
        )));
    }
    Ok(clause)
}
