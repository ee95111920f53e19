//! Condition trees for WHERE clauses and SET lists.
//!
//! A [`Condition`] is either a raw SQL fragment or an ordered list of [`Term`]s.
//! Terms are field equalities, "any of" lists, or nested `AND`/`OR` groups.
//!
//! Conditions can be built directly:
//!
//! ```
//! use pgwhere::Condition;
//!
//! let cond = Condition::new()
//!     .eq("a", 1)
//!     .eq("b", 2)
//!     .or(Condition::new().eq("c", 3).and(Condition::new().eq("d", 4).eq("e", 5)));
//! assert_eq!(
//!     cond.to_sql()?,
//!     "a = '1' AND b = '2' AND (c = '3' OR (d = '4' AND e = '5'))"
//! );
//! # Ok::<(), pgwhere::QbError>(())
//! ```
//!
//! or parsed from the looser mapping shape, where the keys `"and"` and `"or"`
//! open a nested group and an array value means "one of":
//!
//! ```
//! use pgwhere::Condition;
//! use serde_json::json;
//!
//! let cond = Condition::from_json(&json!({
//!     "status": "active",
//!     "or": { "role": ["admin", "owner"] }
//! }))?;
//! assert_eq!(
//!     cond.to_sql()?,
//!     "status = 'active' AND (role = 'admin' OR role = 'owner')"
//! );
//! # Ok::<(), pgwhere::QbError>(())
//! ```

use crate::error::{QbError, QbResult};
use crate::value::Value;
use std::fmt;

/// How sibling terms at one level are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
    /// Joins the assignments of an UPDATE's SET list.
    Comma,
}

impl Connective {
    /// Separator placed between sibling terms.
    pub fn separator(self) -> &'static str {
        match self {
            Connective::And => " AND ",
            Connective::Or => " OR ",
            Connective::Comma => ", ",
        }
    }

    /// Map a grouping key of the mapping form to its connective.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "and" => Some(Connective::And),
            "or" => Some(Connective::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Connective::And => "and",
            Connective::Or => "or",
            Connective::Comma => ",",
        })
    }
}

/// One entry of a condition's term list.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// `field = value` (`field IS NULL` for [`Value::Null`]).
    Eq(String, Value),
    /// One equality per value, only valid directly under [`Connective::Or`].
    AnyOf(String, Vec<Value>),
    /// A nested condition joined with its own connective and parenthesized.
    Group(Connective, Condition),
    /// A SQL fragment among other terms. Parenthesized in conditions, written
    /// as-is in a SET list.
    Raw(String),
}

/// A WHERE condition or SET list.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// SQL passed through verbatim. The caller is responsible for its safety.
    Raw(String),
    /// Ordered terms. An empty list compiles to nothing.
    Terms(Vec<Term>),
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Terms(Vec::new())
    }
}

impl Condition {
    /// An empty condition.
    pub fn new() -> Self {
        Self::default()
    }

    /// A raw SQL fragment.
    pub fn raw(sql: impl Into<String>) -> Self {
        Condition::Raw(sql.into())
    }

    /// Whether this condition compiles to an empty string.
    ///
    /// Raw fragments count as empty only when they are blank.
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::Raw(sql) => sql.trim().is_empty(),
            Condition::Terms(terms) => terms.iter().all(Term::is_empty),
        }
    }

    /// Append a term.
    ///
    /// Appending to a raw fragment turns the fragment into the first term, so
    /// `Condition::raw("hits = hits + 1").eq("b", 2)` works both as a WHERE
    /// condition and as a SET list.
    pub fn push(&mut self, term: Term) {
        match self {
            Condition::Terms(terms) => terms.push(term),
            Condition::Raw(sql) => {
                let raw = std::mem::take(sql);
                *self = Condition::Terms(vec![Term::Raw(raw), term]);
            }
        }
    }

    /// Add `field = value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Term::Eq(field.into(), value.into()));
        self
    }

    /// Add one equality per value. Only compiles under an `OR` connective.
    pub fn any_of<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(Term::AnyOf(
            field.into(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Add a nested `AND` group.
    pub fn and(mut self, group: Condition) -> Self {
        self.push(Term::Group(Connective::And, group));
        self
    }

    /// Add a nested `OR` group.
    pub fn or(mut self, group: Condition) -> Self {
        self.push(Term::Group(Connective::Or, group));
        self
    }

    /// Compile with `AND` between top-level terms.
    pub fn to_sql(&self) -> QbResult<String> {
        crate::compile::compile(self, Connective::And)
    }

    /// Parse the mapping form.
    ///
    /// - `null` is the empty condition, a string is a raw fragment.
    /// - In an object, the keys `"and"`/`"or"` open a group whose value must be
    ///   an object, a string, or `null`. Any other key is a field name whose
    ///   value is a scalar or an array of scalars.
    /// - Object key order is kept.
    pub fn from_json(value: &serde_json::Value) -> QbResult<Self> {
        use serde_json::Value as Json;
        match value {
            Json::Null => Ok(Condition::default()),
            Json::String(s) => Ok(Condition::Raw(s.clone())),
            Json::Object(map) => {
                let mut terms = Vec::with_capacity(map.len());
                for (key, value) in map {
                    terms.push(term_from_json(key, value)?);
                }
                Ok(Condition::Terms(terms))
            }
            other => Err(QbError::invalid_condition(format!(
                "expected an object, a string or null, got {other}"
            ))),
        }
    }
}

fn term_from_json(key: &str, value: &serde_json::Value) -> QbResult<Term> {
    use serde_json::Value as Json;

    if let Some(connective) = Connective::from_key(key) {
        return match value {
            Json::Object(_) | Json::String(_) | Json::Null => {
                Ok(Term::Group(connective, Condition::from_json(value)?))
            }
            other => Err(QbError::invalid_condition(format!(
                "group '{key}' must hold an object or a raw string, got {other}"
            ))),
        };
    }

    match value {
        Json::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(Value::from_json(item).ok_or_else(|| {
                    QbError::invalid_condition(format!(
                        "field '{key}' list may only hold scalars, got {item}"
                    ))
                })?);
            }
            Ok(Term::AnyOf(key.to_string(), values))
        }
        Json::Object(_) => Err(QbError::invalid_condition(format!(
            "field '{key}' cannot hold an object"
        ))),
        scalar => match Value::from_json(scalar) {
            Some(v) => Ok(Term::Eq(key.to_string(), v)),
            None => Err(QbError::invalid_condition(format!(
                "unsupported value for field '{key}'"
            ))),
        },
    }
}

impl Term {
    /// Whether this term compiles to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Term::Eq(..) => false,
            Term::AnyOf(_, values) => values.is_empty(),
            Term::Group(_, inner) => inner.is_empty(),
            Term::Raw(sql) => sql.trim().is_empty(),
        }
    }
}

impl From<&str> for Condition {
    fn from(sql: &str) -> Self {
        Condition::Raw(sql.to_string())
    }
}

impl From<String> for Condition {
    fn from(sql: String) -> Self {
        Condition::Raw(sql)
    }
}

impl From<&Condition> for Condition {
    fn from(cond: &Condition) -> Self {
        cond.clone()
    }
}

impl From<Option<Condition>> for Condition {
    fn from(cond: Option<Condition>) -> Self {
        cond.unwrap_or_default()
    }
}

impl From<Vec<Term>> for Condition {
    fn from(terms: Vec<Term>) -> Self {
        Condition::Terms(terms)
    }
}

impl TryFrom<serde_json::Value> for Condition {
    type Error = QbError;

    fn try_from(value: serde_json::Value) -> QbResult<Self> {
        Condition::from_json(&value)
    }
}

impl TryFrom<&serde_json::Value> for Condition {
    type Error = QbError;

    fn try_from(value: &serde_json::Value) -> QbResult<Self> {
        Condition::from_json(value)
    }
}
