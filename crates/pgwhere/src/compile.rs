//! The condition compiler: [`Condition`] tree to SQL expression text.
//!
//! Compilation is a pure function. Terms are rendered in order and joined with
//! the separator of the level's [`Connective`]; nested groups are compiled with
//! their own connective and parenthesized. Groups and lists that compile to
//! nothing are dropped, so an empty group never leaves `()` behind.

use crate::condition::{Condition, Connective, Term};
use crate::error::{QbError, QbResult};
use crate::escape::write_ident;
use crate::value::Value;

/// Compile `condition`, joining top-level terms with `connective`.
///
/// Returns an empty string for an empty condition; callers omit the clause.
pub fn compile(condition: &Condition, connective: Connective) -> QbResult<String> {
    let mut out = String::new();
    write_condition(condition, connective, &mut out)?;
    Ok(out)
}

/// Compile a WHERE condition (top level joined with `AND`).
pub fn compile_where(condition: &Condition) -> QbResult<String> {
    compile(condition, Connective::And)
}

/// Compile an UPDATE's SET list (assignments joined with `,`).
pub fn compile_set(values: &Condition) -> QbResult<String> {
    compile(values, Connective::Comma)
}

fn write_condition(condition: &Condition, connective: Connective, out: &mut String) -> QbResult<()> {
    let terms = match condition {
        Condition::Raw(sql) => {
            if !sql.trim().is_empty() {
                out.push_str(sql);
            }
            return Ok(());
        }
        Condition::Terms(terms) => terms,
    };

    let mut first = true;
    for term in terms {
        let mark = out.len();
        if !first {
            out.push_str(connective.separator());
        }
        let body = out.len();
        write_term(term, connective, out)?;
        if out.len() == body {
            // Term compiled to nothing; drop the separator as well.
            out.truncate(mark);
        } else {
            first = false;
        }
    }
    Ok(())
}

fn write_term(term: &Term, connective: Connective, out: &mut String) -> QbResult<()> {
    match term {
        Term::Group(inner_connective, inner) => {
            if connective == Connective::Comma {
                return Err(QbError::invalid_condition(format!(
                    "'{inner_connective}' group is not allowed in a SET list"
                )));
            }
            let open = out.len();
            out.push('(');
            write_condition(inner, *inner_connective, out)?;
            if out.len() == open + 1 {
                out.truncate(open);
            } else {
                out.push(')');
            }
            Ok(())
        }
        Term::Raw(sql) if sql.trim().is_empty() => Ok(()),
        // Verbatim in SET lists, parenthesized in conditions.
        Term::Raw(sql) if connective == Connective::Comma => {
            out.push_str(sql);
            Ok(())
        }
        Term::Raw(sql) => {
            out.push('(');
            out.push_str(sql);
            out.push(')');
            Ok(())
        }
        Term::Eq(field, value) => write_equality(field, value, connective, out),
        Term::AnyOf(field, values) => {
            if connective != Connective::Or {
                return Err(QbError::invalid_condition(format!(
                    "list value for field '{field}' is only allowed under 'or', found under '{connective}'"
                )));
            }
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    out.push_str(connective.separator());
                }
                write_equality(field, value, Connective::And, out)?;
            }
            Ok(())
        }
    }
}

fn write_equality(field: &str, value: &Value, connective: Connective, out: &mut String) -> QbResult<()> {
    if Connective::from_key(&field.to_ascii_lowercase()).is_some() {
        return Err(QbError::invalid_condition(format!(
            "'{field}' is reserved for grouping and cannot be used as a field name"
        )));
    }
    write_ident(field, out)?;
    match (value, connective) {
        (Value::Null, Connective::And | Connective::Or) => out.push_str(" IS NULL"),
        _ => {
            out.push_str(" = ");
            out.push_str(&value.to_literal()?);
        }
    }
    Ok(())
}
