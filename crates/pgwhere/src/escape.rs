//! Escaping primitives for splicing names and values into SQL text.
//!
//! Statements built by this crate are sent as plain text, so every name and
//! value goes through one of these functions first:
//!
//! - [`quote_literal`] wraps a value in single quotes and doubles any `'`
//!   (standard-conforming strings, so backslashes are literal).
//! - [`quote_ident`] validates a possibly dotted identifier. Bare parts must
//!   match `[A-Za-z_][A-Za-z0-9_$]*`; parts written as `"..."` may contain
//!   anything except NUL and are re-emitted with `"` doubled.
//!
//! # Example
//! ```
//! use pgwhere::escape::{quote_ident, quote_literal};
//!
//! assert_eq!(quote_literal("O'Brien")?, "'O''Brien'");
//! assert_eq!(quote_ident("public.users")?, "public.users");
//! assert_eq!(quote_ident(r#""Mixed Case".id"#)?, r#""Mixed Case".id"#);
//! # Ok::<(), pgwhere::QbError>(())
//! ```

use crate::error::{QbError, QbResult};

/// Quote a string as a SQL string literal.
pub fn quote_literal(value: &str) -> QbResult<String> {
    if value.contains('\0') {
        return Err(QbError::InvalidValue(
            "string literal cannot contain NUL character".to_string(),
        ));
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    Ok(out)
}

/// Validate an identifier and render it for use in SQL text.
pub fn quote_ident(name: &str) -> QbResult<String> {
    let mut out = String::with_capacity(name.len());
    write_ident(name, &mut out)?;
    Ok(out)
}

/// Validate `name` and append its SQL rendering to `out`.
pub(crate) fn write_ident(name: &str, out: &mut String) -> QbResult<()> {
    if name.is_empty() {
        return Err(QbError::invalid_identifier("identifier cannot be empty"));
    }
    if name.contains('\0') {
        return Err(QbError::invalid_identifier(
            "identifier cannot contain NUL character",
        ));
    }

    let mut chars = name.chars().peekable();
    let mut first = true;

    loop {
        if !first {
            match chars.next() {
                None => break,
                Some('.') if chars.peek().is_some() => out.push('.'),
                Some('.') => {
                    return Err(QbError::invalid_identifier(format!(
                        "trailing '.' in {name:?}"
                    )));
                }
                Some(c) => {
                    return Err(QbError::invalid_identifier(format!(
                        "expected '.' between parts of {name:?}, got '{c}'"
                    )));
                }
            }
        }
        first = false;

        if chars.peek() == Some(&'"') {
            chars.next();
            let start = out.len();
            out.push('"');
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        out.push_str("\"\"");
                    }
                    Some('"') => break,
                    Some(c) => out.push(c),
                    None => {
                        return Err(QbError::invalid_identifier(format!(
                            "unclosed quote in {name:?}"
                        )));
                    }
                }
            }
            if out.len() == start + 1 {
                return Err(QbError::invalid_identifier(format!(
                    "empty quoted part in {name:?}"
                )));
            }
            out.push('"');
            continue;
        }

        let mut len = 0usize;
        while let Some(&c) = chars.peek() {
            if c == '.' {
                break;
            }
            let ok = if len == 0 {
                c == '_' || c.is_ascii_alphabetic()
            } else {
                c == '_' || c == '$' || c.is_ascii_alphanumeric()
            };
            if !ok {
                return Err(QbError::invalid_identifier(format!(
                    "invalid character '{c}' in {name:?}"
                )));
            }
            out.push(c);
            len += 1;
            chars.next();
        }
        if len == 0 {
            return Err(QbError::invalid_identifier(format!(
                "empty segment in {name:?}"
            )));
        }
    }

    Ok(())
}
