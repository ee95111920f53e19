//! Error types for pgwhere

use thiserror::Error;

/// Result type alias for pgwhere operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors raised while compiling or executing statements.
#[derive(Debug, Error)]
pub enum QbError {
    /// Failed to reach or authenticate to the database
    #[error("Connection error ({}): {message}", code.as_deref().unwrap_or("-"))]
    Connection {
        /// SQLSTATE reported by the server, if any.
        code: Option<String>,
        message: String,
    },

    /// The server rejected a statement
    #[error("Statement error ({}): {message}", code.as_deref().unwrap_or("-"))]
    Statement {
        /// SQLSTATE reported by the server, if any.
        code: Option<String>,
        message: String,
        /// The SQL text that triggered the error.
        sql: String,
    },

    /// The condition has a shape that cannot be compiled
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    /// A table or column name failed validation
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A value cannot be rendered as a SQL literal
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Row value could not be read as the requested type
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Bad connection options
    #[error("Config error: {0}")]
    Config(String),
}

impl QbError {
    pub fn invalid_condition(message: impl Into<String>) -> Self {
        Self::InvalidCondition(message.into())
    }

    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is an invalid condition error
    pub fn is_invalid_condition(&self) -> bool {
        matches!(self, Self::InvalidCondition(_))
    }

    /// SQLSTATE carried by connection and statement errors.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Connection { code, .. } | Self::Statement { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Wrap a driver error raised while connecting.
    pub fn from_connect_error(err: tokio_postgres::Error) -> Self {
        let (code, message) = split_driver_error(&err);
        Self::Connection { code, message }
    }

    /// Wrap a driver error raised while running `sql`.
    pub fn from_statement_error(err: tokio_postgres::Error, sql: &str) -> Self {
        let (code, message) = split_driver_error(&err);
        Self::Statement {
            code,
            message,
            sql: sql.to_string(),
        }
    }
}

fn split_driver_error(err: &tokio_postgres::Error) -> (Option<String>, String) {
    let code = err.code().map(|state| state.code().to_string());
    let message = match err.as_db_error() {
        Some(db_err) => db_err.message().to_string(),
        None => err.to_string(),
    };
    (code, message)
}
