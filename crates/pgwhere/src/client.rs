//! The executor seam between statement building and the database driver.

use crate::error::{QbError, QbResult};
use crate::row::Record;
use tokio_postgres::SimpleQueryMessage;

/// Something that can run finished SQL text.
///
/// Statements reach the executor fully rendered (names and values already
/// escaped), so implementations need no parameter binding. Implemented for
/// [`tokio_postgres::Client`]; tests and wrappers can provide their own.
pub trait Executor: Send + Sync {
    /// Run a statement and collect the rows it returns.
    fn fetch(&self, sql: &str) -> impl std::future::Future<Output = QbResult<Vec<Record>>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = QbResult<u64>> + Send;
}

impl Executor for tokio_postgres::Client {
    async fn fetch(&self, sql: &str) -> QbResult<Vec<Record>> {
        let messages = self
            .simple_query(sql)
            .await
            .map_err(|e| QbError::from_statement_error(e, sql))?;
        Ok(collect_rows(&messages))
    }

    async fn execute(&self, sql: &str) -> QbResult<u64> {
        let messages = self
            .simple_query(sql)
            .await
            .map_err(|e| QbError::from_statement_error(e, sql))?;
        Ok(affected_rows(&messages))
    }
}

impl<E: Executor> Executor for &E {
    fn fetch(&self, sql: &str) -> impl std::future::Future<Output = QbResult<Vec<Record>>> + Send {
        (**self).fetch(sql)
    }

    fn execute(&self, sql: &str) -> impl std::future::Future<Output = QbResult<u64>> + Send {
        (**self).execute(sql)
    }
}

fn collect_rows(messages: &[SimpleQueryMessage]) -> Vec<Record> {
    messages
        .iter()
        .filter_map(|m| match m {
            SimpleQueryMessage::Row(row) => Some(Record::from(row)),
            _ => None,
        })
        .collect()
}

/// Affected-row count of the last completed command.
fn affected_rows(messages: &[SimpleQueryMessage]) -> u64 {
    messages
        .iter()
        .rev()
        .find_map(|m| match m {
            SimpleQueryMessage::CommandComplete(n) => Some(*n),
            _ => None,
        })
        .unwrap_or(0)
}
