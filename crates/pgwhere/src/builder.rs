//! The query builder: statement building plus execution on one connection.

use crate::client::Executor;
use crate::condition::Condition;
use crate::config::{BuilderOptions, ConnectOptions};
use crate::error::{QbError, QbResult};
use crate::row::{FromRecord, Record};
use crate::scoped::Scoped;
use crate::statement::{self, Columns, Fields};

/// Builds statements from conditions and runs them on its executor.
///
/// One builder owns one executor for its whole lifetime. Pass the builder (or
/// a reference to it) to whatever needs database access; there is no global
/// instance.
///
/// # Example
/// ```ignore
/// use pgwhere::{Condition, ConnectOptions, Fields, QueryBuilder};
///
/// let qb = QueryBuilder::connect(&ConnectOptions::from_env()?).await?;
///
/// let id = qb.insert("users", &Fields::new().set("name", "alice")).await?;
/// let alice = qb.one("users", Condition::new().eq("id", id), "*").await?;
///
/// let users = qb.scoped("users");
/// users.update(Condition::new().eq("name", "alicia"), Condition::new().eq("id", id)).await?;
/// users.del(Condition::new().eq("id", id)).await?;
/// ```
#[derive(Debug)]
pub struct QueryBuilder<E> {
    executor: E,
    options: BuilderOptions,
}

impl QueryBuilder<tokio_postgres::Client> {
    /// Open a connection and wrap it in a builder.
    ///
    /// The connection's I/O task is spawned onto the current tokio runtime.
    pub async fn connect(opts: &ConnectOptions) -> QbResult<Self> {
        let (client, connection) = opts
            .to_pg_config()
            .connect(tokio_postgres::NoTls)
            .await
            .map_err(QbError::from_connect_error)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "pgwhere.conn",
            host = %opts.host,
            port = opts.port,
            user = %opts.user,
            db = opts.db.as_deref().unwrap_or("-"),
            "connected"
        );

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                #[cfg(feature = "tracing")]
                tracing::error!(target: "pgwhere.conn", error = %e, "connection closed with error");
                #[cfg(not(feature = "tracing"))]
                let _ = e;
            }
        });

        Ok(Self::new(client))
    }
}

impl<E: Executor> QueryBuilder<E> {
    pub fn new(executor: E) -> Self {
        Self::with_options(executor, BuilderOptions::default())
    }

    pub fn with_options(executor: E, options: BuilderOptions) -> Self {
        Self { executor, options }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// A view with `table` fixed for every operation.
    pub fn scoped(&self, table: impl Into<String>) -> Scoped<'_, E> {
        Scoped::new(self, table.into())
    }

    /// `SELECT` rows matching `condition`.
    pub async fn select(
        &self,
        table: &str,
        condition: impl Into<Condition>,
        columns: impl Into<Columns>,
    ) -> QbResult<Vec<Record>> {
        let sql = statement::select_sql(table, &columns.into(), &condition.into())?;
        self.fetch("select", &sql).await
    }

    /// First row matching `condition`, if any.
    pub async fn one(
        &self,
        table: &str,
        condition: impl Into<Condition>,
        columns: impl Into<Columns>,
    ) -> QbResult<Option<Record>> {
        let rows = self.select(table, condition, columns).await?;
        Ok(rows.into_iter().next())
    }

    /// Like [`select`](Self::select), mapping every row through [`FromRecord`].
    pub async fn select_as<T: FromRecord>(
        &self,
        table: &str,
        condition: impl Into<Condition>,
        columns: impl Into<Columns>,
    ) -> QbResult<Vec<T>> {
        let rows = self.select(table, condition, columns).await?;
        rows.iter().map(T::from_record).collect()
    }

    /// Like [`one`](Self::one), mapping the row through [`FromRecord`].
    pub async fn one_as<T: FromRecord>(
        &self,
        table: &str,
        condition: impl Into<Condition>,
        columns: impl Into<Columns>,
    ) -> QbResult<Option<T>> {
        let row = self.one(table, condition, columns).await?;
        row.as_ref().map(T::from_record).transpose()
    }

    /// `INSERT` one row and return its identifier.
    ///
    /// The identifier is the value of [`BuilderOptions::id_column`], read back
    /// with `RETURNING` and parsed as an `i64`. For `uuid` or text keys use
    /// [`insert_returning`](Self::insert_returning).
    pub async fn insert(&self, table: &str, fields: &Fields) -> QbResult<i64> {
        let id_column = self.options.id_column.as_str();
        let row = self
            .insert_returning(table, fields, Columns::list([id_column]))
            .await?;
        row.get_as(id_column)
    }

    /// `INSERT` one row and return the `returning` columns of the new row.
    pub async fn insert_returning(
        &self,
        table: &str,
        fields: &Fields,
        returning: impl Into<Columns>,
    ) -> QbResult<Record> {
        let sql = statement::insert_returning_sql(table, fields, &returning.into())?;
        let rows = self.fetch("insert", &sql).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| QbError::decode("RETURNING", "INSERT returned no row"))
    }

    /// `UPDATE` rows matching `condition`. Returns `true` once the statement ran.
    pub async fn update(
        &self,
        table: &str,
        values: impl Into<Condition>,
        condition: impl Into<Condition>,
    ) -> QbResult<bool> {
        self.update_count(table, values, condition).await?;
        Ok(true)
    }

    /// `UPDATE` rows matching `condition` and return how many changed.
    pub async fn update_count(
        &self,
        table: &str,
        values: impl Into<Condition>,
        condition: impl Into<Condition>,
    ) -> QbResult<u64> {
        let sql = statement::update_sql(table, &values.into(), &condition.into())?;
        self.execute("update", &sql).await
    }

    /// `DELETE` rows matching `condition`. Returns `true` once the statement ran.
    pub async fn del(&self, table: &str, condition: impl Into<Condition>) -> QbResult<bool> {
        self.del_count(table, condition).await?;
        Ok(true)
    }

    /// `DELETE` rows matching `condition` and return how many were removed.
    pub async fn del_count(&self, table: &str, condition: impl Into<Condition>) -> QbResult<u64> {
        let sql = statement::delete_sql(table, &condition.into())?;
        self.execute("delete", &sql).await
    }

    async fn fetch(&self, kind: &'static str, sql: &str) -> QbResult<Vec<Record>> {
        log_statement(kind, sql);
        let result = self.executor.fetch(sql).await;
        match &result {
            Ok(rows) => log_done(kind, rows.len() as u64),
            Err(e) => log_failure(kind, e),
        }
        result
    }

    async fn execute(&self, kind: &'static str, sql: &str) -> QbResult<u64> {
        log_statement(kind, sql);
        let result = self.executor.execute(sql).await;
        match &result {
            Ok(n) => log_done(kind, *n),
            Err(e) => log_failure(kind, e),
        }
        result
    }
}

#[cfg(test)]
mod tests;

#[cfg(feature = "tracing")]
fn log_statement(kind: &'static str, sql: &str) {
    tracing::debug!(target: "pgwhere.sql", kind, sql, "executing");
}

#[cfg(feature = "tracing")]
fn log_done(kind: &'static str, rows: u64) {
    tracing::trace!(target: "pgwhere.sql", kind, rows, "done");
}

#[cfg(feature = "tracing")]
fn log_failure(kind: &'static str, err: &QbError) {
    tracing::warn!(target: "pgwhere.sql", kind, code = err.code().unwrap_or("-"), error = %err, "statement failed");
}

#[cfg(not(feature = "tracing"))]
fn log_statement(_: &'static str, _: &str) {}

#[cfg(not(feature = "tracing"))]
fn log_done(_: &'static str, _: u64) {}

#[cfg(not(feature = "tracing"))]
fn log_failure(_: &'static str, _: &QbError) {}
