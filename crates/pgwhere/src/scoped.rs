//! Table-bound views over a [`QueryBuilder`].

use crate::builder::QueryBuilder;
use crate::client::Executor;
use crate::condition::Condition;
use crate::error::QbResult;
use crate::row::{FromRecord, Record};
use crate::statement::{Columns, Fields};

/// A [`QueryBuilder`] with the table fixed.
///
/// Obtained from [`QueryBuilder::scoped`]. Borrows the builder, so any number
/// of views can share one connection.
#[derive(Debug)]
pub struct Scoped<'a, E> {
    qb: &'a QueryBuilder<E>,
    table: String,
}

impl<E> Clone for Scoped<'_, E> {
    fn clone(&self) -> Self {
        Self {
            qb: self.qb,
            table: self.table.clone(),
        }
    }
}

impl<'a, E: Executor> Scoped<'a, E> {
    pub(crate) fn new(qb: &'a QueryBuilder<E>, table: String) -> Self {
        Self { qb, table }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The underlying builder.
    pub fn builder(&self) -> &'a QueryBuilder<E> {
        self.qb
    }

    pub async fn select(
        &self,
        condition: impl Into<Condition>,
        columns: impl Into<Columns>,
    ) -> QbResult<Vec<Record>> {
        self.qb.select(&self.table, condition, columns).await
    }

    pub async fn one(
        &self,
        condition: impl Into<Condition>,
        columns: impl Into<Columns>,
    ) -> QbResult<Option<Record>> {
        self.qb.one(&self.table, condition, columns).await
    }

    pub async fn select_as<T: FromRecord>(
        &self,
        condition: impl Into<Condition>,
        columns: impl Into<Columns>,
    ) -> QbResult<Vec<T>> {
        self.qb.select_as(&self.table, condition, columns).await
    }

    pub async fn one_as<T: FromRecord>(
        &self,
        condition: impl Into<Condition>,
        columns: impl Into<Columns>,
    ) -> QbResult<Option<T>> {
        self.qb.one_as(&self.table, condition, columns).await
    }

    pub async fn insert(&self, fields: &Fields) -> QbResult<i64> {
        self.qb.insert(&self.table, fields).await
    }

    pub async fn insert_returning(
        &self,
        fields: &Fields,
        returning: impl Into<Columns>,
    ) -> QbResult<Record> {
        self.qb.insert_returning(&self.table, fields, returning).await
    }

    pub async fn update(
        &self,
        values: impl Into<Condition>,
        condition: impl Into<Condition>,
    ) -> QbResult<bool> {
        self.qb.update(&self.table, values, condition).await
    }

    pub async fn update_count(
        &self,
        values: impl Into<Condition>,
        condition: impl Into<Condition>,
    ) -> QbResult<u64> {
        self.qb.update_count(&self.table, values, condition).await
    }

    pub async fn del(&self, condition: impl Into<Condition>) -> QbResult<bool> {
        self.qb.del(&self.table, condition).await
    }

    pub async fn del_count(&self, condition: impl Into<Condition>) -> QbResult<u64> {
        self.qb.del_count(&self.table, condition).await
    }
}
