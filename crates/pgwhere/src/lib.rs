//! # pgwhere
//!
//! A small PostgreSQL query helper that turns nested condition trees into
//! WHERE clauses.
//!
//! - **Condition trees**: field equalities, "one of" lists and nested
//!   `AND`/`OR` groups, built in Rust or parsed from a JSON mapping
//! - **Four statements**: `select`/`one`/`insert`/`update`/`del` over one
//!   connection
//! - **Bound views**: `scoped("users")` fixes the table for every call
//! - **Inline escaping**: names are validated identifiers, values are quoted
//!   literals; raw fragments pass through untouched
//!
//! ```ignore
//! use pgwhere::{Condition, ConnectOptions, Fields, QueryBuilder};
//! use serde_json::json;
//!
//! let qb = QueryBuilder::connect(&ConnectOptions::from_env()?).await?;
//!
//! // SELECT * FROM users WHERE status = 'active' AND (role = 'admin' OR role = 'owner')
//! let rows = qb
//!     .select(
//!         "users",
//!         Condition::from_json(&json!({"status": "active", "or": {"role": ["admin", "owner"]}}))?,
//!         "*",
//!     )
//!     .await?;
//!
//! let id = qb.insert("users", &Fields::new().set("name", "bob")).await?;
//! qb.update("users", Condition::new().eq("status", "active"), Condition::new().eq("id", id))
//!     .await?;
//! qb.del("users", Condition::new().eq("id", id)).await?;
//! ```

pub mod builder;
pub mod client;
pub mod compile;
pub mod condition;
pub mod config;
pub mod error;
pub mod escape;
pub mod row;
pub mod scoped;
pub mod statement;
pub mod value;

pub use builder::QueryBuilder;
pub use client::Executor;
pub use compile::{compile, compile_set, compile_where};
pub use condition::{Condition, Connective, Term};
pub use config::{BuilderOptions, ConnectOptions};
pub use error::{QbError, QbResult};
pub use row::{FromRecord, Record};
pub use scoped::Scoped;
pub use statement::{
    Columns, Fields, delete_sql, insert_returning_sql, insert_sql, select_sql, update_sql,
};
pub use value::Value;
