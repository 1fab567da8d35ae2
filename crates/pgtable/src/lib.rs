//! # pgtable
//!
//! Fluent access to single PostgreSQL tables: scope a table with an equality
//! filter, then read, test, upsert or delete the matching rows.
//!
//! ## Features
//!
//! - **Filter-scoped operations**: `get`, `fetch`, `set` and `remove` act on the rows the filter selects
//! - **Upsert by filter**: `set()` inserts the row if it is missing and updates it otherwise
//! - **Read-only joins**: pull columns from a second table equi-joined on a shared column
//! - **Safe defaults**: DELETE and UPDATE never run without a WHERE clause, and joined handles refuse mutations
//! - **Bound parameters**: values travel as `$n` parameters unless literal mode is chosen
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//! - **Statement logging**: every statement is emitted through `tracing` on the `pgtable.sql` target
//!
//! ## Example
//!
//! ```ignore
//! use pgtable::{ConnectConfig, Table, columns, connect, create_table};
//!
//! let client = connect(&ConnectConfig::from_env()?).await?;
//! create_table(&client, "kv", None).await?;
//!
//! let kv = Table::new("kv");
//!
//! // INSERT the first time, UPDATE afterwards
//! kv.clone()
//!     .filter(columns! { "key" => "k1" })
//!     .set(&client, columns! { "value" => "v1" })
//!     .await?;
//!
//! let value = kv
//!     .clone()
//!     .filter(columns! { "key" => "k1" })
//!     .get(&client, &["value"])
//!     .await?;
//!
//! // Read through a join
//! let bodies = Table::new("msg_users")
//!     .filter(columns! { "user_id" => "u1" })
//!     .join("msgs", "msg_id")
//!     .fetch(&client, &["value"])
//!     .await?;
//! ```

pub mod client;
pub mod columns;
pub mod compose;
pub mod config;
pub mod connect;
pub mod ddl;
pub mod error;
mod exec;
pub mod fragment;
pub mod monitor;
pub mod row;
pub mod scope;
pub mod statement;
pub mod table;
pub mod upsert;
pub mod value;

pub use client::GenericClient;
pub use columns::ColumnValueSet;
pub use config::{ConnectConfig, TableConfig};
pub use connect::connect;
pub use ddl::{DEFAULT_SCHEMA, create_table, drop_table};
pub use error::{TableError, TableResult};
pub use fragment::{Fragment, Fragments};
pub use monitor::SqlLog;
pub use row::Record;
pub use scope::{FilterContext, JoinSpec};
pub use statement::{Statement, StatementKind, StatementMode};
pub use table::{Fetched, Got, Table};
pub use upsert::{UpsertOutcome, UpsertPlan, UpsertStrategy, UpsertWrite};
pub use value::Value;
