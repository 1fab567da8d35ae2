//! Table creation and removal helpers.

use crate::client::GenericClient;
use crate::error::{TableError, TableResult};
use tokio_postgres::error::SqlState;

/// Schema used by [`create_table`] when none is given: a key/value table.
pub const DEFAULT_SCHEMA: &str = "key VARCHAR(40) PRIMARY KEY, value TEXT";

fn has_state(err: &TableError, state: &SqlState) -> bool {
    match err {
        TableError::Query(e) => e.code() == Some(state),
        _ => false,
    }
}

/// `CREATE TABLE <table> (<schema>)`.
///
/// Returns `Ok(false)` if the table already exists.
pub async fn create_table(
    conn: &impl GenericClient,
    table: &str,
    schema: Option<&str>,
) -> TableResult<bool> {
    let sql = format!(
        "CREATE TABLE {} ({})",
        table,
        schema.unwrap_or(DEFAULT_SCHEMA)
    );
    match conn.execute(&sql, &[]).await {
        Ok(_) => {
            tracing::info!(target: "pgtable.sql", table, "table created");
            Ok(true)
        }
        Err(e) if has_state(&e, &SqlState::DUPLICATE_TABLE) => {
            tracing::debug!(target: "pgtable.sql", table, "table already exists");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// `DROP TABLE <table>`.
///
/// Returns `Ok(false)` if there was no such table.
pub async fn drop_table(conn: &impl GenericClient, table: &str) -> TableResult<bool> {
    let sql = format!("DROP TABLE {table}");
    match conn.execute(&sql, &[]).await {
        Ok(_) => {
            tracing::info!(target: "pgtable.sql", table, "table dropped");
            Ok(true)
        }
        Err(e) if has_state(&e, &SqlState::UNDEFINED_TABLE) => {
            tracing::debug!(target: "pgtable.sql", table, "no table to drop");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
