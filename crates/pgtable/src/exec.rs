//! Statement execution: render, log, run with the configured timeout.

use crate::client::GenericClient;
use crate::config::TableConfig;
use crate::error::{TableError, TableResult};
use crate::row::Record;
use crate::statement::Statement;
use std::future::Future;

async fn with_timeout<T>(
    config: &TableConfig,
    fut: impl Future<Output = TableResult<T>>,
) -> TableResult<T> {
    match config.query_timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| TableError::Timeout(limit))?,
        None => fut.await,
    }
}

fn log_failure(table: &str, stmt: &Statement, err: &TableError) {
    tracing::warn!(
        target: "pgtable.sql",
        kind = %stmt.kind(),
        table,
        error = %err,
        "statement failed"
    );
}

pub(crate) async fn query(
    conn: &impl GenericClient,
    table: &str,
    stmt: &Statement,
    config: &TableConfig,
) -> TableResult<Vec<Record>> {
    let (sql, params) = stmt.render(config.mode)?;
    config.sql_log.emit(stmt.kind(), table, &sql, params.len());
    with_timeout(config, conn.query(&sql, &params))
        .await
        .inspect_err(|e| log_failure(table, stmt, e))
}

pub(crate) async fn query_opt(
    conn: &impl GenericClient,
    table: &str,
    stmt: &Statement,
    config: &TableConfig,
) -> TableResult<Option<Record>> {
    let (sql, params) = stmt.render(config.mode)?;
    config.sql_log.emit(stmt.kind(), table, &sql, params.len());
    with_timeout(config, conn.query_opt(&sql, &params))
        .await
        .inspect_err(|e| log_failure(table, stmt, e))
}

pub(crate) async fn execute(
    conn: &impl GenericClient,
    table: &str,
    stmt: &Statement,
    config: &TableConfig,
) -> TableResult<u64> {
    let (sql, params) = stmt.render(config.mode)?;
    config.sql_log.emit(stmt.kind(), table, &sql, params.len());
    with_timeout(config, conn.execute(&sql, &params))
        .await
        .inspect_err(|e| log_failure(table, stmt, e))
}
