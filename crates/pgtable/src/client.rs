//! Generic client trait: the execution seam the table layer talks to.

use crate::error::{TableError, TableResult};
use crate::row::Record;
use crate::value::Value;
use tokio_postgres::types::ToSql;

/// A trait that unifies database clients and transactions.
///
/// The table layer only ever needs two things from a connection: run a
/// statement and get the affected row count, or run a query and get rows
/// back. Implementations decide how `params` are bound; the built-in ones
/// pass them as PostgreSQL parameters for the `$n` placeholders in `sql`.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = TableResult<Vec<Record>>> + Send;

    /// Execute a query and return the first row, if any.
    ///
    /// Semantics:
    /// - 0 rows: returns `Ok(None)`
    /// - 1 row: returns `Ok(Some(row))`
    /// - multiple rows: returns `Ok(Some(first_row))` (does **not** error)
    fn query_opt(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = TableResult<Option<Record>>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = TableResult<u64>> + Send;
}

fn as_refs(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

macro_rules! impl_generic_client {
    ($ty:ty) => {
        impl GenericClient for $ty {
            async fn query(&self, sql: &str, params: &[Value]) -> TableResult<Vec<Record>> {
                let refs = as_refs(params);
                let rows = <$ty>::query(self, sql, &refs)
                    .await
                    .map_err(TableError::from_db_error)?;
                rows.iter().map(Record::from_pg_row).collect()
            }

            async fn execute(&self, sql: &str, params: &[Value]) -> TableResult<u64> {
                let refs = as_refs(params);
                <$ty>::execute(self, sql, &refs)
                    .await
                    .map_err(TableError::from_db_error)
            }
        }
    };
}

impl_generic_client!(tokio_postgres::Client);
impl_generic_client!(tokio_postgres::Transaction<'_>);
