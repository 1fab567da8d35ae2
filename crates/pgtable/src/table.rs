//! The fluent table handle.

use crate::client::GenericClient;
use crate::columns::ColumnValueSet;
use crate::compose;
use crate::config::TableConfig;
use crate::error::{TableError, TableResult};
use crate::exec;
use crate::fragment::Fragments;
use crate::row::Record;
use crate::scope::{FilterContext, JoinSpec};
use crate::statement::Statement;
use crate::upsert::{self, UpsertOutcome, UpsertPlan};
use crate::value::Value;

/// Result of [`Table::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum Got {
    /// Exactly one column was requested.
    Value(Value),
    /// No columns (`*`) or several were requested.
    Row(Record),
}

impl Got {
    /// The scalar, or the first column of the row.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Row(rec) => rec.into_first(),
        }
    }

    pub fn into_record(self) -> Record {
        match self {
            Self::Value(v) => Record::new(vec![v]),
            Self::Row(rec) => rec,
        }
    }
}

/// Result of [`Table::fetch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    /// Exactly one column was requested: one value per row.
    Column(Vec<Value>),
    /// One record per row.
    Rows(Vec<Record>),
}

impl Fetched {
    pub fn len(&self) -> usize {
        match self {
            Self::Column(values) => values.len(),
            Self::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_column(self) -> Option<Vec<Value>> {
        match self {
            Self::Column(values) => Some(values),
            Self::Rows(_) => None,
        }
    }

    pub fn into_rows(self) -> Vec<Record> {
        match self {
            Self::Column(values) => values.into_iter().map(|v| Record::new(vec![v])).collect(),
            Self::Rows(rows) => rows,
        }
    }
}

/// A handle on one table plus the filter, join and extra predicate that
/// scope its operations.
///
/// `Table` is an immutable value: `filter`, `join` and `and_raw` consume it
/// and return the updated handle, and terminal operations borrow it together
/// with a client. Clone a handle to branch from a shared base.
///
/// # Example
///
/// ```ignore
/// use pgtable::{Table, columns};
///
/// let kv = Table::new("kv");
///
/// kv.clone()
///     .filter(columns! { "key" => "k1" })
///     .set(&client, columns! { "value" => "v1" })
///     .await?;
///
/// let value = kv
///     .filter(columns! { "key" => "k1" })
///     .get(&client, &["value"])
///     .await?;
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct Table {
    name: String,
    filter: Option<FilterContext>,
    join: Option<JoinSpec>,
    extra: Option<String>,
    config: TableConfig,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter: None,
            join: None,
            extra: None,
            config: TableConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn filter_context(&self) -> Option<&FilterContext> {
        self.filter.as_ref()
    }

    pub fn join_spec(&self) -> Option<&JoinSpec> {
        self.join.as_ref()
    }

    pub fn extra_predicate(&self) -> Option<&str> {
        self.extra.as_deref()
    }

    // ==================== Scope ====================

    /// Target the rows where every column equals its value. Replaces any
    /// previous filter; the join and extra predicate are kept.
    pub fn filter(mut self, values: impl Into<ColumnValueSet>) -> Self {
        self.filter = Some(FilterContext::new(values.into()));
        self
    }

    /// Read from `table`, equi-joined to this table on `column`.
    ///
    /// Joins are read-only: `set` and `remove` refuse to run while one is set.
    pub fn join(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.join = Some(JoinSpec::new(table, column));
        self
    }

    /// AND a raw predicate onto joined SELECTs. The text is inserted verbatim.
    pub fn and_raw(mut self, predicate: impl Into<String>) -> Self {
        self.extra = Some(predicate.into());
        self
    }

    // ==================== Composition ====================

    fn bound_filter(&self) -> TableResult<&FilterContext> {
        self.filter
            .as_ref()
            .ok_or_else(|| TableError::unbound_filter(&self.name))
    }

    fn reject_join(&self) -> TableResult<()> {
        match &self.join {
            Some(join) => Err(TableError::joined_mutation(&self.name, &join.table)),
            None => Ok(()),
        }
    }

    /// The SELECT `get` (`limit_one`) or `fetch` would run.
    pub fn select_statement(&self, columns: &[&str], limit_one: bool) -> TableResult<Statement> {
        let filter = self.bound_filter()?;
        Ok(compose::select(
            &self.name,
            filter,
            self.join.as_ref(),
            self.extra.as_deref(),
            columns,
            limit_one,
        ))
    }

    /// The existence probe `has` would run.
    pub fn has_statement(&self, values: &ColumnValueSet) -> TableResult<Statement> {
        compose::probe(&self.name, &Fragments::build(values))
    }

    /// The DELETE `remove` would run.
    pub fn delete_statement(&self) -> TableResult<Statement> {
        self.reject_join()?;
        let filter = self.bound_filter()?;
        compose::delete(&self.name, filter.fragments())
    }

    /// The upsert `set` would drive.
    pub fn upsert_plan(&self, mutation: &ColumnValueSet) -> TableResult<UpsertPlan<'_>> {
        self.reject_join()?;
        let filter = self.bound_filter()?;
        UpsertPlan::new(&self.name, filter, mutation)
    }

    // ==================== Terminal operations ====================

    /// Whether any row matches `values`. Independent of `filter()`.
    pub async fn has(
        &self,
        conn: &impl GenericClient,
        values: impl Into<ColumnValueSet>,
    ) -> TableResult<bool> {
        let stmt = self.has_statement(&values.into())?;
        let row = exec::query_opt(conn, &self.name, &stmt, &self.config).await?;
        Ok(row.is_some())
    }

    /// Read one row. `None` when nothing matches.
    pub async fn get(
        &self,
        conn: &impl GenericClient,
        columns: &[&str],
    ) -> TableResult<Option<Got>> {
        let stmt = self.select_statement(columns, true)?;
        let row = exec::query_opt(conn, &self.name, &stmt, &self.config).await?;
        Ok(row.map(|rec| {
            if columns.len() == 1 {
                Got::Value(rec.into_first().unwrap_or_default())
            } else {
                Got::Row(rec)
            }
        }))
    }

    /// Read every matching row, in the order the database returns them.
    pub async fn fetch(
        &self,
        conn: &impl GenericClient,
        columns: &[&str],
    ) -> TableResult<Fetched> {
        let stmt = self.select_statement(columns, false)?;
        let rows = exec::query(conn, &self.name, &stmt, &self.config).await?;
        if columns.len() == 1 {
            Ok(Fetched::Column(
                rows.into_iter()
                    .map(|rec| rec.into_first().unwrap_or_default())
                    .collect(),
            ))
        } else {
            Ok(Fetched::Rows(rows))
        }
    }

    /// Insert-or-update the filtered row with `mutation`.
    ///
    /// An empty mutation inserts a row made of the filter values, or touches
    /// the existing one.
    pub async fn set(
        &self,
        conn: &impl GenericClient,
        mutation: impl Into<ColumnValueSet>,
    ) -> TableResult<UpsertOutcome> {
        let mutation = mutation.into();
        let plan = self.upsert_plan(&mutation)?;
        upsert::run(conn, plan, &self.config).await
    }

    /// Delete the filtered rows and return how many went.
    pub async fn remove(&self, conn: &impl GenericClient) -> TableResult<u64> {
        let stmt = self.delete_statement()?;
        exec::execute(conn, &self.name, &stmt, &self.config).await
    }
}
