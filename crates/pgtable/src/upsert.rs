//! Insert-or-update keyed by the filter.
//!
//! The default strategy is a two-phase state machine:
//!
//! ```text
//! UpsertPlan ──probe()──▶ SELECT true ... LIMIT 1
//!     │
//!     └─resolve(exists)──▶ UpsertWrite::Update(UPDATE ...)   row found
//!                          UpsertWrite::Insert(INSERT ...)   no row
//! ```
//!
//! The probe and the write are separate autocommitted statements. Two
//! concurrent `set()` calls with the same filter can both observe "no row"
//! and both INSERT; the loser fails with
//! [`TableError::UniqueViolation`](crate::TableError::UniqueViolation) if the
//! filter columns are unique, and is not retried.
//! [`UpsertStrategy::OnConflict`] closes that window with a single
//! `INSERT ... ON CONFLICT` when the table has a matching unique constraint.

use crate::client::GenericClient;
use crate::columns::ColumnValueSet;
use crate::compose;
use crate::config::TableConfig;
use crate::error::{TableError, TableResult};
use crate::exec;
use crate::fragment::Fragments;
use crate::scope::FilterContext;
use crate::statement::Statement;

/// How `set()` decides between INSERT and UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpsertStrategy {
    /// Probe for the row, then UPDATE or INSERT.
    #[default]
    ProbeThenWrite,
    /// One `INSERT ... ON CONFLICT (<filter columns>)` statement.
    OnConflict,
}

/// The write chosen after probing.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertWrite {
    Update(Statement),
    Insert(Statement),
}

impl UpsertWrite {
    pub fn statement(&self) -> &Statement {
        match self {
            Self::Update(stmt) | Self::Insert(stmt) => stmt,
        }
    }
}

/// What `set()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row matched; a new one was inserted.
    Inserted(u64),
    /// A row matched and was updated.
    Updated(u64),
    /// Single-statement upsert; the database decided.
    Merged(u64),
}

impl UpsertOutcome {
    pub fn rows_affected(&self) -> u64 {
        match self {
            Self::Inserted(n) | Self::Updated(n) | Self::Merged(n) => *n,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// An upsert waiting for its probe result.
#[derive(Debug, Clone)]
pub struct UpsertPlan<'a> {
    table: &'a str,
    filter: &'a FilterContext,
    mutation: Fragments,
    mutation_columns: Vec<String>,
}

impl<'a> UpsertPlan<'a> {
    /// Plan an upsert of `mutation` into the row identified by `filter`.
    pub fn new(
        table: &'a str,
        filter: &'a FilterContext,
        mutation: &ColumnValueSet,
    ) -> TableResult<Self> {
        if filter.is_empty() {
            return Err(TableError::empty_filter(table));
        }
        Ok(Self {
            table,
            filter,
            mutation: Fragments::build(mutation),
            mutation_columns: mutation.columns().map(str::to_string).collect(),
        })
    }

    /// The existence check for the filter.
    pub fn probe(&self) -> TableResult<Statement> {
        compose::probe(self.table, self.filter.fragments())
    }

    /// Pick the write from the probe result.
    pub fn resolve(self, exists: bool) -> TableResult<UpsertWrite> {
        let filter = self.filter.fragments();
        if exists {
            compose::update(self.table, filter, &self.mutation).map(UpsertWrite::Update)
        } else {
            compose::insert(self.table, filter, &self.mutation).map(UpsertWrite::Insert)
        }
    }

    /// The single-statement alternative to probe + resolve.
    pub fn atomic(&self) -> TableResult<Statement> {
        let columns: Vec<&str> = self.mutation_columns.iter().map(String::as_str).collect();
        compose::upsert_on_conflict(self.table, self.filter.fragments(), &self.mutation, &columns)
    }
}

/// Drive a plan to completion with the configured strategy.
pub(crate) async fn run(
    conn: &impl GenericClient,
    plan: UpsertPlan<'_>,
    config: &TableConfig,
) -> TableResult<UpsertOutcome> {
    let table = plan.table;
    match config.upsert {
        UpsertStrategy::OnConflict => {
            let stmt = plan.atomic()?;
            let n = exec::execute(conn, table, &stmt, config).await?;
            Ok(UpsertOutcome::Merged(n))
        }
        UpsertStrategy::ProbeThenWrite => {
            let probe = plan.probe()?;
            let exists = exec::query_opt(conn, table, &probe, config)
                .await?
                .is_some();
            match plan.resolve(exists)? {
                UpsertWrite::Update(stmt) => {
                    let n = exec::execute(conn, table, &stmt, config).await?;
                    Ok(UpsertOutcome::Updated(n))
                }
                UpsertWrite::Insert(stmt) => {
                    let n = exec::execute(conn, table, &stmt, config).await?;
                    Ok(UpsertOutcome::Inserted(n))
                }
            }
        }
    }
}
