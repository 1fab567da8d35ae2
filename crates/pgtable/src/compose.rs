//! Statement composition.
//!
//! Every function here is pure: it turns table names, fragments and join
//! state into a [`Statement`] without touching a connection. Contract
//! violations (empty predicates where one is required) are reported here, so
//! they fail before anything reaches the database.

use crate::error::{TableError, TableResult};
use crate::fragment::{Fragment, Fragments};
use crate::scope::{FilterContext, JoinSpec};
use crate::statement::{Statement, StatementKind};

/// Append `a, b` skipping whichever side is empty.
fn push_list(stmt: &mut Statement, first: &Fragment, second: &Fragment) {
    stmt.push_parts(first.parts());
    if !first.is_empty() && !second.is_empty() {
        stmt.push(", ");
    }
    stmt.push_parts(second.parts());
}

/// `SELECT true FROM <table> WHERE <predicate> LIMIT 1`
pub fn probe(table: &str, filter: &Fragments) -> TableResult<Statement> {
    if filter.is_empty() {
        return Err(TableError::empty_filter(table));
    }
    let mut stmt = Statement::new(StatementKind::Probe, "SELECT true FROM ");
    stmt.push(table).push(" WHERE ");
    stmt.push_parts(filter.predicate.parts());
    stmt.push(" LIMIT 1");
    Ok(stmt)
}

/// Compose a SELECT.
///
/// Without a join: `SELECT <cols | *> FROM <table> [WHERE <predicate>] [LIMIT 1]`.
/// The extra predicate is only consulted in join mode.
///
/// With a join the projection comes from the joined table and the WHERE
/// clause ANDs the equi-join condition, the filter predicate and the extra
/// predicate (empty parts are skipped). Filter columns are not qualified, so
/// they must not be ambiguous between the two tables.
pub fn select(
    table: &str,
    filter: &FilterContext,
    join: Option<&JoinSpec>,
    extra: Option<&str>,
    columns: &[&str],
    limit_one: bool,
) -> Statement {
    let predicate = &filter.fragments().predicate;
    let mut stmt = Statement::new(StatementKind::Select, "SELECT ");

    match join {
        None => {
            if columns.is_empty() {
                stmt.push("*");
            } else {
                stmt.push(&columns.join(", "));
            }
            stmt.push(" FROM ").push(table);
            if !predicate.is_empty() {
                stmt.push(" WHERE ");
                stmt.push_parts(predicate.parts());
            }
        }
        Some(join) => {
            if columns.is_empty() {
                stmt.push(&join.table).push(".*");
            } else {
                let projection: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{}.{}", join.table, c))
                    .collect();
                stmt.push(&projection.join(", "));
            }
            stmt.push(" FROM ")
                .push(&join.table)
                .push(", ")
                .push(table)
                .push(" WHERE ")
                .push(&format!(
                    "{j}.{c} = {t}.{c}",
                    j = join.table,
                    t = table,
                    c = join.column
                ));
            if !predicate.is_empty() {
                stmt.push(" AND ");
                stmt.push_parts(predicate.parts());
            }
            if let Some(extra) = extra.filter(|e| !e.trim().is_empty()) {
                stmt.push(" AND ").push(extra);
            }
        }
    }

    if limit_one {
        stmt.push(" LIMIT 1");
    }
    stmt
}

/// `INSERT INTO <table> (<filter names>[, <mutation names>]) VALUES (<filter values>[, <mutation values>])`
///
/// The filter's own pairs are always part of the new row: the filter is the
/// row's identity.
pub fn insert(table: &str, filter: &Fragments, mutation: &Fragments) -> TableResult<Statement> {
    if filter.is_empty() {
        return Err(TableError::empty_filter(table));
    }
    let mut stmt = Statement::new(StatementKind::Insert, "INSERT INTO ");
    stmt.push(table).push(" (");
    push_list(&mut stmt, &filter.names, &mutation.names);
    stmt.push(") VALUES (");
    push_list(&mut stmt, &filter.values, &mutation.values);
    stmt.push(")");
    Ok(stmt)
}

/// `UPDATE <table> SET <pairs> WHERE <predicate>`
///
/// An empty mutation re-applies the filter's own pairs, which leaves the row
/// content unchanged but still touches it.
pub fn update(table: &str, filter: &Fragments, mutation: &Fragments) -> TableResult<Statement> {
    if filter.is_empty() {
        return Err(TableError::empty_filter(table));
    }
    let pairs = if mutation.is_empty() {
        &filter.pairs
    } else {
        &mutation.pairs
    };
    let mut stmt = Statement::new(StatementKind::Update, "UPDATE ");
    stmt.push(table).push(" SET ");
    stmt.push_parts(pairs.parts());
    stmt.push(" WHERE ");
    stmt.push_parts(filter.predicate.parts());
    Ok(stmt)
}

/// `DELETE FROM <table> WHERE <predicate>`; refuses an empty predicate.
pub fn delete(table: &str, filter: &Fragments) -> TableResult<Statement> {
    if filter.is_empty() {
        return Err(TableError::empty_filter(table));
    }
    let mut stmt = Statement::new(StatementKind::Delete, "DELETE FROM ");
    stmt.push(table).push(" WHERE ");
    stmt.push_parts(filter.predicate.parts());
    Ok(stmt)
}

/// Single-statement upsert keyed by the filter columns:
///
/// `INSERT ... ON CONFLICT (<filter names>) DO UPDATE SET m = EXCLUDED.m, ...`
///
/// or `DO NOTHING` when there is nothing to update. Requires a unique
/// constraint covering exactly the filter columns.
pub fn upsert_on_conflict(
    table: &str,
    filter: &Fragments,
    mutation: &Fragments,
    mutation_columns: &[&str],
) -> TableResult<Statement> {
    let mut stmt = insert(table, filter, mutation)?;
    stmt.push(" ON CONFLICT (");
    stmt.push_parts(filter.names.parts());
    stmt.push(")");
    if mutation_columns.is_empty() {
        stmt.push(" DO NOTHING");
    } else {
        let assignments: Vec<String> = mutation_columns
            .iter()
            .map(|c| format!("{c} = EXCLUDED.{c}"))
            .collect();
        stmt.push(" DO UPDATE SET ").push(&assignments.join(", "));
    }
    Ok(stmt.with_kind(StatementKind::Upsert))
}

#[cfg(test)]
mod tests;
