//! Composed statements.
//!
//! A [`Statement`] stores SQL pieces and bound values separately, the same
//! way fragments do. Placeholders (`$1, $2, ...`) are only numbered when the
//! statement is rendered, so fragments can be spliced in any order without
//! renumbering.

use crate::error::{TableError, TableResult};
use crate::value::Value;
use std::fmt;

/// One piece of a statement or fragment.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SqlPart {
    Raw(String),
    /// A value slot; the column is kept for error reporting.
    Bind { column: String, value: Value },
}

/// Append raw SQL, merging into a trailing raw piece when possible.
pub(crate) fn push_raw(parts: &mut Vec<SqlPart>, sql: &str) {
    if sql.is_empty() {
        return;
    }
    match parts.last_mut() {
        Some(SqlPart::Raw(last)) => last.push_str(sql),
        _ => parts.push(SqlPart::Raw(sql.to_string())),
    }
}

/// Render pieces as SQL text plus the ordered list of bound values.
///
/// In literal mode the returned value list is always empty.
pub(crate) fn render_parts(
    parts: &[SqlPart],
    mode: StatementMode,
) -> TableResult<(String, Vec<Value>)> {
    let mut sql = String::new();
    let mut params = Vec::new();
    for part in parts {
        match part {
            SqlPart::Raw(s) => sql.push_str(s),
            SqlPart::Bind { column, value } => match mode {
                StatementMode::Bound => {
                    params.push(value.clone());
                    sql.push('$');
                    sql.push_str(&params.len().to_string());
                }
                StatementMode::Literal => {
                    let literal =
                        value
                            .to_literal()
                            .ok_or_else(|| TableError::MalformedLiteral {
                                column: column.clone(),
                                value: value.to_string(),
                            })?;
                    sql.push_str(&literal);
                }
            },
        }
    }
    Ok((sql, params))
}

/// How value slots are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementMode {
    /// `$n` placeholders with values sent separately.
    #[default]
    Bound,
    /// Values inlined as single-quoted literals.
    ///
    /// Quote characters are not escaped; a value containing `'` fails with
    /// [`TableError::MalformedLiteral`] instead of corrupting the statement.
    Literal,
}

/// What a statement does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    /// `SELECT true ... LIMIT 1` existence check.
    Probe,
    Insert,
    Update,
    Delete,
    /// `INSERT ... ON CONFLICT`.
    Upsert,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Probe => "probe",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Upsert => "upsert",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Insert | Self::Update | Self::Delete | Self::Upsert
        )
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully composed statement for one operation.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Statement {
    kind: StatementKind,
    parts: Vec<SqlPart>,
}

impl Statement {
    pub(crate) fn new(kind: StatementKind, initial_sql: &str) -> Self {
        let mut parts = Vec::new();
        push_raw(&mut parts, initial_sql);
        Self { kind, parts }
    }

    pub(crate) fn push(&mut self, sql: &str) -> &mut Self {
        push_raw(&mut self.parts, sql);
        self
    }

    pub(crate) fn push_parts(&mut self, parts: &[SqlPart]) -> &mut Self {
        for part in parts {
            match part {
                SqlPart::Raw(s) => push_raw(&mut self.parts, s),
                SqlPart::Bind { .. } => self.parts.push(part.clone()),
            }
        }
        self
    }

    pub(crate) fn with_kind(mut self, kind: StatementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Number of bound values.
    pub fn param_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, SqlPart::Bind { .. }))
            .count()
    }

    /// Bound values, in placeholder order.
    pub fn params(&self) -> Vec<&Value> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                SqlPart::Bind { value, .. } => Some(value),
                SqlPart::Raw(_) => None,
            })
            .collect()
    }

    /// Render SQL with `$1, $2, ...` placeholders.
    pub fn to_sql(&self) -> String {
        // Bound rendering never fails.
        render_parts(&self.parts, StatementMode::Bound)
            .map(|(sql, _)| sql)
            .unwrap_or_default()
    }

    /// Render SQL with values inlined as quoted literals.
    pub fn to_literal_sql(&self) -> TableResult<String> {
        render_parts(&self.parts, StatementMode::Literal).map(|(sql, _)| sql)
    }

    /// Render in the given mode, returning SQL and the values to bind.
    pub fn render(&self, mode: StatementMode) -> TableResult<(String, Vec<Value>)> {
        render_parts(&self.parts, mode)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
