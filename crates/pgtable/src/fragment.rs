//! Column/value set → statement fragments.

use crate::columns::ColumnValueSet;
use crate::error::TableResult;
use crate::statement::{SqlPart, StatementMode, push_raw, render_parts};
use crate::value::Value;

/// A reusable piece of SQL with its value slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    parts: Vec<SqlPart>,
}

impl Fragment {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn parts(&self) -> &[SqlPart] {
        &self.parts
    }

    /// Render on its own, placeholders numbered from `$1`.
    pub fn to_sql(&self) -> String {
        render_parts(&self.parts, StatementMode::Bound)
            .map(|(sql, _)| sql)
            .unwrap_or_default()
    }

    /// Render with values inlined as quoted literals.
    pub fn to_literal(&self) -> TableResult<String> {
        render_parts(&self.parts, StatementMode::Literal).map(|(sql, _)| sql)
    }

    fn push(&mut self, sql: &str) {
        push_raw(&mut self.parts, sql);
    }

    fn push_slot(&mut self, column: &str, value: &Value) {
        self.parts.push(SqlPart::Bind {
            column: column.to_string(),
            value: value.clone(),
        });
    }
}

/// The four fragments every statement variant is assembled from.
///
/// For `{key: 'k1', value: 'v1'}` (literal mode):
///
/// | fragment    | text                            |
/// |-------------|---------------------------------|
/// | `names`     | `key, value`                    |
/// | `values`    | `'k1', 'v1'`                    |
/// | `pairs`     | `key = 'k1', value = 'v1'`      |
/// | `predicate` | `key = 'k1' AND value = 'v1'`   |
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragments {
    pub names: Fragment,
    pub values: Fragment,
    pub pairs: Fragment,
    pub predicate: Fragment,
}

impl Fragments {
    /// Build fragments in the set's insertion order. An empty set yields four
    /// empty fragments.
    ///
    /// A NULL value is tested with `IS NULL` in the predicate, since `= NULL`
    /// never matches. It is still bound as a value and assigned in pairs.
    pub fn build(set: &ColumnValueSet) -> Self {
        let mut out = Self::default();
        for (i, (column, value)) in set.iter().enumerate() {
            if i > 0 {
                out.names.push(", ");
                out.values.push(", ");
                out.pairs.push(", ");
                out.predicate.push(" AND ");
            }
            out.names.push(column);

            out.values.push_slot(column, value);

            out.pairs.push(column);
            out.pairs.push(" = ");
            out.pairs.push_slot(column, value);

            out.predicate.push(column);
            if value.is_null() {
                out.predicate.push(" IS NULL");
            } else {
                out.predicate.push(" = ");
                out.predicate.push_slot(column, value);
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
