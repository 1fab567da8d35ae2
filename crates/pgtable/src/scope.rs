//! Filter and join state carried by a [`Table`](crate::Table).

use crate::columns::ColumnValueSet;
use crate::fragment::Fragments;

/// The equality filter established by [`Table::filter`](crate::Table::filter),
/// with its fragments computed once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterContext {
    values: ColumnValueSet,
    fragments: Fragments,
}

impl FilterContext {
    pub fn new(values: ColumnValueSet) -> Self {
        let fragments = Fragments::build(&values);
        Self { values, fragments }
    }

    pub fn values(&self) -> &ColumnValueSet {
        &self.values
    }

    pub fn fragments(&self) -> &Fragments {
        &self.fragments
    }

    /// An empty filter matches every row.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<ColumnValueSet> for FilterContext {
    fn from(values: ColumnValueSet) -> Self {
        Self::new(values)
    }
}

/// An equality join with one other table on a shared column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    /// The joined table; projections come from here.
    pub table: String,
    /// Column present in both tables.
    pub column: String,
}

impl JoinSpec {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}
