//! Ordered column → value sets.

use crate::value::Value;

/// An ordered mapping from column name to [`Value`].
///
/// Keys are unique: setting an existing column replaces its value and keeps
/// its original position. Iteration follows insertion order, which is the
/// order fragments and statements are rendered in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValueSet {
    entries: Vec<(String, Value)>,
}

impl ColumnValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value (consuming version, for chaining).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column value, replacing any previous value for that column.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for ColumnValueSet
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ColumnValueSet
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Build a [`ColumnValueSet`] from `column => value` pairs.
///
/// ```
/// use pgtable::columns;
///
/// let set = columns! { "key" => "k1", "hits" => 3 };
/// assert_eq!(set.len(), 2);
/// assert!(columns! {}.is_empty());
/// ```
#[macro_export]
macro_rules! columns {
    () => {
        $crate::ColumnValueSet::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut set = $crate::ColumnValueSet::new();
        $(set.insert($column, $value);)+
        set
    }};
}
