//! Statement execution boundary.
//!
//! The relation layer never talks to a database directly: built statements
//! are handed to an [`Executor`], which returns rows as ordered
//! column/value pairs. Column names may repeat, since joined tables commonly
//! share names like `id`.

#[cfg(feature = "rusqlite")]
mod rusqlite;

use compact_str::CompactString;

use crate::error::Result;
use crate::value::OwnedValue;

/// One result row, columns in statement order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatRow {
    columns: Vec<(CompactString, OwnedValue)>,
}

impl FlatRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<CompactString>, value: impl Into<OwnedValue>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Builder form of [`FlatRow::push`].
    pub fn with(mut self, column: impl Into<CompactString>, value: impl Into<OwnedValue>) -> Self {
        self.push(column, value);
        self
    }

    /// First value stored under `column`.
    pub fn get(&self, column: &str) -> Option<&OwnedValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OwnedValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_columns(self) -> Vec<(CompactString, OwnedValue)> {
        self.columns
    }
}

impl<K, V> FromIterator<(K, V)> for FlatRow
where
    K: Into<CompactString>,
    V: Into<OwnedValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for FlatRow {
    type Item = (CompactString, OwnedValue);
    type IntoIter = std::vec::IntoIter<(CompactString, OwnedValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

/// Runs a composed statement against a relational backend.
pub trait Executor {
    /// Executes `sql` with `params` bound in placeholder order.
    fn query(&self, sql: &str, params: &[OwnedValue]) -> Result<Vec<FlatRow>>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn query(&self, sql: &str, params: &[OwnedValue]) -> Result<Vec<FlatRow>> {
        (**self).query(sql, params)
    }
}
