//! Table accessors, records and the convention catalog.
//!
//! A model is an opaque, case-sensitive name. Its [`TableAccessor`] knows the
//! storage table and how to build a [`Record`] from a column map. Accessors
//! are either registered explicitly on the registry or found in a
//! [`TableCatalog`] under the conventional path `{namespace}::{model}::Table`.

use std::fmt;
use std::sync::Arc;

use compact_str::{CompactString, format_compact};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::{RelataError, Result};
use crate::value::OwnedValue;

/// Ordered column name / value pairs belonging to one model.
pub type ColumnMap = Vec<(CompactString, OwnedValue)>;

/// Storage name and record constructor for one model.
pub trait TableAccessor: fmt::Debug + Send + Sync {
    /// Table name used in FROM and JOIN clauses.
    fn storage_name(&self) -> &str;

    /// Builds a record of `model` from its columns.
    fn create(&self, model: &str, columns: ColumnMap) -> Result<Record>;
}

/// A constructed row of one model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    model: CompactString,
    columns: ColumnMap,
}

impl Record {
    pub fn new(model: impl Into<CompactString>, columns: ColumnMap) -> Self {
        Self {
            model: model.into(),
            columns,
        }
    }

    /// The model this record belongs to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// First value stored under `column`.
    pub fn value(&self, column: &str) -> Option<&OwnedValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Typed access to a column, failing with [`RelataError::MissingColumn`]
    /// when the record does not carry it.
    pub fn get<'a, T>(&'a self, column: &str) -> Result<T>
    where
        T: TryFrom<&'a OwnedValue, Error = RelataError>,
    {
        let value = self
            .value(column)
            .ok_or_else(|| RelataError::MissingColumn {
                model: self.model.clone(),
                column: column.into(),
            })?;
        T::try_from(value)
    }

    /// Like [`Record::get`], mapping NULL to `None`.
    pub fn get_opt<'a, T>(&'a self, column: &str) -> Result<Option<T>>
    where
        T: TryFrom<&'a OwnedValue, Error = RelataError>,
    {
        match self.value(column) {
            None | Some(OwnedValue::Null) => Ok(None),
            Some(value) => T::try_from(value).map(Some),
        }
    }

    pub fn columns(&self) -> &[(CompactString, OwnedValue)] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_columns(self) -> ColumnMap {
        self.columns
    }
}

/// Stock [`TableAccessor`]: a storage name plus an optional column whitelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: CompactString,
    columns: Option<SmallVec<[CompactString; 8]>>,
}

impl Table {
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            columns: None,
        }
    }

    /// Restricts records of this table to the given columns.
    pub fn with_columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CompactString>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn column_names(&self) -> Option<&[CompactString]> {
        self.columns.as_deref()
    }
}

impl TableAccessor for Table {
    fn storage_name(&self) -> &str {
        &self.name
    }

    fn create(&self, model: &str, columns: ColumnMap) -> Result<Record> {
        if let Some(known) = &self.columns {
            if let Some((unknown, _)) = columns.iter().find(|(name, _)| !known.contains(name)) {
                return Err(RelataError::Mapping(format!(
                    "column `{unknown}` is not part of `{model}` ({})",
                    self.name
                )));
            }
        }
        Ok(Record::new(model, columns))
    }
}

/// Source of accessors living at conventional paths.
pub trait TableCatalog: Send + Sync {
    /// Returns the accessor found at `path`, if any.
    fn locate(&self, path: &str) -> Option<Arc<dyn TableAccessor>>;
}

/// Path-keyed in-memory [`TableCatalog`].
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    entries: HashMap<CompactString, Arc<dyn TableAccessor>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<CompactString>, accessor: Arc<dyn TableAccessor>) {
        self.entries.insert(path.into(), accessor);
    }

    /// Builder form of [`StaticCatalog::insert`].
    pub fn with(mut self, path: impl Into<CompactString>, accessor: impl TableAccessor + 'static) -> Self {
        self.insert(path, Arc::new(accessor));
        self
    }
}

impl TableCatalog for StaticCatalog {
    fn locate(&self, path: &str) -> Option<Arc<dyn TableAccessor>> {
        self.entries.get(path).cloned()
    }
}

/// Conventional accessor path for `model` under `namespace`.
///
/// ```
/// use relata_core::model::convention_path;
///
/// assert_eq!(convention_path("app::models", "Tags"), "app::models::Tags::Table");
/// assert_eq!(convention_path("", "Tags"), "Tags::Table");
/// ```
pub fn convention_path(namespace: &str, model: &str) -> CompactString {
    if namespace.is_empty() {
        format_compact!("{model}::Table")
    } else {
        format_compact!("{namespace}::{model}::Table")
    }
}
