//! Splits flat joined rows into per-model records.
//!
//! Rows are tagged with marker columns: a column named `__{Model}` says that
//! every following column, up to the next marker, belongs to `Model`. The
//! marker's own value is ignored. Columns seen before the first marker land in
//! a group for the empty model name, which no accessor can build.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::error::Result;
use crate::executor::FlatRow;
use crate::model::{ColumnMap, Record};
use crate::relation::RelationRegistry;

/// Prefix of marker column names.
pub const MARKER_PREFIX: &str = "__";

/// Model named by a marker column, or `None` for an ordinary column.
///
/// ```
/// use relata_core::materialize::marker_model;
///
/// assert_eq!(marker_model("__Pages"), Some("Pages"));
/// assert_eq!(marker_model("title"), None);
/// ```
pub fn marker_model(column: &str) -> Option<&str> {
    column.strip_prefix(MARKER_PREFIX)
}

/// The records built from one flat row, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordGroup {
    records: SmallVec<[Record; 4]>,
}

impl RecordGroup {
    pub fn get(&self, model: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.model() == model)
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(Record::model)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes and returns the record of `model`.
    pub fn take(&mut self, model: &str) -> Option<Record> {
        let index = self.records.iter().position(|record| record.model() == model)?;
        Some(self.records.remove(index))
    }

    pub fn into_records(self) -> impl Iterator<Item = Record> {
        self.records.into_iter()
    }
}

/// Partitions one row's columns by the most recent marker.
///
/// A model marked twice in the same row keeps a single group.
pub fn partition_row(row: FlatRow) -> SmallVec<[(CompactString, ColumnMap); 4]> {
    let mut groups: SmallVec<[(CompactString, ColumnMap); 4]> = SmallVec::new();
    let mut current = CompactString::default();

    for (column, value) in row {
        if let Some(model) = marker_model(&column) {
            current = model.into();
            continue;
        }
        match groups.iter_mut().find(|(model, _)| *model == current) {
            Some((_, columns)) => columns.push((column, value)),
            None => groups.push((current.clone(), vec![(column, value)])),
        }
    }

    groups
}

/// Hydrates partitioned rows through the registry's accessors.
#[derive(Debug, Clone, Copy)]
pub struct RowMaterializer<'r> {
    registry: &'r RelationRegistry,
}

impl<'r> RowMaterializer<'r> {
    pub const fn new(registry: &'r RelationRegistry) -> Self {
        Self { registry }
    }

    /// One [`RecordGroup`] per input row.
    pub fn materialize<I>(&self, rows: I) -> Result<Vec<RecordGroup>>
    where
        I: IntoIterator<Item = FlatRow>,
    {
        let groups = rows
            .into_iter()
            .map(|row| self.materialize_row(row))
            .collect::<Result<Vec<_>>>()?;
        crate::relata_trace_materialize!(
            groups.len(),
            groups.iter().map(RecordGroup::len).sum::<usize>()
        );
        Ok(groups)
    }

    pub fn materialize_row(&self, row: FlatRow) -> Result<RecordGroup> {
        let mut records = SmallVec::new();
        for (model, columns) in partition_row(row) {
            let accessor = self.registry.resolve_model_class(&model)?;
            records.push(accessor.create(&model, columns)?);
        }
        Ok(RecordGroup { records })
    }
}
