//! The data-access handle tying the registry to an executor.
//!
//! A session is created once, after the registry is fully declared, and owns
//! everything needed to fetch related records:
//!
//! ```text
//! related_for_row(row, "Tags")
//!   -> RelationResolver  builds the Select
//!   -> Executor          runs it
//!   -> TableAccessor     hydrates each row into a Record
//! ```

use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::executor::{Executor, FlatRow};
use crate::materialize::{RecordGroup, RowMaterializer};
use crate::model::Record;
use crate::relation::{RelationRegistry, RelationResolver};
use crate::select::Select;
use crate::value::OwnedValue;

#[derive(Debug)]
pub struct Session<E: Executor> {
    registry: Arc<RelationRegistry>,
    executor: E,
    dialect: Dialect,
}

impl<E: Executor> Session<E> {
    pub fn new(registry: impl Into<Arc<RelationRegistry>>, executor: E) -> Self {
        Self {
            registry: registry.into(),
            executor,
            dialect: Dialect::default(),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn registry(&self) -> &Arc<RelationRegistry> {
        &self.registry
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn resolver(&self) -> RelationResolver<'_> {
        RelationResolver::new(&self.registry).with_dialect(self.dialect)
    }

    pub fn materializer(&self) -> RowMaterializer<'_> {
        RowMaterializer::new(&self.registry)
    }

    /// Records of `target` related to `row`.
    pub fn related_for_row(&self, row: &Record, target: &str) -> Result<Vec<Record>> {
        let select = self.resolver().resolve_for_row(row, target)?;
        self.fetch(&select, target)
    }

    /// Records of `target` related to `keys` of `source`.
    pub fn related_for_keys<I>(&self, source: &str, target: &str, keys: I) -> Result<Vec<Record>>
    where
        I: IntoIterator,
        I::Item: Into<OwnedValue>,
    {
        let select = self.resolver().resolve_for_keys(source, target, keys)?;
        self.fetch(&select, target)
    }

    /// Runs `select` and hydrates every row as a record of `model`.
    pub fn fetch(&self, select: &Select, model: &str) -> Result<Vec<Record>> {
        let accessor = self.registry.resolve_model_class(model)?;
        select
            .execute(&self.executor)?
            .into_iter()
            .map(|row| accessor.create(model, row.into_columns()))
            .collect()
    }

    /// Runs a marker-tagged `select` and splits each row per model.
    pub fn fetch_grouped(&self, select: &Select) -> Result<Vec<RecordGroup>> {
        let rows = select.execute(&self.executor)?;
        self.materializer().materialize(rows)
    }

    /// Runs raw SQL through the executor.
    pub fn query(&self, sql: &str, params: &[OwnedValue]) -> Result<Vec<FlatRow>> {
        self.executor.query(sql, params)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::model::Table;

    /// Executor replaying canned rows and recording statements.
    #[derive(Default)]
    struct Recorder {
        rows: Vec<FlatRow>,
        seen: RefCell<Vec<(String, Vec<OwnedValue>)>>,
    }

    impl Executor for Recorder {
        fn query(&self, sql: &str, params: &[OwnedValue]) -> Result<Vec<FlatRow>> {
            self.seen.borrow_mut().push((sql.to_owned(), params.to_vec()));
            Ok(self.rows.clone())
        }
    }

    fn registry() -> RelationRegistry {
        let mut registry = RelationRegistry::new();
        registry.register_model_class("Pages", Table::new("pages"));
        registry.register_model_class("Comments", Table::new("comments"));
        registry.declare_relation("Pages", "id", "Comments", "page_id");
        registry
    }

    #[test]
    fn related_for_row_hydrates_target_records() {
        let recorder = Recorder {
            rows: vec![FlatRow::new().with("id", 10).with("page_id", 3).with("body", "first")],
            ..Recorder::default()
        };
        let session = Session::new(registry(), recorder);

        let page = Record::new("Pages", vec![("id".into(), 3.into())]);
        let comments = session.related_for_row(&page, "Comments").unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].model(), "Comments");
        assert_eq!(comments[0].get::<String>("body").unwrap(), "first");

        let seen = session.executor().seen.borrow();
        assert_eq!(
            seen[0],
            (
                r#"SELECT "comments".* FROM "comments" WHERE "comments"."page_id" IN (?)"#.to_owned(),
                vec![OwnedValue::Integer(3)]
            )
        );
    }

    #[test]
    fn fetch_grouped_materializes_markers() {
        let recorder = Recorder {
            rows: vec![
                FlatRow::new()
                    .with("__Pages", "")
                    .with("id", 3)
                    .with("__Comments", "")
                    .with("id", 10),
            ],
            ..Recorder::default()
        };
        let session = Session::new(registry(), recorder).with_dialect(Dialect::PostgreSQL);

        let select = Select::from("pages")
            .model_columns("Pages", "pages")
            .model_columns("Comments", "comments");
        let groups = session.fetch_grouped(&select).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].get("Comments").unwrap().get::<i64>("id").unwrap(), 10);
    }
}
