//! `RelationResolver` turns a model pair plus source keys into a selection
//! of related target rows.
//!
//! A direct relation filters the target table on its join column. A
//! transitive relation walks exactly one junction:
//!
//! ```text
//! FROM target
//! JOIN junction ON target.t_col = junction.jt_col
//! JOIN source   ON junction.js_col = source.s_col
//! WHERE source.s_col IN (keys)
//! ```

use compact_str::CompactString;

use crate::dialect::Dialect;
use crate::error::{RelataError, Result};
use crate::join::Join;
use crate::model::Record;
use crate::select::{Bind, Select, qualified};
use crate::value::OwnedValue;

use super::fact::{DirectRelation, RelationFact};
use super::key::RelationKey;
use super::registry::RelationRegistry;

/// Resolves relations against a borrowed registry.
#[derive(Debug, Clone, Copy)]
pub struct RelationResolver<'r> {
    registry: &'r RelationRegistry,
    dialect: Dialect,
}

impl<'r> RelationResolver<'r> {
    pub fn new(registry: &'r RelationRegistry) -> Self {
        Self {
            registry,
            dialect: Dialect::default(),
        }
    }

    pub const fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Selects the `target` rows related to `row`.
    ///
    /// The join column is read from the row itself; for a transitive relation
    /// it is the row's column on the leg towards the junction.
    pub fn resolve_for_row(&self, row: &Record, target: &str) -> Result<Select> {
        let model = row.model();
        let column = match self.relation(model, target)? {
            RelationFact::Direct(direct) => join_column(direct, model, target)?,
            RelationFact::Transitive { junction } => {
                let leg = self.junction_leg(model, junction, model, target)?;
                join_column(leg, model, junction)?
            }
        };

        let key = row
            .value(column)
            .cloned()
            .ok_or_else(|| RelataError::MissingColumn {
                model: model.into(),
                column: column.into(),
            })?;
        self.resolve_for_keys(model, target, [key])
    }

    /// Selects the `target` rows related to `keys` of `source`.
    pub fn resolve_for_keys<I>(&self, source: &str, target: &str, keys: I) -> Result<Select>
    where
        I: IntoIterator,
        I::Item: Into<OwnedValue>,
    {
        let fact = self.relation(source, target)?;
        let keys = Bind::List(keys.into_iter().map(Into::into).collect());

        let target_table = self.storage_name(target)?;
        let select = Select::from(target_table.clone())
            .with_dialect(self.dialect)
            .columns(target_table.clone());

        match fact {
            RelationFact::Direct(direct) => {
                crate::relata_trace_resolve!(source, target, "direct");
                let target_column = join_column(direct, target, source)?;
                Ok(select.r#where(
                    format!("{} IN (?)", qualified(&target_table, target_column)),
                    [keys],
                ))
            }
            RelationFact::Transitive { junction } => {
                crate::relata_trace_resolve!(source, target, "transitive");
                let junction_table = self.storage_name(junction)?;

                let target_leg = self.junction_leg(target, junction, source, target)?;
                let select = select.join(
                    Join::new(),
                    junction_table.clone(),
                    None,
                    format!(
                        "{} = {}",
                        qualified(&target_table, join_column(target_leg, target, junction)?),
                        qualified(&junction_table, join_column(target_leg, junction, target)?),
                    ),
                );

                let source_leg = self.junction_leg(source, junction, source, target)?;
                let source_table = self.storage_name(source)?;
                let source_column = join_column(source_leg, source, junction)?;
                let select = select.join(
                    Join::new(),
                    source_table.clone(),
                    None,
                    format!(
                        "{} = {}",
                        qualified(&junction_table, join_column(source_leg, junction, source)?),
                        qualified(&source_table, source_column),
                    ),
                );

                Ok(select.r#where(
                    format!("{} IN (?)", qualified(&source_table, source_column)),
                    [keys],
                ))
            }
        }
    }

    /// Declared, well-formed fact for the pair.
    fn relation(&self, a: &str, b: &str) -> Result<&'r RelationFact> {
        let fact = self
            .registry
            .lookup_relation(a, b)
            .ok_or_else(|| RelataError::relation_not_found(a, b))?;
        fact.validate(a, b)?;
        Ok(fact)
    }

    /// Direct fact between `model` and `junction`, one leg of `source`..`target`.
    fn junction_leg(
        &self,
        model: &str,
        junction: &str,
        source: &str,
        target: &str,
    ) -> Result<&'r DirectRelation> {
        let fact = self
            .registry
            .lookup_relation(model, junction)
            .ok_or_else(|| RelataError::RelationNotFound {
                left: source.into(),
                right: target.into(),
                via: Some(junction.into()),
            })?;
        fact.validate(model, junction)?;
        fact.as_direct()
            .ok_or_else(|| RelataError::MalformedRelationFact {
                key: RelationKey::new(model, junction).into(),
                reason: "junction legs must be direct relations".to_owned(),
            })
    }

    fn storage_name(&self, model: &str) -> Result<CompactString> {
        Ok(self
            .registry
            .resolve_model_class(model)?
            .storage_name()
            .into())
    }
}

/// Column of `model` in a fact already validated for `(model, other)`.
fn join_column<'f>(direct: &'f DirectRelation, model: &str, other: &str) -> Result<&'f str> {
    direct
        .column_for(model)
        .ok_or_else(|| RelataError::MalformedRelationFact {
            key: RelationKey::new(model, other).into(),
            reason: format!("no join column for `{model}`"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StaticCatalog, Table};

    fn registry() -> RelationRegistry {
        let mut registry = RelationRegistry::new();
        for model in ["A", "B", "J"] {
            registry.register_model_class(model, Table::new(model));
        }
        registry
    }

    fn keys(select: &Select) -> Vec<OwnedValue> {
        select.build().unwrap().params
    }

    #[test]
    fn direct_relation_filters_target_column() {
        let mut registry = registry();
        registry.declare_relation("A", "aId", "B", "bId");

        let select = RelationResolver::new(&registry)
            .resolve_for_keys("A", "B", [1, 2, 3])
            .unwrap();

        assert_eq!(
            select.build().unwrap().sql,
            r#"SELECT "B".* FROM "B" WHERE "B"."bId" IN (?, ?, ?)"#
        );
        assert_eq!(keys(&select), vec![OwnedValue::from(1), OwnedValue::from(2), OwnedValue::from(3)]);
    }

    #[test]
    fn transitive_relation_joins_through_junction() {
        let mut registry = registry();
        registry.declare_through("A", "B", "J");
        registry.declare_relation("A", "aId", "J", "jAId");
        registry.declare_relation("B", "bId", "J", "jBId");

        let select = RelationResolver::new(&registry)
            .resolve_for_keys("A", "B", [5])
            .unwrap();

        assert_eq!(
            select.build().unwrap().sql,
            concat!(
                r#"SELECT "B".* FROM "B" "#,
                r#"JOIN "J" ON "B"."bId" = "J"."jBId" "#,
                r#"JOIN "A" ON "J"."jAId" = "A"."aId" "#,
                r#"WHERE "A"."aId" IN (?)"#
            )
        );
        assert_eq!(keys(&select), vec![OwnedValue::Integer(5)]);
    }

    #[test]
    fn undeclared_pair_names_both_models() {
        let registry = registry();
        let err = RelationResolver::new(&registry)
            .resolve_for_keys("X", "Y", [1])
            .unwrap_err();

        assert!(matches!(
            err,
            RelataError::RelationNotFound { ref left, ref right, via: None }
                if left == "X" && right == "Y"
        ));
    }

    #[test]
    fn missing_junction_leg_names_all_three_models() {
        let mut registry = registry();
        registry.declare_through("A", "B", "J");
        registry.declare_relation("B", "bId", "J", "jBId");

        let err = RelationResolver::new(&registry)
            .resolve_for_keys("A", "B", [5])
            .unwrap_err();

        assert!(matches!(
            err,
            RelataError::RelationNotFound { ref left, ref right, via: Some(ref via) }
                if left == "A" && right == "B" && via == "J"
        ));
    }

    #[test]
    fn transitive_leg_is_malformed() {
        let mut registry = registry();
        registry.declare_through("A", "B", "J");
        registry.declare_relation("A", "aId", "J", "jAId");
        registry.declare_through("B", "J", "A");

        let err = RelationResolver::new(&registry)
            .resolve_for_keys("A", "B", [5])
            .unwrap_err();
        assert!(matches!(err, RelataError::MalformedRelationFact { ref key, .. } if key == "B|J"));
    }

    #[test]
    fn fact_for_other_models_is_malformed() {
        let mut registry = registry();
        registry.declare_relations("A", "B", RelationFact::direct("A", "aId", "C", "cId"));

        let err = RelationResolver::new(&registry)
            .resolve_for_keys("A", "B", [1])
            .unwrap_err();
        assert!(matches!(err, RelataError::MalformedRelationFact { .. }));
    }

    #[test]
    fn resolve_for_row_reads_join_column() {
        let mut registry = registry();
        registry.declare_relation("A", "aId", "B", "a_ref");

        let row = Record::new(
            "A",
            vec![("aId".into(), 9.into()), ("name".into(), "nine".into())],
        );
        let select = RelationResolver::new(&registry)
            .resolve_for_row(&row, "B")
            .unwrap();

        assert_eq!(
            select.build().unwrap().sql,
            r#"SELECT "B".* FROM "B" WHERE "B"."a_ref" IN (?)"#
        );
        assert_eq!(keys(&select), vec![OwnedValue::Integer(9)]);
    }

    #[test]
    fn resolve_for_row_uses_leg_towards_junction() {
        let mut registry = registry();
        registry.declare_through("A", "B", "J");
        registry.declare_relation("A", "uid", "J", "jAId");
        registry.declare_relation("B", "bId", "J", "jBId");

        let row = Record::new("A", vec![("id".into(), 1.into()), ("uid".into(), 42.into())]);
        let select = RelationResolver::new(&registry)
            .resolve_for_row(&row, "B")
            .unwrap();

        assert_eq!(keys(&select), vec![OwnedValue::Integer(42)]);
        assert!(select.build().unwrap().sql.ends_with(r#"WHERE "A"."uid" IN (?)"#));
    }

    #[test]
    fn resolve_for_row_requires_join_column() {
        let mut registry = registry();
        registry.declare_relation("A", "aId", "B", "bId");

        let row = Record::new("A", vec![("name".into(), "no key".into())]);
        let err = RelationResolver::new(&registry)
            .resolve_for_row(&row, "B")
            .unwrap_err();
        assert!(matches!(
            err,
            RelataError::MissingColumn { ref column, .. } if column == "aId"
        ));
    }

    #[test]
    fn resolution_is_repeatable() {
        let mut registry = RelationRegistry::new().with_catalog(
            StaticCatalog::new()
                .with("Pages::Table", Table::new("pages"))
                .with("Tags::Table", Table::new("tags"))
                .with("PageTags::Table", Table::new("page_tags")),
        );
        registry.declare_through("Pages", "Tags", "PageTags");
        registry.declare_relation("Pages", "id", "PageTags", "page_id");
        registry.declare_relation("Tags", "id", "PageTags", "tag_id");

        let resolver = RelationResolver::new(&registry).with_dialect(Dialect::PostgreSQL);
        let first = resolver.resolve_for_keys("Tags", "Pages", [1, 2]).unwrap();
        let second = resolver.resolve_for_keys("Tags", "Pages", [1, 2]).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.build().unwrap(), second.build().unwrap());
        assert_eq!(
            first.build().unwrap().sql,
            concat!(
                r#"SELECT "pages".* FROM "pages" "#,
                r#"JOIN "page_tags" ON "pages"."id" = "page_tags"."page_id" "#,
                r#"JOIN "tags" ON "page_tags"."tag_id" = "tags"."id" "#,
                r#"WHERE "tags"."id" IN ($1, $2)"#
            )
        );
    }
}
