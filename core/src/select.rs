//! Small runtime SELECT builder for relation fetches.
//!
//! Tables and columns are plain strings (models are only known by name at
//! runtime). Conditions are templates with `?` placeholders bound
//! positionally; a [`Bind::List`] expands into one placeholder per element,
//! which is how `IN (?)` takes a key set.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::dialect::Dialect;
use crate::error::{RelataError, Result};
use crate::executor::{Executor, FlatRow};
use crate::join::Join;
use crate::materialize::MARKER_PREFIX;
use crate::value::OwnedValue;

/// A value bound to one `?` in a condition template.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Value(OwnedValue),
    /// Expands to `?, ?, ...`; an empty list renders `NULL`.
    List(Vec<OwnedValue>),
}

impl From<OwnedValue> for Bind {
    fn from(value: OwnedValue) -> Self {
        Self::Value(value)
    }
}

impl From<Vec<OwnedValue>> for Bind {
    fn from(values: Vec<OwnedValue>) -> Self {
        Self::List(values)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Projection {
    /// `"table".*`
    Table(CompactString),
    /// `'' AS "__Model", "table".*`
    Model {
        model: CompactString,
        table: CompactString,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct JoinClause {
    join: Join,
    table: CompactString,
    alias: Option<CompactString>,
    on: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Condition {
    template: String,
    binds: Vec<Bind>,
}

/// SQL text plus its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<OwnedValue>,
}

/// A SELECT over one root table with joins and ANDed conditions.
///
/// Two selects compare equal exactly when they render the same statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    dialect: Dialect,
    table: CompactString,
    projection: SmallVec<[Projection; 2]>,
    joins: SmallVec<[JoinClause; 2]>,
    conditions: Vec<Condition>,
}

impl Select {
    /// Starts a selection rooted at `table`.
    pub fn from(table: impl Into<CompactString>) -> Self {
        Self {
            dialect: Dialect::default(),
            table: table.into(),
            projection: SmallVec::new(),
            joins: SmallVec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Projects every column of `table`. Without any projection the
    /// statement selects `*`.
    pub fn columns(mut self, table: impl Into<CompactString>) -> Self {
        self.projection.push(Projection::Table(table.into()));
        self
    }

    /// Projects a `__{model}` marker column followed by every column of
    /// `table`, so the rows can be split per model by the materializer.
    pub fn model_columns(
        mut self,
        model: impl Into<CompactString>,
        table: impl Into<CompactString>,
    ) -> Self {
        self.projection.push(Projection::Model {
            model: model.into(),
            table: table.into(),
        });
        self
    }

    /// Adds `{join} "table" [AS "alias"] ON {on}`.
    pub fn join(
        mut self,
        join: Join,
        table: impl Into<CompactString>,
        alias: Option<&str>,
        on: impl Into<String>,
    ) -> Self {
        self.joins.push(JoinClause {
            join,
            table: table.into(),
            alias: alias.map(CompactString::from),
            on: on.into(),
        });
        self
    }

    /// Adds a condition; several conditions are ANDed.
    pub fn r#where<I>(mut self, template: impl Into<String>, binds: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Bind>,
    {
        self.conditions.push(Condition {
            template: template.into(),
            binds: binds.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Renders the statement and collects its parameters.
    pub fn build(&self) -> Result<BuiltQuery> {
        let mut sql = String::with_capacity(128);
        let mut params = Vec::new();

        sql.push_str("SELECT ");
        if self.projection.is_empty() {
            sql.push('*');
        }
        for (i, projection) in self.projection.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            match projection {
                Projection::Table(table) => write_all_columns(table, &mut sql),
                Projection::Model { model, table } => {
                    sql.push_str("'' AS ");
                    let mut marker = CompactString::from(MARKER_PREFIX);
                    marker.push_str(model);
                    write_ident(&marker, &mut sql);
                    sql.push_str(", ");
                    write_all_columns(table, &mut sql);
                }
            }
        }

        sql.push_str(" FROM ");
        write_ident(&self.table, &mut sql);

        for clause in &self.joins {
            sql.push(' ');
            sql.push_str(clause.join.keyword());
            sql.push(' ');
            write_ident(&clause.table, &mut sql);
            if let Some(alias) = &clause.alias {
                sql.push_str(" AS ");
                write_ident(alias, &mut sql);
            }
            sql.push_str(" ON ");
            sql.push_str(&clause.on);
        }

        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            let wrap = self.conditions.len() > 1;
            for (i, condition) in self.conditions.iter().enumerate() {
                if i > 0 {
                    sql.push_str(" AND ");
                }
                if wrap {
                    sql.push('(');
                }
                self.expand(condition, &mut sql, &mut params)?;
                if wrap {
                    sql.push(')');
                }
            }
        }

        Ok(BuiltQuery { sql, params })
    }

    /// Builds and runs the statement.
    pub fn execute<E: Executor + ?Sized>(&self, executor: &E) -> Result<Vec<FlatRow>> {
        let BuiltQuery { sql, params } = self.build()?;
        executor.query(&sql, &params)
    }

    fn expand(
        &self,
        condition: &Condition,
        sql: &mut String,
        params: &mut Vec<OwnedValue>,
    ) -> Result<()> {
        let mut binds = condition.binds.iter();
        for ch in condition.template.chars() {
            if ch != '?' {
                sql.push(ch);
                continue;
            }
            match binds.next() {
                Some(Bind::Value(value)) => {
                    params.push(value.clone());
                    self.dialect.write_placeholder(params.len(), sql);
                }
                Some(Bind::List(values)) if values.is_empty() => sql.push_str("NULL"),
                Some(Bind::List(values)) => {
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            sql.push_str(", ");
                        }
                        params.push(value.clone());
                        self.dialect.write_placeholder(params.len(), sql);
                    }
                }
                None => {
                    return Err(RelataError::Statement(format!(
                        "`{}` has more placeholders than bound values",
                        condition.template
                    )));
                }
            }
        }
        if binds.next().is_some() {
            return Err(RelataError::Statement(format!(
                "`{}` has fewer placeholders than bound values",
                condition.template
            )));
        }
        Ok(())
    }
}

/// Writes `name` as a double-quoted identifier.
pub fn write_ident(name: &str, buf: &mut String) {
    buf.push('"');
    for ch in name.chars() {
        if ch == '"' {
            buf.push('"');
        }
        buf.push(ch);
    }
    buf.push('"');
}

/// `"table"."column"`
pub fn qualified(table: &str, column: &str) -> String {
    let mut buf = String::with_capacity(table.len() + column.len() + 5);
    write_ident(table, &mut buf);
    buf.push('.');
    write_ident(column, &mut buf);
    buf
}

fn write_all_columns(table: &str, buf: &mut String) {
    write_ident(table, buf);
    buf.push_str(".*");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(values: &[i64]) -> Bind {
        Bind::List(values.iter().copied().map(OwnedValue::from).collect())
    }

    #[test]
    fn in_list_expands_per_key() {
        let query = Select::from("tags")
            .columns("tags")
            .r#where(format!("{} IN (?)", qualified("tags", "id")), [keys(&[1, 2, 3])])
            .build()
            .unwrap();

        assert_eq!(
            query.sql,
            r#"SELECT "tags".* FROM "tags" WHERE "tags"."id" IN (?, ?, ?)"#
        );
        assert_eq!(query.params, vec![OwnedValue::from(1), OwnedValue::from(2), OwnedValue::from(3)]);
    }

    #[test]
    fn numbered_placeholders_continue_across_conditions() {
        let query = Select::from("pages")
            .with_dialect(Dialect::PostgreSQL)
            .r#where("\"pages\".\"id\" IN (?)", [keys(&[4, 5])])
            .r#where("\"pages\".\"title\" = ?", [OwnedValue::from("Hi")])
            .build()
            .unwrap();

        assert_eq!(
            query.sql,
            r#"SELECT * FROM "pages" WHERE ("pages"."id" IN ($1, $2)) AND ("pages"."title" = $3)"#
        );
        assert_eq!(query.params.len(), 3);
    }

    #[test]
    fn empty_key_set_matches_nothing() {
        let query = Select::from("tags")
            .r#where("\"tags\".\"id\" IN (?)", [keys(&[])])
            .build()
            .unwrap();
        assert_eq!(query.sql, r#"SELECT * FROM "tags" WHERE "tags"."id" IN (NULL)"#);
        assert!(query.params.is_empty());
    }

    #[test]
    fn joins_and_marker_projection() {
        let query = Select::from("pages")
            .model_columns("Pages", "pages")
            .model_columns("Users", "u")
            .join(Join::new().left(), "users", Some("u"), r#""u"."id" = "pages"."author_id""#)
            .build()
            .unwrap();

        assert_eq!(
            query.sql,
            concat!(
                r#"SELECT '' AS "__Pages", "pages".*, '' AS "__Users", "u".* "#,
                r#"FROM "pages" LEFT JOIN "users" AS "u" ON "u"."id" = "pages"."author_id""#
            )
        );
    }

    #[test]
    fn placeholder_count_mismatch_is_an_error() {
        let too_few = Select::from("t").r#where("a = ? AND b = ?", [OwnedValue::from(1)]);
        assert!(matches!(too_few.build(), Err(RelataError::Statement(_))));

        let too_many = Select::from("t").r#where("a = ?", [OwnedValue::from(1), OwnedValue::from(2)]);
        assert!(matches!(too_many.build(), Err(RelataError::Statement(_))));
    }

    #[test]
    fn identifiers_are_escaped() {
        assert_eq!(qualified("we\"ird", "id"), r#""we""ird"."id""#);
    }
}
