//! [`Executor`] for [`rusqlite::Connection`].

#[cfg(feature = "tracing")]
use std::time::Instant;

use compact_str::CompactString;
use ::rusqlite::{Connection, params_from_iter};

use crate::error::Result;
use crate::executor::{Executor, FlatRow};
use crate::value::OwnedValue;

impl Executor for Connection {
    fn query(&self, sql: &str, params: &[OwnedValue]) -> Result<Vec<FlatRow>> {
        #[cfg(feature = "tracing")]
        let started = Instant::now();

        let mut stmt = self.prepare(sql)?;
        let names: Vec<CompactString> = stmt
            .column_names()
            .into_iter()
            .map(CompactString::from)
            .collect();

        let mut rows = stmt.query(params_from_iter(params))?;
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut flat = FlatRow::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                flat.push(name.clone(), row.get::<_, OwnedValue>(i)?);
            }
            results.push(flat);
        }

        crate::relata_trace_query!(sql, params.len(), started);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_named_columns_in_order() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
             INSERT INTO users (id, name) VALUES (1, 'Ada'), (2, 'Bob');",
        )
        .unwrap();

        let rows = conn
            .query(
                "SELECT id, name, NULL AS missing FROM users WHERE id = ?",
                &[OwnedValue::from(2)],
            )
            .unwrap();

        assert_eq!(rows.len(), 1);
        let columns: Vec<_> = rows[0].iter().map(|(name, value)| (name.to_owned(), value.clone())).collect();
        assert_eq!(
            columns,
            vec![
                ("id".to_owned(), OwnedValue::Integer(2)),
                ("name".to_owned(), OwnedValue::Text("Bob".into())),
                ("missing".to_owned(), OwnedValue::Null),
            ]
        );
    }
}
