#![cfg(feature = "rusqlite")]

use ::rusqlite::Connection;
use relata::prelude::*;

pub fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    create_tables(&conn);
    seed(&conn);
    conn
}

fn create_tables(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
         CREATE TABLE pages (
             id INTEGER PRIMARY KEY,
             title TEXT NOT NULL,
             author_id INTEGER NOT NULL REFERENCES users(id)
         );
         CREATE TABLE comments (
             id INTEGER PRIMARY KEY,
             page_id INTEGER NOT NULL REFERENCES pages(id),
             body TEXT NOT NULL
         );
         CREATE TABLE tags (id INTEGER PRIMARY KEY, label TEXT NOT NULL);
         CREATE TABLE page_tags (
             page_id INTEGER NOT NULL REFERENCES pages(id),
             tag_id INTEGER NOT NULL REFERENCES tags(id),
             PRIMARY KEY (page_id, tag_id)
         );",
    )
    .expect("Failed to create blog tables");
}

fn seed(conn: &Connection) {
    conn.execute_batch(
        "INSERT INTO users (id, name) VALUES (1, 'Ada'), (2, 'Bob');
         INSERT INTO pages (id, title, author_id) VALUES
             (1, 'Hello', 1), (2, 'Joins', 2), (3, 'Drafts', 1);
         INSERT INTO comments (id, page_id, body) VALUES
             (1, 1, 'first'), (2, 1, 'second'), (3, 2, 'nice');
         INSERT INTO tags (id, label) VALUES (1, 'rust'), (2, 'sql'), (3, 'unused');
         INSERT INTO page_tags (page_id, tag_id) VALUES (1, 1), (1, 2), (2, 2);",
    )
    .expect("Failed to seed blog tables");
}

/// Registry for the blog schema: pages have comments and an author, and
/// relate to tags through `page_tags`.
pub fn blog_registry() -> RelationRegistry {
    let mut registry = RelationRegistry::new();
    registry.register_model_class("Users", Table::new("users"));
    registry.register_model_class("Pages", Table::new("pages"));
    registry.register_model_class("Comments", Table::new("comments"));
    registry.register_model_class("Tags", Table::new("tags"));
    registry.register_model_class("PageTags", Table::new("page_tags"));

    registry.declare_relation("Pages", "id", "Comments", "page_id");
    registry.declare_relation("Users", "id", "Pages", "author_id");
    registry.declare_relation("Pages", "id", "PageTags", "page_id");
    registry.declare_relation("Tags", "id", "PageTags", "tag_id");
    registry.declare_through("Pages", "Tags", "PageTags");
    registry
}

pub fn labels(records: &[Record]) -> Vec<String> {
    let mut labels: Vec<String> = records
        .iter()
        .map(|record| record.get::<String>("label").expect("tag label"))
        .collect();
    labels.sort();
    labels
}
