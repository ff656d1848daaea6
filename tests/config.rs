#![cfg(all(feature = "config", feature = "rusqlite"))]

use std::io::Write;

use common::{labels, setup_db};
use relata::config::ConfigError;
use relata::prelude::*;

mod common;

const BLOG_TOML: &str = r#"
    namespace = "blog"
    dialect = "sqlite"

    [models.Pages]
    table = "pages"

    [models.Tags]
    table = "tags"

    [models.PageTags]
    table = "page_tags"
    columns = ["page_id", "tag_id"]

    [[relations]]
    left = "Pages"
    left_column = "id"
    right = "PageTags"
    right_column = "page_id"

    [[relations]]
    left = "Tags"
    left_column = "id"
    right = "PageTags"
    right_column = "tag_id"

    [[relations]]
    left = "Pages"
    right = "Tags"
    through = "PageTags"
"#;

#[test]
fn registry_from_toml_resolves_against_sqlite() {
    let config = RelationConfig::from_toml_str(BLOG_TOML).unwrap();
    let registry = config.build_registry().unwrap();
    let session = Session::new(registry, setup_db()).with_dialect(config.dialect());

    let tags = session.related_for_keys("Pages", "Tags", [1]).unwrap();
    assert_eq!(labels(&tags), ["rust", "sql"]);

    let links = session.related_for_keys("Tags", "PageTags", [2]).unwrap();
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|link| link.len() == 2));
}

#[test]
fn registry_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relata.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(BLOG_TOML.as_bytes()).unwrap();

    let config = RelationConfig::load_from(&path).unwrap();
    assert_eq!(config.relations.len(), 3);
    assert_eq!(config.dialect(), Dialect::SQLite);
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = RelationConfig::load_from(&dir.path().join("relata.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}
