//! # relata
//!
//! Relation resolution and joined-row materialization for row-oriented data
//! access.
//!
//! Models are named entities backed by tables. Relations between them are
//! declared pairwise, either directly (one join column per side) or through a
//! junction model for many-to-many links. Given keys of one model, relata
//! builds the SELECT for the related rows of another; given flat rows tagged
//! with `__{Model}` marker columns, it splits them back into per-model records.
//!
//! ## Quick Start
//!
//! ```rust
//! use relata::prelude::*;
//!
//! # fn main() -> relata::Result<()> {
//! let mut registry = RelationRegistry::new();
//! registry.register_model_class("Pages", Table::new("pages"));
//! registry.register_model_class("Tags", Table::new("tags"));
//! registry.register_model_class("PageTags", Table::new("page_tags"));
//!
//! registry.declare_relation("Pages", "id", "PageTags", "page_id");
//! registry.declare_relation("Tags", "id", "PageTags", "tag_id");
//! registry.declare_through("Pages", "Tags", "PageTags");
//!
//! let select = RelationResolver::new(&registry).resolve_for_keys("Pages", "Tags", [1])?;
//! assert_eq!(
//!     select.build()?.sql,
//!     concat!(
//!         r#"SELECT "tags".* FROM "tags" "#,
//!         r#"JOIN "page_tags" ON "tags"."id" = "page_tags"."tag_id" "#,
//!         r#"JOIN "pages" ON "page_tags"."page_id" = "pages"."id" "#,
//!         r#"WHERE "pages"."id" IN (?)"#,
//!     )
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! | Feature    | Enables                                         | Default |
//! |------------|-------------------------------------------------|---------|
//! | `config`   | `relata.toml` relation declarations             | ✅      |
//! | `rusqlite` | [`Executor`](core::Executor) for `rusqlite::Connection` | ✅ |
//! | `tracing`  | statement / resolution events via `tracing`     | ✅      |

// =============================================================================
// Root-level exports
// =============================================================================

/// Result type for relation operations
pub use relata_core::error::Result;

/// Error types
pub mod error {
    pub use relata_core::error::RelataError;
    #[cfg(feature = "config")]
    pub use relata_core::config::ConfigError;
}

/// Core types and traits.
pub mod core {
    pub use relata_core::*;
}

/// Relation declarations loaded from `relata.toml`.
#[cfg(feature = "config")]
pub mod config {
    pub use relata_core::config::*;
}

#[cfg(feature = "rusqlite")]
pub use rusqlite;

/// Everything needed to declare, resolve and materialize relations.
pub mod prelude {
    pub use relata_core::{
        Bind, Dialect, Executor, FlatRow, Join, OwnedValue, Record, RecordGroup, RelationFact,
        RelationRegistry, RelationResolver, RowMaterializer, Select, Session, StaticCatalog,
        Table, TableAccessor, TableCatalog,
    };

    #[cfg(feature = "config")]
    pub use relata_core::RelationConfig;
}
