#[cfg(feature = "config")]
pub mod config;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod join;
pub mod materialize;
pub mod model;
pub mod relation;
pub mod select;
pub mod session;
#[doc(hidden)]
pub mod tracing;
pub mod value;

// Re-export key types and traits
#[cfg(feature = "config")]
pub use config::{ConfigError, RelationConfig};
pub use dialect::Dialect;
pub use error::{RelataError, Result};
pub use executor::{Executor, FlatRow};
pub use join::{Join, JoinType};
pub use materialize::{RecordGroup, RowMaterializer};
pub use model::{ColumnMap, Record, StaticCatalog, Table, TableAccessor, TableCatalog};
pub use relation::{
    DirectRelation, RelationFact, RelationKey, RelationRegistry, RelationResolver,
};
pub use select::{Bind, BuiltQuery, Select};
pub use session::Session;
pub use value::OwnedValue;
