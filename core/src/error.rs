use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelataError {
    /// No relation fact is declared for a model pair, or for one of the
    /// junction legs of a transitive relation
    #[error("No relation declared between `{left}` and `{right}`{}", through(.via))]
    RelationNotFound {
        left: CompactString,
        right: CompactString,
        via: Option<CompactString>,
    },

    /// A model name resolves to no table accessor, neither registered nor by convention
    #[error("No table accessor for model `{model}` (looked up `{path}`)")]
    ModelClassNotFound {
        model: CompactString,
        path: CompactString,
    },

    /// A stored fact does not describe the pair it is stored under
    #[error("Malformed relation fact `{key}`: {reason}")]
    MalformedRelationFact { key: CompactString, reason: String },

    /// A join column is absent from the row being resolved
    #[error("Row of model `{model}` has no column `{column}`")]
    MissingColumn {
        model: CompactString,
        column: CompactString,
    },

    /// Error mapping data
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Error in statement composition
    #[error("Statement error: {0}")]
    Statement(String),

    /// Error loading relation declarations
    #[cfg(feature = "config")]
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Rusqlite specific errors
    #[cfg(feature = "rusqlite")]
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

impl RelataError {
    pub(crate) fn relation_not_found(left: &str, right: &str) -> Self {
        Self::RelationNotFound {
            left: left.into(),
            right: right.into(),
            via: None,
        }
    }
}

fn through(via: &Option<CompactString>) -> String {
    via.as_ref()
        .map(|junction| format!(" through `{junction}`"))
        .unwrap_or_default()
}

/// Result type for relation operations
pub type Result<T> = std::result::Result<T, RelataError>;
