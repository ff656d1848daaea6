//! Relation declarations loaded from `relata.toml`.
//!
//! ```toml
//! namespace = "app::models"
//! dialect = "sqlite"
//!
//! [models.Pages]
//! table = "pages"
//! columns = ["id", "title"]
//!
//! [[relations]]
//! left = "Pages"
//! left_column = "id"
//! right = "PageTags"
//! right_column = "page_id"
//!
//! [[relations]]
//! left = "Pages"
//! right = "Tags"
//! through = "PageTags"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dialect::Dialect;
use crate::model::Table;
use crate::relation::{RelationFact, RelationRegistry};

pub const CONFIG_FILE: &str = "relata.toml";

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationConfig {
    /// Namespace for conventional accessor paths.
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub dialect: Option<Dialect>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelConfig>,
    #[serde(default)]
    pub relations: Vec<RelationEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub table: String,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

/// One `[[relations]]` entry: either both join columns, or a junction.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationEntry {
    pub left: String,
    pub right: String,
    #[serde(default)]
    pub left_column: Option<String>,
    #[serde(default)]
    pub right_column: Option<String>,
    #[serde(default)]
    pub through: Option<String>,
}

impl RelationEntry {
    pub fn to_fact(&self) -> Result<RelationFact, ConfigError> {
        let invalid = |reason: &'static str| ConfigError::InvalidRelation {
            left: self.left.clone(),
            right: self.right.clone(),
            reason,
        };

        match (&self.left_column, &self.right_column, &self.through) {
            (Some(left_column), Some(right_column), None) => Ok(RelationFact::direct(
                self.left.as_str(),
                left_column.as_str(),
                self.right.as_str(),
                right_column.as_str(),
            )),
            (None, None, Some(junction)) => {
                if junction == &self.left || junction == &self.right {
                    Err(invalid("junction must differ from both related models"))
                } else {
                    Ok(RelationFact::through(junction.as_str()))
                }
            }
            (_, _, Some(_)) => Err(invalid("`through` excludes join columns")),
            _ => Err(invalid("expected `left_column` and `right_column`, or `through`")),
        }
    }
}

impl RelationConfig {
    /// Load from default config file
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load from specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.into())
            } else {
                ConfigError::Io(path.into(), e)
            }
        })?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(path.into(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for entry in &self.relations {
            entry.to_fact()?;
        }
        Ok(())
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect.unwrap_or_default()
    }

    /// Declares every model and relation on `registry`.
    ///
    /// Every relation entry is checked first; on error the registry is left
    /// untouched.
    pub fn apply(&self, registry: &mut RelationRegistry) -> Result<(), ConfigError> {
        let facts = self
            .relations
            .iter()
            .map(|entry| Ok((entry, entry.to_fact()?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        if let Some(namespace) = &self.namespace {
            registry.set_namespace(namespace.as_str());
        }

        for (model, table) in &self.models {
            let mut accessor = Table::new(table.table.as_str());
            if let Some(columns) = &table.columns {
                accessor = accessor.with_columns(columns.iter().map(String::as_str));
            }
            registry.register_model_class(model, accessor);
        }

        for (entry, fact) in facts {
            registry.declare_relations(&entry.left, &entry.right, fact);
        }
        Ok(())
    }

    /// A fresh registry holding this configuration.
    pub fn build_registry(&self) -> Result<RelationRegistry, ConfigError> {
        let mut registry = RelationRegistry::new();
        self.apply(&mut registry)?;
        Ok(registry)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid relation between '{left}' and '{right}': {reason}")]
    InvalidRelation {
        left: String,
        right: String,
        reason: &'static str,
    },
}

// ============================================================================
// Tests
// ============================================================================
