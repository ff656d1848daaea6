//! Relation facts: how two models join, directly or through a junction.

use compact_str::CompactString;

use crate::error::{RelataError, Result};

use super::key::RelationKey;

/// One side of a direct relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEnd {
    pub model: CompactString,
    pub column: CompactString,
}

/// Two models joined on one column each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectRelation {
    left: RelationEnd,
    right: RelationEnd,
}

impl DirectRelation {
    pub fn new(
        model_a: impl Into<CompactString>,
        column_a: impl Into<CompactString>,
        model_b: impl Into<CompactString>,
        column_b: impl Into<CompactString>,
    ) -> Self {
        Self {
            left: RelationEnd {
                model: model_a.into(),
                column: column_a.into(),
            },
            right: RelationEnd {
                model: model_b.into(),
                column: column_b.into(),
            },
        }
    }

    /// Join column on `model`'s table.
    pub fn column_for(&self, model: &str) -> Option<&str> {
        [&self.left, &self.right]
            .into_iter()
            .find(|end| end.model == model)
            .map(|end| end.column.as_str())
    }

    pub fn ends(&self) -> (&RelationEnd, &RelationEnd) {
        (&self.left, &self.right)
    }
}

/// A registry entry, stored under the canonical key of its model pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationFact {
    /// The pair joins on one column each.
    Direct(DirectRelation),
    /// The pair relates only through `junction`; both legs must be direct.
    Transitive { junction: CompactString },
}

impl RelationFact {
    pub fn direct(
        model_a: impl Into<CompactString>,
        column_a: impl Into<CompactString>,
        model_b: impl Into<CompactString>,
        column_b: impl Into<CompactString>,
    ) -> Self {
        Self::Direct(DirectRelation::new(model_a, column_a, model_b, column_b))
    }

    pub fn through(junction: impl Into<CompactString>) -> Self {
        Self::Transitive {
            junction: junction.into(),
        }
    }

    pub fn as_direct(&self) -> Option<&DirectRelation> {
        match self {
            Self::Direct(direct) => Some(direct),
            Self::Transitive { .. } => None,
        }
    }

    pub fn junction(&self) -> Option<&str> {
        match self {
            Self::Direct(_) => None,
            Self::Transitive { junction } => Some(junction),
        }
    }

    /// Checks that the fact describes the pair `(a, b)` it was found under.
    pub fn validate(&self, a: &str, b: &str) -> Result<()> {
        let malformed = |reason: String| RelataError::MalformedRelationFact {
            key: RelationKey::new(a, b).into(),
            reason,
        };

        match self {
            Self::Direct(direct) => {
                for model in [a, b] {
                    if direct.column_for(model).is_none() {
                        return Err(malformed(format!("no join column for `{model}`")));
                    }
                }
                let (left, right) = direct.ends();
                if a != b && left.model == right.model {
                    return Err(malformed(format!(
                        "both ends name `{}`",
                        left.model
                    )));
                }
                Ok(())
            }
            Self::Transitive { junction } => {
                if junction.is_empty() {
                    Err(malformed("empty junction model".to_owned()))
                } else if junction == a || junction == b {
                    Err(malformed(format!("junction `{junction}` is one of the related models")))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl From<DirectRelation> for RelationFact {
    fn from(direct: DirectRelation) -> Self {
        Self::Direct(direct)
    }
}
