//! Canonical, order-independent key for a model pair.

use std::fmt;

use compact_str::{CompactString, format_compact};

/// Separator between the two sorted model names when a key is displayed.
pub const KEY_SEPARATOR: char = '|';

/// `RelationKey::new(a, b) == RelationKey::new(b, a)` for every pair.
///
/// The two names are kept apart, so a name containing [`KEY_SEPARATOR`]
/// cannot collide with a different pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationKey {
    low: CompactString,
    high: CompactString,
}

impl RelationKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.into(),
            high: high.into(),
        }
    }

    /// The two model names, lowest first.
    pub fn models(&self) -> (&str, &str) {
        (&self.low, &self.high)
    }
}

impl fmt::Display for RelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.low, self.high)
    }
}

impl From<RelationKey> for CompactString {
    fn from(key: RelationKey) -> Self {
        format_compact!("{key}")
    }
}
