//! SQL dialect selection for placeholder rendering.

use core::fmt::Write;

/// SQL dialect for database-specific behavior
///
/// Only placeholder syntax differs between dialects at this layer; identifiers
/// are always double-quoted.
///
/// # Examples
///
/// ```
/// use relata_core::Dialect;
///
/// let dialect = Dialect::PostgreSQL;
/// assert!(dialect.uses_numbered_placeholders());
///
/// let sqlite = Dialect::SQLite;
/// assert!(!sqlite.uses_numbered_placeholders());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// SQLite - uses `?` positional placeholders
    #[default]
    SQLite,

    /// PostgreSQL - uses `$1, $2, ...` numbered placeholders
    #[cfg_attr(feature = "config", serde(alias = "postgres", alias = "pg"))]
    PostgreSQL,
}

impl Dialect {
    /// Returns `true` if this dialect uses numbered placeholders (`$1, $2, ...`)
    #[inline]
    #[must_use]
    pub const fn uses_numbered_placeholders(&self) -> bool {
        matches!(self, Dialect::PostgreSQL)
    }

    /// Writes the placeholder for the 1-based parameter `index`.
    pub fn write_placeholder(&self, index: usize, buf: &mut String) {
        if self.uses_numbered_placeholders() {
            // Writing into a String cannot fail
            let _ = write!(buf, "${index}");
        } else {
            buf.push('?');
        }
    }
}
