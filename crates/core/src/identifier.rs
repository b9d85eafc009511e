//! SQL table identifiers that are safe to splice into statement text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A table name made only of letters.
///
/// Capability stores interpolate table names directly into DDL and DML, so
/// this type is the only thing standing between a runtime-supplied name and
/// the SQL text. A value of this type always holds a non-empty, letters-only
/// string; there is no way to obtain an unvalidated one.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableIdentifier(String);

impl TableIdentifier {
    /// Validate `name` and wrap it.
    pub fn new(name: impl Into<String>) -> crate::Result<Self> {
        let name = name.into();
        if name.is_empty() || !name.chars().all(char::is_alphabetic) {
            return Err(crate::Error::InvalidIdentifier(name));
        }
        Ok(Self(name))
    }

    /// Build a derived identifier such as `Likeable<T>` or `<T>Recommendation`.
    ///
    /// The combined name is validated again; the letters-only property of
    /// `self` says nothing about `prefix` or `suffix`.
    pub fn derive(&self, prefix: &str, suffix: &str) -> crate::Result<Self> {
        Self::new(format!("{prefix}{}{suffix}", self.0))
    }

    /// Get the identifier exactly as it was supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableIdentifier({self})")
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TableIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TableIdentifier {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for TableIdentifier {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TableIdentifier {
    type Error = crate::Error;

    fn try_from(value: &str) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl From<TableIdentifier> for String {
    fn from(value: TableIdentifier) -> Self {
        value.0
    }
}
