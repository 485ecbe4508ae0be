//! Strongly-typed migration identifier.
//!
//! Identifiers are both the changelog key and the execution sort key. By
//! convention they start with a `YYYYMMDDHHMMSS` timestamp followed by a
//! slug (`20181106183300-add_index`), so lexical order is chronological
//! order. The timestamp is not validated; ordering is plain string ordering.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Length of the `YYYYMMDDHHMMSS` prefix produced by [`MigrationId::timestamped`].
pub const TIMESTAMP_LEN: usize = 14;

/// A non-empty, totally ordered migration identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MigrationId(String);

impl MigrationId {
    /// Create a new `MigrationId`, panicking if the identifier is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(id: impl Into<String>) -> Self {
        let s = id.into();
        assert!(!s.is_empty(), "MigrationId must not be empty");
        Self(s)
    }

    /// Try to create a new `MigrationId`.
    ///
    /// Rejects empty identifiers and identifiers containing path separators,
    /// since directory catalogs map identifiers onto file names.
    pub fn try_new(id: impl Into<String>) -> CoreResult<Self> {
        let s = id.into();
        if s.is_empty() {
            return Err(CoreError::InvalidMigrationId {
                reason: "identifier must not be empty".to_string(),
            });
        }
        if s.contains('/') || s.contains('\\') || s == "." || s == ".." {
            return Err(CoreError::InvalidMigrationId {
                reason: format!("'{}' must not contain path separators", s),
            });
        }
        Ok(Self(s))
    }

    /// Build `<YYYYMMDDHHMMSS>-<slug>` from a timestamp and a free-form
    /// description. Whitespace runs in the description collapse to `_`.
    pub fn timestamped(at: chrono::DateTime<chrono::Utc>, description: &str) -> CoreResult<Self> {
        let slug = description
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();
        if slug.is_empty() {
            return Err(CoreError::InvalidMigrationId {
                reason: "description must not be empty".to_string(),
            });
        }
        Self::try_new(format!("{}-{}", at.format("%Y%m%d%H%M%S"), slug))
    }

    /// Return the underlying identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MigrationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MigrationId {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl TryFrom<&str> for MigrationId {
    type Error = CoreError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl From<MigrationId> for String {
    fn from(id: MigrationId) -> Self {
        id.0
    }
}

impl PartialEq<str> for MigrationId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for MigrationId {
    fn eq(&self, other: &String) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "migration_id_test.rs"]
mod tests;
