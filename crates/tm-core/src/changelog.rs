//! Changelog entry types
//!
//! One [`ChangelogEntry`] is written each time a forward action succeeds and
//! removed when the corresponding reverse action succeeds.

use crate::migration_id::MigrationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entry point that created a changelog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Batch execution of pending migrations
    Up,
    /// Single run of an idempotent migration
    Run,
}

impl Method {
    /// The tag stored in the changelog `method` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Up => "up",
            Method::Run => "run",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Method::Up),
            "run" => Ok(Method::Run),
            other => Err(format!("unknown changelog method '{}'", other)),
        }
    }
}

/// A persisted record of an applied migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogEntry {
    /// Identifier of the applied migration
    pub file_name: MigrationId,

    /// When the forward action completed
    pub applied_at: DateTime<Utc>,

    /// Which entry point recorded the migration
    pub method: Method,
}

impl ChangelogEntry {
    /// Create an entry stamped with the current time
    pub fn now(file_name: MigrationId, method: Method) -> Self {
        Self {
            file_name,
            applied_at: Utc::now(),
            method,
        }
    }
}
