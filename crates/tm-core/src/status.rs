//! Derived migration status.
//!
//! Status items are produced fresh by every reconciliation and never stored.

use crate::migration_id::MigrationId;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// Sentinel shown for migrations that are not in the changelog
pub const PENDING: &str = "PENDING";

/// Whether a cataloged migration has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedState {
    /// Present in the changelog
    Applied(DateTime<Utc>),
    /// Cataloged but not in the changelog
    Pending,
}

impl AppliedState {
    /// Returns `true` for [`AppliedState::Pending`]
    pub fn is_pending(&self) -> bool {
        matches!(self, AppliedState::Pending)
    }

    /// The applied timestamp, if any
    pub fn applied_at(&self) -> Option<DateTime<Utc>> {
        match self {
            AppliedState::Applied(at) => Some(*at),
            AppliedState::Pending => None,
        }
    }
}

impl fmt::Display for AppliedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliedState::Applied(at) => write!(f, "{}", at.to_rfc3339()),
            AppliedState::Pending => f.write_str(PENDING),
        }
    }
}

impl Serialize for AppliedState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of a status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusItem {
    /// Migration identifier
    pub file_name: MigrationId,

    /// Applied timestamp or the pending sentinel
    #[serde(rename = "appliedAt")]
    pub state: AppliedState,
}

impl StatusItem {
    /// Returns `true` when the migration has not been applied
    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }
}
