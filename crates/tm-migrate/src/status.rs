//! Status reconciliation between the catalog and the changelog

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};
use tm_core::{AppliedState, ChangelogEntry, MigrationId, StatusItem};

/// One status item per catalog identifier, ascending.
///
/// An identifier is `Applied` when the changelog holds an entry for it; with
/// several entries the earliest `applied_at` is reported. Changelog entries
/// with no catalog identifier are ignored here, see [`orphaned_entries`].
pub fn reconcile(catalog_ids: &[MigrationId], changelog: &[ChangelogEntry]) -> Vec<StatusItem> {
    let mut applied: HashMap<&str, DateTime<Utc>> = HashMap::new();
    for entry in changelog {
        applied
            .entry(entry.file_name.as_str())
            .and_modify(|at| *at = (*at).min(entry.applied_at))
            .or_insert(entry.applied_at);
    }

    catalog_ids
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|id| StatusItem {
            file_name: id.clone(),
            state: match applied.get(id.as_str()) {
                Some(at) => AppliedState::Applied(*at),
                None => AppliedState::Pending,
            },
        })
        .collect()
}

/// Changelog entries whose identifier is not in the catalog
pub fn orphaned_entries<'a>(
    catalog_ids: &[MigrationId],
    changelog: &'a [ChangelogEntry],
) -> Vec<&'a ChangelogEntry> {
    let known: HashSet<&str> = catalog_ids.iter().map(|id| id.as_str()).collect();
    changelog
        .iter()
        .filter(|entry| !known.contains(entry.file_name.as_str()))
        .collect()
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
