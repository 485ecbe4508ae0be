//! Shared fixtures for engine tests

use crate::action::{Action, ActionError};
use crate::catalog::{Catalog, MemoryCatalog};
use crate::error::{CatalogError, CatalogResult};
use crate::migrator::Migrator;
use crate::unit::MigrationUnit;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tm_core::{ChangelogEntry, MigrationId};
use tm_db::{Database, DbError, DbResult, DuckDbBackend};

pub(crate) const TABLE: &str = "changelog";

/// Ordered log of action invocations, e.g. `up:A`, `down:B`
#[derive(Clone, Default)]
pub(crate) struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    pub(crate) fn push(&self, call: String) {
        self.0.lock().unwrap().push(call);
    }

    pub(crate) fn get(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn recording(calls: &Calls, label: String) -> Action {
    let calls = calls.clone();
    Action::direct(move |_db| {
        let calls = calls.clone();
        let label = label.clone();
        async move {
            calls.push(label);
            Ok::<_, ActionError>(())
        }
    })
}

/// Unit whose up/down actions record their invocation
pub(crate) fn recording_unit(calls: &Calls, id: &str) -> MigrationUnit {
    MigrationUnit::new(recording(calls, format!("up:{id}")))
        .with_down(recording(calls, format!("down:{id}")))
}

/// Unit with only a forward action
pub(crate) fn up_only_unit(calls: &Calls, id: &str) -> MigrationUnit {
    MigrationUnit::new(recording(calls, format!("up:{id}")))
}

/// Unit whose forward action records and then fails
pub(crate) fn failing_up_unit(calls: &Calls, id: &str) -> MigrationUnit {
    let calls = calls.clone();
    let label = format!("up:{id}");
    MigrationUnit::new(Action::direct(move |_db| {
        let calls = calls.clone();
        let label = label.clone();
        async move {
            calls.push(label);
            Err::<(), ActionError>("forward action exploded".into())
        }
    }))
}

/// Unit whose reverse action records and then fails
pub(crate) fn failing_down_unit(calls: &Calls, id: &str) -> MigrationUnit {
    let down_calls = calls.clone();
    let label = format!("down:{id}");
    up_only_unit(calls, id).with_down(Action::signaled(move |_db, done| {
        down_calls.push(label.clone());
        done.fail("reverse action exploded");
    }))
}

/// Signaled-convention unit that completes from a spawned task after a delay
pub(crate) fn deferred_unit(calls: &Calls, id: &str) -> MigrationUnit {
    let up_calls = calls.clone();
    let down_calls = calls.clone();
    let up_label = format!("up:{id}");
    let down_label = format!("down:{id}");
    MigrationUnit::new(Action::signaled(move |_db, done| {
        let calls = up_calls.clone();
        let label = up_label.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(25)).await;
            calls.push(label);
            done.ok();
        });
    }))
    .with_down(Action::signaled(move |_db, done| {
        down_calls.push(down_label.clone());
        done.ok();
    }))
}

/// In-memory DuckDB that counts changelog writes and can be told to fail them
#[derive(Default)]
pub(crate) struct TestDb {
    inner: Option<DuckDbBackend>,
    pub(crate) fail_insert: AtomicBool,
    pub(crate) fail_remove: AtomicBool,
    pub(crate) writes: AtomicUsize,
}

impl TestDb {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Some(DuckDbBackend::in_memory().unwrap()),
            ..Default::default()
        })
    }

    fn inner(&self) -> &DuckDbBackend {
        self.inner.as_ref().unwrap()
    }

    pub(crate) async fn ids(&self) -> Vec<String> {
        self.inner()
            .list_changelog_entries(TABLE)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.file_name.into_inner())
            .collect()
    }

    pub(crate) async fn entries(&self) -> Vec<ChangelogEntry> {
        self.inner().list_changelog_entries(TABLE).await.unwrap()
    }
}

#[async_trait]
impl Database for TestDb {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.inner().execute(sql).await
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.inner().execute_batch(sql).await
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.inner().relation_exists(name).await
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.inner().query_count(sql).await
    }

    async fn query_one(&self, sql: &str) -> DbResult<Option<String>> {
        self.inner().query_one(sql).await
    }

    fn db_type(&self) -> &'static str {
        "test"
    }

    async fn insert_changelog_entry(&self, table: &str, entry: &ChangelogEntry) -> DbResult<()> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(DbError::ExecutionError("insert refused".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner().insert_changelog_entry(table, entry).await
    }

    async fn remove_changelog_entries(&self, table: &str, id: &MigrationId) -> DbResult<usize> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(DbError::ExecutionError("delete refused".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner().remove_changelog_entries(table, id).await
    }

    async fn list_changelog_entries(&self, table: &str) -> DbResult<Vec<ChangelogEntry>> {
        self.inner().list_changelog_entries(table).await
    }
}

/// Catalog whose listing always fails
pub(crate) struct BrokenCatalog;

impl Catalog for BrokenCatalog {
    fn list_identifiers(&self) -> CatalogResult<Vec<MigrationId>> {
        Err(CatalogError::Io {
            path: "migrations".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        })
    }

    fn load_unit(&self, id: &MigrationId) -> CatalogResult<MigrationUnit> {
        Err(CatalogError::NotFound { id: id.clone() })
    }
}

pub(crate) fn migrator(catalog: MemoryCatalog, db: &Arc<TestDb>) -> Migrator {
    Migrator::new(Arc::new(catalog), db.clone(), TABLE)
}
