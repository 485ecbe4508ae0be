use super::*;
use crate::action::Action;
use crate::catalog::MemoryCatalog;
use crate::error::CatalogError;
use crate::test_utils::*;
use crate::unit::MigrationUnit;
use std::sync::atomic::Ordering;
use tm_core::ChangelogEntry;
use tm_db::Database;

fn ids(list: &[MigrationId]) -> Vec<&str> {
    list.iter().map(|id| id.as_str()).collect()
}

fn abc(calls: &Calls) -> MemoryCatalog {
    MemoryCatalog::new()
        .with("A", recording_unit(calls, "A"))
        .with("B", recording_unit(calls, "B"))
        .with("C", recording_unit(calls, "C"))
}

async fn seed(db: &TestDb, id: &str) {
    db.insert_changelog_entry(TABLE, &ChangelogEntry::now(MigrationId::new(id), Method::Up))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_up_nothing_pending() {
    let db = TestDb::new();
    let m = migrator(MemoryCatalog::new(), &db);

    let migrated = m.up().await.unwrap();
    assert!(migrated.is_empty());
    assert_eq!(db.writes.load(Ordering::SeqCst), 0);
    assert!(db.ids().await.is_empty());
}

#[tokio::test]
async fn test_up_applies_all_pending_in_order() {
    let calls = Calls::default();
    let db = TestDb::new();
    let catalog = MemoryCatalog::new()
        .with("C", recording_unit(&calls, "C"))
        .with("A", recording_unit(&calls, "A"))
        .with("B", recording_unit(&calls, "B"));
    let m = migrator(catalog, &db);

    let migrated = m.up().await.unwrap();
    assert_eq!(ids(&migrated), vec!["A", "B", "C"]);
    assert_eq!(calls.get(), vec!["up:A", "up:B", "up:C"]);

    let entries = db.entries().await;
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.method == Method::Up));
}

#[tokio::test]
async fn test_up_skips_applied() {
    let calls = Calls::default();
    let db = TestDb::new();
    seed(&db, "A").await;
    let m = migrator(abc(&calls), &db);

    let migrated = m.up().await.unwrap();
    assert_eq!(ids(&migrated), vec!["B", "C"]);
    assert_eq!(calls.get(), vec!["up:B", "up:C"]);
}

#[tokio::test]
async fn test_up_second_call_is_noop() {
    let calls = Calls::default();
    let db = TestDb::new();
    let m = migrator(abc(&calls), &db);

    m.up().await.unwrap();
    let again = m.up().await.unwrap();
    assert!(again.is_empty());
    assert_eq!(calls.get().len(), 3);
    assert_eq!(db.ids().await.len(), 3);
}

#[tokio::test]
async fn test_up_stops_at_first_failure() {
    let calls = Calls::default();
    let db = TestDb::new();
    let catalog = MemoryCatalog::new()
        .with("A", recording_unit(&calls, "A"))
        .with("B", failing_up_unit(&calls, "B"))
        .with("C", recording_unit(&calls, "C"));
    let m = migrator(catalog, &db);

    let err = m.up().await.unwrap_err();
    assert_eq!(ids(&err.completed), vec!["A"]);
    assert_eq!(err.error.id().map(|id| id.as_str()), Some("B"));
    assert!(matches!(
        err.error,
        MigrateError::ActionFailure {
            direction: Direction::Up,
            ..
        }
    ));
    assert!(err.to_string().contains("Could not migrate up B"));
    assert_eq!(calls.get(), vec!["up:A", "up:B"]);
    assert_eq!(db.ids().await, vec!["A"]);
}

#[tokio::test]
async fn test_up_changelog_write_failure() {
    let calls = Calls::default();
    let db = TestDb::new();
    db.fail_insert.store(true, Ordering::SeqCst);
    let m = migrator(abc(&calls), &db);

    let err = m.up().await.unwrap_err();
    assert!(err.completed.is_empty());
    assert!(matches!(
        err.error,
        MigrateError::PersistenceFailure { ref id, .. } if id == "A"
    ));
    // The action ran; it is not rolled back
    assert_eq!(calls.get(), vec!["up:A"]);
    assert!(db.ids().await.is_empty());
}

#[tokio::test]
async fn test_up_awaits_signaled_completion() {
    let calls = Calls::default();
    let db = TestDb::new();
    let catalog = MemoryCatalog::new()
        .with("A", deferred_unit(&calls, "A"))
        .with("B", recording_unit(&calls, "B"));
    let m = migrator(catalog, &db);

    let migrated = m.up().await.unwrap();
    assert_eq!(ids(&migrated), vec!["A", "B"]);
    assert_eq!(calls.get(), vec!["up:A", "up:B"]);
}

#[tokio::test]
async fn test_up_dropped_done_handle_fails() {
    let db = TestDb::new();
    let catalog = MemoryCatalog::new().with(
        "A",
        MigrationUnit::new(Action::signaled(|_db, done| drop(done))),
    );
    let m = migrator(catalog, &db);

    let err = m.up().await.unwrap_err();
    assert!(err.completed.is_empty());
    assert!(err.to_string().contains("never signalled"));
    assert!(db.ids().await.is_empty());
}

#[tokio::test]
async fn test_up_catalog_error_passes_through() {
    let db = TestDb::new();
    let m = Migrator::new(Arc::new(BrokenCatalog), db.clone(), TABLE);

    let err = m.up().await.unwrap_err();
    assert!(err.completed.is_empty());
    assert!(matches!(
        err.error,
        MigrateError::Catalog(CatalogError::Io { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_up_applies_once() {
    let calls = Calls::default();
    let db = TestDb::new();
    let m = migrator(abc(&calls), &db);

    let (first, second) = tokio::join!(m.up(), m.up());
    let total = first.unwrap().len() + second.unwrap().len();
    assert_eq!(total, 3);
    assert_eq!(calls.get().len(), 3);
    assert_eq!(db.ids().await.len(), 3);
}

#[tokio::test]
async fn test_down_reverts_latest_only() {
    let calls = Calls::default();
    let db = TestDb::new();
    seed(&db, "A").await;
    seed(&db, "B").await;
    let m = migrator(abc(&calls), &db);

    let reverted = m.down(1).await.unwrap();
    assert_eq!(ids(&reverted), vec!["B"]);
    assert_eq!(calls.get(), vec!["down:B"]);
    assert_eq!(db.ids().await, vec!["A"]);
}

#[tokio::test]
async fn test_down_reverts_descending() {
    let calls = Calls::default();
    let db = TestDb::new();
    let m = migrator(abc(&calls), &db);
    m.up().await.unwrap();

    let reverted = m.down(2).await.unwrap();
    assert_eq!(ids(&reverted), vec!["C", "B"]);
    assert_eq!(db.ids().await, vec!["A"]);
}

#[tokio::test]
async fn test_down_count_bounds() {
    let calls = Calls::default();
    let db = TestDb::new();
    let m = migrator(abc(&calls), &db);

    assert!(m.down(1).await.unwrap().is_empty());

    m.up().await.unwrap();
    assert!(m.down(0).await.unwrap().is_empty());
    assert_eq!(db.ids().await.len(), 3);

    let reverted = m.down(10).await.unwrap();
    assert_eq!(ids(&reverted), vec!["C", "B", "A"]);
    assert!(db.ids().await.is_empty());
}

#[tokio::test]
async fn test_down_missing_reverse_action() {
    let calls = Calls::default();
    let db = TestDb::new();
    seed(&db, "A").await;
    let catalog = MemoryCatalog::new().with("A", up_only_unit(&calls, "A"));
    let m = migrator(catalog, &db);

    let err = m.down(1).await.unwrap_err();
    assert!(err.completed.is_empty());
    assert!(matches!(
        err.error,
        MigrateError::MissingDownAction { ref id } if id == "A"
    ));
    assert!(calls.get().is_empty());
    assert_eq!(db.ids().await, vec!["A"]);
}

#[tokio::test]
async fn test_down_stops_at_first_failure() {
    let calls = Calls::default();
    let db = TestDb::new();
    let catalog = MemoryCatalog::new()
        .with("A", recording_unit(&calls, "A"))
        .with("B", failing_down_unit(&calls, "B"))
        .with("C", recording_unit(&calls, "C"));
    let m = migrator(catalog, &db);
    m.up().await.unwrap();

    let err = m.down(3).await.unwrap_err();
    assert_eq!(ids(&err.completed), vec!["C"]);
    assert!(err.to_string().contains("Could not migrate down B"));
    assert_eq!(db.ids().await, vec!["A", "B"]);
}

#[tokio::test]
async fn test_down_changelog_delete_failure() {
    let calls = Calls::default();
    let db = TestDb::new();
    let m = migrator(abc(&calls), &db);
    m.up().await.unwrap();
    db.fail_remove.store(true, Ordering::SeqCst);

    let err = m.down(1).await.unwrap_err();
    assert!(err.completed.is_empty());
    assert!(matches!(
        err.error,
        MigrateError::PersistenceFailure { ref id, .. } if id == "C"
    ));
    assert_eq!(db.ids().await.len(), 3);
}

#[tokio::test]
async fn test_status_report_lists_orphans() {
    let calls = Calls::default();
    let db = TestDb::new();
    seed(&db, "A").await;
    seed(&db, "Z").await;
    let catalog = MemoryCatalog::new()
        .with("A", recording_unit(&calls, "A"))
        .with("B", recording_unit(&calls, "B"));
    let m = migrator(catalog, &db);

    let report = m.status_report().await.unwrap();
    assert_eq!(report.items.len(), 2);
    assert!(!report.items[0].is_pending());
    assert!(report.items[1].is_pending());
    assert_eq!(report.orphaned.len(), 1);
    assert_eq!(report.orphaned[0].file_name, "Z");
}
