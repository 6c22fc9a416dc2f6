use crate::tests::{business, id};
use crate::{Applied, EngineCommand, ReconciliationEngine, RemoteChange};

fn names(engine: &ReconciliationEngine) -> Vec<&str> {
    engine.records().iter().map(|r| r.name.as_str()).collect()
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn given_empty_fetch_when_initialize_then_empty_notice_shown() {
    let mut engine = ReconciliationEngine::new();
    assert!(engine.is_loading());
    assert!(!engine.snapshot().shows_empty_notice());

    let applied = engine.initialize(vec![]);

    assert_eq!(applied, Applied::Changed);
    assert!(engine.is_empty());
    assert!(!engine.is_loading());
    assert!(engine.snapshot().shows_empty_notice());
}

#[test]
fn given_empty_list_when_local_insert_then_list_contains_record() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![]);

    engine.apply_local_insert(business(0xA, "Cafe", 1));

    assert_eq!(engine.snapshot().ids(), vec![id(0xA)]);
}

#[test]
fn given_two_records_when_remote_update_then_order_and_length_kept() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(0xA, "a", 2), business(0xB, "b", 1)]);

    let applied = engine.on_remote_update(business(0xB, "b-prime", 1));

    assert_eq!(applied, Applied::Changed);
    assert_eq!(names(&engine), vec!["a", "b-prime"]);
    assert_eq!(engine.len(), 2);
}

#[test]
fn given_two_records_when_remote_delete_then_stale_update_ignored() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(0xA, "a", 2), business(0xB, "b", 1)]);

    engine.on_remote_delete(id(0xA));
    assert_eq!(names(&engine), vec!["b"]);

    let applied = engine.on_remote_update(business(0xA, "a-stale", 2));

    assert_eq!(applied, Applied::Unchanged);
    assert_eq!(names(&engine), vec!["b"]);
}

// =========================================================================
// Idempotence and convergence
// =========================================================================

#[test]
fn given_remote_insert_when_repeated_then_single_entry() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![]);

    assert_eq!(engine.on_remote_insert(business(1, "Cafe", 0)), Applied::Changed);
    assert_eq!(engine.on_remote_insert(business(1, "Cafe", 0)), Applied::Unchanged);

    assert_eq!(engine.len(), 1);
}

#[test]
fn given_local_insert_when_remote_echo_arrives_then_single_entry() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![]);

    engine.apply_local_insert(business(1, "Cafe", 0));
    engine.on_remote_insert(business(1, "Cafe", 0));

    assert_eq!(engine.len(), 1);
}

#[test]
fn given_remote_echo_first_when_local_insert_then_single_entry() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![]);

    engine.on_remote_insert(business(1, "Cafe", 0));
    let applied = engine.apply_local_insert(business(1, "Cafe", 0));

    assert_eq!(applied, Applied::Unchanged);
    assert_eq!(engine.len(), 1);
}

#[test]
fn given_equivalent_update_when_applied_again_then_unchanged() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "Cafe", 0)]);

    assert_eq!(engine.apply_local_update(business(1, "Bistro", 0)), Applied::Changed);
    let revision = engine.revision();
    assert_eq!(engine.on_remote_update(business(1, "Bistro", 0)), Applied::Unchanged);

    assert_eq!(engine.revision(), revision);
    assert_eq!(names(&engine), vec!["Bistro"]);
}

#[test]
fn given_unknown_id_when_update_then_no_op() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "Cafe", 0)]);

    let applied = engine.apply_local_update(business(2, "Ghost", 0));

    assert_eq!(applied, Applied::Unchanged);
    assert_eq!(engine.len(), 1);
}

#[test]
fn given_absent_id_when_delete_then_no_op() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "Cafe", 0)]);

    assert_eq!(engine.apply_local_delete(id(2)), Applied::Unchanged);
    assert_eq!(engine.len(), 1);
}

// =========================================================================
// Tombstones
// =========================================================================

#[test]
fn given_deleted_record_when_stale_insert_then_stays_absent() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "Cafe", 0)]);

    engine.apply_local_delete(id(1));
    let applied = engine.on_remote_insert(business(1, "Cafe", 0));

    assert_eq!(applied, Applied::Unchanged);
    assert!(!engine.contains(id(1)));
    assert!(engine.is_deleted(id(1)));
}

#[test]
fn given_delete_overtakes_insert_when_insert_arrives_then_stays_absent() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![]);

    engine.on_remote_delete(id(1));
    engine.apply_local_insert(business(1, "Cafe", 0));

    assert!(engine.is_empty());
}

#[test]
fn given_deleted_id_when_refetch_contains_it_then_filtered_out() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "a", 1), business(2, "b", 0)]);
    engine.on_remote_delete(id(1));

    engine.initialize(vec![business(1, "a", 1), business(2, "b", 0)]);

    assert_eq!(names(&engine), vec!["b"]);
}

// =========================================================================
// Ordering
// =========================================================================

#[test]
fn given_unsorted_fetch_when_initialize_then_sorted_newest_first() {
    let mut engine = ReconciliationEngine::new();

    engine.initialize(vec![
        business(1, "old", 0),
        business(2, "newest", 9),
        business(3, "middle", 4),
    ]);

    assert_eq!(names(&engine), vec!["newest", "middle", "old"]);
}

#[test]
fn given_duplicate_ids_when_initialize_then_first_occurrence_kept() {
    let mut engine = ReconciliationEngine::new();

    engine.initialize(vec![business(1, "first", 0), business(1, "second", 0)]);

    assert_eq!(names(&engine), vec!["first"]);
}

#[test]
fn given_identical_timestamps_when_inserted_then_ordered_by_id() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![]);

    engine.on_remote_insert(business(3, "c", 5));
    engine.on_remote_insert(business(1, "a", 5));
    engine.on_remote_insert(business(2, "b", 5));

    assert_eq!(names(&engine), vec!["a", "b", "c"]);
}

#[test]
fn given_older_remote_insert_when_applied_then_placed_by_timestamp() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "new", 10), business(2, "old", 0)]);

    engine.on_remote_insert(business(3, "mid", 5));

    assert_eq!(names(&engine), vec!["new", "mid", "old"]);
}

#[test]
fn given_update_with_moved_timestamp_when_applied_then_repositioned() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "a", 10), business(2, "b", 5)]);

    engine.on_remote_update(business(1, "a", 1));

    assert_eq!(names(&engine), vec!["b", "a"]);
}

// =========================================================================
// Changes racing a full fetch
// =========================================================================

#[test]
fn given_insert_while_loading_when_fetch_lacks_it_then_replayed() {
    let mut engine = ReconciliationEngine::new();
    engine.on_remote_insert(business(2, "late", 5));

    engine.initialize(vec![business(1, "a", 0)]);

    assert_eq!(names(&engine), vec!["late", "a"]);
    assert!(!engine.is_refetching());
}

#[test]
fn given_update_while_loading_when_fetch_has_old_row_then_update_wins() {
    let mut engine = ReconciliationEngine::new();
    engine.on_remote_update(business(1, "renamed", 0));

    engine.initialize(vec![business(1, "a", 0)]);

    assert_eq!(names(&engine), vec!["renamed"]);
}

#[test]
fn given_refetch_when_local_insert_confirmed_meanwhile_then_kept() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "a", 0)]);

    engine.begin_refetch();
    engine.apply_local_insert(business(2, "mine", 3));
    assert_eq!(engine.len(), 2);
    engine.initialize(vec![business(1, "a", 0)]);

    assert_eq!(names(&engine), vec!["mine", "a"]);
}

#[test]
fn given_refetch_when_delete_applied_meanwhile_then_fetched_row_dropped() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "a", 1), business(2, "b", 0)]);

    engine.begin_refetch();
    engine.on_remote_delete(id(2));
    engine.initialize(vec![business(1, "a", 1), business(2, "b", 0)]);

    assert_eq!(names(&engine), vec!["a"]);
}

#[test]
fn given_no_refetch_when_initialize_then_nothing_replayed() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![]);
    engine.on_remote_insert(business(1, "a", 0));

    engine.initialize(vec![]);

    assert!(engine.is_empty());
}

#[test]
fn given_failed_refetch_when_finish_loading_then_journal_dropped_and_list_kept() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "a", 0)]);
    engine.apply(EngineCommand::BeginRefetch);
    engine.on_remote_insert(business(2, "b", 1));

    assert_eq!(engine.apply(EngineCommand::FinishLoading), Applied::Unchanged);

    assert!(!engine.is_refetching());
    assert_eq!(names(&engine), vec!["b", "a"]);
}

// =========================================================================
// Loading, reset and notification
// =========================================================================

#[test]
fn given_failed_fetch_when_finish_loading_then_empty_and_not_loading() {
    let mut engine = ReconciliationEngine::new();

    assert_eq!(engine.finish_loading(), Applied::Changed);
    assert_eq!(engine.finish_loading(), Applied::Unchanged);

    let snapshot = engine.snapshot();
    assert!(!snapshot.is_loading());
    assert!(snapshot.shows_empty_notice());
}

#[test]
fn given_populated_engine_when_reset_then_empty_loading_and_tombstones_cleared() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "a", 0), business(2, "b", 1)]);
    engine.on_remote_delete(id(1));

    assert_eq!(engine.reset(), Applied::Changed);

    assert!(engine.is_empty());
    assert!(engine.is_loading());
    assert!(!engine.is_deleted(id(1)));
    assert_eq!(engine.reset(), Applied::Unchanged);
}

#[test]
fn given_subscriber_when_change_applied_then_snapshot_published() {
    let mut engine = ReconciliationEngine::new();
    let mut rx = engine.subscribe();
    assert!(rx.borrow_and_update().is_loading());

    engine.initialize(vec![business(1, "a", 0)]);

    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.revision(), engine.revision());
    assert_eq!(snapshot.find(id(1)).map(|r| r.name.as_str()), Some("a"));
}

#[test]
fn given_unchanged_operation_when_applied_then_no_notification() {
    let mut engine = ReconciliationEngine::new();
    engine.initialize(vec![business(1, "a", 0)]);
    let mut rx = engine.subscribe();
    rx.borrow_and_update();

    engine.on_remote_insert(business(1, "a", 0));
    engine.apply_local_delete(id(99));

    assert!(!rx.has_changed().unwrap());
}

#[test]
fn given_commands_when_applied_then_dispatch_to_operations() {
    let mut engine = ReconciliationEngine::new();

    engine.apply(EngineCommand::Initialize(vec![business(1, "a", 0)]));
    engine.apply(EngineCommand::LocalInsert(business(2, "b", 1)));
    engine.apply(EngineCommand::Remote(RemoteChange::Update(business(1, "a2", 0))));
    engine.apply(EngineCommand::Remote(RemoteChange::Delete(id(2))));
    assert_eq!(names(&engine), vec!["a2"]);

    engine.apply(EngineCommand::Reset);
    assert!(engine.is_loading());
    assert!(engine.is_empty());
}
