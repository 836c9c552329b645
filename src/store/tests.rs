use std::collections::HashSet;

use super::*;
use crate::day::FixedClock;
use crate::export::ImportData;
use crate::models::{StreakData, TaskPatch, TaskStatus};
use crate::storage::MemoryStore;
use crate::undo::UndoStack;

fn store_on(clock: &FixedClock) -> TaskStore<MemoryStore, &FixedClock> {
    TaskStore::new(MemoryStore::new(), clock)
}

fn ids(tasks: &[Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.id).collect()
}

/// Every starred task precedes every non-starred one.
fn assert_partitioned(tasks: &[Task]) {
    let boundary = tasks.iter().position(|t| !t.starred).unwrap_or(tasks.len());
    assert!(
        tasks[boundary..].iter().all(|t| !t.starred),
        "starred task after the boundary: {:?}",
        tasks.iter().map(|t| (t.id, t.starred)).collect::<Vec<_>>()
    );
}

#[test]
fn test_add_assigns_distinct_ids() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);

    for i in 0..25 {
        store.add_task(&format!("task {}", i)).unwrap();
    }

    let today = store.today();
    assert_eq!(today.len(), 25);
    let unique: HashSet<u64> = ids(&today).into_iter().collect();
    assert_eq!(unique.len(), 25);
    assert!(today.iter().all(|t| !t.starred && t.status == TaskStatus::Active));
}

#[test]
fn test_add_rejects_blank_text() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);

    assert!(store.add_task("   ").is_none());
    assert!(store.today().is_empty());
    assert_eq!(store.add_task("  Trim me  ").unwrap().text, "Trim me");
}

#[test]
fn test_ids_stay_unique_across_collections() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);

    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    store.archive_task(a.id);
    store.move_to_backlog(b.id);
    let c = store.add_task("C").unwrap();

    assert!(c.id > a.id && c.id > b.id);
}

#[test]
fn test_add_after_importing_the_largest_id() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    store.import_data(ImportData {
        tasks: Some(vec![Task::new(u64::MAX, "Imported", clock.now())]),
        archive: None,
    });

    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    assert_eq!(a.id, 1);
    assert_eq!(b.id, 2);
    let unique: HashSet<u64> = ids(&store.today()).into_iter().collect();
    assert_eq!(unique.len(), 3);
}

#[test]
fn test_undo_renumbers_next_to_the_largest_id() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    store.import_data(ImportData {
        tasks: None,
        archive: Some(vec![Task::new(u64::MAX, "Imported", clock.now())]),
    });

    let a = store.add_task("A").unwrap();
    let deleted = store.delete_from(Collection::Today, a.id).unwrap();
    let b = store.add_task("B").unwrap();
    assert_eq!(a.id, b.id);

    let restored = store.restore_deleted(deleted).unwrap();
    assert_ne!(restored.id, b.id);
    assert_ne!(restored.id, u64::MAX);
    assert_eq!(ids(&store.today()), vec![b.id, restored.id]);
}

#[test]
fn test_id_is_timestamp_derived() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);

    let task = store.add_task("A").unwrap();
    assert_eq!(task.id, clock.now().timestamp_millis() as u64);
}

#[test]
fn test_update_task_merges_patch() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let task = store.add_task("Draft").unwrap();

    let updated = store.update_task(task.id, TaskPatch::text("Final")).unwrap();
    assert_eq!(updated.text, "Final");
    assert_eq!(updated.created_at, task.created_at);
    assert!(store.update_task(999, TaskPatch::text("x")).is_none());
}

#[test]
fn test_update_star_respects_cap() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    store.save_settings(Settings {
        max_focus_tasks: 1,
        auto_reset_focus: false,
    });
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();

    let patch = TaskPatch {
        starred: Some(true),
        ..TaskPatch::default()
    };
    assert!(store.update_task(a.id, patch.clone()).unwrap().starred);
    assert!(!store.update_task(b.id, patch).unwrap().starred);
    assert_eq!(store.focus_count(), 1);
    assert_partitioned(&store.today());
}

#[test]
fn test_status_patch_cannot_free_a_focus_slot_while_starred() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    store.save_settings(Settings {
        max_focus_tasks: 1,
        auto_reset_focus: false,
    });
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();

    assert_eq!(store.toggle_star(a.id), StarOutcome::Starred);
    let done = TaskPatch {
        status: Some(TaskStatus::Done),
        ..TaskPatch::default()
    };
    let a = store.update_task(a.id, done).unwrap();
    assert_eq!(a.status, TaskStatus::Done);
    assert!(!a.starred);

    assert_eq!(store.toggle_star(b.id), StarOutcome::Starred);
    let today = store.today();
    assert_eq!(today.iter().filter(|t| t.starred).count(), 1);
    assert_eq!(ids(&today), vec![b.id, a.id]);
    assert_partitioned(&today);
}

#[test]
fn test_starred_inactive_task_holds_its_slot() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    store.save_settings(Settings {
        max_focus_tasks: 1,
        auto_reset_focus: false,
    });
    let mut a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    a.starred = true;
    a.status = TaskStatus::Done;
    store.save(Collection::Today, &[a.clone(), b.clone()]);

    assert_eq!(store.focus_count(), 1);
    assert!(store.focus_tasks().is_empty());
    assert_eq!(store.toggle_star(b.id), StarOutcome::FocusFull);
}

#[test]
fn test_delete_returns_snapshot() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let task = store.add_task("Gone").unwrap();

    assert_eq!(store.delete_task(task.id), Some(task));
    assert!(store.today().is_empty());
    assert_eq!(store.delete_task(12345), None);
}

#[test]
fn test_star_moves_to_front_and_unstar_to_partition_start() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    let c = store.add_task("C").unwrap();

    assert_eq!(store.toggle_star(c.id), StarOutcome::Starred);
    assert_eq!(ids(&store.today()), vec![c.id, a.id, b.id]);

    assert_eq!(store.toggle_star(b.id), StarOutcome::Starred);
    assert_eq!(ids(&store.today()), vec![b.id, c.id, a.id]);

    assert_eq!(store.toggle_star(b.id), StarOutcome::Unstarred);
    assert_eq!(ids(&store.today()), vec![c.id, b.id, a.id]);
    assert_partitioned(&store.today());

    assert_eq!(store.toggle_star(404), StarOutcome::NotFound);
}

#[test]
fn test_unstar_last_when_everything_starred() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    store.toggle_star(a.id);
    store.toggle_star(b.id);

    assert_eq!(store.toggle_star(b.id), StarOutcome::Unstarred);
    assert_eq!(ids(&store.today()), vec![a.id, b.id]);
}

#[test]
fn test_focus_full_rejects_without_mutation() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let tasks: Vec<Task> = (0..8).map(|i| store.add_task(&format!("t{}", i)).unwrap()).collect();

    for task in &tasks[..6] {
        assert_eq!(store.toggle_star(task.id), StarOutcome::Starred);
    }
    let before = store.today();

    assert_eq!(store.toggle_star(tasks[6].id), StarOutcome::FocusFull);
    assert_eq!(store.today(), before);
    assert_eq!(store.focus_count(), 6);
    assert!(!store.can_add_focus());
}

#[test]
fn test_invariants_hold_over_mixed_sequence() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    store.save_settings(Settings {
        max_focus_tasks: 3,
        auto_reset_focus: false,
    });

    let tasks: Vec<Task> = (0..10).map(|i| store.add_task(&format!("t{}", i)).unwrap()).collect();
    for (step, task) in tasks.iter().enumerate() {
        store.toggle_star(task.id);
        if step % 3 == 0 {
            store.toggle_star(tasks[step / 2].id);
        }
        if step % 4 == 1 {
            store.move_down(task.id);
        }
        let today = store.today();
        assert!(store.focus_count() <= 3);
        assert_partitioned(&today);
    }
}

#[test]
fn test_reorder_within_and_across_partition() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    let c = store.add_task("C").unwrap();
    let d = store.add_task("D").unwrap();
    let e = store.add_task("E").unwrap();
    // [A*, B*, C*, D, E]
    store.toggle_star(c.id);
    store.toggle_star(b.id);
    store.toggle_star(a.id);
    assert_eq!(ids(&store.today()), vec![a.id, b.id, c.id, d.id, e.id]);

    let before = store.today();
    assert_eq!(store.reorder(b.id, d.id), ReorderOutcome::CrossPartition);
    assert_eq!(store.today(), before);

    assert_eq!(store.reorder(b.id, a.id), ReorderOutcome::Moved);
    assert_eq!(ids(&store.today()), vec![b.id, a.id, c.id, d.id, e.id]);

    assert_eq!(store.reorder(e.id, d.id), ReorderOutcome::Moved);
    assert_eq!(ids(&store.today()), vec![b.id, a.id, c.id, e.id, d.id]);

    assert_eq!(store.reorder(a.id, a.id), ReorderOutcome::Unchanged);
    assert_eq!(store.reorder(a.id, 999), ReorderOutcome::NotFound);
}

#[test]
fn test_move_up_down_stop_at_partition_edge() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    let c = store.add_task("C").unwrap();
    store.toggle_star(a.id);
    // [A*, B, C]

    assert_eq!(store.move_down(a.id), ReorderOutcome::Unchanged);
    assert_eq!(store.move_up(b.id), ReorderOutcome::Unchanged);
    assert_eq!(store.move_up(c.id), ReorderOutcome::Moved);
    assert_eq!(ids(&store.today()), vec![a.id, c.id, b.id]);
    assert_eq!(store.move_down(b.id), ReorderOutcome::Unchanged);
    assert_eq!(store.move_up(a.id), ReorderOutcome::Unchanged);
}

#[test]
fn test_archive_then_restore_round_trip() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let task = store.add_task("Finish").unwrap();
    store.toggle_star(task.id);

    let archived = store.archive_task(task.id).unwrap();
    assert_eq!(archived.status, TaskStatus::Done);
    assert_eq!(archived.completed_at, Some(clock.now()));
    assert_eq!(archived.archived_at, Some(clock.now()));
    assert!(store.today().is_empty());

    assert!(store.restore_from_archive(task.id));
    let restored = store.find_today(task.id).unwrap();
    assert!(!restored.starred);
    assert_eq!(restored.status, TaskStatus::Active);
    assert!(restored.archived_at.is_none());
    assert!(restored.completed_at.is_none());
    assert!(store.archive().is_empty());
}

#[test]
fn test_archive_missing_id_is_noop() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    assert!(store.archive_task(1).is_none());
    assert_eq!(store.streak(), StreakData::default());
}

#[test]
fn test_backlog_round_trip() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("Later").unwrap();
    let b = store.add_task("Now").unwrap();
    store.toggle_star(a.id);

    assert!(store.move_to_backlog(a.id));
    assert!(!store.move_to_backlog(a.id));
    let parked = &store.backlog()[0];
    assert_eq!(parked.moved_to_backlog_at, Some(clock.now()));
    assert!(parked.starred);

    assert!(store.restore_from_backlog(a.id));
    assert!(store.backlog().is_empty());
    let today = store.today();
    assert_eq!(ids(&today), vec![b.id, a.id]);
    assert!(!today[1].starred);
    assert!(today[1].moved_to_backlog_at.is_none());
}

#[test]
fn test_restore_searches_backlog_then_archive() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    store.move_to_backlog(a.id);
    store.archive_task(b.id);

    assert_eq!(store.restore(b.id), Some(Collection::Archive));
    assert_eq!(store.restore(a.id), Some(Collection::Backlog));
    assert_eq!(store.restore(a.id), None);
}

#[test]
fn test_archive_sorted_newest_first() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    store.archive_task(a.id);
    clock.advance(chrono::Duration::minutes(5));
    store.archive_task(b.id);

    assert_eq!(ids(&store.archive()), vec![b.id, a.id]);
}

#[test]
fn test_streak_continues_and_resets_after_gap() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);

    let t = store.add_task("d1").unwrap();
    store.archive_task(t.id);
    assert_eq!(store.streak().current_streak, 1);

    let t = store.add_task("d1 again").unwrap();
    store.archive_task(t.id);
    assert_eq!(store.streak().current_streak, 1);

    clock.advance_days(1);
    let t = store.add_task("d2").unwrap();
    store.archive_task(t.id);
    assert_eq!(store.streak().current_streak, 2);

    clock.advance_days(1);
    assert_eq!(store.effective_streak(), 2);

    clock.advance_days(1);
    assert_eq!(store.effective_streak(), 0);
    let t = store.add_task("d4").unwrap();
    store.archive_task(t.id);

    let streak = store.streak();
    assert_eq!(streak.current_streak, 1);
    assert_eq!(streak.total_completed, 3);
    assert_eq!(streak.last_streak_date, Some(clock.today()));
}

#[test]
fn test_daily_progress_counts_today_only() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();
    store.archive_task(a.id);

    clock.advance_days(1);
    let b = store.add_task("B").unwrap();
    let c = store.add_task("C").unwrap();
    store.archive_task(b.id);
    store.archive_task(c.id);

    let progress = store.daily_progress();
    assert_eq!(progress.completed_today, 2);
    assert_eq!(progress.target, 6);
}

#[test]
fn test_auto_reset_runs_once_per_day() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    store.toggle_star(a.id);
    store.toggle_star(b.id);

    assert_eq!(store.auto_reset_focus(), 0, "disabled by default");
    assert_eq!(store.focus_count(), 2);

    store.save_settings(Settings {
        max_focus_tasks: 6,
        auto_reset_focus: true,
    });
    assert_eq!(store.auto_reset_focus(), 2);
    assert_eq!(store.focus_count(), 0);

    store.toggle_star(a.id);
    assert_eq!(store.auto_reset_focus(), 0);
    assert_eq!(store.focus_count(), 1);

    clock.advance_days(1);
    assert_eq!(store.auto_reset_focus(), 1);
    assert_eq!(store.storage().raw(LAST_RESET_KEY), Some("2025-04-02"));
}

#[test]
fn test_settings_persist_and_reload() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    store.save_settings(Settings {
        max_focus_tasks: 0,
        auto_reset_focus: true,
    });
    assert_eq!(store.settings().max_focus_tasks, 1);

    let raw = store.storage().raw(SETTINGS_KEY).unwrap().to_string();
    let reopened = TaskStore::new(MemoryStore::new().with_entry(SETTINGS_KEY, &raw), &clock);
    assert_eq!(reopened.settings().max_focus_tasks, 1);
    assert!(reopened.settings().auto_reset_focus);
}

#[test]
fn test_corrupt_document_reads_as_empty() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let storage = MemoryStore::new()
        .with_entry(TASKS_KEY, "{not json")
        .with_entry(STREAK_KEY, "42");
    let mut store = TaskStore::new(storage, &clock);

    assert!(store.today().is_empty());
    assert_eq!(store.streak(), StreakData::default());
    assert!(store.add_task("Fresh start").is_some());
    assert_eq!(store.today().len(), 1);
}

#[test]
fn test_failed_write_degrades_silently() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();

    store.storage_mut().set_fail_writes(true);
    assert!(store.add_task("B").is_some());
    assert!(store.archive_task(a.id).is_none(), "destination write failed");
    assert!(!store.save_settings(Settings::default()));

    store.storage_mut().set_fail_writes(false);
    assert_eq!(ids(&store.today()), vec![a.id]);
    assert!(store.archive().is_empty());
}

#[test]
fn test_undo_delete_appends_to_origin() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let mut undo = UndoStack::new(10);
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    let c = store.add_task("C").unwrap();
    store.move_to_backlog(c.id);

    undo.push(store.delete_from(Collection::Today, a.id).unwrap());
    undo.push(store.delete_from(Collection::Backlog, c.id).unwrap());
    assert!(store.delete_from(Collection::Archive, b.id).is_none());

    let restored = store.restore_deleted(undo.pop().unwrap()).unwrap();
    assert_eq!(restored.id, c.id);
    assert_eq!(ids(&store.backlog()), vec![c.id]);

    store.restore_deleted(undo.pop().unwrap()).unwrap();
    assert_eq!(ids(&store.today()), vec![b.id, a.id]);
    assert!(undo.is_empty());
}

#[test]
fn test_undo_starred_delete_keeps_partition() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    store.save_settings(Settings {
        max_focus_tasks: 2,
        auto_reset_focus: false,
    });
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    let c = store.add_task("C").unwrap();
    let d = store.add_task("D").unwrap();
    store.toggle_star(a.id);
    store.toggle_star(b.id);

    let deleted = store.delete_from(Collection::Today, a.id).unwrap();
    let restored = store.restore_deleted(deleted).unwrap();
    assert!(restored.starred);
    assert_eq!(ids(&store.today()), vec![b.id, a.id, c.id, d.id]);

    let deleted = store.delete_from(Collection::Today, a.id).unwrap();
    store.toggle_star(c.id);
    let restored = store.restore_deleted(deleted).unwrap();
    assert!(!restored.starred, "focus was full");
    assert_partitioned(&store.today());
    assert_eq!(store.focus_count(), 2);
}

#[test]
fn test_undo_renumbers_reused_id() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();
    let deleted = store.delete_from(Collection::Today, a.id).unwrap();
    let b = store.add_task("B").unwrap();
    assert_eq!(a.id, b.id, "fixed clock hands out the same id again");

    let restored = store.restore_deleted(deleted).unwrap();
    assert_ne!(restored.id, b.id);
    let unique: HashSet<u64> = ids(&store.today()).into_iter().collect();
    assert_eq!(unique.len(), 2);
}

#[test]
fn test_bulk_operations() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    store.add_task("C").unwrap();
    store.toggle_star(a.id);
    store.toggle_star(b.id);

    assert_eq!(store.delete_non_starred(), 1);
    assert_eq!(store.clear_all_stars(), 2);
    assert_eq!(store.focus_count(), 0);
    assert_eq!(store.other_tasks().len(), 2);

    store.move_to_backlog(a.id);
    store.archive_task(b.id);
    assert!(store.clear_backlog());
    assert!(store.clear_archive());
    assert!(store.backlog().is_empty() && store.archive().is_empty());
}

#[test]
fn test_edit_in_backlog_and_archive() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    let a = store.add_task("A").unwrap();
    let b = store.add_task("B").unwrap();
    store.move_to_backlog(a.id);
    store.archive_task(b.id);

    assert_eq!(store.update_backlog_task(a.id, TaskPatch::text("A2")).unwrap().text, "A2");
    assert_eq!(store.update_archive_task(b.id, TaskPatch::text("B2")).unwrap().text, "B2");
    assert!(store.update_backlog_task(b.id, TaskPatch::text("x")).is_none());
}

#[test]
fn test_onboarding_flag() {
    let clock = FixedClock::at_day(2025, 4, 1);
    let mut store = store_on(&clock);
    assert!(!store.onboarding_seen());
    store.mark_onboarding_seen();
    assert!(store.onboarding_seen());
}
