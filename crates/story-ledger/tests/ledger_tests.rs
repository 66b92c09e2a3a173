//! Integration tests for the line-preserving ledger editor

use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use rstest::rstest;
use story_fs::NormalizedPath;
use story_ledger::{BackupStore, Error, InsertOutcome, SprintLedger, UpdateOutcome};
use tempfile::TempDir;

const SAMPLE: &str = "development_status:\n  epic-1: in-progress\n  1-a-foo: ready-for-dev  # note\n";

const FULL: &str = "\
# generated: 2025-12-01
# last_verified: 2025-12-31 23:59:59
project: demo

development_status:
  # Epic 1: onboarding
  epic-1: in-progress
  1-a-foo: ready-for-dev  # note
  1-b-bar:   done    # shipped
  epic-1-retrospective: optional

  epic-2: backlog
  2-a-baz: backlog

other_section:
  1-a-foo: should-never-match
";

fn ledger(text: &str) -> SprintLedger {
    SprintLedger::from_content(NormalizedPath::new("sprint-status.yaml"), text.to_string())
}

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

#[test]
fn test_untouched_ledger_round_trips_exactly() {
    let ledger = ledger(FULL);
    assert_eq!(ledger.content(), FULL);
    assert!(!ledger.is_modified());
}

#[test]
fn test_find_entry_is_scoped_to_section() {
    let ledger = ledger(FULL);
    assert_eq!(ledger.find_entry("1-a-foo"), Some(7));
    assert_eq!(ledger.find_entry("project"), None);
    assert_eq!(ledger.status_of("1-b-bar").as_deref(), Some("done"));
}

#[test]
fn test_find_entry_matches_whole_key_only() {
    let ledger = ledger(SAMPLE);
    assert_eq!(ledger.find_entry("1-a"), None);
    assert_eq!(ledger.find_entry("a-foo"), None);
}

#[test]
fn test_first_occurrence_wins() {
    let ledger = ledger("development_status:\n  epic-1: done\n  1-a: done\n  1-a: backlog\n");
    assert_eq!(ledger.find_entry("1-a"), Some(2));
    assert_eq!(ledger.status_of("1-a").as_deref(), Some("done"));
}

#[test]
fn test_update_then_find_returns_new_status() {
    let mut ledger = ledger(FULL);

    let outcome = ledger.update_entry("1-a-foo", "done", None);

    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            previous: "ready-for-dev".into()
        }
    );
    assert_eq!(ledger.status_of("1-a-foo").as_deref(), Some("done"));
    assert_eq!(ledger.lines()[7], "  1-a-foo: done  # note");
    assert_eq!(ledger.updates_applied(), 1);
}

#[test]
fn test_repeated_update_is_a_no_op() {
    let mut ledger = ledger(FULL);
    ledger.update_entry("1-a-foo", "done", Some("Updated 2026-01-02"));
    let before = ledger.lines().to_vec();

    let outcome = ledger.update_entry("1-a-foo", "done", Some("Updated 2026-01-03"));

    assert_eq!(outcome, UpdateOutcome::Unchanged);
    assert_eq!(ledger.updates_applied(), 1);
    assert_eq!(ledger.lines(), before.as_slice());
}

#[test]
fn test_update_with_comment_replaces_comment() {
    let mut ledger = ledger(SAMPLE);

    ledger.update_entry("1-a-foo", "done", Some("Updated 2026-01-02"));

    assert_eq!(
        ledger.content(),
        "development_status:\n  epic-1: in-progress\n  1-a-foo: done  # Updated 2026-01-02\n"
    );
}

#[test]
fn test_update_preserves_other_lines_byte_for_byte() {
    let mut ledger = ledger(FULL);
    ledger.update_entry("1-b-bar", "review", None);

    let original: Vec<&str> = FULL.split('\n').collect();
    let updated = ledger.content();
    let updated: Vec<&str> = updated.split('\n').collect();

    assert_eq!(original.len(), updated.len());
    for (index, (old, new)) in original.iter().zip(&updated).enumerate() {
        if index == 8 {
            assert_eq!(*new, "  1-b-bar:   review    # shipped");
        } else {
            assert_eq!(old, new, "line {index} changed");
        }
    }
}

#[test]
fn test_update_missing_entry_reports_not_found() {
    let mut ledger = ledger(FULL);
    assert_eq!(
        ledger.update_entry("9-z-nope", "done", None),
        UpdateOutcome::NotFound
    );
    assert!(!ledger.is_modified());
}

#[test]
fn test_insert_goes_directly_after_epic_line() {
    let mut ledger = ledger(SAMPLE);

    let outcome = ledger.insert_entry("1-b-bar", "backlog", None);

    assert_eq!(outcome, InsertOutcome::Inserted { line: 2 });
    assert_eq!(
        ledger.content(),
        "development_status:\n  epic-1: in-progress\n  1-b-bar: backlog\n  1-a-foo: ready-for-dev  # note\n"
    );
    assert_eq!(ledger.updates_applied(), 1);
}

#[test]
fn test_insert_uses_epic_indentation_and_comment() {
    let mut ledger = ledger("development_status:\n    epic-3: backlog\n");

    ledger.insert_entry("3-a-new", "review", Some("Updated 2026-01-02"));

    assert_eq!(
        ledger.lines()[2],
        "    3-a-new: review  # Updated 2026-01-02"
    );
}

#[rstest]
#[case("H-1-hardening", InsertOutcome::NoEpicPrefix)]
#[case("5-a-orphan", InsertOutcome::EpicNotFound { epic_key: "epic-5".into() })]
#[case("1-a-foo", InsertOutcome::AlreadyPresent { line: 7 })]
#[case("1-c with space", InsertOutcome::InvalidKey)]
#[case("1-c:colon", InsertOutcome::InvalidKey)]
fn test_insert_failures(#[case] id: &str, #[case] expected: InsertOutcome) {
    let mut ledger = ledger(FULL);

    assert_eq!(ledger.insert_entry(id, "backlog", None), expected);
    assert_eq!(ledger.updates_applied(), 0);
    assert!(!ledger.is_modified());
}

#[rstest]
#[case("1-a-café")]
#[case("1-a-foo+x")]
#[case("1-a-(draft)")]
fn test_inserted_key_is_found_again(#[case] id: &str) {
    let mut ledger = ledger(SAMPLE);

    assert_eq!(
        ledger.insert_entry(id, "done", Some("Updated 2026-01-02")),
        InsertOutcome::Inserted { line: 2 }
    );

    assert_eq!(ledger.find_entry(id), Some(2));
    assert_eq!(ledger.status_of(id).as_deref(), Some("done"));
    assert_eq!(ledger.insert_entry(id, "done", None), InsertOutcome::AlreadyPresent { line: 2 });
    assert_eq!(ledger.update_entry(id, "done", None), UpdateOutcome::Unchanged);
    assert!(ledger.outline().malformed.is_empty());
}

#[test]
fn test_insert_under_epic_line_without_status() {
    let mut ledger = ledger("development_status:\n  epic-1:\n  1-a-foo: done\n");

    let outcome = ledger.insert_entry("1-b-bar", "backlog", None);

    assert_eq!(outcome, InsertOutcome::Inserted { line: 2 });
    assert_eq!(
        ledger.content(),
        "development_status:\n  epic-1:\n  1-b-bar: backlog\n  1-a-foo: done\n"
    );
}

#[test]
fn test_bare_epic_key_prefix_does_not_match_longer_epic() {
    let mut ledger = ledger("development_status:\n  epic-10:\n");
    assert_eq!(
        ledger.insert_entry("1-a-foo", "done", None),
        InsertOutcome::EpicNotFound {
            epic_key: "epic-1".into()
        }
    );
}

#[test]
fn test_insert_ignores_epic_outside_section() {
    let mut ledger = ledger("epics:\n  epic-1: done\ndevelopment_status:\n  epic-2: done\n");
    assert_eq!(
        ledger.insert_entry("1-a-foo", "done", None),
        InsertOutcome::EpicNotFound {
            epic_key: "epic-1".into()
        }
    );
}

#[test]
fn test_upsert_updates_or_inserts() {
    let mut ledger = ledger(SAMPLE);
    assert!(ledger.upsert_entry("1-a-foo", "review", None));
    assert!(ledger.upsert_entry("1-c-new", "backlog", None));
    assert!(!ledger.upsert_entry("1-c-new", "backlog", None));
    assert_eq!(ledger.updates_applied(), 2);
}

#[test]
fn test_update_epic() {
    let mut ledger = ledger(FULL);
    assert_eq!(
        ledger.update_epic("epic-2", "in-progress", None),
        UpdateOutcome::Updated {
            previous: "backlog".into()
        }
    );
    assert_eq!(
        ledger.update_epic("1-a-foo", "done", None),
        UpdateOutcome::NotFound
    );
    assert_eq!(ledger.lines()[11], "  epic-2: in-progress");
}

#[test]
fn test_malformed_entry_is_treated_as_absent() {
    let ledger = ledger("development_status:\n  epic-1: done\n  1-a-foo:\n");
    assert_eq!(ledger.find_entry("1-a-foo"), None);
}

#[test]
fn test_touch_verification_marker() {
    let mut ledger = ledger(FULL);

    assert!(ledger.touch_verification_marker_at(at()));

    assert_eq!(ledger.lines()[1], "# last_verified: 2026-01-02 09:30:00");
    assert_eq!(ledger.lines()[0], "# generated: 2025-12-01");
    assert_eq!(ledger.updates_applied(), 0);
}

#[test]
fn test_touch_verification_marker_absent_is_no_op() {
    let mut ledger = ledger(SAMPLE);
    assert!(!ledger.touch_verification_marker_at(at()));
    assert!(!ledger.is_modified());
}

#[test]
fn test_crlf_ledger_keeps_line_endings() {
    let text = "development_status:\r\n  epic-1: done\r\n  1-a-foo: backlog  # x\r\n";
    let mut ledger = ledger(text);

    ledger.update_entry("1-a-foo", "done", Some("Updated 2026-01-02"));
    ledger.insert_entry("1-b-bar", "review", None);

    assert_eq!(
        ledger.content(),
        "development_status:\r\n  epic-1: done\r\n  1-b-bar: review\r\n  1-a-foo: done  # Updated 2026-01-02\r\n"
    );
}

#[test]
fn test_statuses_skips_epics() {
    let ledger = ledger(FULL);
    let statuses = ledger.statuses();

    assert_eq!(statuses.get("1-a-foo").map(String::as_str), Some("ready-for-dev"));
    assert_eq!(statuses.get("2-a-baz").map(String::as_str), Some("backlog"));
    assert!(!statuses.contains_key("epic-1"));
    assert_eq!(statuses.len(), 4);
}

#[test]
fn test_load_missing_ledger() {
    let temp = TempDir::new().unwrap();
    let result = SprintLedger::load(NormalizedPath::new(temp.path().join("missing.yaml")));
    assert!(matches!(result, Err(Error::LedgerNotFound { .. })));
}

#[test]
fn test_save_backs_up_original_before_overwrite() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sprint-status.yaml");
    fs::write(&path, SAMPLE).unwrap();
    let backups = BackupStore::new(NormalizedPath::new(temp.path().join("backups")));

    let mut ledger = SprintLedger::load(NormalizedPath::new(&path))
        .unwrap()
        .with_backup_store(backups.clone());
    ledger.update_entry("1-a-foo", "done", Some("Updated 2026-01-02"));
    let report = ledger.save_at(true, at()).unwrap();

    assert!(report.written);
    let backup = report.backup.expect("backup expected");
    assert_eq!(fs::read_to_string(backup.to_native()).unwrap(), SAMPLE);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "development_status:\n  epic-1: in-progress\n  1-a-foo: done  # Updated 2026-01-02\n"
    );
    assert_eq!(backups.list().unwrap(), vec![backup]);
}

#[test]
fn test_save_without_changes_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sprint-status.yaml");
    fs::write(&path, SAMPLE).unwrap();
    let backups = BackupStore::new(NormalizedPath::new(temp.path().join("backups")));

    let mut ledger = SprintLedger::load(NormalizedPath::new(&path))
        .unwrap()
        .with_backup_store(backups.clone());
    ledger.update_entry("1-a-foo", "ready-for-dev", None);
    let report = ledger.save_at(true, at()).unwrap();

    assert_eq!(report, Default::default());
    assert!(!temp.path().join("backups").exists());
}

#[test]
fn test_save_without_backup() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sprint-status.yaml");
    fs::write(&path, SAMPLE).unwrap();
    let backups = BackupStore::new(NormalizedPath::new(temp.path().join("backups")));

    let mut ledger = SprintLedger::load(NormalizedPath::new(&path))
        .unwrap()
        .with_backup_store(backups);
    ledger.update_entry("1-a-foo", "review", None);
    let report = ledger.save_at(false, at()).unwrap();

    assert!(report.written);
    assert!(report.backup.is_none());
    assert!(!temp.path().join("backups").exists());
    assert!(!ledger.is_modified());
}

#[test]
fn test_failed_backup_leaves_ledger_untouched() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sprint-status.yaml");
    fs::write(&path, SAMPLE).unwrap();
    // A regular file where the backup directory should be
    let blocker = temp.path().join("backups");
    fs::write(&blocker, "not a directory").unwrap();

    let mut ledger = SprintLedger::load(NormalizedPath::new(&path))
        .unwrap()
        .with_backup_store(BackupStore::new(NormalizedPath::new(&blocker)));
    ledger.update_entry("1-a-foo", "done", None);
    let result = ledger.save_at(true, at());

    assert!(matches!(result, Err(Error::BackupFailed { .. })));
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}
