//! CLI end-to-end tests that invoke the compiled `story` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use story_test_utils::TestWorkspace;

const LEDGER: &str = "development_status:\n  epic-1: in-progress\n  1-a-foo: ready-for-dev\n";

fn story(ws: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("story").unwrap();
    cmd.arg("--root").arg(ws.root()).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("story")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("backfill"));
}

#[test]
fn test_sync_validate_reports_and_fails() {
    let ws = TestWorkspace::new()
        .with_ledger(LEDGER)
        .with_status_story("1-a-foo", "done");

    story(&ws)
        .arg("sync")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("1-a-foo: ready-for-dev → done"));

    assert_eq!(ws.ledger(), LEDGER);
}

#[test]
fn test_sync_clean_exits_zero() {
    let ws = TestWorkspace::new()
        .with_ledger(LEDGER)
        .with_status_story("1-a-foo", "ready-for-dev");

    story(&ws)
        .args(["sync", "--validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ledger matches"));
}

#[test]
fn test_sync_fix_rewrites_ledger() {
    let ws = TestWorkspace::new()
        .with_ledger(LEDGER)
        .with_status_story("1-a-foo", "done");

    story(&ws).args(["sync", "--mode", "fix"]).assert().success();

    let ledger = ws.ledger();
    assert!(ledger.starts_with("development_status:\n  epic-1: in-progress\n  1-a-foo: done  # Updated "));
    assert_eq!(ws.backups().len(), 1);
}

#[test]
fn test_sync_dry_run_shows_diff() {
    let ws = TestWorkspace::new()
        .with_ledger(LEDGER)
        .with_status_story("1-a-foo", "done");

    story(&ws)
        .args(["sync", "--dry-run", "--mode", "fix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+  1-a-foo: done  # Updated"))
        .stdout(predicate::str::contains("No files were modified"));

    assert_eq!(ws.ledger(), LEDGER);
}

#[test]
fn test_sync_validate_flag_beats_dry_run() {
    let ws = TestWorkspace::new()
        .with_ledger(LEDGER)
        .with_status_story("1-a-foo", "done");

    story(&ws).args(["sync", "--validate", "--dry-run"]).assert().code(1);
}

#[test]
fn test_sync_json_output() {
    let ws = TestWorkspace::new()
        .with_ledger(LEDGER)
        .with_status_story("1-a-foo", "done");

    let output = story(&ws).args(["sync", "--json"]).output().unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(report["mode"], "validate");
    assert_eq!(report["discrepancies"][0]["id"], "1-a-foo");
    assert_eq!(report["discrepancies"][0]["scanned"], "done");
}

#[test]
fn test_sync_missing_ledger_fails() {
    let ws = TestWorkspace::new().with_status_story("1-a-foo", "done");

    story(&ws)
        .arg("sync")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Ledger not found"));
}

#[test]
fn test_sync_invalid_epic_warns_and_continues() {
    let ws = TestWorkspace::new()
        .with_ledger(LEDGER)
        .with_status_story("1-a-foo", "ready-for-dev");

    story(&ws)
        .args(["sync", "--epic", "Epic One"])
        .assert()
        .success()
        .stderr(predicate::str::contains("invalid epic format"));
}

#[test]
fn test_sync_path_overrides() {
    let ws = TestWorkspace::new();
    std::fs::create_dir_all(ws.root().join("docs")).unwrap();
    std::fs::write(ws.root().join("docs/1-a-foo.md"), "Status: done\n").unwrap();
    std::fs::write(ws.root().join("status.yaml"), LEDGER).unwrap();

    story(&ws)
        .args(["sync", "--story-dir", "docs", "--sprint-status", "status.yaml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("1-a-foo: ready-for-dev → done"));
}

#[test]
fn test_validate_fails_on_critical_findings() {
    let ws = TestWorkspace::new().with_status_story("1-a-foo", "done");

    story(&ws)
        .arg("validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("CRITICAL"))
        .stdout(predicate::str::contains("Total files scanned:  1"));
}

#[test]
fn test_validate_summary_hides_findings() {
    let ws = TestWorkspace::new().with_status_story("1-a-foo", "done");

    story(&ws)
        .args(["validate", "--summary"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("CRITICAL").not());
}

#[test]
fn test_fix_checkboxes_requires_apply() {
    let ws = TestWorkspace::new().with_story("1-a-foo", "- [x] one\n- [ ] two\n");

    story(&ws)
        .arg("fix-checkboxes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Would uncheck 1 boxes in 1-a-foo.md"));
    assert_eq!(ws.read(ws.story_path("1-a-foo")), "- [x] one\n- [ ] two\n");

    story(&ws).args(["fix-checkboxes", "--apply"]).assert().success();
    assert_eq!(ws.read(ws.story_path("1-a-foo")), "- [ ] one\n- [ ] two\n");
}

#[test]
fn test_clean_needs_scope() {
    let ws = TestWorkspace::new();
    story(&ws).arg("clean").assert().failure();
}

#[test]
fn test_clean_epic_removes_repeats() {
    let para = "A paragraph that the generator repeated far too many times here.";
    let content = format!("{para}\n\n{para}\n\n{para}\n");
    let ws = TestWorkspace::new()
        .with_story("1-a-foo", &content)
        .with_story("2-a-bar", &content);

    story(&ws).args(["clean", "--epic", "1"]).assert().success();

    assert_eq!(ws.read(ws.story_path("1-a-foo")), para);
    assert_eq!(ws.read(ws.story_path("2-a-bar")), content);
}

#[test]
fn test_backfill_adds_status_from_ledger() {
    let ws = TestWorkspace::new()
        .with_ledger(LEDGER)
        .with_story("1-a-foo", "# Foo\n\n## Story\n");

    story(&ws)
        .arg("backfill")
        .assert()
        .success()
        .stdout(predicate::str::contains("1-a-foo"));

    ws.assert_file_contains(ws.story_path("1-a-foo"), "**Status:** ready-for-dev");
}

#[test]
fn test_fix_checkboxes_skips_unreadable_story() {
    let ws = TestWorkspace::new().with_story("1-b-foo", "- [x] one\n");
    std::fs::write(ws.story_path("1-a-bad"), [0xff, 0xfe]).unwrap();

    story(&ws)
        .args(["fix-checkboxes", "--apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 unreadable documents skipped"));
    assert_eq!(ws.read(ws.story_path("1-b-foo")), "- [ ] one\n");
}
