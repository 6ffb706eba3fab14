//! End-to-end CLI tests.
//!
//! Each test gets its own temp directory as both the workspace and the
//! "remote" database location, so nothing touches the developer's real
//! state. The `--dsn` flag has top priority in the credential chain,
//! which keeps these tests independent of `ROWSYNC_DSN` and
//! `~/.rowsync/credential`.

use assert_cmd::Command;
use rowsync::model::TableName;
use rowsync::storage::{RecordStore, SqliteRecordStore};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn rowsync(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rowsync").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn init_workspace(dir: &Path) {
    rowsync(dir).arg("init").assert().success();
    rowsync(dir)
        .args([
            "profile",
            "add",
            "cfg",
            "--file",
            "settings.json",
            "--id",
            "app-settings",
            "--table",
            "json_records",
        ])
        .assert()
        .success();
}

#[test]
fn version_runs() {
    let temp = TempDir::new().unwrap();
    let output = rowsync(temp.path()).arg("version").assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("version"));
}

#[test]
fn init_creates_workspace_skeleton() {
    let temp = TempDir::new().unwrap();
    rowsync(temp.path()).arg("init").assert().success();

    let ws = temp.path().join(".rowsync");
    assert!(ws.join("profiles.json").exists());
    assert!(ws.join("scratch").is_dir());

    let gitignore = fs::read_to_string(ws.join(".gitignore")).unwrap();
    assert!(gitignore.contains("!profiles.json"));

    // Second init without --force is rejected.
    rowsync(temp.path()).arg("init").assert().failure().code(7);
}

#[test]
fn invalid_table_name_is_rejected_before_any_query() {
    let temp = TempDir::new().unwrap();
    rowsync(temp.path()).arg("init").assert().success();

    let output = rowsync(temp.path())
        .args([
            "profile",
            "add",
            "bad",
            "--file",
            "x.json",
            "--id",
            "x",
            "--table",
            "json_records; DROP TABLE x",
        ])
        .assert()
        .failure()
        .code(4);

    let stderr = String::from_utf8_lossy(&output.get_output().stderr).to_string();
    assert!(stderr.contains("INVALID_TABLE_NAME"));
}

#[test]
fn upload_then_download_round_trip() {
    let temp = TempDir::new().unwrap();
    init_workspace(temp.path());

    let dsn = temp.path().join("remote.db");
    let dsn = dsn.to_str().unwrap();
    fs::write(temp.path().join("settings.json"), "{\n  \"a\": 1\n}").unwrap();

    // Upload: start a session, then confirm.
    let output = rowsync(temp.path())
        .args(["upload", "cfg", "--dsn", dsn])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("\"outcome\":\"started\""));
    assert!(temp.path().join(".rowsync").join("session.json").exists());

    rowsync(temp.path())
        .args(["confirm", "--dsn", dsn])
        .assert()
        .success();
    assert!(!temp.path().join(".rowsync").join("session.json").exists());

    let table = TableName::new("json_records").unwrap();
    let mut store = SqliteRecordStore::open(dsn).unwrap();
    let record = store.fetch(&table, "app-settings").unwrap().unwrap();
    assert_eq!(record.data, "{\n  \"a\": 1\n}");

    // Re-uploading identical content creates no session.
    let output = rowsync(temp.path())
        .args(["upload", "cfg", "--dsn", dsn])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("up_to_date"));

    // Change the remote side, then download and confirm.
    store.upsert(&table, "app-settings", "{\n  \"a\": 2\n}").unwrap();
    drop(store);

    rowsync(temp.path())
        .args(["download", "cfg", "--dsn", dsn])
        .assert()
        .success();
    rowsync(temp.path())
        .args(["confirm", "--dsn", dsn])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("settings.json")).unwrap(),
        "{\n  \"a\": 2\n}"
    );
}

#[test]
fn download_missing_remote_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    init_workspace(temp.path());

    let dsn = temp.path().join("remote.db");
    let output = rowsync(temp.path())
        .args(["download", "cfg", "--dsn", dsn.to_str().unwrap()])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("remote_missing"));
    assert!(!temp.path().join(".rowsync").join("session.json").exists());
}

#[test]
fn cancel_discards_the_session() {
    let temp = TempDir::new().unwrap();
    init_workspace(temp.path());

    let dsn = temp.path().join("remote.db");
    let dsn = dsn.to_str().unwrap();
    fs::write(temp.path().join("settings.json"), "local content").unwrap();

    rowsync(temp.path())
        .args(["upload", "cfg", "--dsn", dsn])
        .assert()
        .success();

    rowsync(temp.path()).arg("cancel").assert().success();
    assert!(!temp.path().join(".rowsync").join("session.json").exists());

    // The remote was never written.
    let table = TableName::new("json_records").unwrap();
    let mut store = SqliteRecordStore::open(dsn).unwrap();
    assert!(store.fetch(&table, "app-settings").unwrap().is_none());

    // Cancel with no session is a no-op, not an error.
    rowsync(temp.path()).arg("cancel").assert().success();
}

#[test]
fn deleting_the_candidate_counts_as_closing_the_view() {
    let temp = TempDir::new().unwrap();
    init_workspace(temp.path());

    let dsn = temp.path().join("remote.db");
    let dsn = dsn.to_str().unwrap();
    fs::write(temp.path().join("settings.json"), "local content").unwrap();

    let output = rowsync(temp.path())
        .args(["upload", "cfg", "--dsn", dsn])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let candidate = parsed["candidate"].as_str().unwrap().to_string();

    // "Close the view" by deleting the candidate scratch copy.
    fs::remove_file(&candidate).unwrap();

    // The next sync command discards the stale session, so confirming
    // reports no active session.
    let output = rowsync(temp.path())
        .args(["confirm", "--dsn", dsn])
        .assert()
        .failure()
        .code(3);
    let stderr = String::from_utf8_lossy(&output.get_output().stderr).to_string();
    assert!(stderr.contains("NO_ACTIVE_SESSION"));
    assert!(!temp.path().join(".rowsync").join("session.json").exists());
}
