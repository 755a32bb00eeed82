use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

use prd_forge::history::sqlite::SqliteKv;
use prd_forge::history::{HistoryStore, KvHistory};

fn prd_forge(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_prd-forge"));
    cmd.current_dir(dir)
        .arg("--history-db")
        .arg(dir.join("history.sqlite3"))
        .env_remove("PRD_STATE_DIR")
        .env_remove("PRD_TIMEOUT_SECS");
    cmd
}

fn seed_record(dir: &Path) -> String {
    let kv = SqliteKv::open(&dir.join("history.sqlite3")).unwrap();
    KvHistory::new(kv).append("https://a.com", "# PRD for a.com\n").unwrap().id
}

fn exported(dir: &Path, ext: &str) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("analysis-") && n.ends_with(ext))
        .collect()
}

#[test]
fn unknown_history_id_exits_with_validation_code() {
    let dir = tempfile::tempdir().unwrap();
    prd_forge(dir.path())
        .args(["history", "show", "no-such-id"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no analysis with id no-such-id"));
}

#[test]
fn history_show_prints_the_stored_report() {
    let dir = tempfile::tempdir().unwrap();
    let id = seed_record(dir.path());
    prd_forge(dir.path())
        .args(["history", "show", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("# PRD for a.com"));
}

#[test]
fn bare_output_flags_use_default_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let id = seed_record(dir.path());

    prd_forge(dir.path())
        .args(["history", "show", id.as_str(), "--quiet", "--out", "--json"])
        .assert()
        .success();

    let md = exported(dir.path(), ".md");
    assert_eq!(md.len(), 1);
    assert_eq!(std::fs::read_to_string(dir.path().join(&md[0])).unwrap(), "# PRD for a.com\n");
    assert_eq!(exported(dir.path(), ".json").len(), 1);
}
