use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("phpjson").expect("binary builds")
}

fn write_lang_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn backup_dirs(dir: &Path) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("backup_"))
        })
        .collect()
}

#[test]
fn converts_a_language_file_and_keeps_the_source() {
    let dir = tempfile::tempdir().unwrap();
    write_lang_file(
        dir.path(),
        "en.php",
        "<?php\nreturn [\n'hello' => 'Hello',\n'bye' => 'Goodbye',\n];\n",
    );

    cmd().arg(dir.path()).assert().success().stdout(
        predicate::str::contains("converted 1/1 files").and(predicate::str::contains("1 verified")),
    );

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("en.json")).unwrap()).unwrap();
    assert_eq!(json["hello"], "Hello");
    assert_eq!(json["bye"], "Goodbye");
    assert!(dir.path().join("en.php").exists());
    assert_eq!(backup_dirs(dir.path()).len(), 1);
}

#[test]
fn skips_files_with_existing_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    write_lang_file(dir.path(), "en.php", "return ['a' => 'b'];");

    cmd().arg(dir.path()).assert().success();
    cmd()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no PHP files to convert"));
}

#[test]
fn delete_with_yes_removes_verified_sources() {
    let dir = tempfile::tempdir().unwrap();
    write_lang_file(dir.path(), "en.php", "return ['a' => 'b'];");

    cmd()
        .arg(dir.path())
        .args(["--delete", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 deleted"));

    assert!(!dir.path().join("en.php").exists());
    assert!(dir.path().join("en.json").exists());
    // The backup still holds the original source.
    let backups = backup_dirs(dir.path());
    assert_eq!(backups.len(), 1);
    assert!(backups[0].join("en.php").exists());
}

#[test]
fn one_bad_file_does_not_abort_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_lang_file(dir.path(), "good.php", "return ['a' => 'b'];");
    write_lang_file(dir.path(), "bad.php", "<?php echo 'no array here';\n");

    cmd()
        .arg(dir.path())
        .arg("--no-backup")
        .assert()
        .failure()
        .stdout(
            predicate::str::contains("converted 1/2 files")
                .and(predicate::str::contains("1 failed"))
                .and(predicate::str::contains("bad.php")),
        );

    assert!(dir.path().join("good.json").exists());
    assert!(!dir.path().join("bad.json").exists());
    assert!(backup_dirs(dir.path()).is_empty());
}

#[test]
fn force_reconverts_existing_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    write_lang_file(dir.path(), "en.php", "return ['a' => 'b'];");
    fs::write(dir.path().join("en.json"), "{\"stale\": \"x\"}").unwrap();

    cmd()
        .arg(dir.path())
        .args(["--force", "--no-backup"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("en.json")).unwrap()).unwrap();
    assert_eq!(json["a"], "b");
    assert!(json.get("stale").is_none());
}
