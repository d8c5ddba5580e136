//! End-to-end tests for the airlens user commands
//!
//! These tests validate the credential flow including:
//! - Registration and database creation
//! - Verification success and failure paths
//! - Duplicate email/username rejection

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn airlens() -> Command {
    let mut cmd = Command::cargo_bin("airlens").expect("binary builds");
    cmd.env_remove("AIRLENS_DATA_PATH")
        .env_remove("AIRLENS_PLOTS_DIR")
        .env_remove("AIRLENS_USERS_DB");
    cmd
}

fn register(db: &Path, fullname: &str, email: &str, username: &str, password: &str) -> Command {
    let mut cmd = airlens();
    cmd.arg("user")
        .arg("register")
        .arg("--fullname")
        .arg(fullname)
        .arg("--email")
        .arg(email)
        .arg("--username")
        .arg(username)
        .arg("--password")
        .arg(password)
        .arg("--db")
        .arg(db);
    cmd
}

fn verify(db: &Path, username: &str, password: &str) -> Command {
    let mut cmd = airlens();
    cmd.arg("user")
        .arg("verify")
        .arg("--username")
        .arg(username)
        .arg("--password")
        .arg(password)
        .arg("--db")
        .arg(db);
    cmd
}

#[test]
fn test_register_then_verify() {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("users.db");

    register(&db, "Amara Diallo", "amara@example.com", "amara", "hunter2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered user: amara"));
    assert!(db.exists());

    verify(&db, "amara", "hunter2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, Amara Diallo"));
}

#[test]
fn test_verify_wrong_password_fails() {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("users.db");

    register(&db, "Amara Diallo", "amara@example.com", "amara", "hunter2")
        .assert()
        .success();

    verify(&db, "amara", "wrong")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"));
}

#[test]
fn test_verify_unknown_username_fails() {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("users.db");

    register(&db, "Amara Diallo", "amara@example.com", "amara", "hunter2")
        .assert()
        .success();

    verify(&db, "nobody", "hunter2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"));
}

#[test]
fn test_duplicate_email_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("users.db");

    register(&db, "Amara Diallo", "amara@example.com", "amara", "hunter2")
        .assert()
        .success();

    register(&db, "Impostor", "amara@example.com", "impostor", "pw")
        .assert()
        .failure()
        .stderr(predicate::str::contains("email already exists"));
}

#[test]
fn test_duplicate_username_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("users.db");

    register(&db, "Amara Diallo", "amara@example.com", "amara", "hunter2")
        .assert()
        .success();

    register(&db, "Other Person", "other@example.com", "amara", "pw")
        .assert()
        .failure()
        .stderr(predicate::str::contains("username already exists"));
}

#[test]
fn test_stored_password_is_hashed() {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("users.db");

    register(&db, "Amara Diallo", "amara@example.com", "amara", "hunter2")
        .assert()
        .success();

    // The raw database file must not contain the plaintext password
    let raw = std::fs::read(&db).expect("read db file");
    let needle = b"hunter2";
    let found = raw.windows(needle.len()).any(|window| window == needle);
    assert!(!found, "plaintext password leaked into the database file");
}
