use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

const PROFILE_JSON: &str = r#"{"id":"user1","username":"user","name":"Test User"}"#;

fn task_cli(session_file: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("task-cli").unwrap();
    // Nothing listens here; tests that reach the network fail fast.
    cmd.arg("--server")
        .arg("http://127.0.0.1:9")
        .arg("--session-file")
        .arg(session_file);
    cmd
}

#[test]
fn list_requires_a_session() {
    let dir = TempDir::new().unwrap();
    let session = dir.child("session.json");

    task_cli(session.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn corrupted_session_is_discarded() {
    let dir = TempDir::new().unwrap();
    let session = dir.child("session.json");
    session.write_str("{\"id\": 42").unwrap();

    task_cli(session.path())
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to restore your session"));

    session.assert(predicate::path::missing());
}

#[test]
fn whoami_reads_the_stored_profile() {
    let dir = TempDir::new().unwrap();
    let session = dir.child("session.json");
    session.write_str(PROFILE_JSON).unwrap();

    task_cli(session.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout("Test User (user)\n");
}

#[test]
fn logout_removes_the_session_file() {
    let dir = TempDir::new().unwrap();
    let session = dir.child("session.json");
    session.write_str(PROFILE_JSON).unwrap();

    task_cli(session.path())
        .arg("logout")
        .assert()
        .success()
        .stdout("Logged out\n");

    session.assert(predicate::path::missing());

    task_cli(session.path())
        .arg("logout")
        .assert()
        .success()
        .stdout("Not logged in\n");
}

#[test]
fn edit_without_changes_is_rejected() {
    let dir = TempDir::new().unwrap();
    let session = dir.child("session.json");
    session.write_str(PROFILE_JSON).unwrap();

    task_cli(session.path())
        .args(["edit", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn unreachable_server_is_reported() {
    let dir = TempDir::new().unwrap();
    let session = dir.child("session.json");
    session.write_str(PROFILE_JSON).unwrap();

    task_cli(session.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("request failed"));
}

#[test]
fn help_describes_every_command() {
    let mut cmd = Command::cargo_bin("task-cli").unwrap();

    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("Show a single task")
            .and(predicate::str::contains("Create a task owned by the logged-in user"))
            .and(predicate::str::contains("Mark a task as completed"))
            .and(predicate::str::contains("Mark a task as not completed"))
            .and(predicate::str::contains("Change the title and/or description"))
            .and(predicate::str::contains("Delete a task")),
    );
}
