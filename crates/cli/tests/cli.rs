use assert_cmd::Command;
use predicates::prelude::*;

fn books_schema(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("books-schema").unwrap();
    cmd.env("BOOKS_CONFIG_DIR", config_dir.path())
        .env_remove("BOOKS_ENV")
        .env_remove("RUST_LOG")
        .env("BOOKS_DATABASE__SERVER_SELECTION_TIMEOUT_MS", "200")
        .env("BOOKS_DATABASE__CONNECT_TIMEOUT_MS", "200");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    books_schema(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("verify").and(predicate::str::contains("ping")));
}

#[test]
fn unreachable_engine_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    books_schema(&dir)
        .args(["--endpoint", "mongodb://127.0.0.1:1"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn malformed_endpoint_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    books_schema(&dir)
        .args(["ping", "--endpoint", "postgres://127.0.0.1:5432"])
        .assert()
        .failure();
}

#[test]
fn unknown_environment_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    books_schema(&dir)
        .env("BOOKS_ENV", "qa")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported environment 'qa'"));
}
