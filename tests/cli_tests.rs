use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn help_lists_flags() {
    Command::cargo_bin("selenium-mcp")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--webdriver-url"))
        .stdout(contains("--skip-probe"));
}

#[test]
fn version_prints() {
    Command::cargo_bin("selenium-mcp")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("selenium-mcp"));
}

#[test]
fn unreachable_endpoint_fails_fast() {
    Command::cargo_bin("selenium-mcp")
        .unwrap()
        .args(["--webdriver-url", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .stderr(contains("not reachable"));
}
