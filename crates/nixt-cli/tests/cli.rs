use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::{contains, starts_with};
use tempfile::TempDir;

fn nixt(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nixt"));
    cmd.env("NIXT_DIR", home.path().join("data"))
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("NIXT_DB_PATH", home.path().join("nixt.db"))
        .env("NIXT_DISABLE_SYSTEM_PROXY", "1")
        .env_remove("NIXT_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nixt"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("Nixt"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nixt"));
    cmd.arg("--version").assert().success();
}

#[test]
fn test_cli_completions() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nixt"));
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(starts_with("_nixt"));
}

#[test]
fn test_grant_and_dashboard_session_flow() {
    let home = TempDir::new().unwrap();

    nixt(&home)
        .args(["grant", "add", "ops@example.com", "--name", "Ops", "--role", "manager"])
        .args(["--section", "projects", "--section", "overview"])
        .assert()
        .success()
        .stdout(contains("Granted manager access to ops@example.com"));

    nixt(&home)
        .args(["grant", "list"])
        .assert()
        .success()
        .stdout(contains("ops@example.com").and(contains("overview, projects")));

    nixt(&home)
        .args(["dashboard", "login", "OPS@example.com"])
        .assert()
        .success()
        .stdout(contains("Role:      manager"));

    // The session survives a restart.
    nixt(&home)
        .args(["--format", "json", "dashboard", "status"])
        .assert()
        .success()
        .stdout(contains("\"email\": \"ops@example.com\""));

    nixt(&home)
        .args(["grant", "remove", "ops@example.com"])
        .assert()
        .success()
        .stdout(contains("Removed 1 grant(s)").and(contains("session for ops@example.com ended")));

    nixt(&home)
        .args(["dashboard", "status"])
        .assert()
        .failure()
        .stderr(contains("No dashboard session"));
}

#[test]
fn test_dashboard_login_needs_role_choice() {
    let home = TempDir::new().unwrap();

    for role in ["client", "viewer"] {
        nixt(&home)
            .args(["grant", "add", "dual@example.com", "--name", "Dual", "--role", role])
            .assert()
            .success();
    }

    nixt(&home)
        .args(["dashboard", "login", "dual@example.com"])
        .assert()
        .failure()
        .stderr(contains("MULTIPLE_ROLES"));

    nixt(&home)
        .args(["dashboard", "login", "dual@example.com", "--role", "viewer"])
        .assert()
        .success()
        .stdout(contains("Role:      viewer"));

    nixt(&home)
        .args(["dashboard", "login", "nobody@example.com"])
        .assert()
        .failure()
        .stderr(contains("EMAIL_NOT_FOUND"));
}

#[test]
fn test_prefs_theme() {
    let home = TempDir::new().unwrap();

    nixt(&home)
        .args(["prefs", "theme", "4"])
        .assert()
        .success()
        .stdout(contains("* 4 blue-white"));

    nixt(&home)
        .args(["prefs", "theme", "--next"])
        .assert()
        .success()
        .stdout(contains("* 0 blue-black"));

    nixt(&home)
        .args(["prefs", "theme", "9"])
        .assert()
        .failure()
        .stderr(contains("out of range"));
}

#[test]
fn test_prefs_language() {
    let home = TempDir::new().unwrap();

    nixt(&home)
        .args(["prefs", "language"])
        .assert()
        .success()
        .stdout(contains("Direction:  rtl"));

    nixt(&home)
        .args(["--format", "json", "prefs", "language", "en"])
        .assert()
        .success()
        .stdout(contains("\"direction\": \"ltr\""));
}

#[test]
fn test_auth_login_failure_reports_json_and_exits_nonzero() {
    let home = TempDir::new().unwrap();

    nixt(&home)
        .args(["--format", "json", "--api-url", "http://127.0.0.1:9/api/v1"])
        .args(["auth", "login", "a@example.com", "--password", "secret"])
        .assert()
        .failure()
        .stdout(contains("\"success\": false"))
        .stderr(contains("Server connection error"));
}

#[test]
fn test_auth_refresh_without_token() {
    let home = TempDir::new().unwrap();

    nixt(&home)
        .args(["--api-url", "http://127.0.0.1:9/api/v1", "auth", "refresh"])
        .assert()
        .failure()
        .stderr(contains("Not signed in"));
}
