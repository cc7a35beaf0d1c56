use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn start_with_port(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("start-with-port").unwrap();
    cmd.current_dir(project).env_remove("RUST_LOG").arg("--no-color");
    cmd
}

#[test]
fn test_missing_command_prints_usage() {
    let project = tempfile::tempdir().unwrap();
    start_with_port(project.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage: start-with-port"))
        .stderr(predicate::str::contains("android"));
}

#[test]
fn test_unknown_command_prints_usage() {
    let project = tempfile::tempdir().unwrap();
    start_with_port(project.path())
        .arg("web")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown command: web"))
        .stderr(predicate::str::contains("Usage: start-with-port"));
}

#[test]
fn test_unknown_flag_exits_one() {
    let project = tempfile::tempdir().unwrap();
    start_with_port(project.path())
        .args(["start", "--bogus"])
        .assert()
        .code(1);
}

#[test]
fn test_help_exits_zero() {
    Command::cargo_bin("start-with-port")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build and run the iOS app"));
}

#[test]
fn test_missing_runner_exits_127() {
    let project = tempfile::tempdir().unwrap();
    std::fs::write(
        project.path().join(".devkit.toml"),
        "[metro]\nrunner = \"nonexistent_runner_12345\"\n",
    )
    .unwrap();

    start_with_port(project.path())
        .arg("start")
        .assert()
        .code(127)
        .stderr(predicate::str::contains("using default port 8081"))
        .stderr(predicate::str::contains("Node.js"));
}

#[cfg(unix)]
#[test]
fn test_forwards_port_and_exit_code() {
    use std::os::unix::fs::PermissionsExt;

    let project = tempfile::tempdir().unwrap();
    let runner = project.path().join("fake-npx");
    std::fs::write(&runner, "#!/bin/sh\necho \"$@\" > args.txt\nexit 5\n").unwrap();
    std::fs::set_permissions(&runner, std::fs::Permissions::from_mode(0o755)).unwrap();

    std::fs::write(
        project.path().join("metro.config.js"),
        "module.exports = {\n  server: {\n    port: 9000,\n  },\n};\n",
    )
    .unwrap();
    std::fs::write(
        project.path().join(".devkit.toml"),
        format!("[metro]\nrunner = \"{}\"\n", runner.display()),
    )
    .unwrap();

    start_with_port(project.path())
        .args(["ANDROID", "--", "--deviceId", "emulator-5554"])
        .assert()
        .code(5)
        .stdout(predicate::str::contains("port 9000 (from metro.config.js)"));

    let recorded = std::fs::read_to_string(project.path().join("args.txt")).unwrap();
    assert_eq!(
        recorded.trim(),
        "react-native run-android --port 9000 --deviceId emulator-5554"
    );
}
