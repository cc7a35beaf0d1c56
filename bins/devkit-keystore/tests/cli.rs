use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn generate_keystore(project: &Path, path_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("generate-keystore").unwrap();
    cmd.current_dir(project)
        .env("PATH", path_dir)
        .env_remove("JAVA_HOME")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn test_help_lists_certificate_flags() {
    Command::cargo_bin("generate-keystore")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("--country"));
}

#[test]
fn test_missing_keytool_aborts_without_writing() {
    let project = tempfile::tempdir().unwrap();
    let empty_path = tempfile::tempdir().unwrap();

    generate_keystore(project.path(), empty_path.path())
        .arg("--defaults")
        .assert()
        .code(127)
        .stderr(predicate::str::contains("keytool"))
        .stderr(predicate::str::contains("JDK"));

    assert!(!project.path().join("android").exists());
    assert!(!project.path().join(".gitignore").exists());
}

#[test]
fn test_declined_overwrite_leaves_files_untouched() {
    let project = tempfile::tempdir().unwrap();
    let empty_path = tempfile::tempdir().unwrap();
    let keystore = project.path().join("android/app/release.keystore");
    std::fs::create_dir_all(keystore.parent().unwrap()).unwrap();
    std::fs::write(&keystore, b"old").unwrap();

    generate_keystore(project.path(), empty_path.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Overwrite?"))
        .stderr(predicate::str::contains("cancelled"));

    assert_eq!(std::fs::read(&keystore).unwrap(), b"old");
    assert!(!project.path().join("android/keystore.properties").exists());
    assert!(!project.path().join(".gitignore").exists());
}

#[test]
fn test_explicit_config_must_exist() {
    let project = tempfile::tempdir().unwrap();
    let empty_path = tempfile::tempdir().unwrap();

    generate_keystore(project.path(), empty_path.path())
        .args(["--defaults", "--config", "missing.toml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[cfg(unix)]
#[test]
fn test_generates_with_fake_keytool() {
    use std::os::unix::fs::PermissionsExt;

    let project = tempfile::tempdir().unwrap();
    let bin_dir = tempfile::tempdir().unwrap();
    let keytool = bin_dir.path().join("keytool");
    // Write the file named after -keystore
    std::fs::write(
        &keytool,
        "#!/bin/sh\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = \"-keystore\" ]; then echo fake > \"$2\"; fi\n  shift\ndone\n",
    )
    .unwrap();
    std::fs::set_permissions(&keytool, std::fs::Permissions::from_mode(0o755)).unwrap();

    generate_keystore(project.path(), bin_dir.path())
        .args(["--defaults", "--cn", "Build Bot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("release-key"))
        .stdout(predicate::str::contains("CN=Build Bot"));

    assert!(project.path().join("android/app/release.keystore").exists());
    let properties =
        std::fs::read_to_string(project.path().join("android/keystore.properties")).unwrap();
    assert!(properties.contains("storeFile=release.keystore"));
    assert!(properties.contains("keyAlias=release-key"));

    let gitignore = std::fs::read_to_string(project.path().join(".gitignore")).unwrap();
    assert!(gitignore.contains("android/app/release.keystore"));
    assert!(gitignore.contains("android/keystore.properties"));
}

#[test]
fn test_invalid_config_rejected_before_touching_files() {
    let project = tempfile::tempdir().unwrap();
    let empty_path = tempfile::tempdir().unwrap();
    let keystore = project.path().join("android/app/release.keystore");
    std::fs::create_dir_all(keystore.parent().unwrap()).unwrap();
    std::fs::write(&keystore, b"old").unwrap();
    std::fs::write(
        project.path().join(".devkit.toml"),
        "[keystore]\npassword_length = 0\n",
    )
    .unwrap();

    generate_keystore(project.path(), empty_path.path())
        .args(["--defaults", "--force"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("keystore.password_length"));

    assert_eq!(std::fs::read(&keystore).unwrap(), b"old");
    assert!(!project.path().join("android/keystore.properties").exists());
}
