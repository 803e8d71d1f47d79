//! Integration tests for the pyfreeze CLI

use std::path::Path;
use std::process::{Command, Output};

fn pyfreeze(workdir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pyfreeze"))
        .arg("-C")
        .arg(workdir)
        .args(args)
        .env_remove("PYFREEZE_COLOR")
        .env_remove("PYFREEZE_OUTPUT")
        .env_remove("PYFREEZE_PYTHON")
        .env_remove("PYFREEZE_ENV_DIR")
        .env_remove("PYFREEZE_REQUIREMENTS")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute pyfreeze")
}

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_pyfreeze"))
        .arg("--version")
        .output()
        .expect("Failed to execute pyfreeze");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pyfreeze"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_pyfreeze"))
        .arg("--help")
        .output()
        .expect("Failed to execute pyfreeze");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Freeze Python applications into standalone executables"));
    assert!(stdout.contains("install"));
    assert!(stdout.contains("build"));
    assert!(stdout.contains("clean"));
}

#[test]
fn test_cli_invalid_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_pyfreeze"))
        .arg("invalid-command")
        .output()
        .expect("Failed to execute pyfreeze");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_build_requires_project() {
    let dir = tempfile::tempdir().unwrap();
    let output = pyfreeze(dir.path(), &["build"]);

    // Should fail because no project specified
    assert!(!output.status.success());
}

#[test]
fn test_install_without_requirements_fails_before_creating_anything() {
    let dir = tempfile::tempdir().unwrap();
    let output = pyfreeze(dir.path(), &["install"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("install.requirements_not_found"));
    assert!(!dir.path().join(".venv").exists());
}

#[test]
fn test_build_rejects_path_as_project() {
    let dir = tempfile::tempdir().unwrap();
    let output = pyfreeze(dir.path(), &["build", "src/myapp", "--dry-run"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid arguments"));
}

#[test]
fn test_build_rejects_intermediate_dir_as_project() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("requirements.txt"), "pyinstaller\n").unwrap();
    let output = pyfreeze(dir.path(), &["build", "dist"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("assembly.project_name_conflict"));
    assert!(!dir.path().join(".venv").exists());
}

#[test]
fn test_json_dry_run_prints_packager_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = pyfreeze(
        dir.path(),
        &[
            "--json",
            "build",
            "myapp",
            "--data",
            "assets",
            "--hidden-import",
            "dbdicom",
            "--dry-run",
        ],
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["type"], "DryRun");
    assert_eq!(value["data"]["project"], "myapp");

    let args: Vec<String> = value["data"]["args"]
        .as_array()
        .unwrap()
        .iter()
        .map(|arg| arg.as_str().unwrap().to_string())
        .collect();
    assert_eq!(&args[..2], ["-m", "PyInstaller"]);
    assert!(args.contains(&"--onefile".to_string()));
    assert!(args.windows(2).any(|w| w[0] == "--hidden-import" && w[1] == "dbdicom"));
    assert!(args.windows(2).any(|w| w[0] == "--collect-datas" && w[1] == "dbdicom"));
    #[cfg(unix)]
    assert!(args.contains(&"--add-data=assets:./assets".to_string()));

    // Nothing is created by a dry run
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_clean_collects_output_and_removes_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("build/myapp")).unwrap();
    std::fs::create_dir_all(dir.path().join("dist")).unwrap();
    std::fs::write(dir.path().join("dist/myapp"), b"binary").unwrap();
    std::fs::write(dir.path().join("myapp.spec"), b"# spec").unwrap();

    let output = pyfreeze(dir.path(), &["--json", "clean", "myapp"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(dir.path().join("myapp").is_file());
    assert!(!dir.path().join("build").exists());
    assert!(!dir.path().join("dist").exists());
    assert!(!dir.path().join("myapp.spec").exists());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["type"], "Clean");
    assert_eq!(value["data"]["moved"].as_array().unwrap().len(), 1);
    assert_eq!(value["data"]["removed"].as_array().unwrap().len(), 3);
}

#[test]
fn test_invalid_color_from_environment_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_pyfreeze"))
        .arg("-C")
        .arg(dir.path())
        .arg("clean")
        .env("PYFREEZE_COLOR", "sometimes")
        .output()
        .expect("Failed to execute pyfreeze");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PYFREEZE_COLOR"));
}
