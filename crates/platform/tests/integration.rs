//! Integration tests for platform profiles and native operations

use pyfreeze_errors::{DiscoveryError, PlatformError};
use pyfreeze_events::{AppEvent, PlatformEvent};
use pyfreeze_platform::{
    profile_for, FilesystemOperations, Platform, PlatformContext, PlatformKind, PlatformProfile,
    PosixProfile, WindowsProfile,
};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn test_activation_command_uses_one_separator_convention() {
    let env = Path::new(".venv");

    let posix = PosixProfile.activation_command(env);
    assert_eq!(posix, ". \".venv/bin/activate\"");
    assert!(!posix.contains('\\'));

    let windows = WindowsProfile.activation_command(env);
    assert_eq!(windows, ".venv\\Scripts\\activate");
    assert!(!windows.contains('/'));

    // forward slashes from a caller never leak into the Windows form
    let nested = WindowsProfile.activation_command(Path::new("work/.venv/"));
    assert_eq!(nested, "work\\.venv\\Scripts\\activate");
}

#[test]
fn test_profile_constants() {
    let posix = profile_for(PlatformKind::Posix);
    assert_eq!(posix.data_separator(), ':');
    assert_eq!(posix.scripts_dir(), "bin");
    assert_eq!(posix.base_interpreter(), ("python3".to_string(), vec![]));
    assert_eq!(posix.executable_file_name("myapp"), "myapp");
    assert_eq!(
        posix.interpreter_path(Path::new("/w/.venv")),
        PathBuf::from("/w/.venv/bin/python")
    );

    let windows = profile_for(PlatformKind::Windows);
    assert_eq!(windows.data_separator(), ';');
    assert_eq!(windows.scripts_dir(), "Scripts");
    assert_eq!(
        windows.base_interpreter(),
        ("py".to_string(), vec!["-3".to_string()])
    );
    assert_eq!(windows.executable_file_name("myapp"), "myapp.exe");
}

#[tokio::test]
async fn test_posix_site_packages_single_candidate() {
    let env = tempdir().unwrap();
    std::fs::create_dir_all(env.path().join("lib/python3.11/site-packages/itk")).unwrap();
    // stray files next to the version directory are not candidates
    std::fs::write(env.path().join("lib/README"), b"").unwrap();

    let site = PosixProfile.site_packages(env.path()).await.unwrap();
    assert_eq!(site, env.path().join("lib/python3.11/site-packages"));
}

#[tokio::test]
async fn test_posix_site_packages_no_candidate() {
    let env = tempdir().unwrap();
    std::fs::create_dir_all(env.path().join("lib")).unwrap();
    let err = PosixProfile.site_packages(env.path()).await.unwrap_err();
    assert!(matches!(err, DiscoveryError::NoCandidate { .. }));

    let missing = tempdir().unwrap();
    let err = PosixProfile.site_packages(missing.path()).await.unwrap_err();
    assert!(matches!(err, DiscoveryError::NoCandidate { .. }));
}

#[tokio::test]
async fn test_posix_site_packages_ambiguous() {
    let env = tempdir().unwrap();
    std::fs::create_dir_all(env.path().join("lib/python3.12")).unwrap();
    std::fs::create_dir_all(env.path().join("lib/python3.11")).unwrap();

    let err = PosixProfile.site_packages(env.path()).await.unwrap_err();
    match err {
        DiscoveryError::Ambiguous { candidates, .. } => {
            assert_eq!(candidates, vec!["python3.11", "python3.12"]);
        }
        other => panic!("expected ambiguous discovery, got {other:?}"),
    }
}

#[tokio::test]
async fn test_windows_site_packages_is_fixed() {
    let site = WindowsProfile
        .site_packages(Path::new("C:/w/.venv"))
        .await
        .unwrap();
    assert_eq!(site, Path::new("C:/w/.venv").join("Lib").join("site-packages"));
}

#[tokio::test]
async fn test_filesystem_events_reach_sender() {
    let dir = tempdir().unwrap();
    let (tx, mut rx) = pyfreeze_events::channel();
    let platform = Platform::current();
    let ctx = platform.create_context(Some(tx));

    let target = dir.path().join("a/b");
    platform.filesystem().create_dir_all(&ctx, &target).await.unwrap();
    assert!(platform.filesystem().is_dir(&ctx, &target).await);

    match rx.try_recv().unwrap() {
        AppEvent::Platform(PlatformEvent::FilesystemOperationCompleted { operation, .. }) => {
            assert_eq!(operation, "create_dir_all");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_native_process_captures_output_and_exit_code() {
    let (tx, mut rx) = pyfreeze_events::channel();
    let platform = Platform::current();
    let ctx = platform.create_context(Some(tx));

    let mut cmd = platform.command("sh");
    cmd.args(["-c", "echo \"$GREETING\"; echo oops >&2; exit 3"])
        .env("GREETING", "hello");
    let output = platform.execute_command(&ctx, cmd).await.unwrap();

    assert!(!output.success());
    assert_eq!(output.exit_code, Some(3));
    assert_eq!(output.stdout_text(), "hello");
    assert_eq!(output.stderr_text(), "oops");

    assert!(matches!(
        rx.try_recv().unwrap(),
        AppEvent::Platform(PlatformEvent::ProcessExecutionStarted { .. })
    ));
    assert!(matches!(
        rx.try_recv().unwrap(),
        AppEvent::Platform(PlatformEvent::ProcessExecutionCompleted {
            exit_code: Some(3),
            ..
        })
    ));
}

#[tokio::test]
async fn test_missing_program_is_reported() {
    let platform = Platform::current();
    let ctx = PlatformContext::default();
    let cmd = platform.command("pyfreeze-definitely-not-a-real-program");

    let err = platform.execute_command(&ctx, cmd).await.unwrap_err();
    assert!(matches!(err, PlatformError::CommandNotFound { .. }));
}
