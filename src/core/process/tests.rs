// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use super::runner::RunResult;
use crate::error::ProcessError;

/// Runs to completion with a token that is never cancelled.
async fn run(process: ProcessBuilder) -> Result<ProcessOutput, ProcessError> {
    match process
        .run_with_cancellation(&CancellationToken::new())
        .await?
    {
        RunResult::Completed(output) => Ok(output),
        RunResult::Interrupted => panic!("nothing cancelled this run"),
    }
}

#[cfg(unix)]
fn sh(script: &str) -> ProcessBuilder {
    ProcessBuilder::new("/bin/sh").arg("-c").arg(script)
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_echo() {
    let output = run(ProcessBuilder::new("echo").arg("hello").capture_output())
        .await
        .expect("echo should succeed");

    assert!(output.success());
    insta::assert_snapshot!(output.stdout().trim(), @"hello");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_combined_output_keeps_both_streams() {
    let output = run(
        sh("echo out; echo err 1>&2; exit 3")
            .capture_output()
            .flag(ProcessFlags::ALLOW_FAILURE),
    )
    .await
    .expect("process should complete");

    assert_eq!(output.exit_code(), 3);
    assert_eq!(output.stdout(), "out");
    assert_eq!(output.stderr(), "err");
    let combined = output.combined();
    assert!(combined.contains("out") && combined.contains("err"), "{combined}");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_non_zero_exit_is_error() {
    let err = run(sh("exit 42")).await.unwrap_err();
    match err {
        ProcessError::NonZeroExit { code, .. } => assert_eq!(code, 42),
        other => panic!("expected NonZeroExit, got {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_env_is_added_to_inherited() {
    let output = run(
        sh("echo \"$SHIPIT_TEST_VAR:${PATH:+has-path}\"")
            .env("SHIPIT_TEST_VAR", "test_value")
            .capture_output(),
    )
    .await
    .expect("process should succeed");

    insta::assert_snapshot!(output.stdout().trim(), @"test_value:has-path");
}

#[tokio::test]
async fn test_cancelled_token_spawns_nothing() {
    let token = CancellationToken::new();
    token.cancel();

    // The program does not exist; spawning it would fail with SpawnFailed.
    let result = ProcessBuilder::new("definitely-not-a-real-program-xyz")
        .run_with_cancellation(&token)
        .await
        .expect("cancelled run should not try to spawn");
    assert!(matches!(result, RunResult::Interrupted));
}

#[cfg(unix)]
#[tokio::test]
async fn test_cancel_while_running_kills_child() {
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let result = sh("sleep 30")
        .run_with_cancellation(&token)
        .await
        .expect("interrupted run is not an error");
    assert!(matches!(result, RunResult::Interrupted));
}

#[cfg(unix)]
#[tokio::test]
async fn test_timeout() {
    let err = run(sh("sleep 30").timeout(Duration::from_millis(100)))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::Timeout { .. }), "{err:?}");
}

#[tokio::test]
async fn test_spawn_failure() {
    let err = run(ProcessBuilder::new("./definitely-not-a-real-program-xyz"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::SpawnFailed { .. }), "{err:?}");
}

#[test]
fn test_command_line_quotes_spaces() {
    let builder = ProcessBuilder::new("go")
        .arg("build")
        .arg("-ldflags")
        .arg("-s -w");
    insta::assert_snapshot!(builder.command_line(), @r#"go build -ldflags "-s -w""#);
}

#[test]
fn test_resolve_program_not_in_path() {
    let err = ProcessBuilder::new("nonexistent_program_12345")
        .resolve_program()
        .unwrap_err();
    assert!(matches!(err, ProcessError::ExecutableNotFound { .. }), "{err:?}");
    insta::assert_snapshot!(err, @"executable not found: 'nonexistent_program_12345' (not in PATH)");
    assert!(ProcessBuilder::find("nonexistent_program_12345").is_none());
}

#[test]
fn test_resolve_program_leaves_paths_alone() {
    for program in ["/opt/go/bin/go", "./tools/go", "tools/go"] {
        let resolved = ProcessBuilder::new(program)
            .resolve_program()
            .expect("paths are not looked up");
        assert_eq!(resolved.program(), &std::path::PathBuf::from(program));
    }
}

#[cfg(unix)]
#[test]
fn test_resolve_program_uses_path_and_cache() {
    let path = ProcessBuilder::find("sh").expect("sh should be in PATH");
    assert!(path.is_absolute());
    // second lookup is served from the cache
    assert_eq!(ProcessBuilder::find("sh"), Some(path.clone()));

    let resolved = ProcessBuilder::new("sh")
        .arg("-c")
        .resolve_program()
        .expect("sh should be in PATH");
    assert_eq!(resolved.program(), &path);
    assert_eq!(resolved.args_slice(), ["-c"]);
}
