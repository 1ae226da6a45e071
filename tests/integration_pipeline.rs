// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end build and packaging with a fake compiler.
//!
//! Covers:
//! - Archive naming and contents for every target
//! - Linker flags reaching the compiler
//! - Aggregated failures that leave the other archives in place
//! - Cancellation before anything is spawned
//! - The `jobs` limit on concurrent compiler runs

#![cfg(unix)]

mod common;

use std::path::{Path, PathBuf};

use async_compression::tokio::bufread::GzipDecoder;
use futures_util::StreamExt;
use shipit::error::BuildError;
use shipit::release::{BuilderConfig, ReleaseBuilder};
use tokio::io::{AsyncReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use common::{
    compiler_calls, fake_compiler, fake_compiler_with_delay, fake_toolchain, file_names,
    peak_concurrency,
};

fn release_builder(root: &Path, fail_on: Option<&str>, jobs: usize) -> ReleaseBuilder {
    let bin = root.join("bin");
    std::fs::create_dir_all(&bin).expect("failed to create bin dir");
    builder_with_compiler(root, fake_compiler(&bin, fail_on), jobs)
}

fn builder_with_compiler(root: &Path, script: PathBuf, jobs: usize) -> ReleaseBuilder {
    ReleaseBuilder::new(
        BuilderConfig::builder()
            .main_entry("./cmd/app")
            .binary_name("App")
            .version("v1.2.3")
            .commit("abc1234")
            .build_date("2026-01-02T03:04:05Z")
            .output_dir(root.join("dist"))
            .toolchain(fake_toolchain(script))
            .jobs(jobs)
            .build(),
    )
    .expect("config is complete")
}

async fn read_zip_entry(archive: &Path) -> (String, String) {
    let mut reader = async_zip::tokio::read::fs::ZipFileReader::new(archive)
        .await
        .expect("archive should be a readable zip");
    let name = String::from_utf8_lossy(reader.file().entries()[0].filename().as_bytes())
        .into_owned();
    let mut data = Vec::new();
    reader
        .reader_with_entry(0)
        .await
        .expect("entry should open")
        .read_to_end_checked(&mut data)
        .await
        .expect("entry should read");
    (name, String::from_utf8_lossy(&data).into_owned())
}

async fn read_tar_gz_entry(archive: &Path) -> (String, String) {
    let file = tokio::fs::File::open(archive)
        .await
        .expect("archive should open");
    let mut tar = tokio_tar::Archive::new(GzipDecoder::new(BufReader::new(file)));
    let mut entries = tar.entries().expect("tar entries");
    let mut entry = entries
        .next()
        .await
        .expect("one entry")
        .expect("entry should read");
    let name = entry
        .path()
        .expect("entry path")
        .to_string_lossy()
        .into_owned();
    let mut data = String::new();
    entry
        .read_to_string(&mut data)
        .await
        .expect("entry contents");
    assert!(entries.next().await.is_none(), "exactly one entry");
    (name, data)
}

#[tokio::test]
async fn test_builds_and_packages_every_target() {
    let temp = tempfile::tempdir().expect("tempdir");
    let builder = release_builder(temp.path(), None, 0);

    let mut archives = builder
        .build_and_package_all(&CancellationToken::new())
        .await
        .expect("every target should build");
    archives.sort();
    assert_eq!(archives.len(), 6);

    // Intermediate binaries are gone; only archives remain.
    insta::assert_debug_snapshot!(file_names(&temp.path().join("dist")), @r#"
    [
        "app_1.2.3_darwin_arm64.tar.gz",
        "app_1.2.3_darwin_x86_64.tar.gz",
        "app_1.2.3_linux_arm64.tar.gz",
        "app_1.2.3_linux_x86_64.tar.gz",
        "app_1.2.3_windows_arm64.zip",
        "app_1.2.3_windows_x86_64.zip",
    ]
    "#);
    assert_eq!(compiler_calls(&temp.path().join("bin")).len(), 6);
}

#[tokio::test]
async fn test_windows_archive_is_zip_with_exe_entry() {
    let temp = tempfile::tempdir().expect("tempdir");
    let builder = release_builder(temp.path(), None, 2);
    builder
        .build_and_package_all(&CancellationToken::new())
        .await
        .expect("every target should build");

    let (name, contents) =
        read_zip_entry(&temp.path().join("dist/app_1.2.3_windows_x86_64.zip")).await;
    assert_eq!(name, "App.exe");
    assert!(contents.contains("os=windows\n"), "{contents}");
    assert!(contents.contains("arch=amd64\n"), "{contents}");
    assert!(contents.contains("cgo=0\n"), "{contents}");
    assert!(contents.contains("entry=./cmd/app\n"), "{contents}");
    assert!(
        contents.contains(
            "ldflags=-s -w -X main.version=v1.2.3 -X main.commit=abc1234 -X main.date=2026-01-02T03:04:05Z\n"
        ),
        "{contents}"
    );
}

#[tokio::test]
async fn test_unix_archive_is_tar_gz_with_plain_entry() {
    let temp = tempfile::tempdir().expect("tempdir");
    let builder = release_builder(temp.path(), None, 1);
    builder
        .build_and_package_all(&CancellationToken::new())
        .await
        .expect("every target should build");

    let (name, contents) =
        read_tar_gz_entry(&temp.path().join("dist/app_1.2.3_darwin_arm64.tar.gz")).await;
    assert_eq!(name, "App");
    assert!(contents.contains("os=darwin\narch=arm64\n"), "{contents}");
}

#[tokio::test]
async fn test_one_failure_is_aggregated_and_others_survive() {
    let temp = tempfile::tempdir().expect("tempdir");
    let builder = release_builder(temp.path(), Some("windows/arm64"), 0);

    let err = builder
        .build_and_package_all(&CancellationToken::new())
        .await
        .unwrap_err();

    let BuildError::Targets(failures) = &err else {
        panic!("expected Targets, got {err:?}");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].platform, "windows/arm64");
    insta::assert_snapshot!(
        err,
        @"1 target(s) failed: [windows/arm64] build failed for windows/arm64: cannot compile for windows/arm64"
    );

    // Every target was attempted; five archives exist.
    assert_eq!(compiler_calls(&temp.path().join("bin")).len(), 6);
    let archives = file_names(&temp.path().join("dist"));
    assert_eq!(archives.len(), 5, "{archives:?}");
    assert!(!archives.iter().any(|a| a.contains("windows_arm64")));
}

#[tokio::test]
async fn test_cancelled_token_spawns_no_compiler() {
    let temp = tempfile::tempdir().expect("tempdir");
    let builder = release_builder(temp.path(), None, 0);
    let token = CancellationToken::new();
    token.cancel();

    let err = builder.build_and_package_all(&token).await.unwrap_err();
    let failures = err.failures();
    assert_eq!(failures.len(), 6);
    assert!(
        failures
            .iter()
            .all(|f| matches!(f.error, BuildError::Cancelled { .. })),
        "{err}"
    );
    assert!(compiler_calls(&temp.path().join("bin")).is_empty());
    assert!(file_names(&temp.path().join("dist")).is_empty());
}

#[tokio::test]
async fn test_jobs_limit_bounds_concurrent_compiles() {
    for jobs in [1, 2] {
        let temp = tempfile::tempdir().expect("tempdir");
        let bin = temp.path().join("bin");
        std::fs::create_dir_all(&bin).expect("failed to create bin dir");
        let script = fake_compiler_with_delay(&bin, None, 0.3);
        let builder = builder_with_compiler(temp.path(), script, jobs);

        builder
            .build_and_package_all(&CancellationToken::new())
            .await
            .expect("every target should build");

        assert_eq!(compiler_calls(&bin).len(), 6);
        let peak = peak_concurrency(&bin);
        assert!((1..=jobs).contains(&peak), "jobs={jobs} peak={peak}");
    }
}

#[tokio::test]
async fn test_unbounded_jobs_overlap_compiles() {
    let temp = tempfile::tempdir().expect("tempdir");
    let bin = temp.path().join("bin");
    std::fs::create_dir_all(&bin).expect("failed to create bin dir");
    let script = fake_compiler_with_delay(&bin, None, 0.5);
    let builder = builder_with_compiler(temp.path(), script, 0);

    builder
        .build_and_package_all(&CancellationToken::new())
        .await
        .expect("every target should build");

    assert!(peak_concurrency(&bin) > 1, "targets should build side by side");
}
