// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared fixtures: a fake Go-style compiler written as a shell script.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use shipit::config::types::ToolchainConfig;

/// Writes `fake-go` into `dir`.
///
/// Every run writes the directory of its `-o` path to
/// `dir/calls/<GOOS>_<GOARCH>`. A run whose `GOOS/GOARCH` equals `fail_on`
/// prints to stderr and exits 1; every other run writes a text "binary"
/// listing what it was given.
pub fn fake_compiler(dir: &Path, fail_on: Option<&str>) -> PathBuf {
    fake_compiler_with_delay(dir, fail_on, 0.0)
}

/// Like [`fake_compiler`], but each run sleeps `delay_secs` while marked as
/// running, then records how many runs were active in `dir/peaks/`.
pub fn fake_compiler_with_delay(dir: &Path, fail_on: Option<&str>, delay_secs: f64) -> PathBuf {
    let script = dir.join("fake-go");
    let body = format!(
        r#"#!/bin/sh
out=""
ldflags=""
entry=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    -ldflags) ldflags="$2"; shift 2 ;;
    *) entry="$1"; shift ;;
  esac
done
base="$(dirname "$0")"
platform="${{GOOS}}_${{GOARCH}}"
mkdir -p "$base/calls" "$base/running" "$base/peaks"
dirname "$out" > "$base/calls/$platform"
touch "$base/running/$platform"
sleep {delay}
ls "$base/running" | wc -l | tr -d ' ' > "$base/peaks/$platform"
rm -f "$base/running/$platform"
if [ "$GOOS/$GOARCH" = "{fail}" ]; then
  echo "cannot compile for $GOOS/$GOARCH" >&2
  exit 1
fi
printf 'os=%s\narch=%s\ncgo=%s\nldflags=%s\nentry=%s\n' "$GOOS" "$GOARCH" "$CGO_ENABLED" "$ldflags" "$entry" > "$out"
chmod 755 "$out"
"#,
        fail = fail_on.unwrap_or("-"),
        delay = delay_secs
    );
    std::fs::write(&script, body).expect("failed to write fake compiler");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
        .expect("failed to chmod fake compiler");
    script
}

/// Toolchain settings pointing at the fake compiler.
pub fn fake_toolchain(script: PathBuf) -> ToolchainConfig {
    ToolchainConfig {
        program: script,
        ..ToolchainConfig::default()
    }
}

/// Platforms the fake compiler was invoked for, sorted.
pub fn compiler_calls(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir.join("calls")) else {
        return Vec::new();
    };
    let mut calls: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    calls.sort();
    calls
}

/// Distinct output directories the fake compiler wrote to.
pub fn compiler_output_dirs(dir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = compiler_calls(dir)
        .iter()
        .map(|platform| {
            let recorded = std::fs::read_to_string(dir.join("calls").join(platform))
                .expect("failed to read call record");
            PathBuf::from(recorded.trim())
        })
        .collect();
    dirs.sort();
    dirs.dedup();
    dirs
}

/// Highest number of fake compiler runs seen active at the same time.
pub fn peak_concurrency(dir: &Path) -> usize {
    std::fs::read_dir(dir.join("peaks"))
        .expect("failed to read peaks")
        .filter_map(Result::ok)
        .filter_map(|e| std::fs::read_to_string(e.path()).ok())
        .filter_map(|count| count.trim().parse().ok())
        .max()
        .unwrap_or(0)
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("failed to read dir")
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
