// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use crate::cli::build::{BuildArgs, TargetsArgs};
use crate::cli::global::GlobalOptions;
use crate::cmd::build::release_builder;
use crate::cmd::targets::format_targets;
use crate::cmd::{build_config_loader, load_config};
use crate::config::Config;

fn config_with_binary() -> Config {
    Config::parse(
        r#"
[project]
binary_name = "App"
main_entry = "./cmd/app"

[build]
output_dir = "out"
jobs = 4
"#,
    )
    .expect("config should parse")
}

#[test]
fn test_format_targets() {
    let args = TargetsArgs {
        version: Some("v1.2.3".to_string()),
    };
    let lines = format_targets(&args, &config_with_binary()).expect("binary name is set");
    insta::assert_snapshot!(lines.join("\n"), @r"
    linux/amd64    app_1.2.3_linux_x86_64.tar.gz
    linux/arm64    app_1.2.3_linux_arm64.tar.gz
    windows/amd64  app_1.2.3_windows_x86_64.zip
    windows/arm64  app_1.2.3_windows_arm64.zip
    darwin/amd64   app_1.2.3_darwin_x86_64.tar.gz
    darwin/arm64   app_1.2.3_darwin_arm64.tar.gz
    ");
}

#[test]
fn test_format_targets_requires_binary_name() {
    let err = format_targets(&TargetsArgs::default(), &Config::default()).unwrap_err();
    assert!(err.to_string().contains("binary_name"), "{err}");
}

#[test]
fn test_config_loader_layers_files_and_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("release.toml");
    std::fs::write(
        &file,
        "[project]\nbinary_name = \"app\"\n[build]\njobs = 1\n",
    )
    .expect("write config");

    let global = GlobalOptions {
        configs: vec![file.clone()],
        options: vec!["build.jobs=3".to_string()],
        no_default_config: true,
        ..GlobalOptions::default()
    };

    let loader = build_config_loader(&global).expect("overrides are well formed");
    assert_eq!(
        loader.format_loaded_files(),
        vec![format!("1. [file] {}", file.display())]
    );

    let config = load_config(&global).expect("config should load");
    assert_eq!(config.binary_name().expect("set in file"), "app");
    assert_eq!(config.build.jobs, 3);
}

#[test]
fn test_config_loader_missing_file() {
    let global = GlobalOptions {
        configs: vec!["/nonexistent/shipit-release.toml".into()],
        no_default_config: true,
        ..GlobalOptions::default()
    };
    assert!(load_config(&global).is_err());
}

#[test]
fn test_release_builder_from_args_and_config() {
    let config = config_with_binary();
    let args = BuildArgs {
        version: "v2.0.0".to_string(),
        commit: Some("deadbee".to_string()),
        output_dir: None,
        jobs: None,
    };
    let builder = release_builder(&args, &config).expect("complete configuration");
    let built = builder.config();
    assert_eq!(built.binary_name(), "App");
    assert_eq!(built.main_entry(), "./cmd/app");
    assert_eq!(built.commit(), "deadbee");
    assert_eq!(built.output_dir(), Path::new("out"));
    assert_eq!(built.jobs(), 4);
    assert!(!built.build_date().is_empty());

    let args = BuildArgs {
        output_dir: Some("elsewhere".into()),
        jobs: Some(1),
        ..args
    };
    let builder = release_builder(&args, &config).expect("complete configuration");
    assert_eq!(builder.config().output_dir(), Path::new("elsewhere"));
    assert_eq!(builder.config().jobs(), 1);
}

#[test]
fn test_release_builder_rejects_empty_version() {
    let args = BuildArgs {
        version: String::new(),
        commit: Some("abc1234".to_string()),
        output_dir: None,
        jobs: None,
    };
    let err = release_builder(&args, &config_with_binary()).unwrap_err();
    assert!(err.to_string().contains("version"), "{err}");
}
