// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::global::GlobalOptions;
use crate::cli::{Cli, Command};
use clap::{CommandFactory, Parser};

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["shipit", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_build() {
    let cli = Cli::try_parse_from([
        "shipit",
        "build",
        "--version",
        "v1.2.3",
        "--commit",
        "abc1234",
        "-o",
        "out",
        "-j",
        "2",
    ])
    .unwrap();
    let Some(Command::Build(args)) = cli.command else {
        panic!("expected build command");
    };
    assert_eq!(args.version, "v1.2.3");
    assert_eq!(args.commit.as_deref(), Some("abc1234"));
    assert_eq!(args.output_dir, Some("out".into()));
    assert_eq!(args.jobs, Some(2));
}

#[test]
fn test_build_requires_version() {
    assert!(Cli::try_parse_from(["shipit", "build"]).is_err());
}

#[test]
fn test_parse_release() {
    let cli = Cli::try_parse_from([
        "shipit",
        "release",
        "--version",
        "v2.0.0",
        "--release-id",
        "123456",
        "--no-progress",
    ])
    .unwrap();
    let Some(Command::Release(args)) = cli.command else {
        panic!("expected release command");
    };
    assert_eq!(args.release_id, "123456");
    assert!(args.no_progress);
    assert!(args.commit.is_none());
}

#[test]
fn test_release_requires_release_id() {
    assert!(Cli::try_parse_from(["shipit", "release", "--version", "v1"]).is_err());
}

#[test]
fn test_global_options_to_overrides() {
    let cli = Cli::try_parse_from([
        "shipit",
        "-l",
        "4",
        "--log-file",
        "shipit.log",
        "-s",
        "build.jobs=2",
        "-s",
        "github.owner = acme",
        "-c",
        "a.toml",
        "-c",
        "b.toml",
        "options",
    ])
    .unwrap();
    assert_eq!(cli.global.configs.len(), 2);

    let overrides = cli
        .global
        .to_config_overrides()
        .expect("overrides are well formed");
    insta::assert_debug_snapshot!(overrides, @r#"
    [
        (
            "build.jobs",
            "2",
        ),
        (
            "github.owner",
            " acme",
        ),
        (
            "global.output_log_level",
            "4",
        ),
        (
            "global.file_log_level",
            "4",
        ),
        (
            "global.log_file",
            "shipit.log",
        ),
    ]
    "#);
}

#[test]
fn test_set_without_equals_is_rejected() {
    let global = GlobalOptions {
        options: vec!["build.jobs".to_string()],
        ..GlobalOptions::default()
    };
    let err = global.to_config_overrides().unwrap_err();
    assert!(err.to_string().contains("KEY=VALUE"), "{err}");
}

#[test]
fn test_log_level_range() {
    assert!(Cli::try_parse_from(["shipit", "-l", "7", "version"]).is_err());
}
