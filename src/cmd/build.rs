// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build command implementation for shipit.

use tokio_util::sync::CancellationToken;

use crate::cli::build::BuildArgs;
use crate::cmd::spawn_ctrl_c_handler;
use crate::config::Config;
use crate::error::Result;
use crate::git;
use crate::publish::build_date_now;
use crate::release::{BuilderConfig, ReleaseBuilder};

/// Builds the release builder described by `args` and `config`.
///
/// # Errors
///
/// Returns an error if `project.binary_name` is missing or the resulting
/// build configuration is incomplete.
pub fn release_builder(args: &BuildArgs, config: &Config) -> Result<ReleaseBuilder> {
    let project = &config.project;
    let commit = args
        .commit
        .clone()
        .unwrap_or_else(|| git::resolve_commit(&project.source_dir));
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.build.output_dir.clone());

    let builder = ReleaseBuilder::new(
        BuilderConfig::builder()
            .main_entry(project.main_entry.as_str())
            .binary_name(config.binary_name()?)
            .version(args.version.as_str())
            .commit(commit)
            .build_date(build_date_now())
            .output_dir(output_dir)
            .source_dir(project.source_dir.as_path())
            .toolchain(config.toolchain.clone())
            .jobs(args.jobs.unwrap_or(config.build.jobs))
            .build(),
    )?;
    Ok(builder)
}

/// Main handler for build command.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete or any target fails.
pub async fn run_build_command(args: &BuildArgs, config: &Config) -> Result<()> {
    let builder = release_builder(args, config)?;

    let token = CancellationToken::new();
    spawn_ctrl_c_handler(&token);

    let mut archives = builder.build_and_package_all(&token).await?;
    archives.sort();
    for archive in &archives {
        println!("{}", archive.display());
    }
    tracing::info!(archives = archives.len(), "Build completed successfully");
    Ok(())
}
