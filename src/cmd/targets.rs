// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Targets command: prints the release matrix.

use crate::cli::build::TargetsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::release::build_targets;
use crate::release::target::archive_file_name;

/// Version used for archive names when none is given.
const PLACEHOLDER_VERSION: &str = "VERSION";

/// Print each target with its archive name.
///
/// # Errors
///
/// Returns an error if `project.binary_name` is not configured.
pub fn run_targets_command(args: &TargetsArgs, config: &Config) -> Result<()> {
    for line in format_targets(args, config)? {
        println!("{line}");
    }
    Ok(())
}

/// One line per target: `os/arch  archive`.
///
/// # Errors
///
/// Returns an error if `project.binary_name` is not configured.
pub fn format_targets(args: &TargetsArgs, config: &Config) -> Result<Vec<String>> {
    let binary_name = config.binary_name()?;
    let version = args.version.as_deref().unwrap_or(PLACEHOLDER_VERSION);
    let targets = build_targets();
    let width = targets.iter().map(|t| t.platform().len()).max().unwrap_or(0);

    Ok(targets
        .iter()
        .map(|t| {
            format!(
                "{:<width$}  {}",
                t.platform(),
                archive_file_name(binary_name, version, t)
            )
        })
        .collect())
}
