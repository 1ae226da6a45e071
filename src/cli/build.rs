// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build and targets command arguments.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the `build` command.
#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// Release version, e.g. v1.2.3.
    #[arg(long = "version", value_name = "VERSION")]
    pub version: String,

    /// Commit to embed; defaults to the short hash of HEAD.
    #[arg(long = "commit", value_name = "COMMIT")]
    pub commit: Option<String>,

    /// Overrides `build.output_dir`.
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Overrides `build.jobs` (0 builds every target at once).
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,
}

/// Arguments for the `targets` command.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetsArgs {
    /// Version used to render archive names.
    #[arg(long = "version", value_name = "VERSION")]
    pub version: Option<String>,
}
