// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release command arguments.

use clap::Args;

/// Arguments for the `release` command.
#[derive(Debug, Clone, Args)]
pub struct ReleaseArgs {
    /// Release version, e.g. v1.2.3.
    #[arg(long = "version", value_name = "VERSION")]
    pub version: String,

    /// Identifier of the existing release receiving the assets.
    #[arg(long = "release-id", value_name = "ID")]
    pub release_id: String,

    /// Commit to embed; defaults to the short hash of HEAD.
    #[arg(long = "commit", value_name = "COMMIT")]
    pub commit: Option<String>,

    /// Overrides `build.jobs` (0 builds every target at once).
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Disables the upload progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}
