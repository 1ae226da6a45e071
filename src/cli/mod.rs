// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for shipit using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! shipit [global options] <command>
//! version
//! options
//! config-files
//! targets [--version V]
//! build   --version V [--commit C] [--output-dir DIR] [--jobs N]
//! release --version V --release-id ID [--commit C] [--jobs N] [--no-progress]
//! ```

pub mod build;
pub mod global;
pub mod release;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};

use crate::cli::build::{BuildArgs, TargetsArgs};
use crate::cli::global::GlobalOptions;
use crate::cli::release::ReleaseArgs;

/// Cross-platform release builder.
///
/// Compiles a binary for every supported OS/architecture, packages each one
/// and uploads the archives to a release.
#[derive(Debug, Parser)]
#[command(
    name = "shipit",
    author,
    version,
    about = "Cross-platform release builder",
    long_about = "shipit Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Compiles one binary per OS/architecture with the configured\n\
                  toolchain, packages each into a zip (Windows) or tar.gz, and\n\
                  uploads the archives to a GitHub release.",
    after_help = "CONFIG FILES:\n\n\
                  shipit reads `shipit.toml` from the current directory if it\n\
                  exists, then every file given with --config, in order. Values\n\
                  from SHIPIT__SECTION__KEY environment variables come last,\n\
                  e.g. SHIPIT__GITHUB__TOKEN. Use --no-default-config to skip\n\
                  `shipit.toml`."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in load order.
    #[command(name = "config-files")]
    ConfigFiles,

    /// Lists the release targets and their archive names.
    Targets(TargetsArgs),

    /// Builds and packages every target into a directory.
    Build(BuildArgs),

    /// Builds every target and uploads the archives to a release.
    Release(ReleaseArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Tries to parse command-line arguments from an iterator.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version
/// information was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
