// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for shipit.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, ProjectConfig, ToolchainConfig, BuildConfig, GithubConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; empty disables file logging.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// What is being built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Name of the produced executable, without platform suffix.
    pub binary_name: String,
    /// Package passed to the compiler, e.g. `./cmd/app`.
    pub main_entry: String,
    /// Directory the compiler runs in (module root).
    pub source_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            binary_name: String::new(),
            main_entry: ".".to_string(),
            source_dir: PathBuf::from("."),
        }
    }
}

/// External compiler settings.
///
/// The defaults describe the Go toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Compiler executable.
    pub program: PathBuf,
    /// Environment variable selecting the target OS.
    pub os_var: String,
    /// Environment variable selecting the target architecture.
    pub arch_var: String,
    /// Linker symbol receiving the version string.
    pub version_symbol: String,
    /// Linker symbol receiving the commit hash.
    pub commit_symbol: String,
    /// Linker symbol receiving the build date.
    pub date_symbol: String,
    /// Kill a compiler run after this many seconds (0 = no limit).
    pub timeout_secs: u64,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("go"),
            os_var: "GOOS".to_string(),
            arch_var: "GOARCH".to_string(),
            version_symbol: "main.version".to_string(),
            commit_symbol: "main.commit".to_string(),
            date_symbol: "main.date".to_string(),
            timeout_secs: 0,
        }
    }
}

/// Build output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Where `shipit build` writes archives.
    pub output_dir: PathBuf,
    /// Maximum concurrent target builds (0 = one task per target).
    pub jobs: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            jobs: 0,
        }
    }
}

/// GitHub release upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// API token with `contents: write`.
    pub token: String,
    /// Base URL of the asset upload endpoint.
    pub upload_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            token: String::new(),
            upload_url: "https://uploads.github.com".to_string(),
        }
    }
}
