// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release artifact pipeline.
//!
//! ```text
//! BuilderConfig::builder()...build()
//!        |
//!        v
//! ReleaseBuilder::new(config)      validates, nothing spawned on error
//!        |
//!        v
//! build_and_package_all(token)
//!   one task per BuildTarget:
//!     build_binary ----> <out>/<bin>_<os>_<arch>[.exe]
//!     package_binary --> <out>/<bin>_<ver>_<os>_<arch>.{zip,tar.gz}
//!     remove intermediate binary
//!        |
//!        v
//! Vec<PathBuf> | BuildError::Targets[every failure]
//! ```

pub mod compiler;
pub mod orchestrator;
pub mod packager;
pub mod target;


use std::path::{Path, PathBuf};
use std::sync::Arc;

use bon::Builder;

use crate::config::types::ToolchainConfig;
use crate::error::BuildError;

pub use target::{BuildTarget, build_targets};

/// Everything one release build needs. Immutable once built.
///
/// # Example
///
/// ```
/// use shipit::release::{BuilderConfig, ReleaseBuilder};
///
/// let config = BuilderConfig::builder()
///     .main_entry("./cmd/app")
///     .binary_name("app")
///     .version("v1.2.3")
///     .commit("abc1234")
///     .build_date("2026-01-01T00:00:00Z")
///     .output_dir("dist")
///     .build();
/// let builder = ReleaseBuilder::new(config)?;
/// assert_eq!(builder.build_targets().len(), 6);
/// # Ok::<(), shipit::error::BuildError>(())
/// ```
#[derive(Debug, Clone, Builder)]
pub struct BuilderConfig {
    /// Package handed to the compiler, e.g. `./cmd/app`.
    #[builder(into)]
    main_entry: String,
    /// Executable name without platform suffix.
    #[builder(into)]
    binary_name: String,
    /// Release version, usually with a leading `v`.
    #[builder(into)]
    version: String,
    /// Commit hash embedded into the binary.
    #[builder(into)]
    commit: String,
    /// Build timestamp embedded into the binary.
    #[builder(into)]
    build_date: String,
    /// Directory receiving binaries and archives.
    #[builder(into)]
    output_dir: PathBuf,
    /// Directory the compiler runs in; the current directory if unset.
    #[builder(into)]
    source_dir: Option<PathBuf>,
    #[builder(default)]
    toolchain: ToolchainConfig,
    /// Maximum concurrent targets; 0 runs every target at once.
    #[builder(default)]
    jobs: usize,
}

impl BuilderConfig {
    #[must_use]
    pub fn main_entry(&self) -> &str {
        &self.main_entry
    }

    #[must_use]
    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn commit(&self) -> &str {
        &self.commit
    }

    #[must_use]
    pub fn build_date(&self) -> &str {
        &self.build_date
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    #[must_use]
    pub const fn toolchain(&self) -> &ToolchainConfig {
        &self.toolchain
    }

    #[must_use]
    pub const fn jobs(&self) -> usize {
        self.jobs
    }

    /// Checks that every required field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::MissingField` naming the first empty field.
    pub fn validate(&self) -> Result<(), BuildError> {
        let required = [
            ("version", self.version.as_str()),
            ("commit", self.commit.as_str()),
            ("build_date", self.build_date.as_str()),
            ("binary_name", self.binary_name.as_str()),
            ("main_entry", self.main_entry.as_str()),
        ];
        if let Some(&(field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(BuildError::MissingField { field });
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(BuildError::MissingField {
                field: "output_dir",
            });
        }
        Ok(())
    }
}

/// Builds, packages and names release artifacts for one [`BuilderConfig`].
///
/// Cheap to clone; per-target tasks share the configuration.
#[derive(Debug, Clone)]
pub struct ReleaseBuilder {
    config: Arc<BuilderConfig>,
}

impl ReleaseBuilder {
    /// # Errors
    ///
    /// Returns `BuildError::MissingField` if the configuration is incomplete.
    pub fn new(config: BuilderConfig) -> Result<Self, BuildError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Same list as [`build_targets`].
    #[must_use]
    pub fn build_targets(&self) -> Vec<BuildTarget> {
        build_targets()
    }

    /// Final archive path for `target`.
    #[must_use]
    pub fn archive_path(&self, target: &BuildTarget) -> PathBuf {
        self.config.output_dir.join(target::archive_file_name(
            &self.config.binary_name,
            &self.config.version,
            target,
        ))
    }

    /// Intermediate binary path for `target`.
    #[must_use]
    pub fn binary_path(&self, target: &BuildTarget) -> PathBuf {
        self.config
            .output_dir
            .join(target::binary_file_name(&self.config.binary_name, target))
    }
}
