// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for shipit.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. shipit.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. SHIPIT__* env vars
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! SHIPIT__GITHUB__TOKEN=ghp_x      → github.token = "ghp_x"
//! SHIPIT__PROJECT__BINARY_NAME=app → project.binary_name = "app"
//! SHIPIT__BUILD__JOBS=2            → build.jobs = 2
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{BuildConfig, GithubConfig, GlobalConfig, ProjectConfig, ToolchainConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Project being released.
    pub project: ProjectConfig,
    /// External compiler.
    pub toolchain: ToolchainConfig,
    /// Build output.
    pub build: BuildConfig,
    /// Release upload target.
    pub github: GithubConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use shipit::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("shipit.toml")
    ///     .with_env_prefix("SHIPIT")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate values that are present. Missing required keys are reported
    /// by the accessor of the command that needs them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for malformed values.
    pub fn validate(&self) -> Result<()> {
        let name = &self.project.binary_name;
        if name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                section: "project".to_string(),
                key: "binary_name".to_string(),
                message: format!("must be a file name, got '{name}'"),
            }
            .into());
        }

        if self.toolchain.program.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "toolchain".to_string(),
                key: "program".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }

        if let Err(e) = reqwest::Url::parse(&self.github.upload_url) {
            return Err(ConfigError::InvalidValue {
                section: "github".to_string(),
                key: "upload_url".to_string(),
                message: e.to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Returns the configured binary name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if `project.binary_name` is empty.
    pub fn binary_name(&self) -> std::result::Result<&str, ConfigError> {
        require("project", "binary_name", &self.project.binary_name)
    }

    /// Returns the GitHub settings once owner, repo and token are all set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` naming the first empty key.
    pub fn github(&self) -> std::result::Result<&GithubConfig, ConfigError> {
        require("github", "owner", &self.github.owner)?;
        require("github", "repo", &self.github.repo)?;
        require("github", "token", &self.github.token)?;
        Ok(&self.github)
    }

    /// Format configuration options for display.
    ///
    /// The GitHub token is shown as `[hidden]`. Output is sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_project_options(&mut options);
        self.format_toolchain_options(&mut options);
        self.format_build_options(&mut options);
        self.format_github_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| {
                format!("{key:<max_key_len$} = {value}")
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
    }

    fn format_project_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "project.binary_name".into(),
            self.project.binary_name.clone(),
        );
        options.insert("project.main_entry".into(), self.project.main_entry.clone());
        options.insert(
            "project.source_dir".into(),
            self.project.source_dir.display().to_string(),
        );
    }

    fn format_toolchain_options(&self, options: &mut BTreeMap<String, String>) {
        let t = &self.toolchain;
        options.insert("toolchain.program".into(), t.program.display().to_string());
        options.insert("toolchain.os_var".into(), t.os_var.clone());
        options.insert("toolchain.arch_var".into(), t.arch_var.clone());
        options.insert("toolchain.version_symbol".into(), t.version_symbol.clone());
        options.insert("toolchain.commit_symbol".into(), t.commit_symbol.clone());
        options.insert("toolchain.date_symbol".into(), t.date_symbol.clone());
        options.insert("toolchain.timeout_secs".into(), t.timeout_secs.to_string());
    }

    fn format_build_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "build.output_dir".into(),
            self.build.output_dir.display().to_string(),
        );
        options.insert("build.jobs".into(), self.build.jobs.to_string());
    }

    fn format_github_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("github.owner".into(), self.github.owner.clone());
        options.insert("github.repo".into(), self.github.repo.clone());
        if !self.github.token.is_empty() {
            options.insert("github.token".into(), "[hidden]".into());
        }
        options.insert("github.upload_url".into(), self.github.upload_url.clone());
    }
}

fn require<'a>(
    section: &str,
    key: &str,
    value: &'a str,
) -> std::result::Result<&'a str, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
    } else {
        Ok(value)
    }
}
