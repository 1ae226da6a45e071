// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config (options, config-files), targets, build, release
//! ```

pub mod build;
pub mod config;
pub mod release;
pub mod targets;

#[cfg(test)]
mod tests;

use tokio_util::sync::CancellationToken;

use crate::cli::global::GlobalOptions;
use crate::config::Config;
use crate::config::loader::ConfigLoader;
use crate::error::Result;

/// Name of the configuration file read from the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "shipit.toml";

/// Prefix of configuration environment variables, e.g. `SHIPIT__GITHUB__TOKEN`.
pub const ENV_PREFIX: &str = "SHIPIT";

/// Builds the layered loader for the given global options.
///
/// # Errors
///
/// Returns an error if a `--set` entry or another override is malformed.
pub fn build_config_loader(global: &GlobalOptions) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for (key, value) in global.to_config_overrides()? {
        loader = loader.set(&key, value)?;
    }
    Ok(loader)
}

/// Loads and validates the configuration for the given global options.
///
/// # Errors
///
/// Returns an error if a file is missing or malformed, or a value is invalid.
pub fn load_config(global: &GlobalOptions) -> Result<Config> {
    build_config_loader(global)?.build()
}

/// Cancels `token` on Ctrl+C.
pub fn spawn_ctrl_c_handler(token: &CancellationToken) {
    let cancel_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, cancelling release...");
            cancel_token.cancel();
        }
    });
}
