// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> config --> Logging --> Command Dispatch
//!   Version | Options | ConfigFiles | Targets | Build | Release
//! ```

use std::process::ExitCode;

use shipit::cli::global::GlobalOptions;
use shipit::cli::{self, Command};
use shipit::cmd::build::run_build_command;
use shipit::cmd::config::{run_config_files_command, run_options_command};
use shipit::cmd::release::run_release_command;
use shipit::cmd::targets::run_targets_command;
use shipit::cmd::{build_config_loader, load_config};
use shipit::config::Config;
use shipit::logging::init_logging;
use shipit::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    // Commands that need no configuration still get a logger when it is broken.
    let config = load_config(&cli.global);
    let log_config = build_log_config(&cli.global, config.as_ref().ok());
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config).await
}

/// `[global]` settings from the merged config, or the raw flags when the
/// config failed to load.
fn build_log_config(global: &GlobalOptions, config: Option<&Config>) -> LogConfig {
    if let Some(config) = config {
        return LogConfig::builder()
            .with_console_level(config.global.output_log_level)
            .with_file_level(config.global.file_log_level)
            .maybe_with_log_file(config.global.log_file.clone())
            .build();
    }

    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.clone())
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: shipit::error::Result<Config>) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => config.map(|config| run_options_command(&config)),
        Some(Command::ConfigFiles) => build_config_loader(&cli.global).map(|loader| {
            run_config_files_command(&loader.format_loaded_files());
        }),
        Some(Command::Targets(args)) => {
            config.and_then(|config| run_targets_command(args, &config))
        }
        Some(Command::Build(args)) => match config {
            Ok(config) => run_build_command(args, &config).await,
            Err(e) => Err(e),
        },
        Some(Command::Release(args)) => match config {
            Ok(config) => run_release_command(args, &config).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}
