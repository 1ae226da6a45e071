// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! External compiler invocation for a single target.
//!
//! ```text
//! <program> build -o <out>/<bin>_<os>_<arch>[.exe]
//!     -ldflags "-s -w -X main.version=V -X main.commit=C -X main.date=D"
//!     -trimpath <main_entry>
//! env: CGO_ENABLED=0 GOOS=<os> GOARCH=<arch> (+ inherited)
//! ```

use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::ReleaseBuilder;
use super::target::BuildTarget;
use crate::core::process::builder::{ProcessBuilder, ProcessFlags};
use crate::core::process::runner::RunResult;
use crate::error::BuildError;

impl ReleaseBuilder {
    /// Linker flags stamping version, commit and date into the binary.
    #[must_use]
    pub fn ldflags(&self) -> String {
        let cfg = self.config();
        let tc = cfg.toolchain();
        format!(
            "-s -w -X {}={} -X {}={} -X {}={}",
            tc.version_symbol,
            cfg.version(),
            tc.commit_symbol,
            cfg.commit(),
            tc.date_symbol,
            cfg.build_date()
        )
    }

    /// The compiler command for `target`, ready to run.
    #[must_use]
    pub fn compiler_command(&self, target: &BuildTarget) -> ProcessBuilder {
        let cfg = self.config();
        let tc = cfg.toolchain();
        let mut output = self.binary_path(target);
        // The compiler runs in source_dir; relative outputs stay relative to our cwd.
        if cfg.source_dir().is_some() && output.is_relative() {
            output = std::path::absolute(&output).unwrap_or(output);
        }

        let mut process = ProcessBuilder::new(&tc.program)
            .name(format!("compile {target}"))
            .arg("build")
            .arg("-o")
            .arg(&output)
            .arg("-ldflags")
            .arg(self.ldflags())
            .arg("-trimpath")
            .arg(cfg.main_entry())
            .env("CGO_ENABLED", "0")
            .env(tc.os_var.as_str(), target.os())
            .env(tc.arch_var.as_str(), target.arch())
            .capture_output()
            .flag(ProcessFlags::ALLOW_FAILURE);

        if let Some(dir) = cfg.source_dir() {
            process = process.cwd(dir);
        }
        if tc.timeout_secs > 0 {
            process = process.timeout(Duration::from_secs(tc.timeout_secs));
        }
        process
    }

    /// Compiles the binary for one target.
    ///
    /// Returns the path of the produced executable,
    /// `<output_dir>/<binary>_<os>_<arch>[.exe]`.
    ///
    /// # Errors
    ///
    /// - `BuildError::Cancelled` if the token is cancelled before or during
    ///   the compile. Nothing is spawned if it was cancelled before.
    /// - `BuildError::Compile` with the combined compiler output on a
    ///   non-zero exit.
    /// - `BuildError::Process` if the compiler is not in PATH, cannot be
    ///   spawned or times out.
    pub async fn build_binary(
        &self,
        token: &CancellationToken,
        target: &BuildTarget,
    ) -> Result<PathBuf, BuildError> {
        let platform = target.platform();
        if token.is_cancelled() {
            return Err(BuildError::Cancelled { platform });
        }

        let output = self.binary_path(target);
        let process = self
            .compiler_command(target)
            .resolve_program()
            .map_err(|source| BuildError::Process {
                platform: platform.clone(),
                source,
            })?;
        debug!(platform = %platform, cmd = %process.command_line(), "compiling");

        let result = process
            .run_with_cancellation(token)
            .await
            .map_err(|source| BuildError::Process {
                platform: platform.clone(),
                source,
            })?;

        match result {
            RunResult::Interrupted => {
                warn!(platform = %platform, "compile interrupted");
                Err(BuildError::Cancelled { platform })
            }
            RunResult::Completed(out) if !out.success() => Err(BuildError::Compile {
                platform,
                output: out.combined(),
            }),
            RunResult::Completed(_) => {
                info!(platform = %platform, binary = %output.display(), "compiled");
                Ok(output)
            }
        }
    }
}
