// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run_with_cancellation(token)
//!              |
//!      token cancelled? --> Interrupted (nothing spawned)
//!              |
//!              v
//!     build_command()
//!     args, cwd, env, stdio
//!              |
//!              v
//!          spawn() --> run_child()
//!              |
//!              v
//!    validate exit_code
//!    (skip if ALLOW_FAILURE)
//!              |
//!              v
//!       RunResult::Completed(ProcessOutput)
//! ```

use std::fmt::Write as _;
use std::process::Stdio;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
use super::io::ChildOutcome;
use crate::error::ProcessError;

/// Result of a process run that was allowed to start.
#[derive(Debug)]
pub enum RunResult {
    /// The process ran to completion.
    Completed(ProcessOutput),
    /// The token was cancelled, either before spawning or while running.
    Interrupted,
}

impl ProcessBuilder {
    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process with cancellation support.
    ///
    /// If the token is already cancelled, no process is spawned. If it is
    /// cancelled while the child runs, the child is killed. Both cases
    /// return [`RunResult::Interrupted`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Spawning the child process fails.
    /// - The timeout elapses.
    /// - The process exits with a non-zero status and `ALLOW_FAILURE` is not set.
    pub async fn run_with_cancellation(
        &self,
        token: &CancellationToken,
    ) -> Result<RunResult, ProcessError> {
        if token.is_cancelled() {
            return Ok(RunResult::Interrupted);
        }

        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut child =
            self.build_command()
                .spawn()
                .map_err(|source| ProcessError::SpawnFailed {
                    command: cmd_line.clone(),
                    source,
                })?;
        trace!(process = %name, pid = ?child.id(), "spawned");

        let outcome = self
            .run_child(&name, &mut child, token)
            .await
            .map_err(|e| ProcessError::OutputError {
                command: cmd_line.clone(),
                message: e.to_string(),
            })?;

        let output = match outcome {
            ChildOutcome::Exited(output) => output,
            ChildOutcome::Interrupted => return Ok(RunResult::Interrupted),
            ChildOutcome::TimedOut(duration) => {
                return Err(ProcessError::Timeout {
                    command: cmd_line,
                    timeout_secs: duration.as_secs(),
                });
            }
        };

        if !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) && !output.success() {
            let stderr = output.stderr();
            if !stderr.is_empty() {
                error!(process = %name, stderr = %stderr, "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code: output.exit_code(),
            });
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(RunResult::Completed(output))
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        for (key, value) in self.env_vars() {
            command.env(key, value);
        }

        command.stdin(Stdio::null());
        command.stdout(Self::stdio_from_flags(self.stdout_stream_flags()));
        command.stderr(Self::stdio_from_flags(self.stderr_stream_flags()));

        // Kill on drop so an aborted build never leaves a compiler behind
        command.kill_on_drop(true);

        command
    }

    fn stdio_from_flags(flags: StreamFlags) -> Stdio {
        if flags.is_empty() {
            Stdio::null()
        } else {
            Stdio::piped()
        }
    }
}
