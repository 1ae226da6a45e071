// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("go").resolve_program()?
//!   .args() .cwd() .env() .capture_output() .timeout()
//!   .run_with_cancellation(&token)
//!       --> tokio::process::Command
//!           stream stdout/stderr (arrival order)
//!       --> RunResult::{Completed(ProcessOutput), Interrupted}
//! ```

pub mod builder;
mod io;
pub mod runner;
#[cfg(test)]
mod tests;
