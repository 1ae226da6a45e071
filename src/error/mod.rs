// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              ShipError (~24 bytes)
//!                     |
//!   +-------+-------+-+-----+-------+-----+----+
//!   |       |       |       |       |     |    |
//!   v       v       v       v       v     v    v
//! Build  Publish  Proc    Net     Cfg   Git  Io/Other
//!  Box     Box    Box     Box     Box   Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Build    MissingField, Compile, Package, Cancelled, Targets[..]
//!   Publish  Upload{archive, release_id}, Cancelled
//!   Process  ExecutableNotFound, SpawnFailed, NonZeroExit, Timeout
//!   Network  Reqwest, HttpError, InvalidUrl
//!   Config   ParseError, MissingKey, InvalidValue
//!   Git      Discover, CommandFailed
//! ```

use std::fmt::Write as _;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`ShipError`].
pub type ShipResult<T> = std::result::Result<T, ShipError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum ShipError {
    /// Building or packaging one or more targets failed.
    #[error("build error: {0}")]
    Build(#[from] Box<BuildError>),

    /// Uploading release assets failed.
    #[error("publish error: {0}")]
    Publish(#[from] Box<PublishError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ShipError {
                fn from(err: $error) -> Self {
                    ShipError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    BuildError => Build,
    PublishError => Publish,
    ProcessError => Process,
    NetworkError => Network,
    ConfigError => Config,
    GitError => Git,
    std::io::Error => Io,
}

// --- Build Errors ---

/// Errors raised while compiling or packaging release artifacts.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A required builder setting was empty.
    #[error("missing required build setting '{field}'")]
    MissingField { field: &'static str },

    /// The compiler exited with a non-zero status.
    #[error("build failed for {platform}: {}", summarize_output(.output))]
    Compile { platform: String, output: String },

    /// The compiler could not be run at all.
    #[error("compiler invocation failed for {platform}: {source}")]
    Process {
        platform: String,
        #[source]
        source: ProcessError,
    },

    /// Writing the archive failed.
    #[error("failed to package '{archive}': {source}")]
    Package {
        archive: String,
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be prepared.
    #[error("failed to prepare output directory '{path}': {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Work for the target was cancelled.
    #[error("build cancelled for {platform}")]
    Cancelled { platform: String },

    /// A per-target worker panicked.
    #[error("build worker panicked: {message}")]
    TaskPanicked { message: String },

    /// One or more targets failed. Every failure is listed.
    #[error("{} target(s) failed: {}", .0.len(), format_failures(.0))]
    Targets(Vec<TargetFailure>),
}

impl BuildError {
    /// Returns the per-target failures if this is an aggregate error.
    #[must_use]
    pub fn failures(&self) -> &[TargetFailure] {
        match self {
            Self::Targets(failures) => failures,
            _ => &[],
        }
    }
}

/// A single failed target inside [`BuildError::Targets`].
#[derive(Debug, Error)]
#[error("{platform}: {error}")]
pub struct TargetFailure {
    /// Platform identifier, `os/arch`.
    pub platform: String,
    /// What went wrong for this platform.
    #[source]
    pub error: BuildError,
}

fn format_failures(failures: &[TargetFailure]) -> String {
    let mut out = String::new();
    for (i, failure) in failures.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        let _ = write!(out, "[{}] {}", failure.platform, failure.error);
    }
    out
}

/// Last non-empty line of compiler output, which is usually the actual error.
fn summarize_output(output: &str) -> String {
    output
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map_or_else(|| "no output".to_string(), ToString::to_string)
}

// --- Publish Errors ---

/// Errors raised while uploading archives to a release.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Uploading one archive failed; remaining uploads were skipped.
    #[error("failed to upload '{archive}' to release {release_id}: {source}")]
    Upload {
        archive: String,
        release_id: String,
        #[source]
        source: NetworkError,
    },

    /// Cancellation was requested before the archive was uploaded.
    #[error("upload of '{archive}' to release {release_id} cancelled")]
    Cancelled { archive: String, release_id: String },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a code outside the accepted set.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Failed to wait for or talk to the process.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Reading the local file failed.
    #[error("io error during upload: {0}")]
    Io(#[from] std::io::Error),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config: {message}")]
    ParseError { message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Failed to discover a repository from the given path.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// HEAD could not be resolved to a commit.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },
}
