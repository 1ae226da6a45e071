// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Logging for release runs.
//!
//! ```text
//! init_logging(&LogConfig)
//!        |
//!        v
//!    registry
//!    |            |
//!    v            v
//! Console        File (optional)
//! stderr, ANSI   appended per run, non_blocking
//! ReleaseFormat  ReleaseFormat + timestamp + target
//!        |
//!        v
//!    LogGuard (flush on drop)
//! ```
//!
//! Every line leads with the part of the release it concerns:
//!
//! ```text
//!  INFO [linux/amd64] compiled binary=dist/app_linux_amd64
//!  INFO [linux/amd64 dist/app_1.0.0_linux_x86_64.tar.gz] packaged
//!  WARN [#321 app_1.0.0_windows_x86_64.zip] upload cancelled
//!  INFO release built archives=6
//! ```

use std::fmt::{self, Write as _};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bon::Builder;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    EnvFilter, Layer, fmt as sub_fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::error::{ConfigError, Result};

/// Verbosity, 0-6, as written in `[global]` and on the command line.
///
/// - 0: Silent
/// - 1: Error
/// - 2: Warn
/// - 3: Info (default): one line per compiled, packaged and uploaded artifact
/// - 4: Debug: every compiler command line
/// - 5: Trace: compiler output lines
/// - 6: Dump: trace output from dependencies too
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(u8);

impl Default for LogLevel {
    fn default() -> Self {
        Self::INFO
    }
}

impl LogLevel {
    pub const SILENT: Self = Self(0);
    pub const ERROR: Self = Self(1);
    pub const WARN: Self = Self(2);
    pub const INFO: Self = Self(3);
    pub const DEBUG: Self = Self(4);
    pub const TRACE: Self = Self(5);
    pub const DUMP: Self = Self(6);

    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` if the level is greater than 6.
    pub fn new(level: u8) -> std::result::Result<Self, ConfigError> {
        Self::from_u8(level).ok_or_else(|| ConfigError::InvalidValue {
            section: "global".to_string(),
            key: "log_level".to_string(),
            message: format!("log level must be 0-6, got {level}"),
        })
    }

    #[must_use]
    pub const fn from_u8(level: u8) -> Option<Self> {
        if level <= 6 { Some(Self(level)) } else { None }
    }

    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// `EnvFilter` directives. Below DUMP, dependencies are held at `warn`.
    #[must_use]
    pub const fn to_filter_string(self) -> &'static str {
        match self.0 {
            0 => "off",
            1 => "error",
            2 => "warn",
            3 => "warn,shipit=info",
            4 => "warn,shipit=debug",
            5 => "warn,shipit=trace",
            _ => "trace",
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Line format
// =============================================================================

/// Fields that name what an event is about, in the order they lead a line.
const SCOPE_FIELDS: [&str; 3] = ["release_id", "platform", "archive"];

/// One event's fields, split into scope, message and the rest.
#[derive(Debug, Default)]
pub(crate) struct EventFields {
    scope: [Option<String>; 3],
    message: String,
    rest: Vec<(&'static str, String)>,
}

impl EventFields {
    fn record(&mut self, name: &'static str, value: String) {
        if name == "message" {
            self.message = value;
        } else if let Some(slot) = SCOPE_FIELDS.iter().position(|f| *f == name) {
            self.scope[slot] = Some(value);
        } else {
            self.rest.push((name, value));
        }
    }

    /// `[#<release_id> <platform> <archive>] <message> key=value ...`,
    /// leaving out whichever scope fields the event did not carry.
    pub(crate) fn render(&self, out: &mut impl fmt::Write, ansi: bool) -> fmt::Result {
        let mut scope = self.scope.iter().enumerate().filter_map(|(i, v)| {
            v.as_deref().map(|v| if i == 0 { format!("#{v}") } else { v.to_string() })
        });
        if let Some(first) = scope.next() {
            let joined = scope.fold(first, |acc, part| acc + " " + &part);
            if ansi {
                write!(out, " \x1b[1m[{joined}]\x1b[0m")?;
            } else {
                write!(out, " [{joined}]")?;
            }
        }
        if !self.message.is_empty() {
            write!(out, " {}", self.message)?;
        }
        for (name, value) in &self.rest {
            write!(out, " {name}={value}")?;
        }
        Ok(())
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field.name(), format!("{value:?}"));
    }
}

/// Event formatter that puts the release scope of an event first.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseFormat {
    timestamp: bool,
    target: bool,
}

impl ReleaseFormat {
    /// Level, scope and message only.
    #[must_use]
    pub const fn console() -> Self {
        Self {
            timestamp: false,
            target: false,
        }
    }

    /// Adds a UTC timestamp and the module path, for log files that outlive
    /// the run.
    #[must_use]
    pub const fn file() -> Self {
        Self {
            timestamp: true,
            target: true,
        }
    }
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "\x1b[31m",
        Level::WARN => "\x1b[33m",
        Level::INFO => "\x1b[32m",
        Level::DEBUG => "\x1b[34m",
        _ => "\x1b[35m",
    }
}

impl<S, N> FormatEvent<S, N> for ReleaseFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        if self.timestamp {
            write!(
                writer,
                "{} ",
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
            )?;
        }
        if ansi {
            write!(writer, "{}{:>5}\x1b[0m", level_color(*meta.level()), meta.level())?;
        } else {
            write!(writer, "{:>5}", meta.level())?;
        }
        if self.target {
            write!(writer, " {}:", meta.target())?;
        }

        let mut fields = EventFields::default();
        event.record(&mut fields);
        fields.render(&mut writer, ansi)?;
        writer.write_char('\n')
    }
}

// =============================================================================
// Setup
// =============================================================================

#[derive(Debug, Clone, Builder)]
pub struct LogConfig {
    #[builder(setters(name = with_console_level), default = LogLevel::INFO)]
    console_level: LogLevel,
    #[builder(setters(name = with_file_level), default = LogLevel::TRACE)]
    file_level: LogLevel,
    /// Appended to, so the history of earlier releases survives.
    #[builder(setters(name = with_log_file), into)]
    log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LogConfig {
    #[must_use]
    pub const fn console_level(&self) -> LogLevel {
        self.console_level
    }

    #[must_use]
    pub const fn file_level(&self) -> LogLevel {
        self.file_level
    }

    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

/// Keeps the file writer alive; pending lines are flushed on drop.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
///
/// # Example
///
/// ```no_run
/// use shipit::logging::{init_logging, LogConfig, LogLevel};
///
/// let config = LogConfig::builder()
///     .with_console_level(LogLevel::INFO)
///     .with_file_level(LogLevel::DEBUG)
///     .with_log_file("dist/shipit.log")
///     .build();
///
/// let _guard = init_logging(&config)?;
/// tracing::info!(platform = "linux/amd64", "compiled");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let console_layer = sub_fmt::layer()
        .event_format(ReleaseFormat::console())
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(config.console_level().to_filter_string()));

    let (file_layer, file_guard) = match config.log_file() {
        Some(path) => {
            let file = open_log_file(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = sub_fmt::layer()
                .event_format(ReleaseFormat::file())
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(config.file_level().to_filter_string()));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")?;

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

/// Opens `path` for appending, creating it and its directory if needed.
pub(crate) fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok(file)
}
