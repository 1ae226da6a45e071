// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The fixed release target matrix and per-platform naming rules.
//!
//! ```text
//!  os       arch    binary suffix  archive  archive arch
//!  linux    amd64                  tar.gz   x86_64
//!  linux    arm64                  tar.gz   arm64
//!  windows  amd64   .exe           zip      x86_64
//!  windows  arm64   .exe           zip      arm64
//!  darwin   amd64                  tar.gz   x86_64
//!  darwin   arm64                  tar.gz   arm64
//! ```

use std::fmt;

/// One (OS, architecture) pair, spelled the way the toolchain expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildTarget {
    os: String,
    arch: String,
}

impl BuildTarget {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    #[must_use]
    pub fn os(&self) -> &str {
        &self.os
    }

    #[must_use]
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Platform identifier, `os/arch`.
    #[must_use]
    pub fn platform(&self) -> String {
        self.to_string()
    }

    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// `.exe` on Windows, empty elsewhere.
    #[must_use]
    pub fn exe_suffix(&self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }

    #[must_use]
    pub fn archive_format(&self) -> ArchiveFormat {
        if self.is_windows() {
            ArchiveFormat::Zip
        } else {
            ArchiveFormat::TarGz
        }
    }

    /// Architecture as it appears in archive names.
    #[must_use]
    pub fn archive_arch(&self) -> &str {
        map_arch(&self.arch)
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Container format of a release archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

const TARGETS: [(&str, &str); 6] = [
    ("linux", "amd64"),
    ("linux", "arm64"),
    ("windows", "amd64"),
    ("windows", "arm64"),
    ("darwin", "amd64"),
    ("darwin", "arm64"),
];

/// Every target a release is built for, in a fixed order.
#[must_use]
pub fn build_targets() -> Vec<BuildTarget> {
    TARGETS
        .iter()
        .map(|(os, arch)| BuildTarget::new(*os, *arch))
        .collect()
}

/// Maps a toolchain architecture name to the conventional archive spelling.
/// Unknown names pass through unchanged.
#[must_use]
pub fn map_arch(arch: &str) -> &str {
    match arch {
        "amd64" => "x86_64",
        "386" => "i386",
        other => other,
    }
}

/// Name of the intermediate binary: `<binary>_<os>_<arch>[.exe]`.
#[must_use]
pub fn binary_file_name(binary_name: &str, target: &BuildTarget) -> String {
    format!(
        "{binary_name}_{}_{}{}",
        target.os,
        target.arch,
        target.exe_suffix()
    )
}

/// Name of the release archive:
/// `<binary-lower>_<version-without-v>_<os>_<mapped-arch>.<zip|tar.gz>`.
#[must_use]
pub fn archive_file_name(binary_name: &str, version: &str, target: &BuildTarget) -> String {
    let version = version.strip_prefix('v').unwrap_or(version);
    format!(
        "{}_{version}_{}_{}.{}",
        binary_name.to_lowercase(),
        target.os,
        target.archive_arch(),
        target.archive_format().extension()
    )
}

/// Name of the single entry stored in the archive: `<binary>[.exe]`.
#[must_use]
pub fn entry_name(binary_name: &str, target: &BuildTarget) -> String {
    format!("{binary_name}{}", target.exe_suffix())
}
