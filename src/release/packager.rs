// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Single-binary release archives.
//!
//! ```text
//! windows --> zip     one deflated entry <bin>.exe, unix mode bits, mtime
//! other   --> tar.gz  one regular entry  <bin>, size/mode/mtime from source
//! ```
//!
//! The binary is streamed into the archive, never loaded whole. A partially
//! written archive is removed when any step fails.

use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use async_compression::tokio::write::GzipEncoder;
use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, ZipDateTime, ZipDateTimeBuilder, ZipEntryBuilder};
use chrono::{DateTime, Datelike, Timelike, Utc};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_tar::{Builder as TarBuilder, EntryType, Header};
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, info};

use super::ReleaseBuilder;
use super::target::{ArchiveFormat, BuildTarget, entry_name};
use crate::error::BuildError;

/// Removes the archive on drop unless [`PartialArchiveGuard::keep`] was called.
struct PartialArchiveGuard {
    path: PathBuf,
    keep: bool,
}

impl PartialArchiveGuard {
    const fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    const fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialArchiveGuard {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

impl ReleaseBuilder {
    /// Packages `binary` into the release archive for `target`.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::Package` with the archive path and the first I/O
    /// error hit while reading the binary or writing the archive.
    pub async fn package_binary(
        &self,
        binary: &Path,
        target: &BuildTarget,
    ) -> Result<PathBuf, BuildError> {
        let archive = self.archive_path(target);
        let entry = entry_name(self.config().binary_name(), target);
        let format = target.archive_format();

        debug!(platform = %target, archive = %archive.display(), %format, "packaging");

        let mut guard = PartialArchiveGuard::new(archive.clone());
        let written = match format {
            ArchiveFormat::Zip => write_zip(binary, &archive, &entry).await,
            ArchiveFormat::TarGz => write_tar_gz(binary, &archive, &entry).await,
        };
        written.map_err(|source| BuildError::Package {
            archive: archive.display().to_string(),
            source,
        })?;
        guard.keep();

        info!(platform = %target, archive = %archive.display(), "packaged");
        Ok(archive)
    }
}

#[cfg(unix)]
fn file_mode(meta: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
const fn file_mode(_meta: &std::fs::Metadata) -> u32 {
    0o755
}

fn mtime_secs(meta: &std::fs::Metadata) -> u64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs())
}

/// Zip timestamps are local-format DOS dates; record the source mtime in UTC.
fn zip_mtime(meta: &std::fs::Metadata) -> ZipDateTime {
    let modified: DateTime<Utc> = meta.modified().map_or_else(|_| Utc::now(), DateTime::from);
    zip_date_time(modified)
}

/// DOS dates cover 1980-01-01 to 2107-12-31; anything outside is clamped.
pub(crate) fn zip_date_time(at: DateTime<Utc>) -> ZipDateTime {
    let (year, month, day, hour, minute, second) = match at.year() {
        ..=1979 => (1980, 1, 1, 0, 0, 0),
        2108.. => (2107, 12, 31, 23, 59, 58),
        year => (
            year,
            at.month(),
            at.day(),
            at.hour(),
            at.minute(),
            at.second(),
        ),
    };
    ZipDateTimeBuilder::new()
        .year(year)
        .month(month)
        .day(day)
        .hour(hour)
        .minute(minute)
        .second(second)
        .build()
}

/// Writes a zip archive with one deflated entry named `entry`.
///
/// # Errors
///
/// Returns the first I/O or zip encoding error.
pub async fn write_zip(binary: &Path, archive: &Path, entry: &str) -> io::Result<()> {
    let source = File::open(binary).await?;
    let meta = source.metadata().await?;
    let out = File::create(archive).await?;

    let mut writer = ZipFileWriter::with_tokio(out);
    #[allow(clippy::cast_possible_truncation)]
    let builder = ZipEntryBuilder::new(entry.to_string().into(), Compression::Deflate)
        .unix_permissions(file_mode(&meta) as u16)
        .last_modification_date(zip_mtime(&meta));

    let mut entry_writer = writer
        .write_entry_stream(builder)
        .await
        .map_err(io::Error::other)?;
    futures_util::io::copy(source.compat(), &mut entry_writer).await?;
    entry_writer.close().await.map_err(io::Error::other)?;

    let mut out = writer.close().await.map_err(io::Error::other)?.into_inner();
    out.flush().await?;
    Ok(())
}

/// Writes a gzip-compressed tar archive with one regular entry named `entry`.
///
/// # Errors
///
/// Returns the first I/O error.
pub async fn write_tar_gz(binary: &Path, archive: &Path, entry: &str) -> io::Result<()> {
    let source = File::open(binary).await?;
    let meta = source.metadata().await?;
    let out = File::create(archive).await?;

    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Regular);
    header.set_size(meta.len());
    header.set_mode(file_mode(&meta));
    header.set_mtime(mtime_secs(&meta));

    let mut tar = TarBuilder::new(GzipEncoder::new(out));
    tar.append_data(&mut header, entry, source).await?;

    let mut gz = tar.into_inner().await?;
    gz.shutdown().await?;
    Ok(())
}
