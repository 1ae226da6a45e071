// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build every target into a private temporary directory and upload the
//! archives to a release.
//!
//! ```text
//! Publisher::upload_artifacts(token, release_id, progress)
//!   commit   = override | git HEAD (short) | "unknown"
//!   date     = now, RFC 3339 UTC
//!   tempdir  (removed on return)
//!   ReleaseBuilder::build_and_package_all(token)
//!        |
//!        v
//! upload_archives(uploader, token, release_id, archives, progress)
//!   UploadStart{total}
//!   for each archive, in order:
//!     token cancelled? -> PublishError::Cancelled
//!     UploadAsset{name, current, total}
//!     uploader.upload() -- error --> PublishError::Upload (stop)
//!   UploadComplete{total}
//! ```

pub mod uploader;


use std::path::{Path, PathBuf};
use std::sync::Arc;

use bon::Builder;
use chrono::{SecondsFormat, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::types::{ProjectConfig, ToolchainConfig};
use crate::error::{PublishError, ShipResult};
use crate::git;
use crate::release::{BuilderConfig, ReleaseBuilder};

pub use uploader::{GithubUploader, ReleaseUploader, UploadedAsset};

/// Upload progress, emitted in upload order by a single loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Uploading is about to begin.
    UploadStart { total: usize },
    /// Asset `current` of `total` (1-based) is about to be uploaded.
    UploadAsset {
        name: String,
        current: usize,
        total: usize,
    },
    /// Every asset was uploaded.
    UploadComplete { total: usize },
}

/// Build date stamp used for release binaries.
#[must_use]
pub fn build_date_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Builds release archives and uploads them through a [`ReleaseUploader`].
#[derive(Builder)]
pub struct Publisher {
    uploader: Arc<dyn ReleaseUploader>,
    /// Release version, e.g. `v1.2.3`.
    #[builder(into)]
    version: String,
    project: ProjectConfig,
    #[builder(default)]
    toolchain: ToolchainConfig,
    #[builder(default)]
    jobs: usize,
    /// Commit to embed instead of the repository HEAD.
    #[builder(into)]
    commit: Option<String>,
}

impl Publisher {
    /// Builds every target into a temporary directory and uploads the
    /// resulting archives to `release_id`.
    ///
    /// The temporary directory is removed before this returns, whether the
    /// upload succeeded or not. Assets uploaded before a failure remain on
    /// the release.
    ///
    /// # Errors
    ///
    /// - `BuildError` if the configuration is incomplete or any target fails.
    /// - `PublishError` if an upload fails or is cancelled.
    /// - `ShipError::Io` if the temporary directory cannot be created.
    pub async fn upload_artifacts(
        &self,
        token: &CancellationToken,
        release_id: &str,
        progress: Option<&flume::Sender<ProgressEvent>>,
    ) -> ShipResult<Vec<UploadedAsset>> {
        let source_dir = self.project.source_dir.as_path();
        let commit = self
            .commit
            .clone()
            .unwrap_or_else(|| git::resolve_commit(source_dir));
        let staging = tempfile::Builder::new().prefix("shipit-").tempdir()?;

        let builder = ReleaseBuilder::new(
            BuilderConfig::builder()
                .main_entry(self.project.main_entry.as_str())
                .binary_name(self.project.binary_name.as_str())
                .version(self.version.as_str())
                .commit(commit)
                .build_date(build_date_now())
                .output_dir(staging.path())
                .source_dir(source_dir)
                .toolchain(self.toolchain.clone())
                .jobs(self.jobs)
                .build(),
        )?;

        let mut archives = builder.build_and_package_all(token).await?;
        archives.sort();

        let assets =
            upload_archives(self.uploader.as_ref(), token, release_id, &archives, progress)
                .await?;
        Ok(assets)
    }
}

/// Uploads `archives` one at a time, in order.
///
/// With a progress sender, emits `UploadStart`, one `UploadAsset` before
/// each upload and `UploadComplete` after the last one. A receiver that has
/// gone away is ignored.
///
/// # Errors
///
/// Stops at the first failure with `PublishError::Upload`, or with
/// `PublishError::Cancelled` if the token is cancelled between uploads.
pub async fn upload_archives(
    uploader: &dyn ReleaseUploader,
    token: &CancellationToken,
    release_id: &str,
    archives: &[PathBuf],
    progress: Option<&flume::Sender<ProgressEvent>>,
) -> Result<Vec<UploadedAsset>, PublishError> {
    let total = archives.len();
    emit(progress, ProgressEvent::UploadStart { total }).await;

    let mut assets = Vec::with_capacity(total);
    for (i, archive) in archives.iter().enumerate() {
        let name = asset_name(archive);
        if token.is_cancelled() {
            warn!(archive = %name, release_id, "upload cancelled");
            return Err(PublishError::Cancelled {
                archive: name,
                release_id: release_id.to_string(),
            });
        }

        emit(
            progress,
            ProgressEvent::UploadAsset {
                name: name.clone(),
                current: i + 1,
                total,
            },
        )
        .await;

        let asset = uploader
            .upload(release_id, archive)
            .await
            .map_err(|source| PublishError::Upload {
                archive: name,
                release_id: release_id.to_string(),
                source,
            })?;
        assets.push(asset);
    }

    emit(progress, ProgressEvent::UploadComplete { total }).await;
    info!(release_id, assets = total, "release assets uploaded");
    Ok(assets)
}

async fn emit(progress: Option<&flume::Sender<ProgressEvent>>, event: ProgressEvent) {
    if let Some(tx) = progress {
        let _ = tx.send_async(event).await;
    }
}

fn asset_name(archive: &Path) -> String {
    archive.file_name().map_or_else(
        || archive.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}
