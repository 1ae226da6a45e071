// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Concurrent build and packaging of every target.
//!
//! ```text
//! build_and_package_all(token)
//!   create output_dir
//!   JoinSet: one task per target   (Semaphore if jobs > 0)
//!     cancelled? -> Cancelled
//!     build_binary -> package_binary -> remove binary
//!     Ok  --> Mutex<Vec<PathBuf>>
//!     Err --> flume (bounded to target count)
//!   join all, drain errors
//!   any error? -> BuildError::Targets (sorted by platform)
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::ReleaseBuilder;
use super::target::BuildTarget;
use crate::error::{BuildError, TargetFailure};

impl ReleaseBuilder {
    /// Builds and packages every target concurrently.
    ///
    /// Waits for all targets even when some fail. Archives of successful
    /// targets stay on disk in either case.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::OutputDir` if the output directory cannot be
    /// created, otherwise `BuildError::Targets` listing every failed target.
    pub async fn build_and_package_all(
        &self,
        token: &CancellationToken,
    ) -> Result<Vec<PathBuf>, BuildError> {
        let output_dir = self.config().output_dir();
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| BuildError::OutputDir {
                path: output_dir.display().to_string(),
                source,
            })?;

        let targets = self.build_targets();
        let archives = Arc::new(Mutex::new(Vec::with_capacity(targets.len())));
        let (err_tx, err_rx) = flume::bounded(targets.len());
        let limit = match self.config().jobs() {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };

        info!(targets = targets.len(), jobs = self.config().jobs(), "building release");

        let mut set = JoinSet::new();
        let mut platforms = HashMap::with_capacity(targets.len());
        for target in targets {
            let builder = self.clone();
            let token = token.clone();
            let archives = Arc::clone(&archives);
            let err_tx = err_tx.clone();
            let limit = limit.clone();
            let task_platform = target.platform();
            let handle = set.spawn(async move {
                let _permit = match &limit {
                    Some(sem) => sem.acquire().await.ok(),
                    None => None,
                };
                let platform = target.platform();
                match builder.build_one(&token, &target).await {
                    Ok(archive) => {
                        archives
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(archive);
                    }
                    Err(error) => {
                        error!(platform = %platform, error = %error, "target failed");
                        let _ = err_tx.send(TargetFailure { platform, error });
                    }
                }
            });
            platforms.insert(handle.id(), task_platform);
        }
        drop(err_tx);

        let mut failures = Vec::new();
        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                let platform = platforms
                    .remove(&e.id())
                    .unwrap_or_else(|| "unknown".to_string());
                warn!(platform = %platform, error = %e, "build task did not finish");
                failures.push(TargetFailure {
                    platform,
                    error: BuildError::TaskPanicked {
                        message: e.to_string(),
                    },
                });
            }
        }
        failures.extend(err_rx.drain());

        if !failures.is_empty() {
            failures.sort_by(|a, b| a.platform.cmp(&b.platform));
            return Err(BuildError::Targets(failures));
        }

        let archives = std::mem::take(
            &mut *archives.lock().unwrap_or_else(PoisonError::into_inner),
        );
        info!(archives = archives.len(), "release built");
        Ok(archives)
    }

    /// Cancellation check, compile, package, then drop the intermediate binary.
    async fn build_one(
        &self,
        token: &CancellationToken,
        target: &BuildTarget,
    ) -> Result<PathBuf, BuildError> {
        if token.is_cancelled() {
            return Err(BuildError::Cancelled {
                platform: target.platform(),
            });
        }

        let binary = self.build_binary(token, target).await?;
        let packaged = self.package_binary(&binary, target).await;
        if let Err(e) = tokio::fs::remove_file(&binary).await {
            warn!(binary = %binary.display(), error = %e, "failed to remove intermediate binary");
        }
        packaged
    }
}
