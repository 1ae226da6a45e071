// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release command: build everything and upload to an existing release.
//!
//! ```text
//! Publisher::upload_artifacts --flume--> progress task --> indicatif bar
//! ```

use std::sync::{Arc, OnceLock};

use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use crate::cli::release::ReleaseArgs;
use crate::cmd::spawn_ctrl_c_handler;
use crate::config::Config;
use crate::error::Result;
use crate::publish::{GithubUploader, ProgressEvent, Publisher};

fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

/// Drives a progress bar from upload events until the sender is dropped.
async fn render_progress(rx: flume::Receiver<ProgressEvent>) {
    let mut bar: Option<ProgressBar> = None;
    while let Ok(event) = rx.recv_async().await {
        match event {
            ProgressEvent::UploadStart { total } => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(bar_style());
                bar = Some(pb);
            }
            ProgressEvent::UploadAsset { name, current, .. } => {
                if let Some(pb) = &bar {
                    pb.set_position(current.saturating_sub(1) as u64);
                    pb.set_message(name);
                }
            }
            ProgressEvent::UploadComplete { total } => {
                if let Some(pb) = bar.take() {
                    pb.set_position(total as u64);
                    pb.finish_with_message("uploaded");
                }
            }
        }
    }
    if let Some(pb) = bar {
        pb.abandon();
    }
}

/// Main handler for release command.
///
/// # Errors
///
/// Returns an error if the `[project]` or `[github]` configuration is
/// incomplete, a target fails to build, or an upload fails.
pub async fn run_release_command(args: &ReleaseArgs, config: &Config) -> Result<()> {
    config.binary_name()?;
    let uploader = GithubUploader::from_config(config.github()?)?;

    let publisher = Publisher::builder()
        .uploader(Arc::new(uploader))
        .version(args.version.as_str())
        .project(config.project.clone())
        .toolchain(config.toolchain.clone())
        .jobs(args.jobs.unwrap_or(config.build.jobs))
        .maybe_commit(args.commit.clone())
        .build();

    let token = CancellationToken::new();
    spawn_ctrl_c_handler(&token);

    let (tx, progress) = if args.no_progress {
        (None, None)
    } else {
        let (tx, rx) = flume::unbounded();
        (Some(tx), Some(tokio::spawn(render_progress(rx))))
    };

    let result = publisher
        .upload_artifacts(&token, &args.release_id, tx.as_ref())
        .await;
    drop(tx);
    if let Some(handle) = progress {
        let _ = handle.await;
    }

    let assets = result?;
    for asset in &assets {
        if asset.browser_download_url.is_empty() {
            println!("{}", asset.name);
        } else {
            println!("{}", asset.browser_download_url);
        }
    }
    tracing::info!(
        release_id = %args.release_id,
        assets = assets.len(),
        "Release completed successfully"
    );
    Ok(())
}
