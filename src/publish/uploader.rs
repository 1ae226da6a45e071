// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release asset upload backends.
//!
//! ```text
//! ReleaseUploader (trait, BoxFuture)
//!        |
//!        v
//! GithubUploader
//!   POST {upload_url}/repos/{owner}/{repo}/releases/{id}/assets?name=<file>
//!   Authorization: Bearer <token>
//!   Content-Type: application/octet-stream   (file streamed)
//!        |
//!        v
//! UploadedAsset { id, name, browser_download_url }
//! ```
//!
//! Global client: `OnceLock`, connection pool, keep-alive.

use std::path::Path;
use std::sync::OnceLock;

use futures_util::future::BoxFuture;
use reqwest::{Body, Client, Url, header};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::config::types::GithubConfig;
use crate::error::NetworkError;

/// Asset as reported back by the release host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadedAsset {
    pub id: u64,
    pub name: String,
    pub browser_download_url: String,
}

/// Uploads one archive as a named asset of an existing release.
///
/// Implementations must not retry; the caller decides what a failure means.
pub trait ReleaseUploader: Send + Sync {
    /// Uploads `archive` to the release identified by `release_id`. The asset
    /// name is the archive's file name.
    fn upload<'a>(
        &'a self,
        release_id: &'a str,
        archive: &'a Path,
    ) -> BoxFuture<'a, Result<UploadedAsset, NetworkError>>;
}

/// Global HTTP client, initialized once and reused across uploads.
/// Falls back to a basic client if custom configuration fails.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("shipit/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Uploads assets through the GitHub releases API.
#[derive(Debug, Clone)]
pub struct GithubUploader {
    client: Client,
    base: Url,
    owner: String,
    repo: String,
    token: String,
}

impl GithubUploader {
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidUrl` if `upload_url` is not a valid URL.
    pub fn new(
        upload_url: &str,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, NetworkError> {
        let base = Url::parse(upload_url.trim_end_matches('/'))
            .map_err(|e| NetworkError::InvalidUrl(format!("{upload_url}: {e}")))?;
        Ok(Self {
            client: global_client().clone(),
            base,
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
        })
    }

    /// # Errors
    ///
    /// Returns `NetworkError::InvalidUrl` if `upload_url` is not a valid URL.
    pub fn from_config(config: &GithubConfig) -> Result<Self, NetworkError> {
        Self::new(
            &config.upload_url,
            &config.owner,
            &config.repo,
            &config.token,
        )
    }

    /// Upload endpoint for one asset.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidUrl` if the pieces do not form a URL.
    pub fn asset_url(&self, release_id: &str, name: &str) -> Result<Url, NetworkError> {
        let base = self.base.as_str().trim_end_matches('/');
        let url = format!(
            "{base}/repos/{}/{}/releases/{release_id}/assets",
            self.owner, self.repo
        );
        Url::parse_with_params(&url, &[("name", name)])
            .map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")))
    }

    async fn upload_file(
        &self,
        release_id: &str,
        archive: &Path,
    ) -> Result<UploadedAsset, NetworkError> {
        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                NetworkError::InvalidUrl(format!("no file name in {}", archive.display()))
            })?;
        let url = self.asset_url(release_id, &name)?;

        let file = tokio::fs::File::open(archive).await?;
        let len = file.metadata().await?.len();
        debug!(url = %url, bytes = len, "uploading asset");

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header(header::CONTENT_LENGTH, len)
            .header("X-GitHub-Api-Version", "2022-11-28")
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .map_err(NetworkError::Reqwest)?;

        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let asset: UploadedAsset = response.json().await.map_err(NetworkError::Reqwest)?;
        info!(archive = %name, id = asset.id, "uploaded");
        Ok(asset)
    }
}

impl ReleaseUploader for GithubUploader {
    fn upload<'a>(
        &'a self,
        release_id: &'a str,
        archive: &'a Path,
    ) -> BoxFuture<'a, Result<UploadedAsset, NetworkError>> {
        Box::pin(self.upload_file(release_id, archive))
    }
}
