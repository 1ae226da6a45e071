// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only repository queries used to stamp release binaries.
//!
//! ```text
//! resolve_commit(dir)
//!     |
//!     v
//! head_commit(dir) --gix::discover--> HEAD id --> "abc1234"
//!     |
//!     `-- any error --> "unknown"
//! ```

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{GitError, ShipResult};

/// Length of the abbreviated commit hash embedded in binaries.
pub const SHORT_COMMIT_LEN: usize = 7;

/// Placeholder used when the commit cannot be determined.
pub const UNKNOWN_COMMIT: &str = "unknown";

/// Returns the abbreviated hash of the commit HEAD points to.
///
/// # Errors
///
/// Returns a `GitError` if no repository contains `path` or HEAD does not
/// resolve to a commit (e.g. a freshly initialized repository).
pub fn head_commit(path: &Path) -> ShipResult<String> {
    let repo = gix::discover(path).map_err(|e| GitError::Discover(Box::new(e)))?;
    let id = repo.head_id().map_err(|e| GitError::CommandFailed {
        command: "rev-parse HEAD".to_string(),
        message: e.to_string(),
    })?;
    Ok(id.to_hex_with_len(SHORT_COMMIT_LEN).to_string())
}

/// Like [`head_commit`], but never fails.
#[must_use]
pub fn resolve_commit(path: &Path) -> String {
    match head_commit(path) {
        Ok(commit) => {
            debug!(commit = %commit, path = %path.display(), "resolved commit");
            commit
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "could not resolve commit, using '{UNKNOWN_COMMIT}'");
            UNKNOWN_COMMIT.to_string()
        }
    }
}
