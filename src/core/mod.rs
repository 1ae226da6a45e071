// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules shared by the pipeline.
//!
//! ```text
//!      core
//!       |
//!    process
//!       |
//!   Builder --> tokio::process --> ProcessOutput
//! ```

pub mod process;
