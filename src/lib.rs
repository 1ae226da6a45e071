// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |        targets / build / release
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML + env, layered      |
//!              '-----+---------------+-----'
//!                    |               |
//!                    v               v
//!                 publish  ------> release
//!           upload adapter,     targets, compiler,
//!           progress events     packager, orchestrator
//!                    |               |
//!                    v               v
//!               HTTP (reqwest)     git (gix)
//!
//!   +-----------------------------------------+
//!   |  core      process runner               |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod publish;
pub mod release;
