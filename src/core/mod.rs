//! Core building blocks shared by every command
//!
//! - **config**: pkg-rail.toml parsing and validation
//! - **context**: Unified workspace context (config + discovered package graph)
//! - **error**: Error types with contextual help messages and exit codes
//! - **vcs**: Git operations (SystemGit) for changed-file detection

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
