//! Version control collaborators
//!
//! Only system git is supported; it is used to list files changed since a ref.

pub mod system_git;

pub use system_git::SystemGit;
