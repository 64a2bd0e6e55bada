//! pkg-rail: package graph and affected-package analysis for JavaScript/TypeScript monorepos
//!
//! - **workspace**: discover package manifests (npm/pnpm/yarn/bun workspaces)
//! - **graph**: build the package graph, traverse it, map changed files to packages
//! - **core**: config, errors, workspace context, git

pub mod core;
pub mod graph;
pub mod utils;
pub mod workspace;

pub use crate::core::error::{GraphError, RailError, RailResult};
pub use graph::{DependencyView, GraphNode, PackageGraph};
pub use workspace::PackageDescriptor;
