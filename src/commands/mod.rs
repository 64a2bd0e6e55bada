//! CLI commands for pkg-rail
//!
//! ## Inspection
//! - **list**: Show workspace packages and their local dependencies
//! - **deps**: Direct or transitive dependencies / dependents of one package
//! - **dot**: Graphviz export of the package graph
//!
//! ## Change Analysis
//! - **changed**: Packages owning files changed since a git ref
//! - **affected**: Changed packages plus everything depending on them
//!
//! All commands accept `&WorkspaceContext` to avoid redundant workspace loads.

pub mod affected;
pub mod deps;
pub mod dot;
pub mod list;

pub use affected::{run_affected, run_changed};
pub use deps::{run_dependents, run_deps};
pub use dot::run_dot;
pub use list::run_list;

use pkg_rail::core::context::WorkspaceContext;
use pkg_rail::core::error::RailResult;
use pkg_rail::graph::DependencyView;
use std::path::Path;

/// Resolve `--kind`, falling back to `[affected] kind` from config
pub(crate) fn resolve_view(ctx: &WorkspaceContext, kind: Option<&str>) -> RailResult<DependencyView> {
  match kind {
    Some(kind) => Ok(kind.parse()?),
    None => Ok(ctx.config.affected.kind),
  }
}

/// Package directory relative to the workspace root, for display
pub(crate) fn display_dir(ctx: &WorkspaceContext, dir: &Path) -> String {
  let rel = dir.strip_prefix(ctx.workspace_root()).unwrap_or(dir);
  let rel = pkg_rail::utils::path_to_git_format(rel);
  if rel.is_empty() { ".".to_string() } else { rel }
}
