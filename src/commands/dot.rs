//! `pkg-rail dot` - Graphviz export of the package graph

use pkg_rail::core::context::WorkspaceContext;
use pkg_rail::core::error::RailResult;

/// Run the dot command
///
/// Pipe into `dot -Tsvg` to render.
pub fn run_dot(ctx: &WorkspaceContext) -> RailResult<()> {
  print!("{}", ctx.graph.to_dot());
  Ok(())
}
