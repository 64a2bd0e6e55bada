//! `pkg-rail list` - Show workspace packages

use super::display_dir;
use pkg_rail::core::context::WorkspaceContext;
use pkg_rail::core::error::RailResult;
use pkg_rail::graph::DependencyView;
use serde_json::json;

/// Run the list command
pub fn run_list(ctx: &WorkspaceContext, json: bool) -> RailResult<()> {
  let graph = &ctx.graph;

  if json {
    let packages: Vec<_> = graph
      .nodes()
      .map(|node| {
        json!({
          "name": node.name,
          "version": node.version,
          "dir": display_dir(ctx, &node.dir),
          "dependencies": node.dependency_names(DependencyView::Prod).collect::<Vec<_>>(),
          "dev_dependencies": node.dependency_names(DependencyView::Dev).collect::<Vec<_>>(),
          "optional_dependencies": node.dependency_names(DependencyView::Optional).collect::<Vec<_>>(),
        })
      })
      .collect();

    let output = json!({
      "root": ctx.workspace_root(),
      "package_manager": ctx.package_manager.map(|pm| pm.as_str()),
      "packages": packages,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    return Ok(());
  }

  println!("{} packages in {}", graph.len(), ctx.workspace_root().display());
  for node in graph.nodes() {
    let version = node.version.as_deref().unwrap_or("-");
    println!("  📦 {} {} ({})", node.name, version, display_dir(ctx, &node.dir));
    let deps: Vec<_> = node.dependency_names(DependencyView::All).collect();
    if !deps.is_empty() {
      println!("     → {}", deps.join(", "));
    }
  }

  Ok(())
}
