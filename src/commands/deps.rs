//! `pkg-rail deps` / `pkg-rail dependents` - Walk the graph from one package

use super::resolve_view;
use pkg_rail::core::context::WorkspaceContext;
use pkg_rail::core::error::RailResult;
use pkg_rail::graph::DependencyView;
use std::collections::BTreeSet;

/// Which way to walk from the package
#[derive(Debug, Clone, Copy)]
enum Direction {
  Dependencies,
  Dependents,
}

impl Direction {
  fn label(self) -> &'static str {
    match self {
      Self::Dependencies => "dependencies",
      Self::Dependents => "dependents",
    }
  }
}

/// Run the deps command
pub fn run_deps(
  ctx: &WorkspaceContext,
  name: String,
  transitive: bool,
  kind: Option<String>,
  json: bool,
) -> RailResult<()> {
  run(ctx, Direction::Dependencies, &name, transitive, kind.as_deref(), json)
}

/// Run the dependents command
pub fn run_dependents(
  ctx: &WorkspaceContext,
  name: String,
  transitive: bool,
  kind: Option<String>,
  json: bool,
) -> RailResult<()> {
  run(ctx, Direction::Dependents, &name, transitive, kind.as_deref(), json)
}

fn run(
  ctx: &WorkspaceContext,
  direction: Direction,
  name: &str,
  transitive: bool,
  kind: Option<&str>,
  json: bool,
) -> RailResult<()> {
  let view = resolve_view(ctx, kind)?;
  let names = collect(ctx, direction, name, transitive, view)?;

  tracing::debug!(
    package = name,
    direction = direction.label(),
    %view,
    transitive,
    found = names.len(),
    "walked package graph"
  );

  if json {
    let mut output = serde_json::json!({
      "package": name,
      "view": view.to_string(),
      "transitive": transitive,
    });
    output[direction.label()] = serde_json::json!(names);
    println!("{}", serde_json::to_string_pretty(&output)?);
    return Ok(());
  }

  let scope = if transitive { "transitive" } else { "direct" };
  println!("{} ({} {} {}): {}", name, scope, view, direction.label(), names.len());
  for dep in &names {
    println!("  {}", dep);
  }

  Ok(())
}

fn collect(
  ctx: &WorkspaceContext,
  direction: Direction,
  name: &str,
  transitive: bool,
  view: DependencyView,
) -> RailResult<BTreeSet<String>> {
  let graph = &ctx.graph;

  let names = match (direction, transitive) {
    (Direction::Dependencies, true) => graph.transitive_dependencies(name, view)?,
    (Direction::Dependents, true) => graph.transitive_dependents(name, view)?,
    (Direction::Dependencies, false) => graph
      .find(name)?
      .dependency_names(view)
      .map(str::to_string)
      .collect(),
    (Direction::Dependents, false) => {
      graph.find(name)?;
      graph.direct_dependents(name, view).map(str::to_string).collect()
    }
  };

  Ok(names)
}
