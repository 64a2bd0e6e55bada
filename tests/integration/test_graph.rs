//! Integration tests for discovery and graph inspection (`list`, `deps`, `dependents`, `dot`)

use crate::helpers::{NodeWorkspace, run_pkg_rail, run_pkg_rail_raw, stdout_json, stdout_lines};
use anyhow::Result;

/// app -> ui -> core, app -dev-> testkit, ui -optional-> icons
fn sample_workspace() -> Result<NodeWorkspace> {
  let ws = NodeWorkspace::new_pnpm()?;
  ws.add_package("core", "packages/core", &[])?;
  ws.add_package(
    "ui",
    "packages/ui",
    &[("core", "dependencies"), ("icons", "optionalDependencies")],
  )?;
  ws.add_package("icons", "packages/icons", &[])?;
  ws.add_package("testkit", "packages/testkit", &[("core", "dependencies")])?;
  ws.add_package(
    "app",
    "apps/app",
    &[("ui", "dependencies"), ("testkit", "devDependencies")],
  )?;
  ws.commit("Add packages")?;
  Ok(ws)
}

#[test]
fn test_list_json() -> Result<()> {
  let ws = sample_workspace()?;

  let output = run_pkg_rail(&ws.path, &["list", "--json"])?;
  let json = stdout_json(&output)?;

  assert_eq!(json["package_manager"], "pnpm");
  let packages = json["packages"].as_array().cloned().unwrap_or_default();
  let names: Vec<_> = packages.iter().filter_map(|p| p["name"].as_str()).collect();
  assert_eq!(names, vec!["app", "core", "icons", "testkit", "ui"]);

  let ui = &packages[4];
  assert_eq!(ui["dir"], "packages/ui");
  assert_eq!(ui["version"], "1.0.0");
  assert_eq!(ui["dependencies"], serde_json::json!(["core"]));
  assert_eq!(ui["optional_dependencies"], serde_json::json!(["icons"]));

  Ok(())
}

#[test]
fn test_list_text() -> Result<()> {
  let ws = sample_workspace()?;

  let output = run_pkg_rail(&ws.path, &["list"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("5 packages"), "got: {}", stdout);
  assert!(stdout.contains("app 1.0.0 (apps/app)"), "got: {}", stdout);
  assert!(stdout.contains("→ testkit, ui"), "got: {}", stdout);

  Ok(())
}

#[test]
fn test_deps_direct_and_transitive() -> Result<()> {
  let ws = sample_workspace()?;

  let output = run_pkg_rail(&ws.path, &["deps", "app", "--json"])?;
  let json = stdout_json(&output)?;
  assert_eq!(json["dependencies"], serde_json::json!(["testkit", "ui"]));
  assert_eq!(json["transitive"], false);

  let output = run_pkg_rail(&ws.path, &["deps", "app", "--transitive", "--json"])?;
  let json = stdout_json(&output)?;
  assert_eq!(json["dependencies"], serde_json::json!(["core", "icons", "testkit", "ui"]));

  let output = run_pkg_rail(&ws.path, &["deps", "app", "--transitive", "--kind", "prod", "--json"])?;
  let json = stdout_json(&output)?;
  assert_eq!(json["view"], "prod");
  assert_eq!(json["dependencies"], serde_json::json!(["core", "ui"]));

  let output = run_pkg_rail(&ws.path, &["deps", "app", "--transitive", "--kind", "published", "--json"])?;
  let json = stdout_json(&output)?;
  assert_eq!(json["dependencies"], serde_json::json!(["core", "icons", "ui"]));

  Ok(())
}

#[test]
fn test_dependents_direct_and_transitive() -> Result<()> {
  let ws = sample_workspace()?;

  let output = run_pkg_rail(&ws.path, &["dependents", "core", "--json"])?;
  let json = stdout_json(&output)?;
  assert_eq!(json["dependents"], serde_json::json!(["testkit", "ui"]));

  let output = run_pkg_rail(&ws.path, &["dependents", "core", "--transitive", "--json"])?;
  let json = stdout_json(&output)?;
  assert_eq!(json["dependents"], serde_json::json!(["app", "testkit", "ui"]));

  let output = run_pkg_rail(&ws.path, &["dependents", "testkit", "--transitive", "--kind", "prod", "--json"])?;
  let json = stdout_json(&output)?;
  assert_eq!(json["dependents"], serde_json::json!([]));

  Ok(())
}

#[test]
fn test_deps_unknown_package() -> Result<()> {
  let ws = sample_workspace()?;

  let output = run_pkg_rail_raw(&ws.path, &["deps", "nope"])?;
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Package 'nope' not found"), "got: {}", stderr);
  assert!(stderr.contains("pkg-rail list"), "got: {}", stderr);

  Ok(())
}

#[test]
fn test_external_dependencies_are_ignored() -> Result<()> {
  let ws = NodeWorkspace::new_npm()?;
  ws.add_package("core", "packages/core", &[("react", "dependencies"), ("vitest", "devDependencies")])?;
  ws.add_package("ui", "packages/ui", &[("core", "dependencies"), ("lodash", "dependencies")])?;
  ws.commit("Add packages")?;

  let output = run_pkg_rail(&ws.path, &["deps", "ui", "--transitive", "--json"])?;
  let json = stdout_json(&output)?;
  assert_eq!(json["dependencies"], serde_json::json!(["core"]));

  Ok(())
}

#[test]
fn test_duplicate_package_names_fail() -> Result<()> {
  let ws = NodeWorkspace::new_npm()?;
  ws.add_package("shared", "packages/shared", &[])?;
  ws.add_package("shared", "apps/shared", &[])?;
  ws.commit("Add clashing packages")?;

  let output = run_pkg_rail_raw(&ws.path, &["list"])?;
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Two packages are named 'shared'"), "got: {}", stderr);

  Ok(())
}

#[test]
fn test_missing_workspace_configuration() -> Result<()> {
  let ws = NodeWorkspace::new_npm()?;
  ws.write_file("package.json", "{ \"name\": \"not-a-monorepo\" }\n")?;

  let output = run_pkg_rail_raw(&ws.path, &["list"])?;
  assert_eq!(output.status.code(), Some(3));

  Ok(())
}

#[test]
fn test_dependency_cycle_terminates() -> Result<()> {
  let ws = NodeWorkspace::new_npm()?;
  ws.add_package("a", "packages/a", &[("b", "dependencies")])?;
  ws.add_package("b", "packages/b", &[("c", "dependencies")])?;
  ws.add_package("c", "packages/c", &[("a", "devDependencies")])?;
  ws.commit("Add cyclic packages")?;

  let output = run_pkg_rail(&ws.path, &["deps", "a", "--transitive", "--json"])?;
  let json = stdout_json(&output)?;
  assert_eq!(json["dependencies"], serde_json::json!(["b", "c"]));

  let output = run_pkg_rail(&ws.path, &["dependents", "a", "--transitive", "--json"])?;
  let json = stdout_json(&output)?;
  assert_eq!(json["dependents"], serde_json::json!(["b", "c"]));

  Ok(())
}

#[test]
fn test_dot_export() -> Result<()> {
  let ws = sample_workspace()?;

  let output = run_pkg_rail(&ws.path, &["dot"])?;
  let lines = stdout_lines(&output);
  let dot = lines.join("\n");

  assert!(dot.starts_with("digraph {"), "got: {}", dot);
  assert!(dot.contains("label=\"ui\""));
  assert!(dot.contains("color=blue"), "dev edge app -> testkit");
  assert!(dot.contains("style=dashed"), "optional edge ui -> icons");
  assert_eq!(lines.iter().filter(|line| line.contains("->")).count(), 5);

  Ok(())
}
