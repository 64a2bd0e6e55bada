//! Integration tests for `pkg-rail changed`

use crate::helpers::{NodeWorkspace, run_pkg_rail, stdout_json, stdout_lines};
use anyhow::Result;

#[test]
fn test_changed_lists_owning_packages_only() -> Result<()> {
  let ws = NodeWorkspace::new_npm()?;
  ws.add_package("core", "packages/core", &[])?;
  ws.add_package("ui", "packages/ui", &[("core", "dependencies")])?;
  ws.commit("Add packages")?;
  ws.mark_base()?;

  ws.write_file("packages/core/src/index.ts", "export const name = \"core v2\";\n")?;
  ws.commit("Modify core")?;

  let output = run_pkg_rail(&ws.path, &["changed", "--since", "base", "--format", "names"])?;
  assert_eq!(stdout_lines(&output), vec!["core"]);

  Ok(())
}

#[test]
fn test_changed_prefix_does_not_leak_to_sibling() -> Result<()> {
  let ws = NodeWorkspace::new_npm()?;
  ws.add_package("ui", "packages/ui", &[])?;
  ws.add_package("ui-kit", "packages/ui-kit", &[])?;
  ws.add_package("ui2", "packages/ui2", &[])?;
  ws.commit("Add packages")?;
  ws.mark_base()?;

  ws.write_file("packages/ui-kit/src/index.ts", "export {};\n")?;
  ws.write_file("packages/ui2/src/index.ts", "export {};\n")?;
  ws.commit("Modify siblings")?;

  let output = run_pkg_rail(&ws.path, &["changed", "--since", "base", "--format", "names"])?;
  assert_eq!(stdout_lines(&output), vec!["ui-kit", "ui2"]);

  Ok(())
}

#[test]
fn test_changed_nested_packages_all_match() -> Result<()> {
  let ws = NodeWorkspace::new_npm()?;
  ws.write_file(
    "pkg-rail.toml",
    "[discovery]\npatterns = [\"packages/*\", \"packages/core/plugins/*\"]\n",
  )?;
  ws.add_package("core", "packages/core", &[])?;
  ws.add_package("core-plugin", "packages/core/plugins/extra", &[("core", "dependencies")])?;
  ws.commit("Add nested packages")?;
  ws.mark_base()?;

  ws.write_file("packages/core/plugins/extra/src/index.ts", "export {};\n")?;
  ws.commit("Modify plugin")?;

  let output = run_pkg_rail(&ws.path, &["changed", "--since", "base", "--format", "names"])?;
  assert_eq!(stdout_lines(&output), vec!["core", "core-plugin"]);

  ws.write_file("packages/core/src/index.ts", "export const name = \"core v3\";\n")?;
  let output = run_pkg_rail(&ws.path, &["changed", "--since", "HEAD", "--format", "names"])?;
  assert_eq!(stdout_lines(&output), vec!["core"]);

  Ok(())
}

#[test]
fn test_changed_json_output() -> Result<()> {
  let ws = NodeWorkspace::new_pnpm()?;
  ws.add_package("@scope/lib", "packages/lib", &[])?;
  ws.add_package("@scope/app", "apps/app", &[("@scope/lib", "dependencies")])?;
  ws.commit("Add packages")?;
  ws.mark_base()?;

  ws.write_file("apps/app/src/index.ts", "export {};\n")?;
  ws.write_file("packages/lib/src/index.ts", "export {};\n")?;
  ws.write_file("package.json", "{ \"name\": \"test-monorepo\", \"private\": true, \"version\": \"2.0.0\" }\n")?;

  let output = run_pkg_rail(&ws.path, &["changed", "--since", "base", "--format", "json"])?;
  let json = stdout_json(&output)?;

  assert_eq!(
    json["changed_files"],
    serde_json::json!(["apps/app/src/index.ts", "package.json", "packages/lib/src/index.ts"])
  );
  assert_eq!(json["packages"][0]["name"], "@scope/app");
  assert_eq!(json["packages"][0]["dir"], "apps/app");
  assert_eq!(json["packages"][1]["name"], "@scope/lib");
  assert_eq!(json["packages"].as_array().map(Vec::len), Some(2));

  Ok(())
}

#[test]
fn test_changed_from_subdirectory_root_flag() -> Result<()> {
  let ws = NodeWorkspace::new_npm()?;
  ws.add_package("core", "packages/core", &[])?;
  ws.commit("Add packages")?;
  ws.mark_base()?;
  ws.write_file("packages/core/src/extra.ts", "export {};\n")?;

  let root = ws.path.to_string_lossy().to_string();
  let output = run_pkg_rail(
    &ws.path.join("packages/core"),
    &["--root", &root, "changed", "--since", "base", "--format", "names"],
  )?;
  assert_eq!(stdout_lines(&output), vec!["core"]);

  Ok(())
}

#[test]
#[cfg(unix)]
fn test_changed_file_names_with_quotes_and_backslashes() -> Result<()> {
  let ws = NodeWorkspace::new_npm()?;
  ws.add_package("core", "packages/core", &[])?;
  ws.add_package("ui", "packages/ui", &[])?;
  ws.commit("Add packages")?;
  ws.mark_base()?;

  ws.write_file("packages/core/src/we\"ird.ts", "export {};\n")?;
  ws.commit("Add oddly named file")?;
  ws.write_file("packages/ui/src/back\\slash.ts", "export {};\n")?;

  let output = run_pkg_rail(&ws.path, &["changed", "--since", "base", "--format", "json"])?;
  let json = stdout_json(&output)?;

  assert_eq!(
    json["changed_files"],
    serde_json::json!(["packages/core/src/we\"ird.ts", "packages/ui/src/back\\slash.ts"])
  );
  let names: Vec<_> = json["packages"]
    .as_array()
    .map(|packages| packages.iter().filter_map(|p| p["name"].as_str()).collect())
    .unwrap_or_default();
  assert_eq!(names, vec!["core", "ui"]);

  Ok(())
}
