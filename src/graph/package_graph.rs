//! Workspace package graph built from package descriptors + petgraph
//!
//! ## Graph Structure
//!
//! - **Arena**: every package is a node in a petgraph `DiGraph`; the graph owns all nodes
//! - **Edges**: `A → B` means "A depends on B", labeled with the manifest section it came from
//! - **Index**: package name → `NodeIndex`
//! - **Views**: each node keeps name → `NodeIndex` maps for its local dependencies
//!   (all, published, prod, dev, optional), so views never copy node state
//!
//! Only workspace-local names become edges. Anything published elsewhere is dropped from the
//! views; it is still visible in the node's raw manifest metadata. Cycles are allowed.

use crate::core::error::GraphError;
use crate::workspace::PackageDescriptor;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Manifest section a dependency edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
  /// `dependencies`
  Prod,
  /// `devDependencies`
  Dev,
  /// `optionalDependencies`
  Optional,
}

/// Selects one of the per-node dependency views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyView {
  /// dependencies ∪ devDependencies ∪ optionalDependencies
  #[default]
  All,
  /// dependencies ∪ optionalDependencies (what ships when published)
  Published,
  /// dependencies only
  #[serde(alias = "dependencies")]
  Prod,
  /// devDependencies only
  #[serde(alias = "devDependencies", alias = "devdependencies")]
  Dev,
  /// optionalDependencies only
  #[serde(alias = "optionalDependencies", alias = "optionaldependencies")]
  Optional,
}

impl DependencyView {
  pub const NAMES: &'static [&'static str] = &["all", "published", "prod", "dev", "optional"];

  /// Whether an edge of `kind` belongs to this view.
  pub fn includes(self, kind: DependencyKind) -> bool {
    match self {
      DependencyView::All => true,
      DependencyView::Published => matches!(kind, DependencyKind::Prod | DependencyKind::Optional),
      DependencyView::Prod => kind == DependencyKind::Prod,
      DependencyView::Dev => kind == DependencyKind::Dev,
      DependencyView::Optional => kind == DependencyKind::Optional,
    }
  }
}

impl FromStr for DependencyView {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "all" => Ok(Self::All),
      "published" => Ok(Self::Published),
      "prod" | "dependencies" => Ok(Self::Prod),
      "dev" | "devdependencies" => Ok(Self::Dev),
      "optional" | "optionaldependencies" => Ok(Self::Optional),
      _ => Err(format!(
        "Unknown dependency kind '{}'. Valid kinds: {}",
        s,
        Self::NAMES.join(", ")
      )),
    }
  }
}

impl fmt::Display for DependencyView {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      DependencyView::All => "all",
      DependencyView::Published => "published",
      DependencyView::Prod => "prod",
      DependencyView::Dev => "dev",
      DependencyView::Optional => "optional",
    };
    f.write_str(name)
  }
}

/// A package node in the dependency graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
  pub name: String,
  pub dir: PathBuf,
  pub version: Option<String>,
  /// Raw manifest payload (opaque)
  pub metadata: serde_json::Value,

  all_local_dependencies: BTreeMap<String, NodeIndex>,
  published_local_dependencies: BTreeMap<String, NodeIndex>,
  local_dependencies: BTreeMap<String, NodeIndex>,
  local_dev_dependencies: BTreeMap<String, NodeIndex>,
  local_optional_dependencies: BTreeMap<String, NodeIndex>,
}

impl GraphNode {
  fn new(descriptor: &PackageDescriptor) -> Self {
    Self {
      name: descriptor.name.clone(),
      dir: descriptor.dir.clone(),
      version: descriptor.version.clone(),
      metadata: descriptor.metadata.clone(),
      all_local_dependencies: BTreeMap::new(),
      published_local_dependencies: BTreeMap::new(),
      local_dependencies: BTreeMap::new(),
      local_dev_dependencies: BTreeMap::new(),
      local_optional_dependencies: BTreeMap::new(),
    }
  }

  pub fn all_local_dependencies(&self) -> &BTreeMap<String, NodeIndex> {
    &self.all_local_dependencies
  }

  pub fn published_local_dependencies(&self) -> &BTreeMap<String, NodeIndex> {
    &self.published_local_dependencies
  }

  pub fn local_dependencies(&self) -> &BTreeMap<String, NodeIndex> {
    &self.local_dependencies
  }

  pub fn local_dev_dependencies(&self) -> &BTreeMap<String, NodeIndex> {
    &self.local_dev_dependencies
  }

  pub fn local_optional_dependencies(&self) -> &BTreeMap<String, NodeIndex> {
    &self.local_optional_dependencies
  }

  /// The neighbor map backing `view`.
  pub fn dependencies(&self, view: DependencyView) -> &BTreeMap<String, NodeIndex> {
    match view {
      DependencyView::All => &self.all_local_dependencies,
      DependencyView::Published => &self.published_local_dependencies,
      DependencyView::Prod => &self.local_dependencies,
      DependencyView::Dev => &self.local_dev_dependencies,
      DependencyView::Optional => &self.local_optional_dependencies,
    }
  }

  /// Local dependency names in `view`, sorted.
  pub fn dependency_names(&self, view: DependencyView) -> impl Iterator<Item = &str> + '_ {
    self.dependencies(view).keys().map(String::as_str)
  }

  fn link(&mut self, dep_name: &str, dep_idx: NodeIndex, kind: DependencyKind) {
    self.all_local_dependencies.insert(dep_name.to_string(), dep_idx);
    match kind {
      DependencyKind::Prod => {
        self.local_dependencies.insert(dep_name.to_string(), dep_idx);
        self.published_local_dependencies.insert(dep_name.to_string(), dep_idx);
      }
      DependencyKind::Dev => {
        self.local_dev_dependencies.insert(dep_name.to_string(), dep_idx);
      }
      DependencyKind::Optional => {
        self.local_optional_dependencies.insert(dep_name.to_string(), dep_idx);
        self.published_local_dependencies.insert(dep_name.to_string(), dep_idx);
      }
    }
  }
}

/// Workspace package graph.
///
/// Built once from a descriptor snapshot and immutable afterwards.
pub struct PackageGraph {
  /// Nodes: GraphNode
  /// Edges: DependencyKind (Prod, Dev, Optional)
  graph: DiGraph<GraphNode, DependencyKind>,

  /// Index: package name → node index
  name_to_node: HashMap<String, NodeIndex>,
}

impl PackageGraph {
  /// Build the graph from package descriptors.
  ///
  /// Pass 1 allocates every node; pass 2 resolves dependency names against the arena.
  /// Fails if two descriptors share a name.
  pub fn build(descriptors: Vec<PackageDescriptor>) -> Result<Self, GraphError> {
    let mut graph: DiGraph<GraphNode, DependencyKind> = DiGraph::with_capacity(descriptors.len(), 0);
    let mut name_to_node: HashMap<String, NodeIndex> = HashMap::with_capacity(descriptors.len());

    for descriptor in &descriptors {
      if let Some(&existing) = name_to_node.get(&descriptor.name) {
        return Err(GraphError::DuplicateName {
          name: descriptor.name.clone(),
          first_dir: graph[existing].dir.clone(),
          second_dir: descriptor.dir.clone(),
        });
      }
      let idx = graph.add_node(GraphNode::new(descriptor));
      name_to_node.insert(descriptor.name.clone(), idx);
    }

    for descriptor in &descriptors {
      let from_idx = name_to_node[&descriptor.name];

      let sections = [
        (DependencyKind::Prod, &descriptor.dependencies),
        (DependencyKind::Dev, &descriptor.dev_dependencies),
        (DependencyKind::Optional, &descriptor.optional_dependencies),
      ];

      for (kind, deps) in sections {
        for dep_name in deps.keys() {
          // Not a workspace package
          let Some(&to_idx) = name_to_node.get(dep_name) else {
            continue;
          };
          graph[from_idx].link(dep_name, to_idx, kind);
          graph.add_edge(from_idx, to_idx, kind);
        }
      }
    }

    tracing::debug!(
      packages = graph.node_count(),
      edges = graph.edge_count(),
      "built package graph"
    );

    Ok(Self { graph, name_to_node })
  }

  /// Number of packages in the graph.
  pub fn len(&self) -> usize {
    self.graph.node_count()
  }

  pub fn is_empty(&self) -> bool {
    self.graph.node_count() == 0
  }

  /// Look up a package by name.
  pub fn get(&self, name: &str) -> Option<&GraphNode> {
    self.name_to_node.get(name).map(|idx| &self.graph[*idx])
  }

  /// Look up a package by name, failing if it is not part of the graph.
  pub fn find(&self, name: &str) -> Result<&GraphNode, GraphError> {
    self.get(name).ok_or_else(|| GraphError::PackageNotFound {
      name: name.to_string(),
    })
  }

  /// Resolve a neighbor reference held by one of this graph's nodes.
  pub fn node(&self, idx: NodeIndex) -> &GraphNode {
    &self.graph[idx]
  }

  pub fn contains(&self, name: &str) -> bool {
    self.name_to_node.contains_key(name)
  }

  /// All packages, in no particular order.
  pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
    self.graph.node_weights()
  }

  /// All package names, sorted.
  pub fn package_names(&self) -> Vec<String> {
    let mut names: Vec<_> = self.name_to_node.keys().cloned().collect();
    names.sort();
    names
  }

  /// Packages that list `name` in `view` (direct dependents).
  ///
  /// A dependent that lists `name` in two sections is yielded once per section.
  pub fn direct_dependents<'a>(
    &'a self,
    name: &str,
    view: DependencyView,
  ) -> impl Iterator<Item = &'a str> + use<'a> {
    let idx = self.name_to_node.get(name).copied();
    idx
      .into_iter()
      .flat_map(move |idx| self.graph.edges_directed(idx, Direction::Incoming))
      .filter(move |edge| view.includes(*edge.weight()))
      .map(move |edge| self.graph[edge.source()].name.as_str())
  }

  /// Collect every name reachable from `start_names` by repeatedly applying `expand`.
  ///
  /// `expand` is called exactly once per name added to the result, with that name's node.
  /// Names it yields are only resolved when they are processed, so an unknown name fails
  /// the whole traversal with [`GraphError::PackageNotFound`]. Terminates on cyclic graphs.
  /// Visiting order is unspecified.
  pub fn collect_names<'a, I, S, F, E>(&'a self, start_names: I, mut expand: F) -> Result<BTreeSet<String>, GraphError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: FnMut(&'a GraphNode) -> Option<E>,
    E: IntoIterator,
    E::Item: Into<String>,
  {
    let mut pending: Vec<String> = start_names.into_iter().map(Into::into).collect();
    let mut included = BTreeSet::new();

    while let Some(name) = pending.pop() {
      if included.contains(&name) {
        continue;
      }

      let node = self.find(&name)?;
      included.insert(name);

      if let Some(next) = expand(node) {
        pending.extend(next.into_iter().map(Into::into));
      }
    }

    Ok(included)
  }

  /// Transitive local dependencies of `name` in `view`, excluding `name` itself.
  pub fn transitive_dependencies(&self, name: &str, view: DependencyView) -> Result<BTreeSet<String>, GraphError> {
    let mut names = self.collect_names([name], |node| Some(node.dependency_names(view)))?;
    names.remove(name);
    Ok(names)
  }

  /// Transitive dependents of `name` in `view`, excluding `name` itself.
  pub fn transitive_dependents(&self, name: &str, view: DependencyView) -> Result<BTreeSet<String>, GraphError> {
    let mut names = self.collect_names([name], |node| Some(self.direct_dependents(&node.name, view)))?;
    names.remove(name);
    Ok(names)
  }

  /// Export the local dependency graph to DOT format (Graphviz).
  ///
  /// Dev edges are blue, optional edges dashed.
  pub fn to_dot(&self) -> String {
    use petgraph::dot::{Config, Dot};

    let dot = Dot::with_attr_getters(
      &self.graph,
      &[Config::EdgeNoLabel, Config::NodeNoLabel],
      &|_, edge_ref| match edge_ref.weight() {
        DependencyKind::Prod => String::new(),
        DependencyKind::Dev => "color=blue".to_string(),
        DependencyKind::Optional => "style=dashed".to_string(),
      },
      &|_, (_idx, node)| format!("label=\"{}\" shape=box", node.name),
    );

    format!("{:?}", dot)
  }
}

impl fmt::Debug for PackageGraph {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PackageGraph")
      .field("packages", &self.package_names())
      .field("edges", &self.graph.edge_count())
      .finish()
  }
}
