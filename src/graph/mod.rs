//! Graph-aware workspace analysis
//!
//! Built on package descriptors + petgraph. The graph only knows names, directories and
//! dependency sections; discovery and git live elsewhere and hand it plain data.

pub mod affected;
pub mod changed;
pub mod package_graph;

pub use affected::{AffectedAnalysis, AffectedSet};
pub use package_graph::{DependencyKind, DependencyView, GraphNode, PackageGraph};
