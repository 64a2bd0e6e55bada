//! Workspace discovery for JavaScript/TypeScript monorepos
//!
//! Turns a workspace root into the flat `PackageDescriptor` list the graph is built from.
//! Nothing here knows about the graph; nothing in the graph reads the filesystem.

pub mod descriptor;
pub mod node;

pub use descriptor::PackageDescriptor;
pub use node::{PackageManager, detect_package_manager, discover};
