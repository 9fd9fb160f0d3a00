//! UI System Module
//!
//! Layered UI hierarchy on top of a host scene graph.
//!
//! Architecture:
//! - UiTree: arena of nodes with show/hide/add/remove/dispose cascades
//! - LayerRegistry: the twelve layer roots and their name indices
//! - UiManager: façade that loads templates and routes them into layers

pub mod error;
pub mod node;
pub mod tree;
pub mod layer;
pub mod manager;

#[cfg(test)]
mod tests;

pub use error::{UiError, UiResult};
pub use node::{NodeAction, NodeBehaviour, NodeId, NodeView, PlainNode, UserData, VisualNode};
pub use tree::UiTree;
pub use layer::{LayerRegistry, Registration, UiLayer};
pub use manager::{AddOptions, UiManager, UiManagerBuilder};
