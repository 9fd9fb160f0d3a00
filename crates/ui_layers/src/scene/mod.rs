//! Host scene-graph collaborator
//!
//! The UI tree never owns pixels or transforms itself. Every visual object it
//! wraps lives in a host scene graph reached through the [`SceneGraph`] trait:
//!
//! ```text
//! UiTree (names, parents, lifecycle hooks)
//!      ↓
//! SceneGraph (visual objects, active flags, rects, depth)
//!      ↓
//! Host renderer
//! ```
//!
//! [`SimpleSceneGraph`] is an in-memory implementation used by the demo and
//! the tests. Hosts plug their own engine in by implementing the trait.

mod scene_graph;
mod simple_graph;

pub use scene_graph::{SceneGraph, VisualHandle, RectLayout, CanvasFlags};
pub use simple_graph::{SimpleSceneGraph, VisualObject};
