//! UI nodes and their lifecycle hooks
//!
//! A [`VisualNode`] wraps exactly one visual object from the host scene
//! graph. Nodes live in the [`UiTree`](super::UiTree) arena and refer to each
//! other by [`NodeId`]; the parent link is an index, never an owning pointer.
//!
//! Behaviour is attached through the [`NodeBehaviour`] trait. Every hook has
//! a no-op default, so a node type only overrides what it needs:
//!
//! ```
//! use ui_layers::ui::{NodeBehaviour, NodeView};
//!
//! #[derive(Default)]
//! struct ScoreBoard {
//!     refreshes: u32,
//! }
//!
//! impl NodeBehaviour for ScoreBoard {
//!     fn refresh(&mut self, _node: &NodeView<'_>) {
//!         self.refreshes += 1;
//!     }
//! }
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::scene::VisualHandle;

slotmap::new_key_type! {
    /// Stable identifier of a node in a [`UiTree`](super::UiTree)
    pub struct NodeId;
}

/// Opaque payload handed to a node at construction or show time
pub type UserData = Rc<dyn Any>;

/// Callback invoked with a read-only view of the node
pub type NodeAction = Box<dyn FnMut(&NodeView<'_>)>;

/// Read-only view of a node passed to hooks
#[derive(Clone, Copy)]
pub struct NodeView<'a> {
    /// Node identifier
    pub id: NodeId,
    /// Node name
    pub name: &'a str,
    /// Current user data
    pub user_data: Option<&'a UserData>,
    /// Whether this node is a layer or application root
    pub is_root: bool,
    /// The node's own active flag when the hook runs
    pub visible: bool,
}

impl NodeView<'_> {
    /// Downcast the user data to a concrete type
    pub fn user_data_as<T: Any>(&self) -> Option<&T> {
        self.user_data.and_then(|data| data.downcast_ref::<T>())
    }
}

impl fmt::Debug for NodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeView")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("has_user_data", &self.user_data.is_some())
            .field("is_root", &self.is_root)
            .field("visible", &self.visible)
            .finish()
    }
}

/// Upcast support for typed node lookup
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Lifecycle hooks of a node type
///
/// Show hooks run after the node and its children are active. Hide hooks run
/// after the children are hidden but before the node itself deactivates.
pub trait NodeBehaviour: AsAny {
    /// Name used when the wrapped visual object has a blank name
    fn type_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Runs once, when the node is constructed
    fn init(&mut self, _node: &NodeView<'_>) {}

    /// Runs after the node becomes (or is re-shown while) visible
    fn on_show(&mut self, _node: &NodeView<'_>) {}

    /// Runs after every `on_show`; the place to bind data
    fn refresh(&mut self, _node: &NodeView<'_>) {}

    /// Runs before the node deactivates, or on a hide of a hidden node
    fn on_hide(&mut self, _node: &NodeView<'_>) {}

    /// Runs once, after the node's children are disposed
    fn on_dispose(&mut self, _node: &NodeView<'_>) {}
}

/// Behaviour of nodes created without a dedicated type
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainNode;

impl NodeBehaviour for PlainNode {}

/// Strip the module path and generic arguments from a type name
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics.rsplit("::").next().unwrap_or(without_generics)
}

/// A node in the UI tree
pub struct VisualNode {
    pub(crate) name: String,
    pub(crate) visual: VisualHandle,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: HashMap<String, NodeId>,
    /// Sibling order of `children`; cascades walk this
    pub(crate) order: Vec<NodeId>,
    pub(crate) init_visible: bool,
    pub(crate) is_root: bool,
    pub(crate) user_data: Option<UserData>,
    pub(crate) behaviour: Option<Box<dyn NodeBehaviour>>,
    pub(crate) on_show_action: Option<NodeAction>,
    pub(crate) on_hide_action: Option<NodeAction>,
    pub(crate) disposed: bool,
}

impl VisualNode {
    pub(crate) fn new(
        name: String,
        visual: VisualHandle,
        init_visible: bool,
        behaviour: Box<dyn NodeBehaviour>,
        user_data: Option<UserData>,
        is_root: bool,
    ) -> Self {
        Self {
            name,
            visual,
            parent: None,
            children: HashMap::new(),
            order: Vec::new(),
            init_visible,
            is_root,
            user_data,
            behaviour: Some(behaviour),
            on_show_action: None,
            on_hide_action: None,
            disposed: false,
        }
    }

    /// Node name, unique among its siblings
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wrapped visual object
    pub fn visual(&self) -> VisualHandle {
        self.visual
    }

    /// Parent node, if attached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in sibling order
    pub fn children(&self) -> &[NodeId] {
        &self.order
    }

    /// Child by name
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.order.len()
    }

    /// Active flag captured at construction
    pub fn init_visible(&self) -> bool {
        self.init_visible
    }

    /// Whether this is a layer or application root
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Whether dispose has run
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Current user data
    pub fn user_data(&self) -> Option<&UserData> {
        self.user_data.as_ref()
    }

    /// Downcast the behaviour to a concrete node type
    pub fn behaviour_as<T: NodeBehaviour>(&self) -> Option<&T> {
        let behaviour: &dyn NodeBehaviour = self.behaviour.as_deref()?;
        behaviour.as_any().downcast_ref::<T>()
    }

    /// Mutable variant of [`VisualNode::behaviour_as`]
    pub fn behaviour_as_mut<T: NodeBehaviour>(&mut self) -> Option<&mut T> {
        let behaviour: &mut dyn NodeBehaviour = self.behaviour.as_deref_mut()?;
        behaviour.as_any_mut().downcast_mut::<T>()
    }

    pub(crate) fn view(&self, id: NodeId, visible: bool) -> NodeView<'_> {
        NodeView {
            id,
            name: &self.name,
            user_data: self.user_data.as_ref(),
            is_root: self.is_root,
            visible,
        }
    }
}

impl fmt::Debug for VisualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualNode")
            .field("name", &self.name)
            .field("visual", &self.visual)
            .field("parent", &self.parent)
            .field("children", &self.order.len())
            .field("init_visible", &self.init_visible)
            .field("is_root", &self.is_root)
            .field("behaviour", &self.behaviour.as_ref().map(|b| b.type_name()))
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Panel;
    impl NodeBehaviour for Panel {}

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("crate::ui::Panel"), "Panel");
        assert_eq!(short_type_name("Wrapper<crate::Inner>"), "Wrapper");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn test_type_name_through_trait_object() {
        let behaviour: Box<dyn NodeBehaviour> = Box::new(Panel);
        assert_eq!(behaviour.type_name(), "Panel");
        assert_eq!(PlainNode.type_name(), "PlainNode");
    }

    #[test]
    fn test_downcast_behaviour() {
        let node = VisualNode::new(
            "panel".to_string(),
            VisualHandle::default(),
            true,
            Box::new(Panel),
            None,
            false,
        );
        assert!(node.behaviour_as::<Panel>().is_some());
        assert!(node.behaviour_as::<PlainNode>().is_none());
    }

    #[test]
    fn test_view_user_data_downcast() {
        let data: UserData = Rc::new(42_u32);
        let node = VisualNode::new(
            "panel".to_string(),
            VisualHandle::default(),
            true,
            Box::new(PlainNode),
            Some(data),
            false,
        );
        let view = node.view(NodeId::default(), true);
        assert!(view.visible);
        assert_eq!(view.user_data_as::<u32>(), Some(&42));
        assert_eq!(view.user_data_as::<i64>(), None);
    }
}
