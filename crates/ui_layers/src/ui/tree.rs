//! UI node tree
//!
//! [`UiTree`] owns every [`VisualNode`] in a slot map together with the host
//! [`SceneGraph`] that owns their visual objects. All lifecycle operations
//! (show, hide, add, remove, dispose) go through the tree so that node
//! bookkeeping and scene state never drift apart.
//!
//! Visibility cascades are depth ordered:
//!
//! ```text
//! show(P):  activate P → show C1 → show C2 → P.on_show
//! hide(P):  hide C1 → hide C2 → P.on_hide → deactivate P
//! ```
//!
//! Pinned nodes (the application root and the layer roots) can not be
//! disposed, and their children can only be changed through the
//! `pub(crate)` managed entry points used by the layer registry.

use slotmap::{SecondaryMap, SlotMap};

use super::error::{UiError, UiResult};
use super::node::{NodeAction, NodeBehaviour, NodeId, UserData, VisualNode};
use crate::scene::{RectLayout, SceneGraph, VisualHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Init,
    Show,
    Hide,
    Dispose,
}

/// Arena of UI nodes bound to a host scene graph
pub struct UiTree {
    nodes: SlotMap<NodeId, VisualNode>,
    /// Which node wraps each visual object
    owners: SecondaryMap<VisualHandle, NodeId>,
    /// Nodes whose children are owned by the layer registry
    pinned: SecondaryMap<NodeId, ()>,
    scene: Box<dyn SceneGraph>,
}

impl UiTree {
    /// Create an empty tree over a scene graph
    pub fn new(scene: Box<dyn SceneGraph>) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            owners: SecondaryMap::new(),
            pinned: SecondaryMap::new(),
            scene,
        }
    }

    /// Host scene graph
    pub fn scene(&self) -> &dyn SceneGraph {
        self.scene.as_ref()
    }

    /// Mutable host scene graph
    pub fn scene_mut(&mut self) -> &mut dyn SceneGraph {
        self.scene.as_mut()
    }

    /// Number of nodes held by the arena, including disposed ones still referenced by a parent
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    pub fn has_no_nodes(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the node is an application or layer root managed by the registry
    pub fn is_pinned(&self, id: NodeId) -> bool {
        self.pinned.contains_key(id)
    }

    pub(crate) fn pin(&mut self, id: NodeId) {
        if self.nodes.contains_key(id) {
            self.pinned.insert(id, ());
        }
    }

    pub(crate) fn unpin(&mut self, id: NodeId) {
        self.pinned.remove(id);
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> Option<&VisualNode> {
        self.nodes.get(id)
    }

    /// Mutably borrow a node
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut VisualNode> {
        self.nodes.get_mut(id)
    }

    /// Node wrapping a visual object
    pub fn node_of_visual(&self, visual: VisualHandle) -> Option<NodeId> {
        self.owners.get(visual).copied()
    }

    /// Node name
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(VisualNode::name)
    }

    /// Parent node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(VisualNode::parent)
    }

    /// Children in sibling order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id) {
            Some(node) => node.children(),
            None => &[],
        }
    }

    /// Direct child by name
    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes.get(parent).and_then(|node| node.child(name))
    }

    /// Whether the node has no live visual object
    pub fn is_empty(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .map_or(true, |node| !self.scene.is_alive(node.visual))
    }

    /// Whether dispose has run on the node
    pub fn is_disposed(&self, id: NodeId) -> bool {
        self.nodes.get(id).map_or(true, VisualNode::is_disposed)
    }

    /// The node's own visible flag
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| self.scene.is_active(node.visual))
    }

    /// Whether the node and every ancestor are visible
    pub fn is_visible_in_hierarchy(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if !self.is_visible(node_id) {
                return false;
            }
            current = self.parent(node_id);
        }
        true
    }

    /// Current user data
    pub fn user_data(&self, id: NodeId) -> Option<&UserData> {
        self.nodes.get(id).and_then(VisualNode::user_data)
    }

    /// Downcast a node's behaviour
    pub fn behaviour_as<T: NodeBehaviour>(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id).and_then(VisualNode::behaviour_as::<T>)
    }

    /// Mutably downcast a node's behaviour
    pub fn behaviour_as_mut<T: NodeBehaviour>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id).and_then(VisualNode::behaviour_as_mut::<T>)
    }

    /// Set the callback run before `on_show`
    pub fn set_on_show_action(&mut self, id: NodeId, action: Option<NodeAction>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.on_show_action = action;
        }
    }

    /// Set the callback run before `on_hide`
    pub fn set_on_hide_action(&mut self, id: NodeId, action: Option<NodeAction>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.on_hide_action = action;
        }
    }

    /// Wrap a live visual object in a new node
    ///
    /// The visual's current active flag is recorded as the node's initial
    /// visibility and replayed when the node is attached. A blank visual name
    /// is replaced by the behaviour's type name.
    pub fn create_node(
        &mut self,
        visual: VisualHandle,
        behaviour: Box<dyn NodeBehaviour>,
        user_data: Option<UserData>,
        is_root: bool,
    ) -> UiResult<NodeId> {
        if !self.scene.is_alive(visual) {
            return Err(UiError::InvalidArgument(
                "visual handle does not refer to a live object".to_string(),
            ));
        }
        if let Some(owner) = self.owners.get(visual) {
            return Err(UiError::InvalidArgument(format!(
                "visual object is already wrapped by node {:?}",
                owner
            )));
        }

        let init_visible = self.scene.is_active(visual);
        let existing = self
            .scene
            .name(visual)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string);
        let name = match existing {
            Some(name) => name,
            None => {
                let fallback = behaviour.type_name();
                self.scene.set_name(visual, fallback);
                fallback.to_string()
            }
        };

        let id = self.nodes.insert(VisualNode::new(
            name,
            visual,
            init_visible,
            behaviour,
            user_data,
            is_root,
        ));
        self.owners.insert(visual, id);
        self.notify(id, Hook::Init);

        log::trace!("Created node {:?} ({})", id, self.name(id).unwrap_or_default());
        Ok(id)
    }

    /// Show a node, cascading to its children
    ///
    /// Showing a node that is already visible re-runs its show hooks and
    /// refresh without touching the children. Returns false for unknown or
    /// disposed nodes.
    pub fn show(&mut self, id: NodeId, user_data: Option<UserData>) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if !node.disposed => node.user_data = user_data,
            _ => return false,
        }

        if self.is_visible(id) {
            self.notify(id, Hook::Show);
        } else {
            self.set_visible(id, true);
        }
        true
    }

    /// Hide a node, cascading to its children first
    ///
    /// Hiding a hidden node only re-runs its hide hooks. Returns false for
    /// unknown or disposed nodes.
    pub fn hide(&mut self, id: NodeId) -> bool {
        match self.nodes.get(id) {
            Some(node) if !node.disposed => {}
            _ => return false,
        }

        if self.is_visible(id) {
            self.set_visible(id, false);
        } else {
            self.notify(id, Hook::Hide);
        }
        true
    }

    /// Visibility transition shared by show, hide and their cascades
    fn set_visible(&mut self, id: NodeId, value: bool) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let visual = node.visual;
        if !self.scene.is_alive(visual) || self.scene.is_active(visual) == value {
            return;
        }

        let children = node.order.clone();
        if value {
            self.scene.set_active(visual, true);
            for child in children {
                self.set_visible(child, true);
            }
            self.notify(id, Hook::Show);
        } else {
            for child in children {
                self.set_visible(child, false);
            }
            self.notify(id, Hook::Hide);
            self.scene.set_active(visual, false);
        }
    }

    /// Attach `child` under `parent`
    ///
    /// `index` positions the child's visual among its siblings when it is in
    /// bounds; otherwise the child is appended. A child whose visual object
    /// was active at construction is shown with its own user data. Pinned
    /// parents are refused; their children go through the layer registry.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> UiResult<()> {
        if self.is_pinned(parent) {
            return Err(UiError::InvalidArgument(format!(
                "parent ({}) is managed by the layer registry",
                self.name(parent).unwrap_or_default()
            )));
        }
        self.attach(parent, child, index)
    }

    /// Attach under a pinned parent
    pub(crate) fn add_managed_child(&mut self, parent: NodeId, child: NodeId) -> UiResult<()> {
        self.attach(parent, child, None)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> UiResult<()> {
        if self.is_empty(child) {
            return Err(UiError::InvalidArgument("node can not be empty".to_string()));
        }
        let (child_name, child_visual, child_parent, child_disposed, init_visible) = match self.nodes.get(child) {
            Some(node) => (
                node.name.clone(),
                node.visual,
                node.parent,
                node.disposed,
                node.init_visible,
            ),
            None => return Err(UiError::InvalidArgument("node can not be empty".to_string())),
        };
        if child_name.trim().is_empty() {
            return Err(UiError::InvalidArgument("node name can not be empty".to_string()));
        }
        if child_disposed {
            return Err(UiError::InvalidArgument(format!("node ({}) is disposed", child_name)));
        }
        if let Some(existing) = child_parent {
            return Err(UiError::InvalidArgument(format!(
                "node ({}) is already attached to {:?}",
                child_name, existing
            )));
        }

        let parent_visual = match self.nodes.get(parent) {
            Some(node) if !node.disposed => node.visual,
            _ => {
                return Err(UiError::InvalidArgument(
                    "parent node does not exist or is disposed".to_string(),
                ))
            }
        };
        if self.is_self_or_ancestor(child, parent) {
            return Err(UiError::InvalidArgument(format!(
                "attaching ({}) would create a cycle",
                child_name
            )));
        }

        let parent_node = self
            .nodes
            .get_mut(parent)
            .ok_or_else(|| UiError::InvalidArgument("parent node does not exist".to_string()))?;
        if parent_node.children.contains_key(&child_name) {
            return Err(UiError::DuplicateKey(child_name));
        }

        parent_node.children.insert(child_name.clone(), child);
        let sibling_count = parent_node.order.len();
        let index = index.filter(|i| *i <= sibling_count);
        match index {
            Some(i) => parent_node.order.insert(i, child),
            None => parent_node.order.push(child),
        }
        self.scene.attach_child(parent_visual, child_visual, index);

        let user_data = match self.nodes.get_mut(child) {
            Some(node) => {
                node.parent = Some(parent);
                node.user_data.clone()
            }
            None => None,
        };

        log::debug!("Attached node ({}) under {:?}", child_name, parent);
        if init_visible {
            self.show(child, user_data);
        }
        Ok(())
    }

    fn is_self_or_ancestor(&self, candidate: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == candidate {
                return true;
            }
            current = self.parent(node_id);
        }
        false
    }

    /// Detach the named child from `parent`
    ///
    /// The child's descendants are detached bottom-up, then the child is
    /// hidden. The child is not disposed. Returns false if no such child or
    /// if the parent is pinned.
    pub fn remove_child(&mut self, parent: NodeId, name: &str) -> bool {
        if self.is_pinned(parent) {
            log::warn!("Refusing to detach ({}) from a registry-managed root", name);
            return false;
        }
        self.detach(parent, name)
    }

    /// Detach from a pinned parent
    pub(crate) fn remove_managed_child(&mut self, parent: NodeId, name: &str) -> bool {
        self.detach(parent, name)
    }

    fn detach(&mut self, parent: NodeId, name: &str) -> bool {
        let Some(parent_node) = self.nodes.get_mut(parent) else {
            return false;
        };
        let Some(child) = parent_node.children.remove(name) else {
            return false;
        };
        parent_node.order.retain(|c| *c != child);

        if !self.nodes.contains_key(child) {
            return false;
        }

        self.remove_children(child);
        self.hide(child);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }

        log::debug!("Detached node ({}) from {:?}", name, parent);
        self.release_if_disposed(child);
        true
    }

    /// Detach a node from its parent
    pub fn remove_from_parent(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        match node.parent {
            Some(parent) => {
                let name = node.name.clone();
                self.remove_child(parent, &name)
            }
            None => false,
        }
    }

    /// Detach every child of a node; no-op on pinned nodes
    pub fn remove_children(&mut self, id: NodeId) {
        if self.is_pinned(id) {
            return;
        }
        let names: Vec<String> = match self.nodes.get(id) {
            Some(node) => node
                .order
                .iter()
                .filter_map(|c| self.nodes.get(*c).map(|n| n.name.clone()))
                .collect(),
            None => return,
        };
        for name in names {
            self.remove_child(id, &name);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.children.clear();
            node.order.clear();
        }
    }

    /// Dispose a node and its whole subtree
    ///
    /// Children are disposed first, then the node's `on_dispose` hook runs,
    /// its actions and parent link are cleared and a non-root visual object
    /// is destroyed. The node stays in its parent's child map; callers that
    /// want it gone pair this with [`UiTree::remove_child`]. Returns false if
    /// the node was unknown, already disposed or pinned.
    pub fn dispose(&mut self, id: NodeId) -> bool {
        if self.is_pinned(id) {
            log::warn!("Refusing to dispose registry-managed root ({})", self.name(id).unwrap_or_default());
            return false;
        }
        match self.nodes.get_mut(id) {
            Some(node) if !node.disposed => node.disposed = true,
            _ => return false,
        }

        self.dispose_children(id);
        self.notify(id, Hook::Dispose);

        let Some(node) = self.nodes.get_mut(id) else {
            return true;
        };
        node.on_show_action = None;
        node.on_hide_action = None;
        let parent = node.parent.take();
        let visual = node.visual;
        let is_root = node.is_root;
        let name = node.name.clone();

        if !is_root {
            self.owners.remove(visual);
            self.scene.destroy(visual);
        }

        let still_indexed = parent
            .and_then(|p| self.nodes.get(p))
            .is_some_and(|p| p.children.get(&name) == Some(&id));
        if !still_indexed {
            self.free(id);
        }

        log::debug!("Disposed node ({})", name);
        true
    }

    /// Dispose every child of a node and forget them; no-op on pinned nodes
    pub fn dispose_children(&mut self, id: NodeId) {
        if self.is_pinned(id) {
            return;
        }
        let children = match self.nodes.get(id) {
            Some(node) => node.order.clone(),
            None => return,
        };
        for child in &children {
            self.dispose(*child);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.children.clear();
            node.order.clear();
        }
        for child in children {
            self.release_if_disposed(child);
        }
    }

    /// Stretch the node's visual object over its parent container
    pub fn make_full_screen(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if !self.scene.is_alive(node.visual) {
            return false;
        }
        self.scene.set_rect(node.visual, RectLayout::full_screen());
        true
    }

    fn release_if_disposed(&mut self, id: NodeId) {
        if self.nodes.get(id).is_some_and(VisualNode::is_disposed) {
            self.free(id);
        }
    }

    fn free(&mut self, id: NodeId) {
        self.pinned.remove(id);
        if let Some(node) = self.nodes.remove(id) {
            if self.owners.get(node.visual) == Some(&id) {
                self.owners.remove(node.visual);
            }
        }
    }

    /// Run a hook with the behaviour and actions temporarily moved out of the node
    fn notify(&mut self, id: NodeId, hook: Hook) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let mut behaviour = node.behaviour.take();
        let mut action = match hook {
            Hook::Show => node.on_show_action.take(),
            Hook::Hide => node.on_hide_action.take(),
            Hook::Init | Hook::Dispose => None,
        };

        if let Some(node) = self.nodes.get(id) {
            let view = node.view(id, self.scene.is_active(node.visual));
            if let Some(action) = action.as_mut() {
                action(&view);
            }
            if let Some(behaviour) = behaviour.as_mut() {
                match hook {
                    Hook::Init => behaviour.init(&view),
                    Hook::Show => {
                        behaviour.on_show(&view);
                        behaviour.refresh(&view);
                    }
                    Hook::Hide => behaviour.on_hide(&view),
                    Hook::Dispose => behaviour.on_dispose(&view),
                }
            }
        }

        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.behaviour = behaviour;
        match hook {
            Hook::Show if node.on_show_action.is_none() => node.on_show_action = action,
            Hook::Hide if node.on_hide_action.is_none() => node.on_hide_action = action,
            _ => {}
        }
    }
}

impl std::fmt::Debug for UiTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiTree")
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}
