//! Layer registry
//!
//! Top-level nodes are partitioned into a fixed, ordered set of layers. Each
//! layer has one root node, created once and kept for the manager's
//! lifetime, and one name index of the nodes registered in it. The index and
//! the root's children always hold the same names.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Deserialize};

use super::error::{UiError, UiResult};
use super::node::{NodeId, PlainNode};
use super::tree::UiTree;
use crate::core::UiConfig;
use crate::scene::CanvasFlags;

/// Rendering layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UiLayer {
    /// Parked UI that should stay loaded but out of sight
    Hidden,
    /// Backgrounds
    Floor,
    /// Regular screens
    Normal,
    /// Persistent HUD elements
    Fixed,
    /// Windows opened over screens
    Window,
    /// Tooltips
    Tip,
    /// Full-screen dimming boards
    BlackBoard,
    /// Dialogue boxes
    Dialogue,
    /// Tutorial guides
    Guide,
    /// Loading screens
    Loading,
    /// Notifications
    Notify,
    /// System overlays
    System,
}

impl UiLayer {
    /// Number of layers
    pub const COUNT: usize = 12;

    /// Every layer in rank order, back to front
    pub const ALL: [UiLayer; Self::COUNT] = [
        UiLayer::Hidden,
        UiLayer::Floor,
        UiLayer::Normal,
        UiLayer::Fixed,
        UiLayer::Window,
        UiLayer::Tip,
        UiLayer::BlackBoard,
        UiLayer::Dialogue,
        UiLayer::Guide,
        UiLayer::Loading,
        UiLayer::Notify,
        UiLayer::System,
    ];

    /// Scan order for removal by name alone; short-lived overlays first
    pub const REMOVAL_ORDER: [UiLayer; Self::COUNT] = [
        UiLayer::System,
        UiLayer::Notify,
        UiLayer::Hidden,
        UiLayer::Floor,
        UiLayer::Normal,
        UiLayer::Fixed,
        UiLayer::Window,
        UiLayer::Tip,
        UiLayer::BlackBoard,
        UiLayer::Dialogue,
        UiLayer::Guide,
        UiLayer::Loading,
    ];

    /// Position in the back-to-front order
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Layer name, also used as the layer root's name
    pub fn name(self) -> &'static str {
        match self {
            UiLayer::Hidden => "Hidden",
            UiLayer::Floor => "Floor",
            UiLayer::Normal => "Normal",
            UiLayer::Fixed => "Fixed",
            UiLayer::Window => "Window",
            UiLayer::Tip => "Tip",
            UiLayer::BlackBoard => "BlackBoard",
            UiLayer::Dialogue => "Dialogue",
            UiLayer::Guide => "Guide",
            UiLayer::Loading => "Loading",
            UiLayer::Notify => "Notify",
            UiLayer::System => "System",
        }
    }

    /// Depth offset of the layer root for a given step
    pub fn depth_offset(self, step: f32) -> f32 {
        self.rank() as f32 * step
    }
}

impl fmt::Display for UiLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of [`LayerRegistry::add_to_layer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The node was indexed and attached under the layer root
    Added(NodeId),
    /// A node with the same name was already indexed; it is returned untouched
    Existing(NodeId),
}

impl Registration {
    /// The registered node, new or existing
    pub fn id(self) -> NodeId {
        match self {
            Registration::Added(id) | Registration::Existing(id) => id,
        }
    }
}

#[derive(Debug)]
struct LayerSlot {
    root: NodeId,
    index: HashMap<String, NodeId>,
}

/// One root node and one name index per layer
#[derive(Debug)]
pub struct LayerRegistry {
    /// Indexed by [`UiLayer::rank`]
    slots: Vec<LayerSlot>,
}

impl LayerRegistry {
    /// Create every layer root under `parent`
    ///
    /// Each root is named after its layer, offset in depth by rank, assigned
    /// the configured rendering layer, given canvas components, stretched
    /// full screen and shown. Layer roots are pinned in the tree so their
    /// children only change through the registry.
    pub fn new(tree: &mut UiTree, parent: NodeId, config: &UiConfig) -> UiResult<Self> {
        config.validate()?;

        let mut slots = Vec::with_capacity(UiLayer::COUNT);
        for layer in UiLayer::ALL {
            let visual = tree.scene_mut().create_visual(layer.name(), true);
            let root = tree.create_node(visual, Box::new(PlainNode), None, true)?;
            tree.add_managed_child(parent, root)?;
            tree.pin(root);

            let scene = tree.scene_mut();
            scene.set_depth_offset(visual, layer.depth_offset(config.layer_depth_step));
            scene.set_render_layer(visual, &config.render_layer);
            scene.set_canvas_flags(
                visual,
                CanvasFlags::CULL_TRANSPARENT | CanvasFlags::BLOCKS_RAYCASTS | CanvasFlags::INTERACTABLE,
            );
            tree.make_full_screen(root);
            tree.show(root, None);

            slots.push(LayerSlot {
                root,
                index: HashMap::with_capacity(config.layer_index_capacity),
            });
        }

        log::debug!("Created {} layer roots", slots.len());
        Ok(Self { slots })
    }

    fn slot(&self, layer: UiLayer) -> &LayerSlot {
        &self.slots[layer.rank()]
    }

    fn slot_mut(&mut self, layer: UiLayer) -> &mut LayerSlot {
        &mut self.slots[layer.rank()]
    }

    /// Root node of a layer
    pub fn root(&self, layer: UiLayer) -> NodeId {
        self.slot(layer).root
    }

    /// Every layer root, back to front
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().map(|slot| slot.root)
    }

    /// Index a node in a layer and attach it under the layer root
    ///
    /// First write wins: if the name is already indexed the existing node is
    /// returned and `node` is left untouched.
    pub fn add_to_layer(&mut self, tree: &mut UiTree, node: NodeId, layer: UiLayer) -> UiResult<Registration> {
        let name = tree
            .name(node)
            .ok_or_else(|| UiError::InvalidArgument("node does not exist".to_string()))?
            .to_string();

        let slot = self.slot_mut(layer);
        if let Some(existing) = slot.index.get(&name) {
            return Ok(Registration::Existing(*existing));
        }

        tree.add_managed_child(slot.root, node)?;
        slot.index.insert(name, node);
        Ok(Registration::Added(node))
    }

    /// Remove a name from one layer's root and index
    ///
    /// Returns whether the layer root held the name.
    pub fn remove_from_layer(&mut self, tree: &mut UiTree, name: &str, layer: UiLayer) -> bool {
        let slot = self.slot_mut(layer);
        let removed = tree.remove_managed_child(slot.root, name);
        slot.index.remove(name);
        removed
    }

    /// Remove a name from the first layer holding it, in [`UiLayer::REMOVAL_ORDER`]
    pub fn remove_any(&mut self, tree: &mut UiTree, name: &str) -> Option<UiLayer> {
        for layer in UiLayer::REMOVAL_ORDER {
            let slot = self.slot_mut(layer);
            if tree.remove_managed_child(slot.root, name) {
                slot.index.remove(name);
                return Some(layer);
            }
        }
        None
    }

    /// First node registered under `name`, scanning layers back to front
    pub fn find_any(&self, name: &str) -> Option<NodeId> {
        self.slots.iter().find_map(|slot| slot.index.get(name).copied())
    }

    /// Node registered under `name` in one layer
    pub fn find_in(&self, name: &str, layer: UiLayer) -> Option<NodeId> {
        self.slot(layer).index.get(name).copied()
    }

    /// First layer holding `name`, back to front
    pub fn layer_of(&self, name: &str) -> Option<UiLayer> {
        UiLayer::ALL
            .into_iter()
            .find(|layer| self.slot(*layer).index.contains_key(name))
    }

    /// Number of nodes registered in a layer
    pub fn len(&self, layer: UiLayer) -> usize {
        self.slot(layer).index.len()
    }

    /// Whether a layer has no registered nodes
    pub fn is_empty(&self, layer: UiLayer) -> bool {
        self.slot(layer).index.is_empty()
    }

    /// Names registered in a layer, in no particular order
    pub fn names(&self, layer: UiLayer) -> Vec<&str> {
        self.slot(layer).index.keys().map(String::as_str).collect()
    }

    /// Copy of a layer's index, safe to iterate while removing
    pub fn snapshot(&self, layer: UiLayer) -> Vec<(String, NodeId)> {
        self.slot(layer)
            .index
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect()
    }

    /// Forget every entry of a layer's index without touching the tree
    pub fn clear(&mut self, layer: UiLayer) {
        self.slot_mut(layer).index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SimpleSceneGraph;

    fn setup() -> (UiTree, LayerRegistry, NodeId) {
        let mut tree = UiTree::new(Box::new(SimpleSceneGraph::new()));
        let visual = tree.scene_mut().create_visual("UIRoot", true);
        let root = tree.create_node(visual, Box::new(PlainNode), None, true).unwrap();
        let registry = LayerRegistry::new(&mut tree, root, &UiConfig::default()).unwrap();
        (tree, registry, root)
    }

    fn node(tree: &mut UiTree, name: &str) -> NodeId {
        let visual = tree.scene_mut().create_visual(name, true);
        tree.create_node(visual, Box::new(PlainNode), None, false).unwrap()
    }

    #[test]
    fn test_layer_roots_are_ordered_in_depth() {
        let (tree, registry, root) = setup();
        assert_eq!(tree.children(root).len(), UiLayer::COUNT);

        let mut previous = f32::NEG_INFINITY;
        for layer in UiLayer::ALL {
            let layer_root = registry.root(layer);
            let visual = tree.node(layer_root).unwrap().visual();
            let depth = tree.scene().depth_offset(visual);
            assert!(depth > previous, "{} should sit in front of the previous layer", layer);
            previous = depth;

            assert_eq!(tree.name(layer_root), Some(layer.name()));
            assert_eq!(tree.scene().render_layer(visual), Some("UI"));
            assert!(tree.scene().rect(visual).unwrap().is_full_screen());
            assert!(tree.scene().canvas_flags(visual).contains(CanvasFlags::BLOCKS_RAYCASTS));
            assert!(tree.is_visible(layer_root));
        }
    }

    #[test]
    fn test_first_write_wins() {
        let (mut tree, mut registry, _) = setup();
        let first = node(&mut tree, "panel");
        let second = node(&mut tree, "panel");

        assert_eq!(
            registry.add_to_layer(&mut tree, first, UiLayer::Normal).unwrap(),
            Registration::Added(first)
        );
        assert_eq!(
            registry.add_to_layer(&mut tree, second, UiLayer::Normal).unwrap(),
            Registration::Existing(first)
        );
        assert_eq!(registry.len(UiLayer::Normal), 1);
        assert_eq!(tree.parent(second), None);
    }

    #[test]
    fn test_same_name_in_different_layers() {
        let (mut tree, mut registry, _) = setup();
        let normal = node(&mut tree, "panel");
        let system = node(&mut tree, "panel");
        registry.add_to_layer(&mut tree, normal, UiLayer::Normal).unwrap();
        registry.add_to_layer(&mut tree, system, UiLayer::System).unwrap();

        // Back-to-front lookup finds the lower layer first
        assert_eq!(registry.find_any("panel"), Some(normal));
        assert_eq!(registry.layer_of("panel"), Some(UiLayer::Normal));

        // Overlay layers are removed first
        assert_eq!(registry.remove_any(&mut tree, "panel"), Some(UiLayer::System));
        assert_eq!(registry.find_in("panel", UiLayer::System), None);
        assert_eq!(registry.find_any("panel"), Some(normal));
    }

    #[test]
    fn test_index_and_root_stay_in_lockstep() {
        let (mut tree, mut registry, _) = setup();
        let panel = node(&mut tree, "panel");
        registry.add_to_layer(&mut tree, panel, UiLayer::Window).unwrap();

        let layer_root = registry.root(UiLayer::Window);
        assert_eq!(tree.child(layer_root, "panel"), Some(panel));
        assert_eq!(registry.names(UiLayer::Window), vec!["panel"]);

        assert!(registry.remove_from_layer(&mut tree, "panel", UiLayer::Window));
        assert_eq!(tree.child(layer_root, "panel"), None);
        assert!(registry.is_empty(UiLayer::Window));
        assert!(!registry.remove_from_layer(&mut tree, "panel", UiLayer::Window));
        assert_eq!(registry.remove_any(&mut tree, "panel"), None);
    }

    #[test]
    fn test_layer_roots_reject_direct_tree_changes() {
        let (mut tree, mut registry, _) = setup();
        let panel = node(&mut tree, "panel");
        let stray = node(&mut tree, "stray");
        registry.add_to_layer(&mut tree, panel, UiLayer::Normal).unwrap();
        let layer_root = registry.root(UiLayer::Normal);

        assert!(!tree.remove_child(layer_root, "panel"));
        assert!(!tree.dispose(layer_root));
        assert!(tree.add_child(layer_root, stray, None).is_err());

        assert_eq!(tree.child(layer_root, "panel"), Some(panel));
        assert_eq!(registry.names(UiLayer::Normal), vec!["panel"]);
        assert_eq!(tree.children(layer_root), &[panel]);
    }

    #[test]
    fn test_oversized_index_capacity_is_rejected() {
        let mut tree = UiTree::new(Box::new(SimpleSceneGraph::new()));
        let visual = tree.scene_mut().create_visual("UIRoot", true);
        let root = tree.create_node(visual, Box::new(PlainNode), None, true).unwrap();
        let config = UiConfig::default().with_layer_index_capacity(usize::MAX);

        let result = LayerRegistry::new(&mut tree, root, &config);
        assert!(matches!(result, Err(UiError::Config(_))));
    }

    #[test]
    fn test_removal_order_covers_every_layer() {
        let mut order = UiLayer::REMOVAL_ORDER.to_vec();
        order.sort();
        assert_eq!(order, UiLayer::ALL.to_vec());
    }
}
