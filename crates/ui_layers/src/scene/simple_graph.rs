//! In-memory scene graph
//!
//! Keeps visual objects in a slot map. No spatial optimization and no
//! rendering; sufficient for headless hosts, tools and tests.

use slotmap::SlotMap;

use super::scene_graph::{CanvasFlags, RectLayout, SceneGraph, VisualHandle};

/// A visual object stored by [`SimpleSceneGraph`]
#[derive(Debug, Clone, Default)]
pub struct VisualObject {
    /// Object name
    pub name: String,
    /// Own active flag
    pub active: bool,
    /// Parent object
    pub parent: Option<VisualHandle>,
    /// Children in sibling order
    pub children: Vec<VisualHandle>,
    /// Rect component
    pub rect: Option<RectLayout>,
    /// Local depth offset
    pub depth_offset: f32,
    /// Rendering layer name
    pub render_layer: Option<String>,
    /// Canvas components
    pub canvas_flags: CanvasFlags,
}

/// Slot-map backed scene graph
#[derive(Debug, Default)]
pub struct SimpleSceneGraph {
    objects: SlotMap<VisualHandle, VisualObject>,
}

impl SimpleSceneGraph {
    /// Create a new empty scene graph
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
        }
    }

    /// Number of live visual objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the graph holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Borrow a visual object
    pub fn get(&self, handle: VisualHandle) -> Option<&VisualObject> {
        self.objects.get(handle)
    }

    fn detach(&mut self, child: VisualHandle) {
        let old_parent = self.objects.get_mut(child).and_then(|object| object.parent.take());
        if let Some(parent) = old_parent.and_then(|p| self.objects.get_mut(p)) {
            parent.children.retain(|c| *c != child);
        }
    }

    fn is_ancestor_or_self(&self, candidate: VisualHandle, handle: VisualHandle) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            if h == candidate {
                return true;
            }
            current = self.objects.get(h).and_then(|o| o.parent);
        }
        false
    }
}

impl SceneGraph for SimpleSceneGraph {
    fn create_visual(&mut self, name: &str, active: bool) -> VisualHandle {
        self.objects.insert(VisualObject {
            name: name.to_string(),
            active,
            ..Default::default()
        })
    }

    fn visual_count(&self) -> usize {
        self.objects.len()
    }

    fn destroy(&mut self, handle: VisualHandle) -> bool {
        if !self.objects.contains_key(handle) {
            return false;
        }
        self.detach(handle);

        let mut pending = vec![handle];
        while let Some(current) = pending.pop() {
            if let Some(object) = self.objects.remove(current) {
                pending.extend(object.children);
            }
        }
        true
    }

    fn is_alive(&self, handle: VisualHandle) -> bool {
        self.objects.contains_key(handle)
    }

    fn name(&self, handle: VisualHandle) -> Option<&str> {
        self.objects.get(handle).map(|o| o.name.as_str())
    }

    fn set_name(&mut self, handle: VisualHandle, name: &str) {
        if let Some(object) = self.objects.get_mut(handle) {
            object.name = name.to_string();
        }
    }

    fn is_active(&self, handle: VisualHandle) -> bool {
        self.objects.get(handle).is_some_and(|o| o.active)
    }

    fn set_active(&mut self, handle: VisualHandle, active: bool) {
        if let Some(object) = self.objects.get_mut(handle) {
            object.active = active;
        }
    }

    fn attach_child(&mut self, parent: VisualHandle, child: VisualHandle, index: Option<usize>) {
        if !self.objects.contains_key(parent) || !self.objects.contains_key(child) {
            return;
        }
        // Refuse to build a cycle in the visual hierarchy
        if self.is_ancestor_or_self(child, parent) {
            log::warn!("Ignoring attach that would make {:?} its own ancestor", child);
            return;
        }

        self.detach(child);
        if let Some(object) = self.objects.get_mut(child) {
            object.parent = Some(parent);
        }
        if let Some(object) = self.objects.get_mut(parent) {
            match index {
                Some(i) if i <= object.children.len() => object.children.insert(i, child),
                _ => object.children.push(child),
            }
        }
    }

    fn parent(&self, handle: VisualHandle) -> Option<VisualHandle> {
        self.objects.get(handle).and_then(|o| o.parent)
    }

    fn children(&self, handle: VisualHandle) -> Vec<VisualHandle> {
        self.objects
            .get(handle)
            .map(|o| o.children.clone())
            .unwrap_or_default()
    }

    fn rect(&self, handle: VisualHandle) -> Option<RectLayout> {
        self.objects.get(handle).and_then(|o| o.rect)
    }

    fn set_rect(&mut self, handle: VisualHandle, rect: RectLayout) {
        if let Some(object) = self.objects.get_mut(handle) {
            object.rect = Some(rect);
        }
    }

    fn depth_offset(&self, handle: VisualHandle) -> f32 {
        self.objects.get(handle).map_or(0.0, |o| o.depth_offset)
    }

    fn set_depth_offset(&mut self, handle: VisualHandle, offset: f32) {
        if let Some(object) = self.objects.get_mut(handle) {
            object.depth_offset = offset;
        }
    }

    fn render_layer(&self, handle: VisualHandle) -> Option<&str> {
        self.objects.get(handle).and_then(|o| o.render_layer.as_deref())
    }

    fn set_render_layer(&mut self, handle: VisualHandle, layer: &str) {
        let mut pending = vec![handle];
        while let Some(current) = pending.pop() {
            if let Some(object) = self.objects.get_mut(current) {
                object.render_layer = Some(layer.to_string());
                pending.extend(object.children.iter().copied());
            }
        }
    }

    fn canvas_flags(&self, handle: VisualHandle) -> CanvasFlags {
        self.objects.get(handle).map_or(CanvasFlags::empty(), |o| o.canvas_flags)
    }

    fn set_canvas_flags(&mut self, handle: VisualHandle, flags: CanvasFlags) {
        if let Some(object) = self.objects.get_mut(handle) {
            object.canvas_flags = flags;
        }
    }
}
