//! Scene graph trait and shared visual types

use bitflags::bitflags;
use serde::{Serialize, Deserialize};

use crate::assets::VisualTemplate;
use crate::foundation::math::{approx_eq_vec2, Vec2};

slotmap::new_key_type! {
    /// Handle to a visual object owned by a [`SceneGraph`]
    pub struct VisualHandle;
}

bitflags! {
    /// Host rendering components attached to a visual object
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CanvasFlags: u8 {
        /// Skip drawing fully transparent geometry
        const CULL_TRANSPARENT = 1 << 0;
        /// The object and its children receive pointer raycasts
        const BLOCKS_RAYCASTS = 1 << 1;
        /// The object and its children accept interaction
        const INTERACTABLE = 1 << 2;
    }
}

/// Anchor-based rectangle layout relative to the parent container
///
/// Anchors are normalized (0.0 to 1.0) positions inside the parent. The
/// anchored position and size delta are pixel offsets on top of the anchors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectLayout {
    /// Lower-left anchor in parent space
    pub anchor_min: Vec2,
    /// Upper-right anchor in parent space
    pub anchor_max: Vec2,
    /// Pixel offset of the pivot from the anchor reference point
    pub anchored_position: Vec2,
    /// Size added to the distance between the anchors
    pub size_delta: Vec2,
}

impl RectLayout {
    /// Layout centered in the parent with a fixed size
    pub fn centered(width: f32, height: f32) -> Self {
        Self {
            anchor_min: Vec2::new(0.5, 0.5),
            anchor_max: Vec2::new(0.5, 0.5),
            anchored_position: Vec2::zeros(),
            size_delta: Vec2::new(width, height),
        }
    }

    /// Layout that stretches to fill the parent exactly
    pub fn full_screen() -> Self {
        Self {
            anchor_min: Vec2::zeros(),
            anchor_max: Vec2::new(1.0, 1.0),
            anchored_position: Vec2::zeros(),
            size_delta: Vec2::zeros(),
        }
    }

    /// Whether this layout spans the whole parent with no offset
    pub fn is_full_screen(&self) -> bool {
        let full = Self::full_screen();
        approx_eq_vec2(&self.anchor_min, &full.anchor_min)
            && approx_eq_vec2(&self.anchor_max, &full.anchor_max)
            && approx_eq_vec2(&self.anchored_position, &full.anchored_position)
            && approx_eq_vec2(&self.size_delta, &full.size_delta)
    }

    /// Resolve to (min_x, min_y, max_x, max_y) inside a parent of the given size
    pub fn resolve(&self, parent_width: f32, parent_height: f32) -> (f32, f32, f32, f32) {
        let parent = Vec2::new(parent_width, parent_height);
        let lower = self.anchor_min.component_mul(&parent);
        let upper = self.anchor_max.component_mul(&parent);
        let center = (lower + upper) * 0.5 + self.anchored_position;
        let half = ((upper - lower) + self.size_delta) * 0.5;
        (center.x - half.x, center.y - half.y, center.x + half.x, center.y + half.y)
    }
}

impl Default for RectLayout {
    fn default() -> Self {
        Self::centered(100.0, 100.0)
    }
}

/// Operations the UI tree consumes from the host scene graph
///
/// Calls on a handle that no longer resolves are silently ignored; getters
/// return a neutral value. The tree checks [`SceneGraph::is_alive`] where a
/// dead handle is a caller error.
pub trait SceneGraph {
    /// Create a detached visual object
    fn create_visual(&mut self, name: &str, active: bool) -> VisualHandle;

    /// Build a detached visual object hierarchy from a template
    fn instantiate(&mut self, template: &VisualTemplate) -> VisualHandle {
        let handle = self.create_visual(&template.name, template.active);
        if let Some(rect) = template.rect {
            self.set_rect(handle, rect);
        }
        for child in &template.children {
            let child_handle = self.instantiate(child);
            self.attach_child(handle, child_handle, None);
        }
        handle
    }

    /// Number of live visual objects
    fn visual_count(&self) -> usize;

    /// Destroy a visual object and everything below it
    ///
    /// Returns false if the handle was already dead.
    fn destroy(&mut self, handle: VisualHandle) -> bool;

    /// Whether the handle refers to a live visual object
    fn is_alive(&self, handle: VisualHandle) -> bool;

    /// Object name, `None` for dead handles
    fn name(&self, handle: VisualHandle) -> Option<&str>;

    /// Rename the object
    fn set_name(&mut self, handle: VisualHandle, name: &str);

    /// The object's own active flag
    fn is_active(&self, handle: VisualHandle) -> bool;

    /// Set the object's own active flag
    fn set_active(&mut self, handle: VisualHandle, active: bool);

    /// Re-parent `child` under `parent`, at `index` among its siblings or last
    fn attach_child(&mut self, parent: VisualHandle, child: VisualHandle, index: Option<usize>);

    /// Parent object, if attached
    fn parent(&self, handle: VisualHandle) -> Option<VisualHandle>;

    /// Children in sibling order
    fn children(&self, handle: VisualHandle) -> Vec<VisualHandle>;

    /// Rect layout, `None` when the object has no rect component
    fn rect(&self, handle: VisualHandle) -> Option<RectLayout>;

    /// Set (adding if needed) the rect layout
    fn set_rect(&mut self, handle: VisualHandle, rect: RectLayout);

    /// Local depth offset along the view axis
    fn depth_offset(&self, handle: VisualHandle) -> f32;

    /// Set the local depth offset
    fn set_depth_offset(&mut self, handle: VisualHandle, offset: f32);

    /// Rendering layer name, if assigned
    fn render_layer(&self, handle: VisualHandle) -> Option<&str>;

    /// Assign the rendering layer to the object and all of its descendants
    fn set_render_layer(&mut self, handle: VisualHandle, layer: &str);

    /// Attached canvas components
    fn canvas_flags(&self, handle: VisualHandle) -> CanvasFlags;

    /// Replace the attached canvas components
    fn set_canvas_flags(&mut self, handle: VisualHandle, flags: CanvasFlags);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_full_screen_layout() {
        let rect = RectLayout::full_screen();
        assert!(rect.is_full_screen());
        assert!(!RectLayout::default().is_full_screen());
    }

    #[test]
    fn test_resolve_full_screen_matches_parent() {
        let (min_x, min_y, max_x, max_y) = RectLayout::full_screen().resolve(1920.0, 1080.0);
        assert_relative_eq!(min_x, 0.0);
        assert_relative_eq!(min_y, 0.0);
        assert_relative_eq!(max_x, 1920.0);
        assert_relative_eq!(max_y, 1080.0);
    }

    #[test]
    fn test_resolve_centered() {
        let (min_x, min_y, max_x, max_y) = RectLayout::centered(200.0, 100.0).resolve(800.0, 600.0);
        assert_relative_eq!(min_x, 300.0);
        assert_relative_eq!(min_y, 250.0);
        assert_relative_eq!(max_x, 500.0);
        assert_relative_eq!(max_y, 350.0);
    }
}
