//! Visual templates
//!
//! A template is a loadable blueprint for a visual object hierarchy. It is
//! plain data so it can be authored in TOML or RON:
//!
//! ```toml
//! name = "main_menu"
//! active = true
//!
//! [rect]
//! anchor_min = [0.0, 0.0]
//! anchor_max = [1.0, 1.0]
//!
//! [[children]]
//! name = "title"
//! ```

use serde::{Serialize, Deserialize};

use crate::scene::RectLayout;

fn default_active() -> bool {
    true
}

/// Blueprint for a visual object and its raw visual children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualTemplate {
    /// Name given to the instantiated object; blank names are allowed
    #[serde(default)]
    pub name: String,
    /// Initial active flag
    #[serde(default = "default_active")]
    pub active: bool,
    /// Rect layout, if the object has one
    #[serde(default)]
    pub rect: Option<RectLayout>,
    /// Child objects, instantiated in order
    #[serde(default)]
    pub children: Vec<VisualTemplate>,
}

impl VisualTemplate {
    /// Create an active template with no rect and no children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            rect: None,
            children: Vec::new(),
        }
    }

    /// Start inactive; the node is then not shown when attached
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Set the rect layout
    pub fn with_rect(mut self, rect: RectLayout) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Append a child template
    pub fn with_child(mut self, child: VisualTemplate) -> Self {
        self.children.push(child);
        self
    }
}
