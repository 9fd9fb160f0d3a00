//! In-memory template registry

use std::collections::HashMap;

use super::{AssetError, AssetLoader, VisualTemplate};

/// Serves templates registered ahead of time under a path
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetLoader {
    templates: HashMap<String, VisualTemplate>,
}

impl MemoryAssetLoader {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under `path`, replacing any previous one
    pub fn register(&mut self, path: impl Into<String>, template: VisualTemplate) {
        self.templates.insert(path.into(), template);
    }

    /// Builder form of [`MemoryAssetLoader::register`]
    pub fn with_template(mut self, path: impl Into<String>, template: VisualTemplate) -> Self {
        self.register(path, template);
        self
    }

    /// Number of registered templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no templates are registered
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl AssetLoader for MemoryAssetLoader {
    fn load_sync(&self, path: &str) -> Result<VisualTemplate, AssetError> {
        self.templates
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}
