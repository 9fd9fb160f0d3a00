//! # UI Configuration
//!
//! Settings for the layer manager. Loadable from TOML or RON through the
//! [`Config`] trait:
//!
//! ```toml
//! log_level = "info"
//! layer_depth_step = 1000.0
//! layer_index_capacity = 64
//! render_layer = "UI"
//! template_search_paths = ["resources/ui", "ui"]
//! ```

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};

/// Largest accepted `layer_index_capacity`
pub const MAX_LAYER_INDEX_CAPACITY: usize = 4096;

/// Configuration for the UI layer manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Default log filter used by `foundation::logging::init_with_level`
    pub log_level: String,
    /// Depth distance between consecutive layer roots
    pub layer_depth_step: f32,
    /// Capacity reserved for each layer's name index, at most
    /// [`MAX_LAYER_INDEX_CAPACITY`]
    pub layer_index_capacity: usize,
    /// Rendering layer assigned to every layer root
    pub render_layer: String,
    /// Directories searched, in order, for template files
    pub template_search_paths: Vec<String>,
}

impl UiConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            layer_depth_step: 1000.0,
            layer_index_capacity: 64,
            render_layer: "UI".to_string(),
            template_search_paths: vec![
                "resources/ui".to_string(),
                "ui".to_string(),
            ],
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the depth distance between layers
    pub fn with_layer_depth_step(mut self, step: f32) -> Self {
        self.layer_depth_step = step;
        self
    }

    /// Set the per-layer index capacity
    pub fn with_layer_index_capacity(mut self, capacity: usize) -> Self {
        self.layer_index_capacity = capacity;
        self
    }

    /// Set the rendering layer name for layer roots
    pub fn with_render_layer(mut self, name: impl Into<String>) -> Self {
        self.render_layer = name.into();
        self
    }

    /// Append a template search directory
    pub fn with_template_path(mut self, path: impl Into<String>) -> Self {
        self.template_search_paths.push(path.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.layer_depth_step.is_finite() || self.layer_depth_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "layer_depth_step must be a positive finite number, got {}",
                self.layer_depth_step
            )));
        }

        if self.layer_index_capacity > MAX_LAYER_INDEX_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "layer_index_capacity must be at most {}, got {}",
                MAX_LAYER_INDEX_CAPACITY, self.layer_index_capacity
            )));
        }

        if self.render_layer.trim().is_empty() {
            return Err(ConfigError::Invalid("render_layer cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for UiConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(UiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_depth_step() {
        let config = UiConfig::new().with_layer_depth_step(0.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_oversized_index_capacity() {
        let config = UiConfig::from_str_with_format(
            "layer_index_capacity = 9223372036854775807",
            "ui.toml",
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let at_limit = UiConfig::new().with_layer_index_capacity(MAX_LAYER_INDEX_CAPACITY);
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui.toml");
        let path = path.to_str().unwrap();

        let config = UiConfig::new()
            .with_layer_depth_step(500.0)
            .with_render_layer("Overlay");
        config.save_to_file(path).unwrap();

        let loaded = UiConfig::load_from_file(path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_partial_file_fills_defaults() {
        let loaded = UiConfig::from_str_with_format("(layer_index_capacity: 8)", "ui.ron").unwrap();
        assert_eq!(loaded.layer_index_capacity, 8);
        assert_eq!(loaded.render_layer, "UI");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = UiConfig::load_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded, UiConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = UiConfig::from_str_with_format("", "ui.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
