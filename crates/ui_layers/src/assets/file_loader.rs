//! Template files on disk
//!
//! Templates are `.toml` or `.ron` files looked up through a list of search
//! directories, falling back to the path as given.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{AssetError, AssetLoader, VisualTemplate};
use crate::core::UiConfig;

/// Loads templates from TOML or RON files
#[derive(Debug, Clone, Default)]
pub struct FileAssetLoader {
    search_paths: Vec<PathBuf>,
}

impl FileAssetLoader {
    /// Create a loader with explicit search directories
    pub fn new<I, P>(search_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_paths: search_paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a loader using the configured template search paths
    pub fn from_config(config: &UiConfig) -> Self {
        Self::new(config.template_search_paths.iter().cloned())
    }

    /// Search directories, in lookup order
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    fn resolve_path(&self, path: &str) -> Result<PathBuf, AssetError> {
        let found = self
            .search_paths
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file());

        // Not in any search path; try the path as given
        let file_path = found.unwrap_or_else(|| PathBuf::from(path));
        if !file_path.is_file() {
            return Err(AssetError::NotFound(path.to_string()));
        }
        Ok(file_path)
    }

    fn parse(file_path: &Path, contents: &str) -> Result<VisualTemplate, AssetError> {
        let invalid = |reason: String| AssetError::InvalidData {
            path: file_path.display().to_string(),
            reason,
        };

        match file_path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(contents).map_err(|e| invalid(e.to_string())),
            Some("ron") => ron::from_str(contents).map_err(|e| invalid(e.to_string())),
            _ => Err(AssetError::UnsupportedFormat(file_path.display().to_string())),
        }
    }
}

#[async_trait(?Send)]
impl AssetLoader for FileAssetLoader {
    fn load_sync(&self, path: &str) -> Result<VisualTemplate, AssetError> {
        let file_path = self.resolve_path(path)?;
        let contents = std::fs::read_to_string(&file_path)?;
        log::debug!("Loaded template {} from {}", path, file_path.display());
        Self::parse(&file_path, &contents)
    }

    async fn load_async(&self, path: &str) -> Result<VisualTemplate, AssetError> {
        let file_path = self.resolve_path(path)?;
        let contents = tokio::fs::read_to_string(&file_path).await?;
        log::debug!("Loaded template {} from {} (async)", path, file_path.display());
        Self::parse(&file_path, &contents)
    }
}
