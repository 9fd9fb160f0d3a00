//! Asset loading collaborator
//!
//! Resolves a template path into a [`VisualTemplate`] that the scene graph
//! can instantiate. Resolution may block ([`AssetLoader::load_sync`]) or
//! suspend ([`AssetLoader::load_async`]); instantiation always happens
//! synchronously afterwards, on the thread that owns the UI tree.

mod template;
mod memory_loader;
mod file_loader;

pub use template::VisualTemplate;
pub use memory_loader::MemoryAssetLoader;
pub use file_loader::FileAssetLoader;

use async_trait::async_trait;
use thiserror::Error;

/// Resolves template paths to visual templates
///
/// Loaders are used from a single thread, so the async half is not required
/// to be `Send`.
#[async_trait(?Send)]
pub trait AssetLoader {
    /// Resolve a template, blocking until it is available
    fn load_sync(&self, path: &str) -> Result<VisualTemplate, AssetError>;

    /// Resolve a template, suspending the caller while it loads
    ///
    /// The default implementation resolves synchronously.
    async fn load_async(&self, path: &str) -> Result<VisualTemplate, AssetError> {
        self.load_sync(path)
    }
}

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),
    
    /// Invalid asset data
    #[error("Invalid data in {path}: {reason}")]
    InvalidData {
        /// Path of the offending template
        path: String,
        /// Parser message
        reason: String,
    },
    
    /// Unsupported asset format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    
    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
