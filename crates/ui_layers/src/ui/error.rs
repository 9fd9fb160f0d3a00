//! UI error taxonomy

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;

/// Errors surfaced by the UI tree and manager
#[derive(Error, Debug)]
pub enum UiError {
    /// Empty name or path, dead visual handle, or an attach that would break the tree
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A sibling with the same name is already attached
    #[error("Node name ({0}) already exists under this parent")]
    DuplicateKey(String),

    /// The asset loader could not resolve a template
    #[error("Asset resolution failed: {0}")]
    AssetResolution(#[from] AssetError),

    /// A collaborator the manager cannot run without was not supplied
    #[error("Missing dependency: {0}")]
    MissingDependency(&'static str),

    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for UI operations
pub type UiResult<T> = Result<T, UiError>;
