//! # Core Module
//!
//! Shared abstractions that the UI subsystems depend on.
//!
//! ## Organization
//!
//! - **Config**: configuration for the layer manager, logging and template lookup

pub mod config;

pub use config::{UiConfig, MAX_LAYER_INDEX_CAPACITY};
pub use crate::config::{Config, ConfigError};
