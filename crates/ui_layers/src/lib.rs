//! # UI Layers
//!
//! A layered screen-space UI hierarchy manager.
//!
//! ## Features
//!
//! - **Node Tree**: named nodes over a host scene graph with cascading show/hide
//! - **Ordered Layers**: twelve fixed layers from background to system overlays
//! - **Template Loading**: TOML/RON visual templates, loaded synchronously or asynchronously
//! - **Lifecycle Hooks**: per-type behaviour with init, show, refresh, hide and dispose
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ui_layers::prelude::*;
//!
//! #[derive(Default)]
//! struct MainMenu;
//!
//! impl NodeBehaviour for MainMenu {
//!     fn refresh(&mut self, node: &NodeView<'_>) {
//!         log::info!("refreshing {}", node.name);
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UiConfig::load_or_default("ui.toml")?;
//!     let mut ui = UiManager::builder()
//!         .asset_loader(Box::new(FileAssetLoader::from_config(&config)))
//!         .config(config)
//!         .build()?;
//!
//!     ui.add_to_full_screen::<MainMenu>("main_menu.toml", UiLayer::Normal, None)?;
//!     ui.remove_all();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod core;

pub mod foundation;
pub mod config;
pub mod scene;
pub mod assets;
pub mod ui;

/// Common imports for UI users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, AssetLoader, FileAssetLoader, MemoryAssetLoader, VisualTemplate},
        config::{Config, ConfigError},
        core::UiConfig,
        scene::{CanvasFlags, RectLayout, SceneGraph, SimpleSceneGraph, VisualHandle},
        ui::{
            AddOptions, LayerRegistry, NodeBehaviour, NodeId, NodeView, PlainNode, UiError,
            UiLayer, UiManager, UiManagerBuilder, UiResult, UiTree, UserData,
        },
    };
}
