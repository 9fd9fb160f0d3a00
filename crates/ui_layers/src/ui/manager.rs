//! UI Manager
//!
//! Façade over the node tree and the layer registry. The manager owns the
//! application root, the twelve layer roots and the asset loader used to
//! turn template paths into registered nodes.

use std::fmt;

use super::error::{UiError, UiResult};
use super::layer::{LayerRegistry, Registration, UiLayer};
use super::node::{NodeBehaviour, NodeId, PlainNode, UserData};
use super::tree::UiTree;
use crate::assets::{AssetLoader, VisualTemplate};
use crate::core::UiConfig;
use crate::scene::{SceneGraph, SimpleSceneGraph, VisualHandle};

/// Per-add options
#[derive(Clone, Default)]
pub struct AddOptions {
    /// Stretch the new node over its layer
    pub full_screen: bool,
    /// Payload handed to the node's hooks
    pub user_data: Option<UserData>,
}

impl AddOptions {
    /// Default options: not full screen, no user data
    pub fn new() -> Self {
        Self::default()
    }

    /// Stretch the node over its layer once added
    pub fn full_screen(mut self) -> Self {
        self.full_screen = true;
        self
    }

    /// Attach user data
    pub fn with_user_data(mut self, user_data: UserData) -> Self {
        self.user_data = Some(user_data);
        self
    }
}

impl fmt::Debug for AddOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddOptions")
            .field("full_screen", &self.full_screen)
            .field("has_user_data", &self.user_data.is_some())
            .finish()
    }
}

/// Builder for [`UiManager`]
#[derive(Default)]
pub struct UiManagerBuilder {
    config: UiConfig,
    scene: Option<Box<dyn SceneGraph>>,
    asset_loader: Option<Box<dyn AssetLoader>>,
    root_visual: Option<VisualHandle>,
}

impl UiManagerBuilder {
    /// Start from the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific configuration
    pub fn config(mut self, config: UiConfig) -> Self {
        self.config = config;
        self
    }

    /// Host scene graph; an empty [`SimpleSceneGraph`] when not set
    pub fn scene(mut self, scene: Box<dyn SceneGraph>) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Asset loader used to resolve template paths (required)
    pub fn asset_loader(mut self, loader: Box<dyn AssetLoader>) -> Self {
        self.asset_loader = Some(loader);
        self
    }

    /// Existing container visual in the host scene to use as the application root
    ///
    /// The manager never destroys a container it did not create.
    pub fn root_visual(mut self, visual: VisualHandle) -> Self {
        self.root_visual = Some(visual);
        self
    }

    /// Create the application root and the layer roots
    pub fn build(self) -> UiResult<UiManager> {
        self.config.validate()?;

        let Some(loader) = self.asset_loader else {
            log::error!("UI manager initialisation failed: asset loader is not set");
            return Err(UiError::MissingDependency("asset loader"));
        };

        let scene: Box<dyn SceneGraph> = match self.scene {
            Some(scene) => scene,
            None => Box::new(SimpleSceneGraph::new()),
        };
        let mut tree = UiTree::new(scene);

        let owns_root_visual = self.root_visual.is_none();
        let root_visual = match self.root_visual {
            Some(visual) => visual,
            None => tree.scene_mut().create_visual("UIRoot", true),
        };
        let root = tree.create_node(root_visual, Box::new(PlainNode), None, true)?;
        tree.show(root, None);

        let layers = LayerRegistry::new(&mut tree, root, &self.config)?;
        tree.pin(root);

        log::info!(
            "UI manager initialised with {} layers (depth step {})",
            UiLayer::COUNT,
            self.config.layer_depth_step
        );

        Ok(UiManager {
            config: self.config,
            tree,
            layers,
            loader,
            root,
            owns_root_visual,
            shut_down: false,
        })
    }
}

/// Central UI layer management system
pub struct UiManager {
    config: UiConfig,
    tree: UiTree,
    layers: LayerRegistry,
    loader: Box<dyn AssetLoader>,
    /// Application root, parent of every layer root
    root: NodeId,
    owns_root_visual: bool,
    shut_down: bool,
}

impl UiManager {
    /// Start building a manager
    pub fn builder() -> UiManagerBuilder {
        UiManagerBuilder::new()
    }

    /// Node tree, including the scene graph
    pub fn tree(&self) -> &UiTree {
        &self.tree
    }

    /// Mutable node tree, for direct child management below registered nodes
    ///
    /// The application root and the layer roots are pinned: adding, removing
    /// or disposing their children through the tree is refused, so the layer
    /// indexes cannot drift from the tree.
    pub fn tree_mut(&mut self) -> &mut UiTree {
        &mut self.tree
    }

    /// Layer registry
    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    /// Active configuration
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Application root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether [`UiManager::shutdown`] has run
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Load a template and register it in `layer` as a node of type `T`
    pub fn add_sync<T>(&mut self, path: &str, layer: UiLayer, options: AddOptions) -> UiResult<NodeId>
    where
        T: NodeBehaviour + Default,
    {
        self.add_sync_with(path, layer, options, Box::new(T::default()))
    }

    /// Load a template and register it in `layer` with the given behaviour
    ///
    /// If `layer` already holds a node of the same name, the new node is
    /// disposed and the existing node's id is returned.
    pub fn add_sync_with(
        &mut self,
        path: &str,
        layer: UiLayer,
        options: AddOptions,
        behaviour: Box<dyn NodeBehaviour>,
    ) -> UiResult<NodeId> {
        self.ensure_running()?;
        require_non_empty(path, "template path")?;

        let template = self.loader.load_sync(path).map_err(|e| {
            log::error!("Failed to load UI template {}: {}", path, e);
            UiError::from(e)
        })?;
        self.attach(&template, layer, options, behaviour)
    }

    /// Asynchronous variant of [`UiManager::add_sync`]
    pub async fn add_async<T>(&mut self, path: &str, layer: UiLayer, options: AddOptions) -> UiResult<NodeId>
    where
        T: NodeBehaviour + Default,
    {
        self.add_async_with(path, layer, options, Box::new(T::default())).await
    }

    /// Asynchronous variant of [`UiManager::add_sync_with`]
    ///
    /// Only template resolution suspends. No tree or registry state changes
    /// until it completes, and the exclusive borrow keeps other adds out.
    pub async fn add_async_with(
        &mut self,
        path: &str,
        layer: UiLayer,
        options: AddOptions,
        behaviour: Box<dyn NodeBehaviour>,
    ) -> UiResult<NodeId> {
        self.ensure_running()?;
        require_non_empty(path, "template path")?;

        let template = match self.loader.load_async(path).await {
            Ok(template) => template,
            Err(e) => {
                log::error!("Failed to load UI template {}: {}", path, e);
                return Err(e.into());
            }
        };
        self.attach(&template, layer, options, behaviour)
    }

    /// Load a template and register it in `layer`, stretched full screen
    pub fn add_to_full_screen<T>(
        &mut self,
        path: &str,
        layer: UiLayer,
        user_data: Option<UserData>,
    ) -> UiResult<NodeId>
    where
        T: NodeBehaviour + Default,
    {
        let options = AddOptions {
            full_screen: true,
            user_data,
        };
        self.add_sync::<T>(path, layer, options)
    }

    fn attach(
        &mut self,
        template: &VisualTemplate,
        layer: UiLayer,
        options: AddOptions,
        behaviour: Box<dyn NodeBehaviour>,
    ) -> UiResult<NodeId> {
        let visual = self.tree.scene_mut().instantiate(template);
        let node = match self.tree.create_node(visual, behaviour, options.user_data, false) {
            Ok(node) => node,
            Err(e) => {
                self.tree.scene_mut().destroy(visual);
                return Err(e);
            }
        };

        let registration = match self.layers.add_to_layer(&mut self.tree, node, layer) {
            Ok(registration) => registration,
            Err(e) => {
                self.tree.dispose(node);
                return Err(e);
            }
        };

        match registration {
            Registration::Added(id) => {
                if options.full_screen {
                    self.tree.make_full_screen(id);
                }
                log::debug!(
                    "Added UI ({}) to layer {}",
                    self.tree.name(id).unwrap_or_default(),
                    layer
                );
                Ok(id)
            }
            Registration::Existing(existing) => {
                log::warn!(
                    "UI ({}) already exists in layer {}; discarding the new instance",
                    self.tree.name(existing).unwrap_or_default(),
                    layer
                );
                self.tree.dispose(node);
                Ok(existing)
            }
        }
    }

    /// Detach the named node from the first layer holding it
    ///
    /// Layers are scanned in [`UiLayer::REMOVAL_ORDER`]. The node is hidden
    /// but not disposed. Returns whether a node was removed.
    pub fn remove(&mut self, name: &str) -> UiResult<bool> {
        require_non_empty(name, "name")?;
        match self.layers.remove_any(&mut self.tree, name) {
            Some(layer) => {
                log::debug!("Removed UI ({}) from layer {}", name, layer);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Detach the named node from one layer
    pub fn remove_from(&mut self, name: &str, layer: UiLayer) -> UiResult<bool> {
        require_non_empty(name, "name")?;
        let removed = self.layers.remove_from_layer(&mut self.tree, name, layer);
        if removed {
            log::debug!("Removed UI ({}) from layer {}", name, layer);
        }
        Ok(removed)
    }

    /// Hide, dispose and unregister every node in every layer
    pub fn remove_all(&mut self) {
        let mut count = 0;
        for layer in UiLayer::ALL {
            for (name, id) in self.layers.snapshot(layer) {
                self.tree.hide(id);
                self.tree.dispose(id);
                self.layers.remove_from_layer(&mut self.tree, &name, layer);
                count += 1;
            }
            self.layers.clear(layer);
        }
        log::debug!("Removed all UI ({} nodes)", count);
    }

    /// First node registered under `name`, scanning layers back to front
    pub fn get(&self, name: &str) -> UiResult<Option<NodeId>> {
        require_non_empty(name, "name")?;
        Ok(self.layers.find_any(name))
    }

    /// Behaviour of the named node, if it is a `T`
    pub fn get_as<T: NodeBehaviour>(&self, name: &str) -> UiResult<Option<&T>> {
        let Some(id) = self.get(name)? else {
            return Ok(None);
        };
        Ok(self.tree.behaviour_as::<T>(id))
    }

    /// Mutable variant of [`UiManager::get_as`]
    pub fn get_as_mut<T: NodeBehaviour>(&mut self, name: &str) -> UiResult<Option<&mut T>> {
        let Some(id) = self.get(name)? else {
            return Ok(None);
        };
        Ok(self.tree.behaviour_as_mut::<T>(id))
    }

    /// Whether any layer holds `name`
    pub fn has(&self, name: &str) -> UiResult<bool> {
        Ok(self.get(name)?.is_some())
    }

    /// Whether any layer holds `name` as a node of type `T`
    ///
    /// Use [`UiManager::get_as`] to check and borrow the typed node in one call.
    pub fn has_as<T: NodeBehaviour>(&self, name: &str) -> UiResult<bool> {
        Ok(self.get_as::<T>(name)?.is_some())
    }

    /// Show the named node with new user data
    ///
    /// Returns whether a node was found.
    pub fn show(&mut self, name: &str, user_data: Option<UserData>) -> UiResult<bool> {
        match self.get(name)? {
            Some(id) => Ok(self.tree.show(id, user_data)),
            None => Ok(false),
        }
    }

    /// Hide the named node
    pub fn hide(&mut self, name: &str) -> UiResult<bool> {
        match self.get(name)? {
            Some(id) => Ok(self.tree.hide(id)),
            None => Ok(false),
        }
    }

    /// Dispose every registered node, the layer roots and the application root
    ///
    /// Runs once; later calls do nothing. A host-supplied root container
    /// survives, the visuals the manager created do not.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.remove_all();

        let layer_visuals: Vec<VisualHandle> = UiLayer::ALL
            .into_iter()
            .filter_map(|layer| self.tree.node(self.layers.root(layer)))
            .map(|node| node.visual())
            .collect();
        let root_visual = self.tree.node(self.root).map(|node| node.visual());

        for root in self.layers.roots() {
            self.tree.unpin(root);
        }
        self.tree.unpin(self.root);
        self.tree.dispose(self.root);

        let scene = self.tree.scene_mut();
        for visual in layer_visuals {
            scene.destroy(visual);
        }
        if self.owns_root_visual {
            if let Some(visual) = root_visual {
                scene.destroy(visual);
            }
        }

        log::info!("UI manager shut down");
    }

    fn ensure_running(&self) -> UiResult<()> {
        if self.shut_down {
            return Err(UiError::InvalidArgument("UI manager is shut down".to_string()));
        }
        Ok(())
    }
}

impl Drop for UiManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for UiManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiManager")
            .field("config", &self.config)
            .field("tree", &self.tree)
            .field("root", &self.root)
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}

fn require_non_empty(value: &str, what: &str) -> UiResult<()> {
    if value.trim().is_empty() {
        return Err(UiError::InvalidArgument(format!("{} can not be empty", what)));
    }
    Ok(())
}
