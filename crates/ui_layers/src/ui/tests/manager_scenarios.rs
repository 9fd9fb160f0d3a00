//! Manager scenarios over in-memory templates

use std::cell::RefCell;
use std::rc::Rc;

use crate::assets::{MemoryAssetLoader, VisualTemplate};
use crate::core::UiConfig;
use crate::scene::{RectLayout, SceneGraph, SimpleSceneGraph};
use crate::ui::{AddOptions, NodeBehaviour, NodeView, PlainNode, UiError, UiLayer, UiManager, UserData};
use approx::assert_relative_eq;
use futures::executor::block_on;

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Panel that logs its lifecycle into a shared log passed as user data
    #[derive(Default)]
    struct LoggedPanel;

    impl LoggedPanel {
        fn record(node: &NodeView<'_>, hook: &str) {
            if let Some(log) = node.user_data_as::<RefCell<Vec<String>>>() {
                log.borrow_mut().push(format!("{}.{}", node.name, hook));
            }
        }
    }

    impl NodeBehaviour for LoggedPanel {
        fn on_show(&mut self, node: &NodeView<'_>) {
            Self::record(node, "show");
        }

        fn on_hide(&mut self, node: &NodeView<'_>) {
            Self::record(node, "hide");
        }

        fn on_dispose(&mut self, node: &NodeView<'_>) {
            Self::record(node, "dispose");
        }
    }

    fn templates() -> MemoryAssetLoader {
        let mut loader = MemoryAssetLoader::new();
        for layer in UiLayer::ALL {
            let name = format!("panel_{}", layer.name().to_lowercase());
            loader.register(format!("ui/{}", name), VisualTemplate::new(name));
        }
        loader.register("ui/panel_a", VisualTemplate::new("panel_a"));
        loader.register(
            "ui/dialog",
            VisualTemplate::new("dialog")
                .with_rect(RectLayout::centered(640.0, 360.0))
                .with_child(VisualTemplate::new("title"))
                .with_child(VisualTemplate::new("close").inactive()),
        );
        loader
    }

    fn manager() -> UiManager {
        UiManager::builder()
            .asset_loader(Box::new(templates()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_add_get_remove_round_trip() {
        let mut manager = manager();
        let id = manager
            .add_sync::<PlainNode>("ui/panel_a", UiLayer::Normal, AddOptions::new())
            .unwrap();

        let found = manager.get("panel_a").unwrap().unwrap();
        assert_eq!(found, id);
        assert_eq!(manager.tree().name(found), Some("panel_a"));
        assert_eq!(manager.layers().layer_of("panel_a"), Some(UiLayer::Normal));
        assert_eq!(
            manager.tree().parent(found),
            Some(manager.layers().root(UiLayer::Normal))
        );

        assert!(manager.remove("panel_a").unwrap());
        assert_eq!(manager.get("panel_a").unwrap(), None);
        assert!(!manager.remove("panel_a").unwrap());
    }

    #[test]
    fn test_duplicate_in_layer_returns_first_and_releases_second() {
        let mut manager = manager();
        let first = manager
            .add_sync::<PlainNode>("ui/panel_a", UiLayer::Normal, AddOptions::new())
            .unwrap();
        let visuals = manager.tree().scene().visual_count();
        let nodes = manager.tree().node_count();

        let second = manager
            .add_sync::<PlainNode>("ui/panel_a", UiLayer::Normal, AddOptions::new())
            .unwrap();

        assert_eq!(second, first);
        assert_eq!(manager.layers().len(UiLayer::Normal), 1);
        assert_eq!(manager.tree().scene().visual_count(), visuals);
        assert_eq!(manager.tree().node_count(), nodes);
    }

    #[test]
    fn test_async_duplicate_in_layer_returns_first_and_releases_second() {
        let mut manager = manager();
        let first = block_on(manager.add_async::<PlainNode>("ui/panel_a", UiLayer::Normal, AddOptions::new()))
            .unwrap();
        let visuals = manager.tree().scene().visual_count();
        let nodes = manager.tree().node_count();

        let second = block_on(manager.add_async::<PlainNode>("ui/panel_a", UiLayer::Normal, AddOptions::new()))
            .unwrap();

        assert_eq!(second, first);
        assert_eq!(manager.layers().len(UiLayer::Normal), 1);
        assert_eq!(manager.tree().scene().visual_count(), visuals);
        assert_eq!(manager.tree().node_count(), nodes);
    }

    #[test]
    fn test_tree_access_cannot_desync_layer_index() {
        let mut manager = manager();
        let panel = manager
            .add_sync::<PlainNode>("ui/panel_a", UiLayer::Normal, AddOptions::new())
            .unwrap();
        let layer_root = manager.layers().root(UiLayer::Normal);
        let app_root = manager.root();

        assert!(!manager.tree_mut().remove_child(layer_root, "panel_a"));
        assert!(!manager.tree_mut().remove_from_parent(panel));
        assert_eq!(manager.get("panel_a").unwrap(), Some(panel));
        assert_eq!(manager.tree().child(layer_root, "panel_a"), Some(panel));

        assert!(!manager.tree_mut().dispose(layer_root));
        assert!(!manager.tree_mut().dispose(app_root));
        assert!(!manager.tree().is_disposed(layer_root));
        assert_eq!(manager.tree().children(app_root).len(), UiLayer::COUNT);

        let visual = manager.tree_mut().scene_mut().create_visual("stray", true);
        let stray = manager
            .tree_mut()
            .create_node(visual, Box::new(PlainNode), None, false)
            .unwrap();
        let result = manager.tree_mut().add_child(layer_root, stray, None);
        assert!(matches!(result, Err(UiError::InvalidArgument(_))));
        assert_eq!(manager.layers().names(UiLayer::Normal), vec!["panel_a"]);

        // The registry still owns the layer
        assert!(manager.remove("panel_a").unwrap());
        assert_eq!(manager.tree().child(layer_root, "panel_a"), None);
        manager
            .add_sync::<PlainNode>("ui/panel_a", UiLayer::Normal, AddOptions::new())
            .unwrap();
        assert_eq!(manager.layers().len(UiLayer::Normal), 1);
    }

    #[test]
    fn test_same_name_in_two_layers_is_allowed() {
        let mut manager = manager();
        let normal = manager
            .add_sync::<PlainNode>("ui/panel_a", UiLayer::Normal, AddOptions::new())
            .unwrap();
        let system = manager
            .add_sync::<PlainNode>("ui/panel_a", UiLayer::System, AddOptions::new())
            .unwrap();
        assert_ne!(normal, system);

        // Lookup scans back to front, removal scans overlays first
        assert_eq!(manager.get("panel_a").unwrap(), Some(normal));
        assert!(manager.remove("panel_a").unwrap());
        assert_eq!(manager.layers().find_in("panel_a", UiLayer::System), None);
        assert_eq!(manager.get("panel_a").unwrap(), Some(normal));
    }

    #[test]
    fn test_remove_all_clears_every_layer() {
        let mut manager = manager();
        let mut names = Vec::new();
        for layer in UiLayer::ALL {
            let name = format!("panel_{}", layer.name().to_lowercase());
            manager
                .add_sync::<PlainNode>(&format!("ui/{}", name), layer, AddOptions::new())
                .unwrap();
            names.push(name);
        }
        let baseline = 1 + UiLayer::COUNT;

        manager.remove_all();

        for name in &names {
            assert_eq!(manager.get(name).unwrap(), None);
        }
        for layer in UiLayer::ALL {
            assert!(manager.layers().is_empty(layer));
            assert!(manager.tree().children(manager.layers().root(layer)).is_empty());
        }
        assert_eq!(manager.tree().node_count(), baseline);
        assert_eq!(manager.tree().scene().visual_count(), baseline);
    }

    #[test]
    fn test_remove_all_hides_before_dispose() {
        let mut manager = manager();
        let log: Rc<RefCell<Vec<String>>> = Log::default();
        let data: UserData = log.clone();
        manager
            .add_sync::<LoggedPanel>("ui/dialog", UiLayer::Window, AddOptions::new().with_user_data(data))
            .unwrap();
        log.borrow_mut().clear();

        manager.remove_all();
        assert_eq!(*log.borrow(), vec!["dialog.hide", "dialog.dispose"]);
    }

    #[test]
    fn test_full_screen_overrides_template_layout() {
        let mut manager = manager();
        let id = manager
            .add_to_full_screen::<PlainNode>("ui/dialog", UiLayer::Dialogue, None)
            .unwrap();

        let visual = manager.tree().node(id).unwrap().visual();
        let rect = manager.tree().scene().rect(visual).unwrap();
        assert_relative_eq!(rect.anchor_min.x, 0.0);
        assert_relative_eq!(rect.anchor_min.y, 0.0);
        assert_relative_eq!(rect.anchor_max.x, 1.0);
        assert_relative_eq!(rect.anchor_max.y, 1.0);
        assert_relative_eq!(rect.anchored_position.norm(), 0.0);
        assert_relative_eq!(rect.size_delta.norm(), 0.0);
    }

    #[test]
    fn test_template_hierarchy_is_instantiated() {
        let mut manager = manager();
        let id = manager
            .add_sync::<PlainNode>("ui/dialog", UiLayer::Window, AddOptions::new())
            .unwrap();

        let scene = manager.tree().scene();
        let visual = manager.tree().node(id).unwrap().visual();
        let children = scene.children(visual);
        assert_eq!(children.len(), 2);
        assert_eq!(scene.name(children[0]), Some("title"));
        assert!(scene.is_active(children[0]));
        assert!(!scene.is_active(children[1]));
    }

    #[test]
    fn test_async_add_matches_sync_add() {
        let mut manager = manager();
        let id = block_on(manager.add_async::<PlainNode>("ui/panel_a", UiLayer::Tip, AddOptions::new().full_screen()))
            .unwrap();

        assert_eq!(manager.get("panel_a").unwrap(), Some(id));
        assert_eq!(manager.layers().layer_of("panel_a"), Some(UiLayer::Tip));
        assert!(manager.tree().is_visible_in_hierarchy(id));
        let visual = manager.tree().node(id).unwrap().visual();
        assert!(manager.tree().scene().rect(visual).unwrap().is_full_screen());

        let missing = block_on(manager.add_async::<PlainNode>("ui/missing", UiLayer::Tip, AddOptions::new()));
        assert!(missing.is_err());
        assert_eq!(manager.layers().len(UiLayer::Tip), 1);
    }

    #[test]
    fn test_layer_roots_follow_config() {
        let config = UiConfig::default()
            .with_layer_depth_step(10.0)
            .with_render_layer("Overlay");
        let manager = UiManager::builder()
            .config(config)
            .asset_loader(Box::new(templates()))
            .build()
            .unwrap();

        let tree = manager.tree();
        for layer in UiLayer::ALL {
            let visual = tree.node(manager.layers().root(layer)).unwrap().visual();
            assert_relative_eq!(tree.scene().depth_offset(visual), layer.rank() as f32 * 10.0);
            assert_eq!(tree.scene().render_layer(visual), Some("Overlay"));
        }
        assert_eq!(tree.children(manager.root()).len(), UiLayer::COUNT);
    }

    #[test]
    fn test_host_root_survives_shutdown() {
        let mut scene = SimpleSceneGraph::new();
        let container = scene.create_visual("HostCanvas", true);
        let mut manager = UiManager::builder()
            .scene(Box::new(scene))
            .root_visual(container)
            .asset_loader(Box::new(templates()))
            .build()
            .unwrap();
        manager
            .add_sync::<PlainNode>("ui/panel_a", UiLayer::Normal, AddOptions::new())
            .unwrap();

        manager.shutdown();
        let scene = manager.tree().scene();
        assert!(scene.is_alive(container));
        assert!(scene.children(container).is_empty());
        assert_eq!(scene.visual_count(), 1);
    }
}
