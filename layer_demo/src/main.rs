//! Layer demo application
//!
//! Loads a few UI templates from `layer_demo/ui` into different layers,
//! toggles them by name and tears everything down, logging each step.
//! Run from the workspace root with `RUST_LOG=debug` for the full trace.

use std::rc::Rc;

use ui_layers::foundation::logging;
use ui_layers::prelude::*;

const CONFIG_PATH: &str = "layer_demo/ui.toml";

/// Main menu that tracks how often it was shown
#[derive(Default)]
struct MainMenu {
    shows: u32,
}

impl NodeBehaviour for MainMenu {
    fn on_show(&mut self, node: &NodeView<'_>) {
        self.shows += 1;
        log::info!("{} shown ({} times)", node.name, self.shows);
    }

    fn on_hide(&mut self, node: &NodeView<'_>) {
        log::info!("{} hidden", node.name);
    }
}

/// Transient notification displaying its user data
#[derive(Default)]
struct Toast;

impl NodeBehaviour for Toast {
    fn refresh(&mut self, node: &NodeView<'_>) {
        if let Some(message) = node.user_data_as::<String>() {
            log::info!("toast: {}", message);
        }
    }

    fn on_dispose(&mut self, node: &NodeView<'_>) {
        log::debug!("{} disposed", node.name);
    }
}

fn print_layers(ui: &UiManager) {
    for layer in UiLayer::ALL {
        let mut names = ui.layers().names(layer);
        if names.is_empty() {
            continue;
        }
        names.sort_unstable();
        log::info!("  {:<10} {}", layer, names.join(", "));
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = UiConfig::load_or_default(CONFIG_PATH)?;
    logging::init_with_level(&config.log_level);
    log::info!("Starting layer demo");

    let loader = FileAssetLoader::from_config(&config);
    let mut ui = UiManager::builder()
        .config(config)
        .asset_loader(Box::new(loader))
        .build()?;

    ui.add_sync::<MainMenu>("main_menu.toml", UiLayer::Normal, AddOptions::new())?;
    ui.add_sync::<PlainNode>("hud.toml", UiLayer::Fixed, AddOptions::new().full_screen())?;
    ui.add_async::<PlainNode>("loading.toml", UiLayer::Loading, AddOptions::new().full_screen())
        .await?;

    // Registering the same name twice keeps the first instance
    let first = ui.get("hud")?;
    let again = ui.add_sync::<PlainNode>("hud.toml", UiLayer::Fixed, AddOptions::new())?;
    log::info!("duplicate hud kept the first instance: {}", first == Some(again));

    let message: UserData = Rc::new("Level loaded".to_string());
    ui.add_async::<Toast>("toast.ron", UiLayer::Notify, AddOptions::new())
        .await?;
    ui.show("toast", Some(message))?;

    log::info!("Layers after loading:");
    print_layers(&ui);

    // Removal only detaches; dispose releases the node for good
    if let Some(loading) = ui.get("loading")? {
        ui.remove("loading")?;
        ui.tree_mut().dispose(loading);
    }
    ui.hide("main_menu")?;
    ui.show("main_menu", None)?;

    if let Some(menu) = ui.get_as::<MainMenu>("main_menu")? {
        log::info!("main_menu has been shown {} times", menu.shows);
    }
    log::info!("toast is a Toast: {}", ui.has_as::<Toast>("toast")?);

    ui.remove_all();
    log::info!("Layers after remove_all:");
    print_layers(&ui);

    ui.shutdown();
    Ok(())
}
