use bevy::prelude::*;

use super::parse::parse_input_toml;
use super::systems::system_evaluate_bindings;
use super::types::InputMap;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct InputActionUpdateSet;

/// Bundled fallback used on wasm and when the file on disk is missing.
pub const EMBEDDED_INPUT_TOML: &str = include_str!("../../../assets/config/input.toml");

pub fn input_config_path() -> String {
    std::env::var("INPUT_CONFIG_PATH").unwrap_or_else(|_| "assets/config/input.toml".into())
}

pub struct InputActionsPlugin;
impl Plugin for InputActionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputMap>()
            .configure_sets(PreUpdate, InputActionUpdateSet)
            .add_systems(PreStartup, load_initial_input_map)
            .add_systems(PreUpdate, system_evaluate_bindings.in_set(InputActionUpdateSet));
    }
}

fn load_initial_input_map(mut commands: Commands) {
    #[cfg(target_arch = "wasm32")]
    let raw: String = EMBEDDED_INPUT_TOML.to_string();
    #[cfg(not(target_arch = "wasm32"))]
    let raw: String = {
        let path = input_config_path();
        std::fs::read_to_string(&path).unwrap_or_else(|e| {
            warn!("Input map {path} unreadable ({e}); using embedded defaults");
            EMBEDDED_INPUT_TOML.to_string()
        })
    };
    let parsed = parse_input_toml(&raw, cfg!(feature = "debug"));
    for e in &parsed.errors {
        error!("INPUT MAP ERROR: {e}");
    }
    info!("Input map loaded: {} actions", parsed.input_map.actions.len());
    commands.insert_resource(parsed.input_map);
}
