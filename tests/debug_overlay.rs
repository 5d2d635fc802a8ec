#![cfg(feature = "debug")]

use artwork_scenes::debug::keys::debug_key_input_system;
use artwork_scenes::debug::overlay::overlay_line;
use artwork_scenes::debug::stats::smooth;
use artwork_scenes::debug::{DebugState, DebugStats};
use artwork_scenes::interaction::inputmap::parse::parse_input_toml;
use artwork_scenes::interaction::inputmap::systems::system_evaluate_bindings;
use bevy::prelude::*;

const STATS_ONLY: &str = "[actions]\nToggleStats = {}\n[bindings]\nToggleStats = [\"Key:F1\"]\n";

#[test]
fn toggle_stats_flips_overlay_once_per_press() {
    let parsed = parse_input_toml(STATS_ONLY, false);
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.init_resource::<ButtonInput<KeyCode>>();
    app.insert_resource(parsed.input_map);
    app.init_resource::<DebugState>();
    app.add_systems(Update, (system_evaluate_bindings, debug_key_input_system).chain());

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::F1);
    app.update();
    assert!(app.world().resource::<DebugState>().overlay_visible);
    // Still held: no second toggle.
    app.update();
    assert!(app.world().resource::<DebugState>().overlay_visible);
}

#[test]
fn overlay_line_lists_counters() {
    let stats = DebugStats {
        fps: 59.94,
        frame_time_ms: 16.7,
        mesh_count: 1002,
        pending_loads: 1,
    };
    let line = overlay_line(&stats, None);
    assert!(line.starts_with("FPS 59.9"));
    assert!(line.contains("meshes 1002"));
    assert!(line.contains("pending 1"));
}

#[test]
fn smoothing_seeds_then_averages() {
    assert_eq!(smooth(0.0, 60.0), 60.0);
    assert!((smooth(60.0, 30.0) - 57.0).abs() < 1e-4);
}
