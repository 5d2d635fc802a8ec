//! Building and running a single scene. The binary decides *which* scene; this
//! module turns the choice plus a config into a configured `App`.
use std::path::PathBuf;

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::core::config::ArtworkConfig;
use crate::scenes::SceneKind;

use super::ArtworkPlugin;

pub const BASE_CONFIG_PATH: &str = "assets/config/artwork.ron";
pub const LOCAL_CONFIG_PATH: &str = "assets/config/artwork.local.ron";

/// Layering order: an explicit `--config` file alone, otherwise base then local
/// override.
pub fn config_paths(explicit: Option<PathBuf>) -> Vec<PathBuf> {
    match explicit {
        Some(p) => vec![p],
        None => vec![PathBuf::from(BASE_CONFIG_PATH), PathBuf::from(LOCAL_CONFIG_PATH)],
    }
}

/// `scene` value of a `?a=b&scene=name` query string.
pub fn scene_from_query(search: &str) -> Option<SceneKind> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "scene")
        .and_then(|(_, v)| SceneKind::from_name(v))
}

/// Load the layered config, reporting problems through `report` (the logger is
/// not up yet when the launcher calls this).
pub fn load_config(paths: &[PathBuf], mut report: impl FnMut(&str)) -> ArtworkConfig {
    let (cfg, used, errors) = ArtworkConfig::load_layered(paths.iter());
    for e in &errors {
        report(&format!("config: {e}"));
    }
    for w in cfg.validate() {
        report(&format!("config warning: {w}"));
    }
    if used.is_empty() {
        report("config: no files loaded, using defaults");
    }
    cfg
}

/// Window title for `scene`; an empty configured title leaves just the scene name.
pub fn window_title(title: &str, scene: SceneKind) -> String {
    if title.is_empty() {
        scene.name().to_string()
    } else {
        format!("{title} - {scene}")
    }
}

pub fn build_app(scene: SceneKind, cfg: ArtworkConfig, config_paths: Vec<PathBuf>) -> App {
    let title = window_title(&cfg.window.title, scene);
    let mut app = App::new();
    app.insert_resource(cfg.clone()).add_plugins(
        DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title,
                resolution: WindowResolution::new(cfg.window.width, cfg.window.height),
                resizable: true,
                #[cfg(target_arch = "wasm32")]
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }),
    );
    app.add_plugins(ArtworkPlugin::new(scene).with_config_paths(config_paths));
    app
}

pub fn run_scene(scene: SceneKind, cfg: ArtworkConfig, config_paths: Vec<PathBuf>) -> AppExit {
    build_app(scene, cfg, config_paths).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_picks_scene_param() {
        assert_eq!(scene_from_query("?scene=double_helix"), Some(SceneKind::DoubleHelix));
        assert_eq!(
            scene_from_query("?debug=1&scene=ball_cluster"),
            Some(SceneKind::BallCluster)
        );
        assert_eq!(scene_from_query("?scene=unknown"), None);
        assert_eq!(scene_from_query(""), None);
    }

    #[test]
    fn title_carries_scene_name() {
        assert_eq!(window_title("Artwork Scenes", SceneKind::StickerWorld), "Artwork Scenes - sticker_world");
        assert_eq!(window_title("", SceneKind::StickerWorld), "sticker_world");
    }

    #[test]
    fn explicit_config_replaces_layering() {
        assert_eq!(config_paths(Some("x.ron".into())), vec![PathBuf::from("x.ron")]);
        assert_eq!(config_paths(None).len(), 2);
    }
}
