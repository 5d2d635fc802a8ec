use artwork_scenes::app::launch::{config_paths, load_config, BASE_CONFIG_PATH};
use artwork_scenes::core::config::{ArtworkConfig, EMBEDDED_ARTWORK_RON};
use std::io::Write;

fn write_ron(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    path
}

#[test]
fn local_layer_overrides_single_fields() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_ron(dir.path(), "base.ron", EMBEDDED_ARTWORK_RON);
    let local = write_ron(
        dir.path(),
        "local.ron",
        "(balloon: (impulse: 0.1), helix: (turns: 2))",
    );
    let (cfg, used, errors) = ArtworkConfig::load_layered([&base, &local]);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(used.len(), 2);
    assert_eq!(cfg.balloon.impulse, 0.1);
    // Siblings of an overridden field survive the merge.
    assert_eq!(cfg.balloon.gravity, -0.002);
    assert_eq!(cfg.helix.turns, 2);
    assert_eq!(cfg.helix.points_per_turn, 40);
    assert_eq!(cfg.cluster.count, 400);
}

#[test]
fn missing_local_layer_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_ron(dir.path(), "base.ron", "(classic: (hit_distance: 0.2))");
    let missing = dir.path().join("artwork.local.ron");
    let mut messages = Vec::new();
    let cfg = load_config(&[base, missing], |m| messages.push(m.to_string()));
    assert_eq!(cfg.classic.hit_distance, 0.2);
    assert_eq!(messages.len(), 1, "{messages:?}");
    assert!(messages[0].contains("artwork.local.ron"));
}

#[test]
fn nothing_loaded_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut messages = Vec::new();
    let cfg = load_config(&[dir.path().join("none.ron")], |m| messages.push(m.to_string()));
    assert_eq!(cfg.spiked_sphere.count, ArtworkConfig::default().spiked_sphere.count);
    assert!(messages.iter().any(|m| m.contains("no files loaded")));
}

#[test]
fn validation_warnings_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_ron(dir.path(), "base.ron", "(window: (width: -1.0))");
    let mut messages = Vec::new();
    load_config(&[base], |m| messages.push(m.to_string()));
    assert!(messages.iter().any(|m| m.starts_with("config warning:")));
}

#[test]
fn default_paths_start_with_shipped_file() {
    let paths = config_paths(None);
    assert_eq!(paths[0].to_str(), Some(BASE_CONFIG_PATH));
}
