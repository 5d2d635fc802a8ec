use artwork_scenes::app::launch::scene_from_query;
use artwork_scenes::SceneKind;

#[test]
fn every_scene_is_reachable_by_name_and_query() {
    for kind in SceneKind::ALL {
        assert_eq!(SceneKind::from_name(kind.name()), Some(kind));
        assert_eq!(scene_from_query(&format!("?scene={}", kind.name())), Some(kind));
        assert!(!kind.description().is_empty());
    }
}

#[test]
fn display_matches_cli_name() {
    assert_eq!(SceneKind::DoubleHelix.to_string(), "double_helix");
    assert_eq!(SceneKind::from_name(" Ball-Cluster "), Some(SceneKind::BallCluster));
}
