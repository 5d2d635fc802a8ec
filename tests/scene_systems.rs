use artwork_scenes::core::components::{Player, RotatingGroup, SpikeRadius};
use artwork_scenes::interaction::inputmap::parse::parse_input_toml;
use artwork_scenes::interaction::inputmap::systems::system_evaluate_bindings;
use artwork_scenes::motion::proximity::{Obstacle, ObstacleField, ProximityParams};
use artwork_scenes::motion::{BalloonMotion, FlashTimer, HitReaction, JumpMotion};
use artwork_scenes::scenes::virus_jump::{
    jump_input_system, jump_step_system, world_space_detection_system, WorldProximity,
};
use artwork_scenes::scenes::virus_jump_v2::{
    balloon_input_system, balloon_step_system, local_frame_detection_system,
};
use bevy::prelude::*;

const TRIGGER_ONLY: &str = "[actions]\nTrigger = {}\n[bindings]\nTrigger = [\"Key:Space\"]\n";

fn app_with_trigger() -> App {
    let parsed = parse_input_toml(TRIGGER_ONLY, false);
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.init_resource::<ButtonInput<KeyCode>>();
    app.insert_resource(parsed.input_map);
    app
}

#[test]
fn balloon_group_detection_under_rotation() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_systems(Update, local_frame_detection_system);

    let spike = Vec3::new(0.0, 3.05, 0.0);
    let rotation = Quat::from_rotation_z(0.4);
    app.world_mut().spawn((
        RotatingGroup,
        Transform::from_rotation(rotation),
        ObstacleField::new(
            vec![Obstacle { position: spike, radius: 0.1 }],
            ProximityParams::new(0.15, 0.5),
        ),
    ));
    let player = app
        .world_mut()
        .spawn((
            Player,
            Transform::from_translation(rotation * spike),
            HitReaction::new(10, 0.5, 0.1),
        ))
        .id();

    app.update();
    let r = app.world().get::<HitReaction>(player).unwrap();
    assert!(r.impacted);
    assert_eq!(r.countdown, 10);

    // Move the player well clear: the cooldown runs down before the reaction clears.
    app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(0.0, 10.0, 0.0);
    for _ in 0..10 {
        app.update();
    }
    assert!(app.world().get::<HitReaction>(player).unwrap().impacted);
    app.update();
    assert!(!app.world().get::<HitReaction>(player).unwrap().impacted);
}

#[test]
fn classic_detection_resolves_children_through_parent() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_systems(Update, world_space_detection_system);

    let rotation = Quat::from_rotation_x(0.5);
    let group = app
        .world_mut()
        .spawn((RotatingGroup, Transform::from_rotation(rotation)))
        .id();
    let local = Vec3::new(0.0, 3.1, 0.0);
    app.world_mut()
        .spawn((ChildOf(group), Transform::from_translation(local), SpikeRadius(0.1)));
    let player = app
        .world_mut()
        .spawn((
            Player,
            Transform::from_translation(rotation * local + Vec3::Z * 0.05),
            WorldProximity(ProximityParams::new(0.1, 0.0)),
            FlashTimer::new(0.1),
        ))
        .id();

    app.update();
    assert!(app.world().get::<FlashTimer>(player).unwrap().active());
}

#[test]
fn classic_detection_misses_unrotated_position() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_systems(Update, world_space_detection_system);

    let group = app
        .world_mut()
        .spawn((RotatingGroup, Transform::from_rotation(Quat::from_rotation_x(0.5))))
        .id();
    let local = Vec3::new(0.0, 3.1, 0.0);
    app.world_mut()
        .spawn((ChildOf(group), Transform::from_translation(local), SpikeRadius(0.1)));
    let player = app
        .world_mut()
        .spawn((
            Player,
            Transform::from_translation(local),
            WorldProximity(ProximityParams::new(0.1, 0.0)),
            FlashTimer::new(0.1),
        ))
        .id();

    app.update();
    assert!(!app.world().get::<FlashTimer>(player).unwrap().active());
}

#[test]
fn trigger_starts_jump_and_moves_player() {
    let mut app = app_with_trigger();
    app.add_systems(
        Update,
        (system_evaluate_bindings, jump_input_system, jump_step_system).chain(),
    );
    let player = app
        .world_mut()
        .spawn((Player, Transform::from_xyz(0.0, 3.06, 0.0), JumpMotion::new(3.06, 0.3, 0.015)))
        .id();

    app.update();
    assert_eq!(app.world().get::<Transform>(player).unwrap().translation.y, 3.06);

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::Space);
    app.update();
    let y = app.world().get::<Transform>(player).unwrap().translation.y;
    assert!((y - 3.075).abs() < 1e-5, "y = {y}");
    assert!(app.world().get::<JumpMotion>(player).unwrap().in_motion());
}

#[test]
fn trigger_launches_balloon() {
    let mut app = app_with_trigger();
    app.add_systems(
        Update,
        (system_evaluate_bindings, balloon_input_system, balloon_step_system).chain(),
    );
    let player = app
        .world_mut()
        .spawn((
            Player,
            Transform::from_xyz(0.0, 3.12, 0.0),
            BalloonMotion::new(3.12, -0.002, 0.08, 0.96, 0.2),
        ))
        .id();

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::Space);
    app.update();
    let y = app.world().get::<Transform>(player).unwrap().translation.y;
    assert!((y - 3.20).abs() < 1e-5, "y = {y}");
}

#[test]
fn no_input_map_means_no_jump() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_systems(Update, (jump_input_system, jump_step_system).chain());
    let player = app
        .world_mut()
        .spawn((Player, Transform::default(), JumpMotion::new(0.0, 0.3, 0.02)))
        .id();
    app.update();
    assert!(!app.world().get::<JumpMotion>(player).unwrap().in_motion());
}
