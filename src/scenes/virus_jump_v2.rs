//! Balloon jump over the spiked sphere. Detection moves the player into the
//! group's local frame once per frame and scans the static obstacle list.
use bevy::prelude::*;
use rand::Rng;

use crate::core::components::{Player, RotatingGroup};
use crate::core::config::{hex_color, ArtworkConfig, SpawnRange};
use crate::core::system::system_order::{DetectionSet, PresentationSet, SceneMotionSet};
use crate::interaction::inputmap::{actions, InputMap};
use crate::motion::proximity::{ObstacleField, ProximityParams};
use crate::motion::{BalloonMotion, HitReaction};

use super::common::{spawn_camera, vec3};
use super::spiked::{
    scene_rng, spawn_lights, spawn_spiked_world, tint_player, ConePivot, PlayerPalette, PlayerSpec,
};

/// Spike base sits on the surface; the whole cone sticks out.
pub(crate) const CONE_PIVOT: ConePivot = ConePivot::Base;

/// One material per spike, each with its own hue drawn from `hue` (degrees).
pub fn hued_cone_materials(
    materials: &mut Assets<StandardMaterial>,
    hue: &SpawnRange<f32>,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<Handle<StandardMaterial>> {
    (0..count)
        .map(|_| {
            materials.add(StandardMaterial {
                base_color: Color::hsl(hue.sample(&mut *rng), 0.9, 0.5),
                perceptual_roughness: 0.6,
                ..default()
            })
        })
        .collect()
}

pub struct BalloonJumpPlugin;

impl Plugin for BalloonJumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup)
            .add_systems(
                Update,
                (balloon_input_system, balloon_step_system)
                    .chain()
                    .in_set(SceneMotionSet),
            )
            .add_systems(Update, local_frame_detection_system.in_set(DetectionSet))
            .add_systems(Update, reaction_visual_system.in_set(PresentationSet));
    }
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<ArtworkConfig>,
) {
    let sphere = &cfg.spiked_sphere;
    let b = &cfg.balloon;
    commands.insert_resource(ClearColor(hex_color(sphere.background)));
    spawn_camera(
        &mut commands,
        vec3(b.camera_position),
        vec3(sphere.camera_target),
        75.0,
        Some(&b.fog),
    );
    spawn_lights(&mut commands);

    let mut rng = scene_rng(sphere.seed);
    let cone_materials = hued_cone_materials(&mut materials, &b.hue, sphere.count, &mut rng);

    let world = spawn_spiked_world(
        &mut commands,
        &mut meshes,
        &mut materials,
        sphere,
        ProximityParams::new(b.threshold, b.radius_factor),
        PlayerSpec {
            rest_height: b.rest_height,
            spin_rate: Vec3::new(-20.0, -5.0, 0.0) * sphere.rotation_speed,
            palette: PlayerPalette {
                rest: Color::WHITE,
                impact: hex_color(b.impact_color),
            },
        },
        CONE_PIVOT,
        &mut rng,
        |_, i| cone_materials.get(i).cloned().unwrap_or_default(),
    );
    commands.entity(world.player).insert((
        BalloonMotion::new(b.rest_height, b.gravity, b.impulse, b.damping, b.max_velocity),
        HitReaction::new(b.cooldown_frames, b.hit_scale, b.easing),
    ));
}

pub fn balloon_input_system(input: Option<Res<InputMap>>, mut q: Query<&mut BalloonMotion, With<Player>>) {
    let Some(input) = input else {
        return;
    };
    if input.just_pressed(actions::TRIGGER) {
        for mut balloon in &mut q {
            balloon.trigger();
        }
    }
}

pub fn balloon_step_system(mut q: Query<(&mut BalloonMotion, &mut Transform), With<Player>>) {
    for (mut balloon, mut tf) in &mut q {
        balloon.step();
        tf.translation.y = balloon.position;
    }
}

pub fn local_frame_detection_system(
    groups: Query<(&Transform, &ObstacleField), With<RotatingGroup>>,
    mut players: Query<(&Transform, &mut HitReaction), With<Player>>,
) {
    for (player_tf, mut reaction) in &mut players {
        let hit = groups
            .iter()
            .find_map(|(group_tf, field)| field.detect(player_tf.translation, &group_tf.compute_affine()));
        if let Some(i) = hit {
            if !reaction.impacted {
                debug!(target: "scene", "spike {i} touched");
            }
        }
        reaction.step(hit.is_some());
    }
}

fn reaction_visual_system(
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut q: Query<(&HitReaction, &PlayerPalette, &MeshMaterial3d<StandardMaterial>, &mut Transform), With<Player>>,
) {
    for (reaction, palette, handle, mut tf) in &mut q {
        tint_player(&mut materials, handle, palette, reaction.impacted);
        tf.scale = Vec3::splat(reaction.scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn every_spike_gets_its_own_hue_in_range() {
        let mut materials = Assets::<StandardMaterial>::default();
        let mut rng = StdRng::seed_from_u64(7);
        let handles = hued_cone_materials(&mut materials, &SpawnRange::new(0.0, 40.0), 50, &mut rng);
        assert_eq!(handles.len(), 50);
        let hues: Vec<f32> = handles
            .iter()
            .map(|h| Hsla::from(materials.get(h).unwrap().base_color).hue)
            .collect();
        assert!(hues.iter().all(|h| (-1e-3..=40.0 + 1e-3).contains(h)), "{hues:?}");
        let mut distinct = hues.clone();
        distinct.sort_by(|a, b| a.total_cmp(b));
        distinct.dedup_by(|a, b| (*a - *b).abs() < 1e-6);
        assert!(distinct.len() > 16, "hues collapsed to {}", distinct.len());
    }

    #[test]
    fn balloon_spikes_stand_on_their_base() {
        assert_eq!(CONE_PIVOT, ConePivot::Base);
    }
}
