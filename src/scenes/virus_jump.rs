//! "Virus Jump": fixed-arc jump over the spiked sphere. Spike positions are
//! resolved to world space every frame and the player flashes briefly on contact.
use bevy::prelude::*;

use crate::core::components::{Player, RotatingGroup, SpikeRadius, TitleText};
use crate::core::config::{hex_color, ArtworkConfig};
use crate::core::system::system_order::{DetectionSet, PresentationSet, SceneMotionSet};
use crate::interaction::inputmap::{actions, InputMap};
use crate::loading::{AssetRole, PendingLoads, SceneMutation, SceneMutationQueue};
use crate::motion::proximity::{first_hit_resolved, ProximityParams};
use crate::motion::{FlashTimer, JumpMotion};

use super::common::{spawn_camera, vec3};
use super::spiked::{
    scene_rng, spawn_lights, spawn_spiked_world, tint_player, ConePivot, PlayerPalette, PlayerSpec,
};

/// Spikes sit centred on the surface, so only their outer half shows.
pub(crate) const CONE_PIVOT: ConePivot = ConePivot::Centre;

/// World-space detection parameters (no radius term).
#[derive(Component, Debug, Clone, Copy)]
pub struct WorldProximity(pub ProximityParams);

pub struct VirusJumpPlugin;

impl Plugin for VirusJumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup)
            .add_systems(
                Update,
                (jump_input_system, jump_step_system)
                    .chain()
                    .in_set(SceneMotionSet),
            )
            .add_systems(Update, world_space_detection_system.in_set(DetectionSet))
            .add_systems(
                Update,
                (flash_tint_system, apply_title_font).in_set(PresentationSet),
            );
    }
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingLoads>,
    cfg: Res<ArtworkConfig>,
) {
    let sphere = &cfg.spiked_sphere;
    let classic = &cfg.classic;
    commands.insert_resource(ClearColor(hex_color(sphere.background)));
    spawn_camera(
        &mut commands,
        vec3(classic.camera_position),
        vec3(sphere.camera_target),
        75.0,
        Some(&classic.fog),
    );
    spawn_lights(&mut commands);

    let cone_material = materials.add(StandardMaterial {
        base_color: hex_color(classic.cone_color),
        ..default()
    });
    let mut rng = scene_rng(sphere.seed);
    let speed = sphere.rotation_speed;
    let world = spawn_spiked_world(
        &mut commands,
        &mut meshes,
        &mut materials,
        sphere,
        ProximityParams::new(classic.hit_distance, 0.0),
        PlayerSpec {
            rest_height: classic.rest_height,
            spin_rate: Vec3::new(-20.0, -5.0, -5.0) * speed,
            palette: PlayerPalette {
                rest: Color::WHITE,
                impact: hex_color(classic.flash_color),
            },
        },
        CONE_PIVOT,
        &mut rng,
        |_, _| cone_material.clone(),
    );
    commands.entity(world.player).insert((
        JumpMotion::new(classic.rest_height, classic.jump.height, classic.jump.speed),
        FlashTimer::new(classic.flash_secs),
        WorldProximity(ProximityParams::new(classic.hit_distance, 0.0)),
    ));

    commands.spawn((
        Text::new(classic.title.clone()),
        TextFont {
            font_size: 48.0,
            ..default()
        },
        TextColor(hex_color(classic.title_color)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(24.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        TextLayout::new_with_justify(JustifyText::Center),
        TitleText,
    ));
    pending.request::<Font>(&asset_server, AssetRole::TitleFont, classic.title_font.clone());
}

pub fn jump_input_system(input: Option<Res<InputMap>>, mut q: Query<&mut JumpMotion, With<Player>>) {
    let Some(input) = input else {
        return;
    };
    if !input.just_pressed(actions::TRIGGER) {
        return;
    }
    for mut jump in &mut q {
        if jump.trigger() {
            debug!(target: "scene", "jump started at y={:.3}", jump.position);
        }
    }
}

pub fn jump_step_system(mut q: Query<(&mut JumpMotion, &mut Transform), With<Player>>) {
    for (mut jump, mut tf) in &mut q {
        jump.step();
        tf.translation.y = jump.position;
    }
}

/// Resolve every spike through its parent's transform and compare in world space.
pub fn world_space_detection_system(
    time: Res<Time>,
    groups: Query<&Transform, With<RotatingGroup>>,
    spikes: Query<(&ChildOf, &Transform, &SpikeRadius)>,
    mut players: Query<(&Transform, &WorldProximity, &mut FlashTimer), With<Player>>,
) {
    for (player_tf, proximity, mut flash) in &mut players {
        if flash.tick(time.delta()) {
            debug!(target: "scene", "flash ended");
        }
        let resolved = spikes.iter().filter_map(|(child_of, tf, radius)| {
            groups
                .get(child_of.parent())
                .ok()
                .map(|g| (g.compute_affine().transform_point3(tf.translation), radius.0))
        });
        if let Some(i) = first_hit_resolved(player_tf.translation, resolved, proximity.0) {
            if flash.trigger() {
                info!(target: "scene", "spike {i} touched");
            }
        }
    }
}

fn flash_tint_system(
    mut materials: ResMut<Assets<StandardMaterial>>,
    q: Query<(&FlashTimer, &PlayerPalette, &MeshMaterial3d<StandardMaterial>), With<Player>>,
) {
    for (flash, palette, handle) in &q {
        tint_player(&mut materials, handle, palette, flash.active());
    }
}

/// Swap the title to the loaded font; on failure the default font stays.
pub fn apply_title_font(mut queue: ResMut<SceneMutationQueue>, mut q: Query<&mut TextFont, With<TitleText>>) {
    for m in queue.drain() {
        let SceneMutation::Ready { role: AssetRole::TitleFont, handle } = m else {
            continue;
        };
        match handle.try_typed::<Font>() {
            Ok(font) => {
                for mut tf in &mut q {
                    tf.font = font.clone();
                }
                info!(target: "assets", "title font applied");
            }
            Err(e) => warn!(target: "assets", "title font handle mismatch: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_spikes_are_half_buried() {
        let mesh = CONE_PIVOT.unit_cone();
        let lowest = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|a| a.as_float3())
            .unwrap()
            .iter()
            .map(|p| p[1])
            .fold(f32::MAX, f32::min);
        assert!((lowest + 0.5).abs() < 1e-5, "lowest {lowest}");
    }
}
