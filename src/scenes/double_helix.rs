//! Two interleaved sphere strands joined by thin rungs, with small nodes between
//! neighbouring turns and a cloud of slowly bobbing particles.
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::core::config::{hex_color, ArtworkConfig, HelixConfig};
use crate::core::system::system_order::SceneMotionSet;
use crate::interaction::orbit::OrbitCamera;

use super::common::{set_ambient, spawn_camera, spawn_directional, vec3};
use super::spiked::scene_rng;

const RUNG_RADIUS: f32 = 0.015;
const NODE_RADIUS: f32 = 0.08;
const BOB_STEP: f32 = 0.002;

#[derive(Component)]
pub struct HelixGroup {
    pub rate: f32,
}

/// Vertical drift parameters of one floating particle.
#[derive(Component, Debug, Clone, Copy)]
pub struct HelixParticle {
    pub offset: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrandPoint {
    pub first: Vec3,
    pub second: Vec3,
    pub size: f32,
}

#[derive(Debug, Default, Clone)]
pub struct HelixLayout {
    pub points: Vec<StrandPoint>,
    pub rungs: Vec<(Vec3, Vec3)>,
    pub nodes: Vec<Vec3>,
}

/// Deterministic geometry of both strands. Sizes grow from bottom to top.
pub fn helix_layout(cfg: &HelixConfig) -> HelixLayout {
    let total = cfg.turns * cfg.points_per_turn;
    let mut layout = HelixLayout::default();
    if total == 0 {
        return layout;
    }
    for i in 0..total {
        let t = i as f32 / total as f32;
        let angle = t * cfg.turns as f32 * TAU;
        let y = (t - 0.5) * cfg.height;
        let size = 0.1 + (0.2 + t * 0.3) * 0.2;
        let first = Vec3::new(angle.cos() * cfg.radius, y, angle.sin() * cfg.radius);
        let second = Vec3::new((angle + PI).cos() * cfg.radius, y, (angle + PI).sin() * cfg.radius);

        if cfg.rung_every > 0 && i % cfg.rung_every == 0 {
            layout.rungs.push((first, second));
        }
        // Node sits between this point's first strand and the previous point's second.
        if i > 0 && cfg.node_every > 0 && i % cfg.node_every == 0 {
            if let Some(prev) = layout.points.last() {
                layout.nodes.push((first + prev.second) * 0.5);
            }
        }
        layout.points.push(StrandPoint { first, second, size });
    }
    layout
}

/// Cylinder transform spanning `a` to `b` for a unit-height, Y-aligned mesh.
pub fn rung_transform(a: Vec3, b: Vec3) -> Transform {
    let d = b - a;
    let len = d.length();
    let rotation = if len > f32::EPSILON {
        Quat::from_rotation_arc(Vec3::Y, d / len)
    } else {
        Quat::IDENTITY
    };
    Transform {
        translation: (a + b) * 0.5,
        rotation,
        scale: Vec3::new(1.0, len, 1.0),
    }
}

/// Per-frame vertical drift of a particle at scene time `t`.
pub fn bob_offset(particle: &HelixParticle, t: f32) -> f32 {
    (t * particle.speed + particle.offset).sin() * BOB_STEP
}

pub struct DoubleHelixPlugin;

impl Plugin for DoubleHelixPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup)
            .add_systems(Update, helix_motion.in_set(SceneMotionSet));
    }
}

fn metal(materials: &mut Assets<StandardMaterial>, color: u32, roughness: f32, metallic: f32) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial {
        base_color: hex_color(color),
        perceptual_roughness: roughness,
        metallic,
        ..default()
    })
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<ArtworkConfig>,
) {
    let h = &cfg.helix;
    commands.insert_resource(ClearColor(hex_color(h.fog.color)));
    let eye = vec3(h.camera_position);
    let camera = spawn_camera(&mut commands, eye, Vec3::ZERO, 50.0, Some(&h.fog));
    commands
        .entity(camera)
        .insert(OrbitCamera::looking_from(eye, Vec3::ZERO).with_damping(0.05));

    set_ambient(&mut commands, hex_color(0xff00ff), 250.0);
    spawn_directional(&mut commands, hex_color(0x66ffff), 8_000.0, Vec3::new(5.0, 8.0, 5.0), true);
    spawn_directional(&mut commands, hex_color(0xd78f3d), 3_000.0, Vec3::new(-3.0, 2.0, -3.0), false);
    spawn_directional(&mut commands, hex_color(0xf52727), 4_000.0, Vec3::new(0.0, -2.0, -5.0), false);

    let sphere_mat = metal(&mut materials, 0xc8dcd6, 0.6, 0.2);
    let rung_mat = metal(&mut materials, 0xd4a574, 0.3, 1.0);
    let particle_mat = metal(&mut materials, 0xdcb683, 0.4, 0.8);
    let unit_sphere = meshes.add(Sphere::new(1.0).mesh().uv(32, 32));
    let rung_mesh = meshes.add(Cylinder::new(RUNG_RADIUS, 1.0));

    let layout = helix_layout(h);
    let mut rng = scene_rng(None);
    commands
        .spawn((
            HelixGroup { rate: h.rotation_rate },
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|group| {
            for p in &layout.points {
                for at in [p.first, p.second] {
                    group.spawn((
                        Mesh3d(unit_sphere.clone()),
                        MeshMaterial3d(sphere_mat.clone()),
                        Transform::from_translation(at).with_scale(Vec3::splat(p.size)),
                    ));
                }
            }
            for &(a, b) in &layout.rungs {
                group.spawn((
                    Mesh3d(rung_mesh.clone()),
                    MeshMaterial3d(rung_mat.clone()),
                    rung_transform(a, b),
                ));
            }
            for &at in &layout.nodes {
                group.spawn((
                    Mesh3d(unit_sphere.clone()),
                    MeshMaterial3d(particle_mat.clone()),
                    Transform::from_translation(at).with_scale(Vec3::splat(NODE_RADIUS)),
                ));
            }
            for _ in 0..h.particles {
                let t: f32 = rng.gen();
                let angle = rng.gen::<f32>() * TAU;
                let distance = h.radius + 0.5 + rng.gen::<f32>() * 2.0;
                let y = (t - 0.5) * h.height * 1.2;
                let size = 0.02 + rng.gen::<f32>() * 0.08;
                group.spawn((
                    Mesh3d(unit_sphere.clone()),
                    MeshMaterial3d(particle_mat.clone()),
                    Transform::from_xyz(angle.cos() * distance, y, angle.sin() * distance)
                        .with_scale(Vec3::splat(size)),
                    HelixParticle {
                        offset: rng.gen::<f32>() * TAU,
                        speed: 0.2 + rng.gen::<f32>() * 0.3,
                    },
                ));
            }
        });
    info!(
        target: "scene",
        "double helix: {} strand points, {} rungs, {} nodes, {} particles",
        layout.points.len() * 2,
        layout.rungs.len(),
        layout.nodes.len(),
        h.particles
    );
}

pub fn helix_motion(
    time: Res<Time>,
    cfg: Res<ArtworkConfig>,
    mut groups: Query<(&HelixGroup, &mut Transform), Without<HelixParticle>>,
    mut particles: Query<(&HelixParticle, &mut Transform), Without<HelixGroup>>,
) {
    let t = time.elapsed_secs() * cfg.helix.time_scale;
    for (group, mut tf) in &mut groups {
        tf.rotation = Quat::from_rotation_y(t * group.rate);
    }
    for (p, mut tf) in &mut particles {
        tf.translation.y += bob_offset(p, t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_counts() {
        let layout = helix_layout(&HelixConfig::default());
        assert_eq!(layout.points.len(), 160);
        // i = 0, 3, ..., 159
        assert_eq!(layout.rungs.len(), 54);
        // i = 2, 4, ..., 158
        assert_eq!(layout.nodes.len(), 79);
    }

    #[test]
    fn strands_are_opposite_and_sizes_grow() {
        let cfg = HelixConfig::default();
        let layout = helix_layout(&cfg);
        for p in &layout.points {
            assert!((p.first.xz() + p.second.xz()).length() < 1e-4);
            assert!((p.first.xz().length() - cfg.radius).abs() < 1e-4);
        }
        assert!((layout.points[0].size - 0.14).abs() < 1e-6);
        assert!(layout.points.windows(2).all(|w| w[1].size > w[0].size));
        assert!((layout.points[0].first.y + cfg.height / 2.0).abs() < 1e-5);
    }

    #[test]
    fn node_is_midpoint_with_previous_second_strand() {
        let layout = helix_layout(&HelixConfig::default());
        let expected = (layout.points[2].first + layout.points[1].second) * 0.5;
        assert!(layout.nodes[0].distance(expected) < 1e-6);
    }

    #[test]
    fn rung_spans_both_ends() {
        let a = Vec3::new(1.5, 0.0, 0.0);
        let b = Vec3::new(-1.5, 0.0, 0.0);
        let tf = rung_transform(a, b);
        let top = tf.transform_point(Vec3::Y * 0.5);
        let bottom = tf.transform_point(-Vec3::Y * 0.5);
        assert!(top.distance(b) < 1e-5 || top.distance(a) < 1e-5);
        assert!(bottom.distance(a) < 1e-5 || bottom.distance(b) < 1e-5);
    }

    #[test]
    fn group_follows_scaled_time() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(ArtworkConfig::default());
        app.add_systems(Update, helix_motion);
        let g = app
            .world_mut()
            .spawn((HelixGroup { rate: 0.3 }, Transform::default()))
            .id();
        app.update();
        app.update();
        let elapsed = app.world().resource::<Time>().elapsed_secs();
        let tf = app.world().get::<Transform>(g).unwrap();
        let expected = Quat::from_rotation_y(elapsed * 0.5 * 0.3);
        assert!(tf.rotation.angle_between(expected) < 1e-5);
    }
}
