//! Zero-gravity cluster of spheres and cubes pulled toward the origin by a
//! spring-like force; the Explode action scatters them.
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use crate::core::config::{hex_color, ArtworkConfig, ClusterConfig};
use crate::core::system::system_order::SceneMotionSet;
use crate::interaction::inputmap::{actions, InputMap};
use crate::interaction::orbit::OrbitCamera;

use super::common::{set_ambient, spawn_camera, spawn_directional};
use super::spiked::scene_rng;

#[derive(Component, Debug, Clone, Copy)]
pub struct ClusterBody;

/// Strength of the pull toward the origin, shared by every body.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Attraction(pub f32);

#[derive(Resource, Debug, Clone, Copy)]
pub struct ExplodeSpeed(pub f32);

/// Force toward the origin, proportional to distance.
pub fn attraction_force(position: Vec3, strength: f32) -> Vec3 {
    -position * strength
}

/// Independent uniform components in `[-speed, speed]`.
pub fn explode_velocity(rng: &mut impl Rng, speed: f32) -> Vec3 {
    if speed <= 0.0 {
        return Vec3::ZERO;
    }
    Vec3::new(
        rng.gen_range(-speed..=speed),
        rng.gen_range(-speed..=speed),
        rng.gen_range(-speed..=speed),
    )
}

pub struct BallClusterPlugin;

impl Plugin for BallClusterPlugin {
    fn build(&self, app: &mut App) {
        let timestep = app
            .world()
            .get_resource::<ArtworkConfig>()
            .map(|c| c.cluster.timestep)
            .unwrap_or(1.0 / 60.0);
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            .insert_resource(TimestepMode::Fixed {
                dt: timestep,
                substeps: 1,
            })
            .add_systems(Startup, setup)
            .add_systems(
                Update,
                (explode_on_input, apply_attraction)
                    .chain()
                    .in_set(SceneMotionSet),
            );
        #[cfg(feature = "debug")]
        app.add_plugins(RapierDebugRenderPlugin {
            enabled: false,
            ..default()
        })
        .add_systems(Update, toggle_collider_debug);
    }
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<ArtworkConfig>,
) {
    let c = &cfg.cluster;
    commands.insert_resource(ClearColor(hex_color(c.background)));
    commands.insert_resource(Attraction(c.attraction));
    commands.insert_resource(ExplodeSpeed(c.explode_speed));

    let eye = Vec3::new(4.0, 4.0, 6.0).normalize() * c.camera_distance;
    let camera = spawn_camera(&mut commands, eye, Vec3::ZERO, 60.0, None);
    commands
        .entity(camera)
        .insert(OrbitCamera::looking_from(eye, Vec3::ZERO).with_damping(0.05));
    set_ambient(&mut commands, Color::WHITE, 600.0);
    spawn_directional(&mut commands, Color::WHITE, 8_000.0, Vec3::new(5.0, 10.0, 7.0), false);

    spawn_bodies(&mut commands, &mut meshes, &mut materials, c);
}

fn spawn_bodies(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    c: &ClusterConfig,
) {
    let ball_mesh = meshes.add(Sphere::new(c.ball_radius).mesh().uv(16, 16));
    let side = c.box_half_extent * 2.0;
    let box_mesh = meshes.add(Cuboid::new(side, side, side));
    let mut rng = scene_rng(None);

    for _ in 0..c.count {
        let is_ball = rng.gen_bool(0.5);
        let material = materials.add(StandardMaterial {
            base_color: Color::hsl(rng.gen_range(0.0..360.0), 0.6, 0.6),
            perceptual_roughness: 0.1,
            metallic: 0.1,
            ..default()
        });
        let position = (Vec3::new(rng.gen(), rng.gen(), rng.gen()) * 2.0 - Vec3::ONE) * c.spread;
        let (mesh, collider) = if is_ball {
            (ball_mesh.clone(), Collider::ball(c.ball_radius))
        } else {
            (
                box_mesh.clone(),
                Collider::cuboid(c.box_half_extent, c.box_half_extent, c.box_half_extent),
            )
        };
        commands.spawn((
            ClusterBody,
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(position),
            RigidBody::Dynamic,
            collider,
            ColliderMassProperties::Mass(c.mass),
            Damping {
                linear_damping: c.linear_damping,
                angular_damping: c.angular_damping,
            },
            GravityScale(0.0),
            Velocity::zero(),
            ExternalForce::default(),
        ));
    }
    info!(target: "scene", "ball cluster: {} bodies", c.count);
}

pub fn apply_attraction(
    attraction: Option<Res<Attraction>>,
    mut q: Query<(&Transform, &mut ExternalForce), With<ClusterBody>>,
) {
    let Some(k) = attraction else {
        return;
    };
    for (tf, mut force) in &mut q {
        force.force = attraction_force(tf.translation, k.0);
    }
}

/// Replace every body's linear velocity with a fresh random one.
pub fn explode_on_input(
    input: Option<Res<InputMap>>,
    speed: Option<Res<ExplodeSpeed>>,
    mut q: Query<&mut Velocity, With<ClusterBody>>,
) {
    let (Some(input), Some(speed)) = (input, speed) else {
        return;
    };
    if !input.just_pressed(actions::EXPLODE) {
        return;
    }
    let mut rng = rand::thread_rng();
    let mut n = 0usize;
    for mut vel in &mut q {
        vel.linvel = explode_velocity(&mut rng, speed.0);
        n += 1;
    }
    debug!(target: "scene", "explode: {n} bodies");
}

#[cfg(feature = "debug")]
fn toggle_collider_debug(input: Option<Res<InputMap>>, ctx: Option<ResMut<DebugRenderContext>>) {
    let (Some(input), Some(mut ctx)) = (input, ctx) else {
        return;
    };
    if input.just_pressed(actions::TOGGLE_STATS) {
        ctx.enabled = !ctx.enabled;
    }
}
