//! Sphere scaled by the brightness of a frame source, optionally ringed by small
//! spinning primitives.
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use rand::Rng;

use crate::core::components::EulerSpin;
use crate::core::config::{hex_color, ArtworkConfig, BrightnessConfig};
use crate::core::system::system_order::{PresentationSet, SceneMotionSet};
use crate::loading::StatusBoard;
use crate::motion::ease_toward;
use crate::sensing::{sample_brightness_system, BrightnessFeed};

use super::common::{set_ambient, spawn_camera, spawn_directional};
use super::spiked::scene_rng;

/// Sphere whose uniform scale chases `brightness * max_scale`.
#[derive(Component, Debug, Clone)]
pub struct BrightnessScaled {
    pub max_scale: f32,
    pub smoothing: f32,
    pub scale: f32,
}

impl BrightnessScaled {
    pub fn step(&mut self, brightness: f32) -> f32 {
        let target = brightness * self.max_scale;
        self.scale = ease_toward(self.scale, target, self.smoothing);
        self.scale
    }
}

pub struct BrightnessSpherePlugin;

impl Plugin for BrightnessSpherePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup)
            .add_systems(
                Update,
                (sample_brightness_system, scale_from_brightness)
                    .chain()
                    .in_set(SceneMotionSet),
            )
            .add_systems(Update, brightness_hud.in_set(PresentationSet));
    }
}

pub(crate) fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut board: ResMut<StatusBoard>,
    cfg: Res<ArtworkConfig>,
) {
    let b = &cfg.brightness;
    commands.insert_resource(ClearColor(hex_color(b.background)));
    spawn_camera(&mut commands, Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO, 55.0, Some(&b.fog));
    set_ambient(&mut commands, Color::WHITE, 400.0);
    spawn_directional(&mut commands, Color::WHITE, 6_000.0, Vec3::new(5.0, 5.0, 5.0), false);
    spawn_directional(&mut commands, Color::WHITE, 3_000.0, Vec3::new(-5.0, -5.0, 5.0), false);

    let feed = match BrightnessFeed::open(b) {
        Ok(feed) => feed,
        Err(e) => {
            error!(target: "sensing", "camera source unavailable: {e:#}");
            board.push(format!("Camera access failed: {e:#}"));
            return;
        }
    };
    commands.insert_resource(feed);

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(1.0).mesh().uv(64, 64))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 0.5,
            metallic: 0.1,
            ..default()
        })),
        Transform::from_scale(Vec3::ZERO),
        EulerSpin::new(Vec3::new(b.rotation_speed, b.rotation_speed, 0.0)),
        BrightnessScaled {
            max_scale: b.max_scale,
            smoothing: b.smoothing,
            scale: 0.0,
        },
    ));
    spawn_friends(&mut commands, &mut meshes, &mut materials, b);
}

fn spawn_friends(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    b: &BrightnessConfig,
) {
    if b.friends == 0 {
        return;
    }
    let s = b.friend_size;
    let shapes = [
        meshes.add(Cuboid::new(s, s, s)),
        meshes.add(Tetrahedron::new(
            Vec3::new(1.0, 1.0, 1.0) * s / 3f32.sqrt(),
            Vec3::new(-1.0, -1.0, 1.0) * s / 3f32.sqrt(),
            Vec3::new(-1.0, 1.0, -1.0) * s / 3f32.sqrt(),
            Vec3::new(1.0, -1.0, -1.0) * s / 3f32.sqrt(),
        )),
        meshes.add(octahedron(s)),
        meshes.add(super::spiked::flat_icosphere(s, 0)),
    ];
    let material = materials.add(StandardMaterial {
        base_color: hex_color(b.friend_color),
        perceptual_roughness: 0.5,
        metallic: 0.1,
        ..default()
    });
    let mut rng = scene_rng(None);
    for _ in 0..b.friends {
        let distance = b.friend_distance.sample(&mut rng);
        let theta = rng.gen::<f32>() * std::f32::consts::TAU;
        let phi = rng.gen::<f32>() * std::f32::consts::PI;
        let position = Vec3::new(
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
            phi.cos(),
        ) * distance;
        let start = Vec3::new(rng.gen(), rng.gen(), rng.gen()) * std::f32::consts::PI;
        let rate = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ) * b.friend_spin;
        let spin = EulerSpin::starting_at(start, rate);
        commands.spawn((
            Mesh3d(shapes[rng.gen_range(0..shapes.len())].clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(position).with_rotation(spin.rotation()),
            spin,
        ));
    }
}

/// Flat-shaded regular octahedron with circumradius `r`.
pub fn octahedron(r: f32) -> Mesh {
    let px = Vec3::X * r;
    let nx = -px;
    let py = Vec3::Y * r;
    let ny = -py;
    let pz = Vec3::Z * r;
    let nz = -pz;
    let faces = [
        [py, pz, px],
        [py, px, nz],
        [py, nz, nx],
        [py, nx, pz],
        [ny, px, pz],
        [ny, nz, px],
        [ny, nx, nz],
        [ny, pz, nx],
    ];
    let positions: Vec<[f32; 3]> = faces.iter().flatten().map(|v| v.to_array()).collect();
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.compute_flat_normals();
    mesh
}

pub fn scale_from_brightness(
    feed: Option<Res<BrightnessFeed>>,
    mut q: Query<(&mut BrightnessScaled, &mut Transform)>,
) {
    let Some(feed) = feed else {
        return;
    };
    for (mut scaled, mut tf) in &mut q {
        let s = scaled.step(feed.latest);
        tf.scale = Vec3::splat(s);
    }
}

fn brightness_hud(
    feed: Option<Res<BrightnessFeed>>,
    q: Query<&BrightnessScaled>,
    mut board: ResMut<StatusBoard>,
) {
    let Some(feed) = feed else {
        return;
    };
    let size = q.iter().next().map(|s| s.scale).unwrap_or_default();
    board.set_hud(format!(
        "Brightness: {:.1}%\nSphere size: {:.2}",
        feed.latest * 100.0,
        size
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_one_snaps() {
        let mut s = BrightnessScaled { max_scale: 5.0, smoothing: 1.0, scale: 0.0 };
        assert!((s.step(0.4) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn smoothing_converges() {
        let mut s = BrightnessScaled { max_scale: 5.0, smoothing: 0.15, scale: 0.0 };
        for _ in 0..200 {
            s.step(0.5);
        }
        assert!((s.scale - 2.5).abs() < 1e-4);
    }

    fn setup_app(cfg: ArtworkConfig) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<StatusBoard>()
            .insert_resource(cfg)
            .add_systems(Startup, setup);
        app.update();
        app
    }

    #[test]
    fn failed_acquisition_reports_and_spawns_nothing() {
        let mut cfg = ArtworkConfig::default();
        cfg.brightness.frames = Some("/missing".into());
        let mut app = setup_app(cfg);
        let board = app.world().resource::<StatusBoard>();
        assert!(
            board.lines().iter().any(|l| l.contains("Camera access failed")),
            "{:?}",
            board.lines()
        );
        assert!(app.world().get_resource::<BrightnessFeed>().is_none());
        let world = app.world_mut();
        assert_eq!(world.query::<&BrightnessScaled>().iter(world).count(), 0);
        assert_eq!(world.query::<&EulerSpin>().iter(world).count(), 0);
    }

    #[test]
    fn generated_source_spawns_sphere_and_friends() {
        let mut cfg = ArtworkConfig::default();
        cfg.brightness.friends = 5;
        let mut app = setup_app(cfg);
        assert!(app.world().get_resource::<BrightnessFeed>().is_some());
        assert!(app.world().resource::<StatusBoard>().lines().is_empty());
        let world = app.world_mut();
        assert_eq!(world.query::<&BrightnessScaled>().iter(world).count(), 1);
        // sphere plus friends
        assert_eq!(world.query::<&EulerSpin>().iter(world).count(), 6);
    }

    #[test]
    fn octahedron_has_eight_faces() {
        let mesh = octahedron(0.2);
        assert_eq!(mesh.count_vertices(), 24);
    }
}
