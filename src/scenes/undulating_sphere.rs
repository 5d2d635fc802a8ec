//! Sphere whose vertices ripple along their own direction, with a vertical color
//! gradient and a square viewport.
use bevy::prelude::*;
use bevy::render::camera::Viewport;
use bevy::render::mesh::VertexAttributeValues;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::core::components::EulerSpin;
use crate::core::config::{hex_color, ArtworkConfig, UndulatingConfig};
use crate::core::system::system_order::SceneMotionSet;

use super::common::{set_ambient, spawn_camera, spawn_directional};

/// Rest positions captured at spawn; deformation always starts from these.
#[derive(Component, Debug, Clone)]
pub struct Undulating {
    pub base: Vec<[f32; 3]>,
    pub amplitude: f32,
    pub frequency: f32,
}

#[derive(Component)]
pub struct SquareViewport;

/// Per-axis ripple: each coordinate is pushed along the unit direction's matching
/// component by `sin(coord * frequency + t) * amplitude`.
pub fn undulate(base: &[[f32; 3]], t: f32, amplitude: f32, frequency: f32, out: &mut Vec<[f32; 3]>) {
    out.clear();
    out.extend(base.iter().map(|p| {
        let v = Vec3::from_array(*p);
        let len = v.length();
        if len <= f32::EPSILON {
            return *p;
        }
        let dir = v / len;
        let wave = Vec3::new(
            (v.x * frequency + t).sin(),
            (v.y * frequency + t).sin(),
            (v.z * frequency + t).sin(),
        ) * amplitude;
        (v + dir * wave).to_array()
    }));
}

/// Linear blend from `bottom` (y = -1) to `top` (y = +1).
pub fn gradient_color(y: f32, bottom: [f32; 3], top: [f32; 3]) -> [f32; 4] {
    let f = ((y + 1.0) * 0.5).clamp(0.0, 1.0);
    let c = Vec3::from_array(bottom).lerp(Vec3::from_array(top), f);
    [c.x, c.y, c.z, 1.0]
}

/// Largest square anchored at the top-left corner of a `width x height` surface.
pub fn square_viewport(width: u32, height: u32) -> (UVec2, UVec2) {
    let side = width.min(height).max(1);
    (UVec2::ZERO, UVec2::splat(side))
}

pub struct UndulatingSpherePlugin;

impl Plugin for UndulatingSpherePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup)
            .add_systems(Update, undulate_system.in_set(SceneMotionSet))
            .add_systems(Update, fit_square_viewport);
    }
}

fn build_mesh(cfg: &UndulatingConfig) -> (Mesh, Vec<[f32; 3]>) {
    let segments = cfg.segments.max(3);
    let mut mesh = Sphere::new(1.0).mesh().uv(segments, segments);
    let base: Vec<[f32; 3]> = match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(p)) => p.clone(),
        _ => Vec::new(),
    };
    let colors: Vec<[f32; 4]> = base
        .iter()
        .map(|p| gradient_color(p[1], cfg.color_bottom, cfg.color_top))
        .collect();
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    (mesh, base)
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<ArtworkConfig>,
) {
    let u = &cfg.undulating;
    commands.insert_resource(ClearColor(hex_color(u.background)));
    let camera = spawn_camera(&mut commands, Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 45.0, None);
    if u.square_viewport {
        commands.entity(camera).insert(SquareViewport);
    }
    set_ambient(&mut commands, Color::WHITE, 300.0);
    spawn_directional(&mut commands, Color::WHITE, 8_000.0, Vec3::new(0.0, 3.0, 3.0), false);

    let (mesh, base) = build_mesh(u);
    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 0.35,
            reflectance: 0.6,
            ..default()
        })),
        Transform::default(),
        EulerSpin::new(Vec3::new(0.0, u.spin, 0.0)),
        Undulating {
            base,
            amplitude: u.amplitude,
            frequency: u.frequency,
        },
    ));
}

fn undulate_system(
    time: Res<Time>,
    mut meshes: ResMut<Assets<Mesh>>,
    q: Query<(&Undulating, &Mesh3d)>,
    mut scratch: Local<Vec<[f32; 3]>>,
) {
    let t = time.elapsed_secs();
    for (u, mesh3d) in &q {
        let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
            continue;
        };
        undulate(&u.base, t, u.amplitude, u.frequency, &mut scratch);
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, scratch.clone());
        mesh.compute_smooth_normals();
    }
}

fn fit_square_viewport(
    mut resized: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<&mut Camera, With<SquareViewport>>,
    mut initialized: Local<bool>,
) {
    let changed = resized.read().count() > 0;
    if !changed && *initialized {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let (pos, size) = square_viewport(window.physical_width(), window.physical_height());
    for mut camera in &mut cameras {
        camera.viewport = Some(Viewport {
            physical_position: pos,
            physical_size: size,
            ..default()
        });
    }
    *initialized = true;
}
