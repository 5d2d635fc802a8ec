//! Plumbing shared by every scene: camera/fog/light helpers, spin, resize logging.
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::core::components::EulerSpin;
use crate::core::config::{hex_color, FogConfig};
use crate::core::system::system_order::SceneMotionSet;

pub fn vec3(a: [f32; 3]) -> Vec3 {
    Vec3::from_array(a)
}

pub fn linear_fog(cfg: &FogConfig) -> DistanceFog {
    DistanceFog {
        color: hex_color(cfg.color),
        falloff: FogFalloff::Linear {
            start: cfg.start,
            end: cfg.end,
        },
        ..default()
    }
}

/// Perspective camera at `eye` looking at `target`. Bevy keeps the aspect ratio
/// in sync with the window on resize.
pub fn spawn_camera(
    commands: &mut Commands,
    eye: Vec3,
    target: Vec3,
    fov_degrees: f32,
    fog: Option<&FogConfig>,
) -> Entity {
    let mut e = commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: fov_degrees.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(eye).looking_at(target, Vec3::Y),
    ));
    if let Some(f) = fog {
        e.insert(linear_fog(f));
    }
    e.id()
}

pub fn spawn_directional(commands: &mut Commands, color: Color, illuminance: f32, from: Vec3, shadows: bool) {
    commands.spawn((
        DirectionalLight {
            color,
            illuminance,
            shadows_enabled: shadows,
            ..default()
        },
        Transform::from_translation(from).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

pub fn set_ambient(commands: &mut Commands, color: Color, brightness: f32) {
    commands.insert_resource(AmbientLight {
        color,
        brightness,
        ..default()
    });
}

pub fn apply_euler_spin(mut q: Query<(&mut EulerSpin, &mut Transform)>) {
    for (mut spin, mut tf) in &mut q {
        tf.rotation = spin.advance();
    }
}

fn log_window_resize(mut events: EventReader<WindowResized>) {
    for ev in events.read() {
        debug!(target: "window", "resized to {}x{}", ev.width, ev.height);
    }
}

pub struct SceneCommonPlugin;
impl Plugin for SceneCommonPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WindowResized>()
            .add_systems(Update, apply_euler_spin.in_set(SceneMotionSet))
            .add_systems(Update, log_window_resize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler_spin_accumulates_angles() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(Update, apply_euler_spin);
        let rate = Vec3::new(0.003, 0.0015, 0.001);
        let e = app
            .world_mut()
            .spawn((EulerSpin::new(rate), Transform::default()))
            .id();
        for _ in 0..100 {
            app.update();
        }
        let spin = app.world().get::<EulerSpin>(e).unwrap();
        assert!((spin.angles - rate * 100.0).length() < 1e-5);
        let tf = app.world().get::<Transform>(e).unwrap();
        let expected = Quat::from_euler(EulerRot::XYZ, 0.3, 0.15, 0.1);
        assert!(tf.rotation.angle_between(expected) < 1e-4);
    }
}
