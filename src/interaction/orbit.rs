//! Drag-to-orbit / wheel-to-zoom camera with velocity damping.
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

const PITCH_EPS: f32 = 0.01;

#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub yaw_velocity: f32,
    pub pitch_velocity: f32,
    /// Fraction of angular velocity removed per frame.
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Keep the camera at or above the target's horizon.
    pub upper_hemisphere_only: bool,
}

impl OrbitCamera {
    /// Derive yaw / pitch / radius from an initial eye position.
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length().max(1e-3);
        let pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self {
            target,
            radius,
            yaw,
            pitch,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            damping: 0.1,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            min_radius: 0.5,
            max_radius: 100.0,
            upper_hemisphere_only: false,
        }
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(0.0, 1.0);
        self
    }

    pub fn upper_hemisphere(mut self, on: bool) -> Self {
        self.upper_hemisphere_only = on;
        self.pitch = self.clamp_pitch(self.pitch);
        self
    }

    fn clamp_pitch(&self, pitch: f32) -> f32 {
        let max = std::f32::consts::FRAC_PI_2 - PITCH_EPS;
        let min = if self.upper_hemisphere_only { 0.0 } else { -max };
        pitch.clamp(min, max)
    }

    /// Feed a pointer drag (pixels) and wheel delta (lines).
    pub fn push_input(&mut self, drag: Vec2, wheel: f32) {
        self.yaw_velocity -= drag.x * self.rotate_speed;
        self.pitch_velocity += drag.y * self.rotate_speed;
        if wheel != 0.0 {
            self.radius = (self.radius * (1.0 - wheel * self.zoom_speed))
                .clamp(self.min_radius, self.max_radius);
        }
    }

    /// Integrate one frame of damped motion.
    pub fn advance(&mut self) {
        self.yaw += self.yaw_velocity;
        self.pitch = self.clamp_pitch(self.pitch + self.pitch_velocity);
        let keep = 1.0 - self.damping;
        self.yaw_velocity *= keep;
        self.pitch_velocity *= keep;
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(sy * cp, sp, cy * cp) * self.radius
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }
}

pub fn orbit_camera_system(
    mouse_buttons: Option<Res<ButtonInput<MouseButton>>>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    mut q: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let dragging = mouse_buttons.is_some_and(|m| m.pressed(MouseButton::Left));
    let mut drag = Vec2::ZERO;
    for ev in motion.read() {
        if dragging {
            drag += ev.delta;
        }
    }
    let mut scroll = 0.0f32;
    for ev in wheel.read() {
        scroll += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.01,
        };
    }
    for (mut orbit, mut tf) in &mut q {
        orbit.push_input(drag, scroll);
        orbit.advance();
        *tf = orbit.transform();
    }
}

pub struct OrbitCameraPlugin;
impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MouseMotion>()
            .add_event::<MouseWheel>()
            .add_systems(Update, orbit_camera_system);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looking_from_round_trips_eye() {
        let eye = Vec3::new(8.0, 3.0, 8.0);
        let orbit = OrbitCamera::looking_from(eye, Vec3::ZERO);
        assert!(orbit.eye().distance(eye) < 1e-4);
    }

    #[test]
    fn velocity_decays_with_damping() {
        let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO).with_damping(0.5);
        orbit.push_input(Vec2::new(-100.0, 0.0), 0.0);
        let v0 = orbit.yaw_velocity;
        orbit.advance();
        assert!((orbit.yaw_velocity - v0 * 0.5).abs() < 1e-6);
    }

    #[test]
    fn upper_hemisphere_blocks_going_below_horizon() {
        let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO).upper_hemisphere(true);
        orbit.push_input(Vec2::new(0.0, -100_000.0), 0.0);
        for _ in 0..10 {
            orbit.advance();
        }
        assert!(orbit.pitch >= 0.0);
        assert!(orbit.eye().y >= -1e-5);
    }
}
