use bevy::prelude::*;

/// Root of a rigid group whose children keep fixed local positions (the spiked sphere).
#[derive(Component)]
pub struct RotatingGroup;

/// The player-controlled small sphere.
#[derive(Component)]
pub struct Player;

/// Collision radius of a spike, mirrored from its obstacle record.
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct SpikeRadius(pub f32);

/// Accumulated Euler angles (XYZ order) advanced by a constant per-frame rate.
/// Rotation is rebuilt from the angles, so increments compose like an Euler accumulator.
#[derive(Component, Debug, Copy, Clone, Default, PartialEq)]
pub struct EulerSpin {
    pub angles: Vec3,
    pub rate: Vec3,
}
impl EulerSpin {
    pub fn new(rate: Vec3) -> Self {
        Self {
            angles: Vec3::ZERO,
            rate,
        }
    }
    pub fn starting_at(angles: Vec3, rate: Vec3) -> Self {
        Self { angles, rate }
    }
    pub fn advance(&mut self) -> Quat {
        self.angles += self.rate;
        self.rotation()
    }
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.angles.x, self.angles.y, self.angles.z)
    }
}

/// Marker for the scene title text.
#[derive(Component)]
pub struct TitleText;

/// Marker for the text node owned by the status board.
#[derive(Component)]
pub struct StatusText;
