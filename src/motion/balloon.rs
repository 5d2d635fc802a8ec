use bevy::prelude::*;

/// Accumulating "balloon" jump. Presses add velocity (clamped), gravity and
/// air damping act only while above rest; landing clamps to rest.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct BalloonMotion {
    pub rest: f32,
    pub gravity: f32,
    pub impulse: f32,
    pub damping: f32,
    pub max_velocity: f32,
    pub position: f32,
    pub velocity: f32,
}

impl BalloonMotion {
    pub fn new(rest: f32, gravity: f32, impulse: f32, damping: f32, max_velocity: f32) -> Self {
        Self {
            rest,
            gravity,
            impulse,
            damping,
            max_velocity,
            position: rest,
            velocity: 0.0,
        }
    }

    /// Presses are accepted mid-air.
    pub fn trigger(&mut self) {
        self.velocity = (self.velocity + self.impulse).min(self.max_velocity);
    }

    pub fn in_motion(&self) -> bool {
        self.position > self.rest || self.velocity > 0.0
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        self.position += self.velocity;
        if self.position > self.rest {
            self.velocity += self.gravity;
            self.velocity *= self.damping;
        } else {
            self.position = self.rest;
            self.velocity = self.velocity.max(0.0);
        }
    }
}
