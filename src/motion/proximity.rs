//! Frame-coherent brute-force proximity test against a rigid, rotating set of obstacles.
//!
//! Obstacles keep their local-frame positions forever; each frame only the player
//! is moved into the group's frame (one inverse transform) and the list is scanned
//! in order until the first hit.
use bevy::math::Affine3A;
use bevy::prelude::*;
use rand::Rng;

use crate::core::config::SpawnRange;

/// Immutable obstacle record in the owning group's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub position: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityParams {
    pub threshold: f32,
    pub radius_factor: f32,
}

impl ProximityParams {
    pub fn new(threshold: f32, radius_factor: f32) -> Self {
        Self {
            threshold,
            radius_factor,
        }
    }

    /// Distance below which an obstacle of `radius` counts as touched.
    #[inline]
    pub fn reach(&self, radius: f32) -> f32 {
        self.threshold + radius * self.radius_factor
    }
}

/// Index of the first obstacle (in list order) strictly within reach of `point`.
pub fn first_hit(point: Vec3, obstacles: &[Obstacle], params: ProximityParams) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| point.distance(o.position) < params.reach(o.radius))
}

/// Same test over positions resolved elsewhere (e.g. per-obstacle world transforms).
pub fn first_hit_resolved<I>(point: Vec3, resolved: I, params: ProximityParams) -> Option<usize>
where
    I: IntoIterator<Item = (Vec3, f32)>,
{
    resolved
        .into_iter()
        .position(|(pos, radius)| point.distance(pos) < params.reach(radius))
}

/// Obstacle list plus the detection parameters, attached to the rotating group.
#[derive(Component, Debug, Clone)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    pub params: ProximityParams,
}

impl ObstacleField {
    pub fn new(obstacles: Vec<Obstacle>, params: ProximityParams) -> Self {
        Self { obstacles, params }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Move `world_point` into the group frame once, then scan.
    pub fn detect(&self, world_point: Vec3, group: &Affine3A) -> Option<usize> {
        if self.obstacles.is_empty() {
            return None;
        }
        let local = group.inverse().transform_point3(world_point);
        first_hit(local, &self.obstacles, self.params)
    }
}

/// Placement of one spike on the sphere surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeLayout {
    pub direction: Vec3,
    pub position: Vec3,
    pub radius: f32,
    pub height: f32,
}

impl SpikeLayout {
    pub fn obstacle(&self) -> Obstacle {
        Obstacle {
            position: self.position,
            radius: self.radius,
        }
    }

    /// Orientation turning +Y (cone axis) onto the outward direction.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_arc(Vec3::Y, self.direction)
    }
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_direction(rng: &mut impl Rng) -> Vec3 {
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

/// Scatter `count` spikes over a sphere of `sphere_radius`.
pub fn scatter_spikes(
    rng: &mut impl Rng,
    count: usize,
    sphere_radius: f32,
    radius: SpawnRange<f32>,
    height: SpawnRange<f32>,
) -> Vec<SpikeLayout> {
    (0..count)
        .map(|_| {
            let direction = random_unit_direction(rng);
            SpikeLayout {
                direction,
                position: direction * sphere_radius,
                radius: radius.sample(rng),
                height: height.sample(rng),
            }
        })
        .collect()
}
