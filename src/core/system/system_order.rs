//! Central system ordering labels to make the per-frame sequence explicit.
//! Stages (high-level, all in `Update`):
//! 1. SceneMotionSet (integrators, group rotation, spins, forces before Rapier)
//! 2. DetectionSet (proximity tests against this frame's transforms)
//! 3. PresentationSet (colors, eased scales, HUD text)
//! 4. Rendering (implicit)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SceneMotionSet; // advances per-frame animation state

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DetectionSet; // reads positions written by SceneMotionSet

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PresentationSet; // copies logical state onto materials / transforms / text
