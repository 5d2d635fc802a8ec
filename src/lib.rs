pub mod app;
pub mod core;
pub mod debug;
pub mod interaction;
pub mod loading;
pub mod motion;
pub mod scenes;
pub mod sensing;

// Curated re-exports
pub use app::{ArtworkPlugin, build_app, run_scene};
pub use crate::core::config::{ArtworkConfig, WindowConfig};
pub use motion::proximity::{first_hit, Obstacle, ProximityParams};
pub use motion::{BalloonMotion, JumpMotion};
pub use scenes::SceneKind;
