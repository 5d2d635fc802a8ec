//! Renderer-independent per-frame state machines: proximity detection, hit
//! reactions and the two scalar jump integrators.
pub mod balloon;
pub mod jump;
pub mod proximity;
pub mod reaction;

pub use balloon::BalloonMotion;
pub use jump::{JumpMotion, JumpPhase};
pub use proximity::{first_hit, first_hit_resolved, Obstacle, ObstacleField, ProximityParams};
pub use reaction::{ease_toward, FlashTimer, HitReaction};
