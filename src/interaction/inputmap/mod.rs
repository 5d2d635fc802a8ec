pub mod parse;
pub mod plugin;
pub mod systems;
pub mod types;
#[cfg(feature = "debug")]
pub mod hot_reload;

pub use plugin::{InputActionUpdateSet, InputActionsPlugin};
pub use types::InputMap;

/// Action names the scenes read.
pub mod actions {
    pub const TRIGGER: &str = "Trigger";
    pub const EXPLODE: &str = "Explode";
    pub const TOGGLE_STATS: &str = "ToggleStats";
}
