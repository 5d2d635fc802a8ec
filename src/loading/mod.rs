//! Asynchronous asset acquisition. Loads are requested through [`PendingLoads`];
//! once resolved they become [`SceneMutation`]s that scenes drain on the frame loop.
pub mod pending;
pub mod queue;
pub mod status;

pub use pending::{classify, poll_pending_loads, LoadOutcome, PendingLoads};
pub use queue::{AssetRole, SceneMutation, SceneMutationQueue};
pub use status::{StatusBoard, surface_load_failures};

use bevy::prelude::*;

use crate::core::system::system_order::{PresentationSet, SceneMotionSet};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct AssetResolveSet;

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingLoads>()
            .init_resource::<SceneMutationQueue>()
            .init_resource::<StatusBoard>()
            .configure_sets(Update, AssetResolveSet.before(SceneMotionSet))
            .add_systems(
                Update,
                (poll_pending_loads, surface_load_failures)
                    .chain()
                    .in_set(AssetResolveSet),
            )
            .add_systems(Startup, status::spawn_status_text)
            .add_systems(Update, status::update_status_text.in_set(PresentationSet));
    }
}
