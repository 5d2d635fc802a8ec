use std::path::PathBuf;

use bevy::prelude::*;

use crate::core::system::system_order::{DetectionSet, PresentationSet, SceneMotionSet};
use crate::debug::DebugPlugin;
#[cfg(feature = "debug")]
use crate::interaction::inputmap::hot_reload::InputMapHotReloadPlugin;
use crate::interaction::inputmap::plugin::InputActionsPlugin;
use crate::interaction::orbit::OrbitCameraPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::{ConfigHotReloadPlugin, ConfigReloadSettings};
use crate::loading::LoadingPlugin;
use crate::scenes::common::SceneCommonPlugin;
use crate::scenes::{ActiveScene, SceneKind};

/// Shared plumbing plus one scene. `ArtworkConfig` must already be inserted.
pub struct ArtworkPlugin {
    pub scene: SceneKind,
    /// Layered config files watched for hot reload; empty keeps the defaults.
    pub config_paths: Vec<PathBuf>,
}

impl ArtworkPlugin {
    pub fn new(scene: SceneKind) -> Self {
        Self {
            scene,
            config_paths: Vec::new(),
        }
    }

    pub fn with_config_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }
}

impl Plugin for ArtworkPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ActiveScene(self.scene));
        if !self.config_paths.is_empty() {
            app.insert_resource(ConfigReloadSettings {
                paths: self.config_paths.clone(),
                ..default()
            });
        }
        app.configure_sets(
            Update,
            (
                SceneMotionSet,
                DetectionSet.after(SceneMotionSet),
                PresentationSet.after(DetectionSet),
            ),
        )
        .add_plugins((
            InputActionsPlugin,
            LoadingPlugin,
            SceneCommonPlugin,
            OrbitCameraPlugin,
            DebugPlugin,
            ConfigHotReloadPlugin,
            AutoClosePlugin,
            #[cfg(feature = "debug")]
            InputMapHotReloadPlugin,
        ));
        self.scene.add_to(app);
        info!(target: "app", "scene '{}' installed", self.scene);
    }
}
