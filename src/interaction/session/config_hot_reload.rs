//! Native-only config hot reload. Scenes copy their settings into components
//! at `Startup`, so a reload only resizes and retitles the window. The new
//! `ArtworkConfig` is stored for the few systems that read it each frame
//! (the helix time scale); every other change needs a relaunch.
use bevy::prelude::*;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::app::launch::window_title;
use crate::core::config::ArtworkConfig;
use crate::scenes::ActiveScene;

/// Files watched for changes, in layering order.
#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}
impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("assets/config/artwork.ron"),
                PathBuf::from("assets/config/artwork.local.ron"),
            ],
            interval_secs: 0.5,
        }
    }
}

/// Last seen modification time per file. A file that disappears is forgotten,
/// so recreating it counts as a change.
#[derive(Debug, Default)]
pub struct ConfigWatcher {
    seen: HashMap<PathBuf, SystemTime>,
    primed: bool,
}

impl ConfigWatcher {
    /// True when any watched file is new or newer than last time. The first
    /// call only records the startup state.
    pub fn poll(&mut self, paths: &[PathBuf]) -> bool {
        let mut changed = false;
        for path in paths {
            match std::fs::metadata(path).and_then(|m| m.modified()) {
                Ok(stamp) => {
                    if self.seen.insert(path.clone(), stamp) != Some(stamp) {
                        changed = true;
                    }
                }
                Err(_) => changed |= self.seen.remove(path).is_some(),
            }
        }
        if !self.primed {
            self.primed = true;
            return false;
        }
        changed
    }
}

#[derive(Resource)]
struct ConfigReloadState {
    watcher: ConfigWatcher,
    timer: Timer,
}

pub struct ConfigHotReloadPlugin;
impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>();
            let interval = app
                .world()
                .resource::<ConfigReloadSettings>()
                .interval_secs
                .max(0.05);
            app.insert_resource(ConfigReloadState {
                watcher: ConfigWatcher::default(),
                timer: Timer::from_seconds(interval, TimerMode::Repeating),
            })
            .add_systems(Update, poll_and_reload_config);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = app;
    }
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    scene: Option<Res<ActiveScene>>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg: ResMut<ArtworkConfig>,
    mut windows: Query<&mut Window>,
) {
    let state = &mut *state;
    // Always poll on the very first frame so the watcher is primed.
    if state.watcher.primed && !state.timer.tick(time.delta()).just_finished() {
        return;
    }
    if !state.watcher.poll(&settings.paths) {
        return;
    }
    let (reloaded, used, errors) = ArtworkConfig::load_layered(settings.paths.iter());
    for e in &errors {
        warn!(target: "config", "reload: {e}");
    }
    if used.is_empty() {
        // Keep the running config rather than falling back to defaults.
        return;
    }
    for w in reloaded.validate() {
        warn!(target: "config", "reload warning: {w}");
    }
    if *cfg == reloaded {
        debug!(target: "config", "reload: no effective change");
        return;
    }
    if let Ok(mut window) = windows.single_mut() {
        let w = &reloaded.window;
        if window.width() != w.width || window.height() != w.height {
            window.resolution.set(w.width, w.height);
        }
        if let Some(scene) = scene.as_deref() {
            let title = window_title(&w.title, scene.0);
            if window.title != title {
                window.title = title;
            }
        }
    }
    info!(target: "config", "reload applied from {}", used.join(", "));
    *cfg = reloaded;
}
