#[cfg(feature = "debug")]
use bevy::prelude::*;
#[cfg(feature = "debug")]
use super::state::{DebugState, DebugStats};
#[cfg(feature = "debug")]
use crate::scenes::ActiveScene;

#[cfg(feature = "debug")]
pub fn debug_logging_system(
    time: Res<Time>,
    scene: Option<Res<ActiveScene>>,
    mut state: ResMut<DebugState>,
    stats: Res<DebugStats>,
) {
    state.time_accum += time.delta_secs();
    if state.time_accum < state.log_interval {
        return;
    }
    state.time_accum = 0.0;
    let name = scene.map_or("?", |s| s.0.name());
    info!(
        target: "debug",
        "{name} frame={} t={:.1}s fps={:.1} ft={:.2}ms meshes={} pending={}",
        state.frame_counter,
        time.elapsed_secs(),
        stats.fps,
        stats.frame_time_ms,
        stats.mesh_count,
        stats.pending_loads
    );
}
