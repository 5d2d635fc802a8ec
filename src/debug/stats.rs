#[cfg(feature = "debug")]
use super::state::{DebugState, DebugStats};
#[cfg(feature = "debug")]
use crate::loading::PendingLoads;
#[cfg(feature = "debug")]
use bevy::prelude::*;

/// Exponential moving average with weight 0.1 on the newest sample; the first
/// sample seeds the average.
#[cfg(feature = "debug")]
pub fn smooth(prev: f32, sample: f32) -> f32 {
    if prev == 0.0 {
        sample
    } else {
        prev * 0.9 + sample * 0.1
    }
}

#[cfg(feature = "debug")]
pub fn debug_stats_collect_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    mut stats: ResMut<DebugStats>,
    q_meshes: Query<(), With<Mesh3d>>,
    pending: Option<Res<PendingLoads>>,
) {
    state.frame_counter += 1;
    let dt = time.delta_secs().max(1e-6);
    stats.fps = smooth(stats.fps, 1.0 / dt);
    stats.frame_time_ms = smooth(stats.frame_time_ms, dt * 1000.0);
    stats.mesh_count = q_meshes.iter().count();
    stats.pending_loads = pending.map(|p| p.len()).unwrap_or(0);
}
