#[cfg(feature = "debug")]
use bevy::prelude::*;
#[cfg(feature = "debug")]
use super::state::{DebugState, DebugStats};
#[cfg(feature = "debug")]
use crate::interaction::inputmap::InputMap;

#[cfg(feature = "debug")]
#[derive(Component)]
pub(crate) struct DebugOverlayText;

#[cfg(feature = "debug")]
pub fn debug_overlay_spawn(mut commands: Commands) {
    commands.spawn((
        Text::new(String::new()),
        TextFont {
            font_size: 14.0,
            ..Default::default()
        },
        TextColor(Color::WHITE),
        bevy::ui::Node {
            position_type: bevy::ui::PositionType::Absolute,
            top: Val::Px(4.0),
            left: Val::Px(6.0),
            ..Default::default()
        },
        DebugOverlayText,
    ));
}

/// One-line stats summary followed by the names of held actions.
#[cfg(feature = "debug")]
pub fn overlay_line(stats: &DebugStats, input_map: Option<&InputMap>) -> String {
    let mut base = format!(
        "FPS {:.1} ft {:.1}ms meshes {} pending {}",
        stats.fps, stats.frame_time_ms, stats.mesh_count, stats.pending_loads
    );
    if let Some(im) = input_map {
        let held: Vec<&str> = im
            .actions
            .iter()
            .filter(|meta| im.states.get(meta.id.0 as usize).is_some_and(|s| s.pressed))
            .map(|meta| meta.name.as_str())
            .collect();
        if !held.is_empty() {
            base.push_str("\nINPUT: ");
            base.push_str(&held.join(" "));
        }
    }
    base
}

#[cfg(feature = "debug")]
pub(crate) fn debug_overlay_update(
    state: Res<DebugState>,
    stats: Res<DebugStats>,
    input_map: Option<Res<InputMap>>,
    mut q_text: Query<&mut Text, With<DebugOverlayText>>,
) {
    if let Ok(mut text) = q_text.single_mut() {
        if !state.overlay_visible {
            if !text.0.is_empty() {
                text.0.clear();
            }
            return;
        }
        text.0 = overlay_line(&stats, input_map.as_deref());
    }
}
