#[cfg(feature = "debug")]
use super::state::DebugState;
#[cfg(feature = "debug")]
use crate::interaction::inputmap::{actions, InputMap};
#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
pub fn debug_key_input_system(input_map: Option<Res<InputMap>>, mut state: ResMut<DebugState>) {
    let Some(input_map) = input_map else {
        return;
    };
    if input_map.just_pressed(actions::TOGGLE_STATS) {
        state.overlay_visible = !state.overlay_visible;
        info!(
            target: "debug",
            "stats overlay {} frame={}",
            if state.overlay_visible { "shown" } else { "hidden" },
            state.frame_counter
        );
    }
}
