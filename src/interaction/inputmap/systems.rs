//! Systems for input action evaluation.
use super::types::*;
use bevy::prelude::*;

fn token_active(
    token: &RawBindingToken,
    keyboard: &ButtonInput<KeyCode>,
    mouse_buttons: Option<&ButtonInput<MouseButton>>,
) -> bool {
    match token {
        RawBindingToken::Key(k) => keyboard.pressed(*k),
        RawBindingToken::MouseBtn(b) => mouse_buttons.is_some_and(|m| m.pressed(*b)),
    }
}

/// Fold raw button state into per-action pressed / just_pressed / just_released.
pub fn system_evaluate_bindings(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Option<Res<ButtonInput<MouseButton>>>,
    mut input_map: ResMut<InputMap>,
) {
    let dt = time.delta_secs();
    let map = &mut *input_map;
    map.frame_counter += 1;
    if map.bindings_runtime.len() < map.bindings.len() {
        map.bindings_runtime
            .resize(map.bindings.len(), BindingRuntime::default());
    }
    let was_pressed: Vec<bool> = map.states.iter().map(|s| s.pressed).collect();
    for st in &mut map.states {
        st.clear_transitions();
        st.pressed = false;
    }
    for binding in &map.bindings {
        let all_active = binding
            .tokens
            .iter()
            .all(|t| token_active(t, &keyboard, mouse_buttons.as_deref()));
        let rt = &mut map.bindings_runtime[binding.id as usize];
        if all_active {
            if rt.active {
                rt.hold_elapsed += dt;
            } else {
                rt.active = true;
                rt.hold_elapsed = 0.0;
            }
        } else {
            rt.active = false;
            rt.hold_elapsed = 0.0;
        }
        rt.fired = rt.active && rt.hold_elapsed >= binding.hold_secs;
        if rt.fired {
            if let Some(st) = map.states.get_mut(binding.action.0 as usize) {
                st.pressed = true;
            }
        }
    }
    for (st, was) in map.states.iter_mut().zip(was_pressed) {
        st.just_pressed = st.pressed && !was;
        st.just_released = !st.pressed && was;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::inputmap::parse::parse_input_toml;

    fn app_with(raw: &str) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(ButtonInput::<KeyCode>::default());
        app.insert_resource(ButtonInput::<MouseButton>::default());
        app.insert_resource(parse_input_toml(raw, false).input_map);
        app.add_systems(Update, system_evaluate_bindings);
        app
    }

    #[test]
    fn press_produces_single_just_pressed_frame() {
        let mut app = app_with(
            r#"
            [actions]
            Trigger = {}
            [bindings]
            Trigger = ["Key:Space"]
        "#,
        );
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Space);
        app.update();
        assert!(app.world().resource::<InputMap>().just_pressed("Trigger"));
        app.update();
        let map = app.world().resource::<InputMap>();
        assert!(map.pressed("Trigger"));
        assert!(!map.just_pressed("Trigger"));
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .release(KeyCode::Space);
        app.update();
        assert!(app.world().resource::<InputMap>().just_released("Trigger"));
    }

    #[test]
    fn chord_requires_all_tokens() {
        let mut app = app_with(
            r#"
            [actions]
            Reset = {}
            [bindings]
            Reset = ["Key:ControlLeft + Key:R"]
        "#,
        );
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyR);
        app.update();
        assert!(!app.world().resource::<InputMap>().pressed("Reset"));
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ControlLeft);
        app.update();
        assert!(app.world().resource::<InputMap>().just_pressed("Reset"));
    }
}
