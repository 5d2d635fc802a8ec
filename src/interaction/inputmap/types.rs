use bevy::prelude::*;
use smallvec::SmallVec;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(pub u16); // internal index (array position)

#[derive(Debug, Clone)]
pub struct ActionMeta {
    pub id: ActionId,
    pub name: String,
    pub description: String,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct ActionState {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}
impl ActionState {
    pub fn clear_transitions(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawBindingToken {
    Key(KeyCode),
    MouseBtn(MouseButton),
}

/// All tokens must be held; `hold_secs > 0` delays activation until held that long.
#[derive(Debug, Clone)]
pub struct Binding {
    pub id: u32,
    pub action: ActionId,
    pub tokens: SmallVec<[RawBindingToken; 2]>,
    pub hold_secs: f32,
}

#[derive(Debug, Default, Clone)]
pub struct BindingRuntime {
    pub active: bool,
    pub hold_elapsed: f32,
    pub fired: bool,
}

#[derive(Resource, Debug, Default)]
pub struct InputMap {
    pub actions: Vec<ActionMeta>,
    pub name_to_id: HashMap<String, ActionId>,
    pub bindings: Vec<Binding>,
    pub bindings_runtime: Vec<BindingRuntime>,
    pub states: Vec<ActionState>,
    pub frame_counter: u64,
}

impl InputMap {
    pub fn state(&self, name: &str) -> Option<&ActionState> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.states.get(id.0 as usize))
    }
    pub fn pressed(&self, name: &str) -> bool {
        self.state(name).is_some_and(|s| s.pressed)
    }
    pub fn just_pressed(&self, name: &str) -> bool {
        self.state(name).is_some_and(|s| s.just_pressed)
    }
    pub fn just_released(&self, name: &str) -> bool {
        self.state(name).is_some_and(|s| s.just_released)
    }
    pub fn bindings_for(&self, name: &str) -> impl Iterator<Item = &Binding> {
        let id = self.name_to_id.get(name).copied();
        self.bindings.iter().filter(move |b| Some(b.action) == id)
    }
}
