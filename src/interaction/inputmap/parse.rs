use super::types::*;
use bevy::prelude::*;
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Default)]
pub struct ParsedInputConfig {
    pub input_map: InputMap,
    pub errors: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ActionDecl {
    description: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct DebugToml {
    bindings: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, serde::Deserialize)]
struct RootToml {
    actions: Option<BTreeMap<String, ActionDecl>>,
    bindings: Option<BTreeMap<String, Vec<String>>>,
    debug: Option<DebugToml>,
}

/// Parse the TOML input map. Problems are collected, never fatal: a bad binding
/// drops only itself.
pub fn parse_input_toml(raw: &str, debug_layer: bool) -> ParsedInputConfig {
    let mut result = ParsedInputConfig::default();
    let root: RootToml = match toml::from_str(raw) {
        Ok(r) => r,
        Err(e) => {
            result.errors.push(format!("Top-level parse: {e}"));
            return result;
        }
    };
    let mut input_map = InputMap::default();
    for (name, decl) in root.actions.unwrap_or_default() {
        if !validate_action_name(&name) {
            result
                .errors
                .push(format!("Invalid action name '{name}': must be PascalCase"));
            continue;
        }
        let id = ActionId(input_map.actions.len() as u16);
        input_map.actions.push(ActionMeta {
            id,
            name: name.clone(),
            description: decl.description.unwrap_or_default(),
        });
        input_map.name_to_id.insert(name, id);
        input_map.states.push(ActionState::default());
    }

    // Normal bindings first, then the debug overlay when allowed.
    let mut all_bindings: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (k, v) in root.bindings.unwrap_or_default() {
        all_bindings.entry(k).or_default().extend(v);
    }
    if debug_layer {
        if let Some(db) = root.debug.and_then(|d| d.bindings) {
            for (k, v) in db {
                all_bindings.entry(k).or_default().extend(v);
            }
        }
    }

    for (action_name, list) in all_bindings {
        let Some(aid) = input_map.name_to_id.get(&action_name).copied() else {
            result
                .errors
                .push(format!("Binding references unknown action '{action_name}'"));
            continue;
        };
        for spec in &list {
            match parse_binding(spec) {
                Ok((mut tokens, hold_secs)) => {
                    tokens.sort_by_key(token_sort_key);
                    let id = input_map.bindings.len() as u32;
                    input_map.bindings.push(Binding {
                        id,
                        action: aid,
                        tokens,
                        hold_secs,
                    });
                }
                Err(err) => result
                    .errors
                    .push(format!("[binding {action_name} '{spec}'] {err}")),
            }
        }
    }
    input_map.bindings_runtime = vec![BindingRuntime::default(); input_map.bindings.len()];
    result.input_map = input_map;
    result
}

fn validate_action_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

fn token_sort_key(t: &RawBindingToken) -> (u8, String) {
    match t {
        RawBindingToken::Key(k) => (0, format!("{k:?}")),
        RawBindingToken::MouseBtn(b) => (1, format!("{b:?}")),
    }
}

/// `Key:ControlLeft + Key:R`, `Mouse:Left`, `hold>0.5:Key:F1`.
pub fn parse_binding(spec: &str) -> Result<(SmallVec<[RawBindingToken; 2]>, f32), String> {
    let mut tokens: SmallVec<[RawBindingToken; 2]> = SmallVec::new();
    let mut hold: f32 = 0.0;
    let mut seen: HashSet<RawBindingToken> = HashSet::new();
    for part in spec.split('+') {
        let mut p = part.trim();
        if p.is_empty() {
            continue;
        }
        if let Some(rest) = p.strip_prefix("hold>") {
            let (secs_str, after) = rest
                .split_once(':')
                .ok_or_else(|| format!("Malformed hold qualifier '{p}': missing ':'"))?;
            hold = secs_str
                .parse::<f32>()
                .map_err(|_| format!("Invalid hold seconds '{secs_str}'"))?;
            p = after;
        }
        let token = parse_token(p)?;
        if !seen.insert(token) {
            return Err(format!("Duplicate token in chord: {token:?}"));
        }
        tokens.push(token);
    }
    if tokens.is_empty() {
        return Err("Empty binding".into());
    }
    Ok((tokens, hold))
}

fn parse_token(s: &str) -> Result<RawBindingToken, String> {
    if let Some(rest) = s.strip_prefix("Key:") {
        return parse_keycode(rest).map(RawBindingToken::Key);
    }
    if let Some(rest) = s.strip_prefix("Mouse:") {
        return match rest {
            "Left" => Ok(RawBindingToken::MouseBtn(MouseButton::Left)),
            "Right" => Ok(RawBindingToken::MouseBtn(MouseButton::Right)),
            "Middle" => Ok(RawBindingToken::MouseBtn(MouseButton::Middle)),
            other => Err(format!("Unknown mouse button '{other}'")),
        };
    }
    Err(format!("Unrecognized token '{s}'"))
}

fn parse_keycode(name: &str) -> Result<KeyCode, String> {
    let kc = match name {
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "ArrowUp" => KeyCode::ArrowUp,
        "Digit1" => KeyCode::Digit1,
        "Digit2" => KeyCode::Digit2,
        "E" | "KeyE" => KeyCode::KeyE,
        "J" | "KeyJ" => KeyCode::KeyJ,
        "R" | "KeyR" => KeyCode::KeyR,
        "W" | "KeyW" => KeyCode::KeyW,
        "ControlLeft" => KeyCode::ControlLeft,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        other => return Err(format!("Unsupported KeyCode '{other}' (extend parser)")),
    };
    Ok(kc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_with_hold() {
        let (tokens, hold) = parse_binding("hold>0.5:Key:F1 + Key:ShiftLeft").unwrap();
        assert_eq!(hold, 0.5);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn duplicate_token_rejected() {
        assert!(parse_binding("Key:Space + Key:Space").is_err());
    }

    #[test]
    fn debug_layer_only_when_enabled() {
        let raw = r#"
            [actions]
            Trigger = { description = "jump" }
            [bindings]
            Trigger = ["Key:Space"]
            [debug.bindings]
            Trigger = ["Key:J"]
        "#;
        assert_eq!(parse_input_toml(raw, false).input_map.bindings.len(), 1);
        assert_eq!(parse_input_toml(raw, true).input_map.bindings.len(), 2);
    }
}
