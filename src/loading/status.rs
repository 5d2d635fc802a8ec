use bevy::prelude::*;

use super::queue::{SceneMutation, SceneMutationQueue};
use crate::core::components::StatusText;

const MAX_STATUS_LINES: usize = 8;

/// User-visible status: sticky messages (load failures etc.) plus a per-frame HUD line.
#[derive(Resource, Default, Debug, Clone)]
pub struct StatusBoard {
    lines: Vec<String>,
    hud: String,
    dirty: bool,
}

impl StatusBoard {
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        if self.lines.len() > MAX_STATUS_LINES {
            self.lines.remove(0);
        }
        self.dirty = true;
    }

    pub fn set_hud(&mut self, hud: impl Into<String>) {
        let hud = hud.into();
        if hud != self.hud {
            self.hud = hud;
            self.dirty = true;
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn hud(&self) -> &str {
        &self.hud
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.hud.is_empty() {
            out.push_str(&self.hud);
        }
        for l in &self.lines {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(l);
        }
        out
    }
}

/// Log every failed load and show it; the rest of the scene keeps running.
pub fn surface_load_failures(mut queue: ResMut<SceneMutationQueue>, mut board: ResMut<StatusBoard>) {
    for m in queue.take_failures() {
        if let SceneMutation::Failed { role, path, reason } = m {
            error!(target: "assets", "failed to load {path} ({role:?}): {reason}");
            board.push(format!("Failed to load {path}: {reason}"));
        }
    }
}

pub fn spawn_status_text(mut commands: Commands) {
    commands.spawn((
        Text::new(String::new()),
        TextFont {
            font_size: 16.0,
            ..Default::default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(8.0),
            left: Val::Px(10.0),
            ..Default::default()
        },
        StatusText,
    ));
}

pub fn update_status_text(mut board: ResMut<StatusBoard>, mut q: Query<&mut Text, With<StatusText>>) {
    if !board.dirty {
        return;
    }
    let rendered = board.render();
    for mut text in &mut q {
        text.0.clone_from(&rendered);
    }
    board.dirty = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::queue::AssetRole;

    #[test]
    fn failures_reach_board_and_leave_queue() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<SceneMutationQueue>();
        app.init_resource::<StatusBoard>();
        app.add_systems(Update, surface_load_failures);
        app.world_mut().resource_mut::<SceneMutationQueue>().push(SceneMutation::Failed {
            role: AssetRole::Model,
            path: "models/missing.glb".into(),
            reason: "not found".into(),
        });
        app.update();
        assert!(app.world().resource::<SceneMutationQueue>().is_empty());
        let board = app.world().resource::<StatusBoard>();
        assert_eq!(board.lines().len(), 1);
        assert!(board.lines()[0].contains("models/missing.glb"));
    }

    #[test]
    fn board_keeps_most_recent_lines() {
        let mut b = StatusBoard::default();
        for i in 0..(MAX_STATUS_LINES + 3) {
            b.push(format!("line {i}"));
        }
        assert_eq!(b.lines().len(), MAX_STATUS_LINES);
        assert_eq!(b.lines()[0], "line 3");
    }
}
