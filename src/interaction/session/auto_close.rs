use crate::core::config::ArtworkConfig;
use bevy::prelude::*;

/// Countdown to a clean exit, present only when `window.autoClose` is positive.
#[derive(Resource, Deref, DerefMut)]
pub struct AutoCloseTimer(Timer);

/// Exits after `window.autoClose` seconds (smoke runs, screenshots).
pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, arm_auto_close)
            .add_systems(Update, exit_when_elapsed.run_if(resource_exists::<AutoCloseTimer>));
    }
}

fn arm_auto_close(mut commands: Commands, cfg: Res<ArtworkConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!(target: "session", seconds = secs, "exiting after {secs}s");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn exit_when_elapsed(time: Res<Time>, mut timer: ResMut<AutoCloseTimer>, mut exit: EventWriter<AppExit>) {
    if timer.tick(time.delta()).just_finished() {
        info!(target: "session", "auto-close elapsed");
        exit.write(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn app_with(auto_close: f32) -> App {
        let mut cfg = ArtworkConfig::default();
        cfg.window.auto_close = auto_close;
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(cfg)
            .add_plugins(AutoClosePlugin);
        app
    }

    #[test]
    fn disabled_by_default() {
        let mut app = app_with(0.0);
        app.update();
        assert!(app.world().get_resource::<AutoCloseTimer>().is_none());
    }

    #[test]
    fn elapsed_timer_requests_exit() {
        use bevy::time::TimeUpdateStrategy;
        let mut app = app_with(0.5);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        let mut exited = false;
        for _ in 0..12 {
            app.update();
            exited |= !app.world().resource::<Events<AppExit>>().is_empty();
        }
        assert!(exited);
    }
}
