use bevy::prelude::*;

/// Exponential smoothing step: move `current` a fraction `k` of the way to `target`.
#[inline]
pub fn ease_toward(current: f32, target: f32, k: f32) -> f32 {
    current + (target - current) * k
}

/// Cosmetic response to a proximity hit: shrink pulse + impact tint held for a
/// fixed number of quiet frames after the last hit.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct HitReaction {
    pub cooldown_frames: u32,
    pub countdown: u32,
    pub hit_scale: f32,
    pub easing: f32,
    pub scale: f32,
    pub target_scale: f32,
    pub impacted: bool,
}

impl HitReaction {
    pub fn new(cooldown_frames: u32, hit_scale: f32, easing: f32) -> Self {
        Self {
            cooldown_frames,
            countdown: 0,
            hit_scale,
            easing,
            scale: 1.0,
            target_scale: 1.0,
            impacted: false,
        }
    }

    /// Advance one frame. Hits re-arm the countdown to its fixed value (no accumulation).
    pub fn step(&mut self, hit: bool) {
        if hit {
            self.impacted = true;
            self.target_scale = self.hit_scale;
            self.countdown = self.cooldown_frames;
        } else if self.countdown > 0 {
            self.countdown -= 1;
        } else {
            self.impacted = false;
            self.target_scale = 1.0;
        }
        self.scale = ease_toward(self.scale, self.target_scale, self.easing);
    }
}

/// One-shot timed tint that ignores new triggers while running.
#[derive(Component, Debug, Clone)]
pub struct FlashTimer {
    timer: Timer,
    active: bool,
}

impl FlashTimer {
    pub fn new(secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(secs.max(0.0), TimerMode::Once),
            active: false,
        }
    }

    /// Start the flash. Returns false when one is already running.
    pub fn trigger(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.timer.reset();
        self.active = true;
        true
    }

    /// Advance by `delta`; returns true on the tick the flash ends.
    pub fn tick(&mut self, delta: std::time::Duration) -> bool {
        if !self.active {
            return false;
        }
        if self.timer.tick(delta).finished() {
            self.active = false;
            return true;
        }
        false
    }

    pub fn active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn cooldown_holds_for_exactly_ten_quiet_frames() {
        let mut r = HitReaction::new(10, 0.5, 0.1);
        r.step(true);
        assert_eq!(r.countdown, 10);
        for _ in 0..10 {
            r.step(false);
            assert!(r.impacted);
            assert_eq!(r.target_scale, 0.5);
        }
        r.step(false);
        assert!(!r.impacted);
        assert_eq!(r.target_scale, 1.0);
    }

    #[test]
    fn repeated_hits_rearm_without_accumulating() {
        let mut r = HitReaction::new(10, 0.5, 0.1);
        for _ in 0..5 {
            r.step(true);
        }
        assert_eq!(r.countdown, 10);
    }

    #[test]
    fn easing_follows_closed_form() {
        let mut r = HitReaction::new(1000, 0.5, 0.1);
        let s0 = r.scale;
        for n in 1..=20 {
            r.step(true);
            let expected = 0.5 - (0.5 - s0) * 0.9f32.powi(n);
            assert!((r.scale - expected).abs() < 1e-5, "frame {n}");
        }
    }

    #[test]
    fn easing_settles_within_one_percent() {
        let mut r = HitReaction::new(1000, 0.5, 0.1);
        let mut frames = 0;
        while (r.scale - 0.5).abs() > 0.005 {
            r.step(true);
            frames += 1;
            assert!(frames < 100);
        }
        // ln(0.01) / ln(0.9) ~= 43.7
        assert_eq!(frames, 44);
    }

    #[test]
    fn flash_ignores_retrigger_until_done() {
        let mut f = FlashTimer::new(0.1);
        assert!(f.trigger());
        assert!(!f.trigger());
        assert!(!f.tick(Duration::from_millis(50)));
        assert!(f.tick(Duration::from_millis(60)));
        assert!(!f.active());
        assert!(f.trigger());
    }
}
