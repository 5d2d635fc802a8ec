use bevy::prelude::*;

/// Fraction of a step treated as "arrived"; absorbs f32 drift from repeated adds.
const ARRIVAL_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Resting,
    Ascending,
    Descending,
}

/// Fixed-arc jump: constant speed up to `rest + height`, then back down to `rest`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct JumpMotion {
    pub rest: f32,
    pub height: f32,
    pub speed: f32,
    pub position: f32,
    pub phase: JumpPhase,
}

impl JumpMotion {
    pub fn new(rest: f32, height: f32, speed: f32) -> Self {
        Self {
            rest,
            height,
            speed,
            position: rest,
            phase: JumpPhase::Resting,
        }
    }

    pub fn in_motion(&self) -> bool {
        self.phase != JumpPhase::Resting
    }

    /// Trigger edge. Ignored while a jump is in progress; returns whether it started one.
    pub fn trigger(&mut self) -> bool {
        if self.in_motion() {
            return false;
        }
        self.phase = JumpPhase::Ascending;
        true
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        let slack = self.speed * ARRIVAL_EPSILON;
        match self.phase {
            JumpPhase::Resting => {}
            JumpPhase::Ascending => {
                let apex = self.rest + self.height;
                self.position += self.speed;
                if self.position + slack >= apex {
                    self.position = apex;
                    self.phase = JumpPhase::Descending;
                }
            }
            JumpPhase::Descending => {
                self.position -= self.speed;
                if self.position - slack <= self.rest {
                    self.position = self.rest;
                    self.phase = JumpPhase::Resting;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_arc_takes_fifteen_frames_each_way() {
        let mut j = JumpMotion::new(0.0, 0.3, 0.02);
        assert!(j.trigger());
        for _ in 0..14 {
            j.step();
            assert_eq!(j.phase, JumpPhase::Ascending);
        }
        j.step();
        assert!((j.position - 0.3).abs() < 1e-6);
        assert_eq!(j.phase, JumpPhase::Descending);
        for _ in 0..14 {
            j.step();
            assert_eq!(j.phase, JumpPhase::Descending);
        }
        j.step();
        assert_eq!(j.position, 0.0);
        assert_eq!(j.phase, JumpPhase::Resting);
    }

    #[test]
    fn trigger_mid_air_is_ignored() {
        let mut j = JumpMotion::new(3.06, 0.3, 0.015);
        assert!(j.trigger());
        j.step();
        let before = j.clone();
        assert!(!j.trigger());
        assert_eq!(j, before);
    }

    #[test]
    fn resting_step_is_noop() {
        let mut j = JumpMotion::new(1.0, 0.3, 0.02);
        j.step();
        assert_eq!(j.position, 1.0);
        assert!(!j.in_motion());
    }
}
