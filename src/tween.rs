//! Time-based scalar tweens.

use std::collections::HashMap;
use std::f32::consts::PI;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    /// Cubic ease-out.
    #[default]
    PowerOut,
    SineInOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::PowerOut => 1.0 - (1.0 - t).powi(3),
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    /// Restart from `from` every cycle; never finishes.
    Forever,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStep {
    pub value: f32,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub ease: Ease,
    pub repeat: Repeat,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            ease: Ease::default(),
            repeat: Repeat::Once,
            elapsed: 0.0,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Advances by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> TweenStep {
        self.elapsed += dt.max(0.0);
        if self.duration <= 0.0 {
            return TweenStep {
                value: self.to,
                finished: self.repeat == Repeat::Once,
            };
        }
        match self.repeat {
            Repeat::Once => {
                let t = (self.elapsed / self.duration).min(1.0);
                TweenStep {
                    value: self.lerp(self.ease.apply(t)),
                    finished: t >= 1.0,
                }
            }
            Repeat::Forever => {
                self.elapsed %= self.duration;
                let t = self.elapsed / self.duration;
                TweenStep {
                    value: self.lerp(self.ease.apply(t)),
                    finished: false,
                }
            }
        }
    }

    fn lerp(&self, t: f32) -> f32 {
        self.from + (self.to - self.from) * t
    }
}

/// Running tweens keyed by slot. Starting a tween in an occupied slot kills
/// the previous one.
#[derive(Debug)]
pub struct Tweens<K> {
    running: HashMap<K, Tween>,
}

impl<K: Eq + Hash + Copy> Tweens<K> {
    pub fn new() -> Self {
        Self {
            running: HashMap::new(),
        }
    }

    pub fn start(&mut self, key: K, tween: Tween) {
        self.running.insert(key, tween);
    }

    /// Stops the tween in `key`; returns whether one was running.
    pub fn kill(&mut self, key: K) -> bool {
        self.running.remove(&key).is_some()
    }

    pub fn is_running(&self, key: K) -> bool {
        self.running.contains_key(&key)
    }

    /// Advances every tween; finished ones are removed and reported.
    pub fn advance(&mut self, dt: f32) -> Vec<(K, TweenStep)> {
        let mut steps: Vec<(K, TweenStep)> = self
            .running
            .iter_mut()
            .map(|(k, tw)| (*k, tw.advance(dt)))
            .collect();
        for (k, step) in &steps {
            if step.finished {
                self.running.remove(k);
            }
        }
        steps.sort_by_key(|(_, step)| step.finished);
        steps
    }
}

impl<K: Eq + Hash + Copy> Default for Tweens<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eases_hit_endpoints() {
        for ease in [Ease::Linear, Ease::PowerOut, Ease::SineInOut] {
            assert!(ease.apply(0.0).abs() < 1e-6);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn once_finishes_at_target() {
        let mut tw = Tween::new(0.0, 2.0, 1.0).ease(Ease::Linear);
        let mid = tw.advance(0.5);
        assert!((mid.value - 1.0).abs() < 1e-6);
        assert!(!mid.finished);
        let end = tw.advance(0.75);
        assert_eq!(end.value, 2.0);
        assert!(end.finished);
    }

    #[test]
    fn forever_wraps() {
        let mut tw = Tween::new(0.0, 10.0, 1.0)
            .ease(Ease::Linear)
            .repeat(Repeat::Forever);
        let step = tw.advance(2.5);
        assert!((step.value - 5.0).abs() < 1e-4);
        assert!(!step.finished);
    }

    #[test]
    fn slot_restart_replaces() {
        let mut tweens = Tweens::new();
        tweens.start("rot", Tween::new(0.0, 1.0, 1.0));
        tweens.start("rot", Tween::new(5.0, 6.0, 1.0).ease(Ease::Linear));
        let steps = tweens.advance(0.5);
        assert_eq!(steps.len(), 1);
        assert!((steps[0].1.value - 5.5).abs() < 1e-6);
        assert!(tweens.kill("rot"));
        assert!(!tweens.is_running("rot"));
    }
}
