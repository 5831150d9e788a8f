//! Pointer smoothing shared by the interactive units.

use glam::Vec2;

/// Lerp factor used by the hover preview plane.
pub const FOLLOW_FACTOR: f32 = 0.1;

pub const FLOW_POSITION_FACTOR: f32 = 0.7;
pub const FLOW_VELOCITY_FACTOR: f32 = 0.6;
pub const FLOW_VELOCITY_DAMPING: f32 = 0.92;
pub const FLOW_RENDER_FACTOR: f32 = 0.3;

/// One exponential-smoothing step from `current` towards `target`.
///
/// The result always lies between `current` and `target` for `factor` in
/// `[0, 1]`, so repeated steps approach monotonically without overshoot.
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    let factor = factor.clamp(0.0, 1.0);
    let next = current + (target - current) * factor;
    if target >= current {
        next.clamp(current, target)
    } else {
        next.clamp(target, current)
    }
}

pub fn approach2(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    Vec2::new(
        approach(current.x, target.x, factor),
        approach(current.y, target.y, factor),
    )
}

/// Position that lags behind a target by a fixed lerp factor per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub current: Vec2,
    pub target: Vec2,
    pub factor: f32,
}

impl PointerState {
    pub fn new(at: Vec2, factor: f32) -> Self {
        Self {
            current: at,
            target: at,
            factor,
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    /// Advances one frame.
    pub fn tick(&mut self) {
        self.current = approach2(self.current, self.target, self.factor);
    }

    /// Remaining distance to the target; drives velocity-based deformation.
    pub fn lag(&self) -> Vec2 {
        self.target - self.current
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(Vec2::ZERO, FOLLOW_FACTOR)
    }
}

/// Three cascaded low-pass filters feeding the flowmap pass.
///
/// Position follows the raw pointer, velocity follows the per-frame position
/// delta (then decays), and the rendered velocity follows the velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowPointer {
    pub target: Vec2,
    pub position: Vec2,
    pub velocity: Vec2,
    pub render_velocity: Vec2,
    primed: bool,
}

impl FlowPointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pointer sample in surface UV space. The first sample snaps
    /// position so entering the surface does not inject a spurious impulse.
    pub fn move_to(&mut self, uv: Vec2) {
        self.target = uv;
        if !self.primed {
            self.position = uv;
            self.primed = true;
        }
    }

    pub fn tick(&mut self) {
        let prev = self.position;
        self.position = approach2(self.position, self.target, FLOW_POSITION_FACTOR);
        let delta = self.position - prev;
        self.velocity =
            approach2(self.velocity, delta, FLOW_VELOCITY_FACTOR) * FLOW_VELOCITY_DAMPING;
        self.render_velocity =
            approach2(self.render_velocity, self.velocity, FLOW_RENDER_FACTOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_hits_target_with_full_factor() {
        assert_eq!(approach(3.0, 9.0, 1.0), 9.0);
        assert_eq!(approach(3.0, 9.0, 0.0), 3.0);
        assert_eq!(approach(9.0, 3.0, 0.5), 6.0);
    }

    #[test]
    fn flow_filters_cascade_by_their_factors() {
        let p0 = Vec2::new(0.2, 0.4);
        let p1 = Vec2::new(0.6, 0.1);
        let mut f = FlowPointer::new();
        f.move_to(p0);
        f.move_to(p1);
        f.tick();

        let moved = (p1 - p0) * 0.7;
        assert!(f.position.abs_diff_eq(p0 + moved, 1e-6));
        let velocity = moved * 0.6 * 0.92;
        assert!(f.velocity.abs_diff_eq(velocity, 1e-6));
        assert!(f.render_velocity.abs_diff_eq(velocity * 0.3, 1e-6));
    }

    #[test]
    fn lag_shrinks_each_frame() {
        let mut p = PointerState::default();
        p.set_target(Vec2::new(100.0, -40.0));
        let mut last = p.lag().length();
        for _ in 0..20 {
            p.tick();
            let now = p.lag().length();
            assert!(now < last);
            last = now;
        }
    }

    #[test]
    fn flow_pointer_settles_when_still() {
        let mut f = FlowPointer::new();
        f.move_to(Vec2::new(0.2, 0.2));
        f.move_to(Vec2::new(0.8, 0.6));
        for _ in 0..3 {
            f.tick();
        }
        assert!(f.render_velocity.length() > 0.0);
        for _ in 0..400 {
            f.tick();
        }
        assert!(f.velocity.length() < 1e-4);
        assert!(f.render_velocity.length() < 1e-4);
        assert!((f.position - f.target).length() < 1e-4);
    }

    #[test]
    fn first_sample_snaps() {
        let mut f = FlowPointer::new();
        f.move_to(Vec2::new(0.5, 0.5));
        f.tick();
        assert_eq!(f.velocity, Vec2::ZERO);
    }
}
