//! Flowmap feedback: decay plus pointer impulse.
//!
//! `step_texel` is the host-side twin of the flowmap fragment shader.

use glam::{Vec2, Vec3};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlowmapParams {
    /// Flowmap surface edge in texels.
    pub size: u32,
    /// Impulse radius in aspect-corrected UV units.
    pub falloff: f32,
    /// Per-frame multiplicative decay.
    pub dissipation: f32,
    /// Impulse strength.
    pub alpha: f32,
    /// Per-channel sampling offset, UV units at full flow.
    pub aberration: f32,
    /// Blend towards the previous frame at full flow magnitude.
    pub blur: f32,
}

impl Default for FlowmapParams {
    fn default() -> Self {
        Self {
            size: 128,
            falloff: 0.3,
            dissipation: 0.96,
            alpha: 1.0,
            aberration: 0.012,
            blur: 0.6,
        }
    }
}

/// Attribute overriding `FlowmapParams::falloff`.
pub const FALLOFF_ATTR: &str = "data-falloff";

/// Velocity gain applied before injection; pointer deltas are small.
pub const VELOCITY_GAIN: f32 = 60.0;

/// Clear value for a freshly allocated flow surface (zero flow).
pub fn zero_texel(encoded: bool) -> [f32; 4] {
    if encoded {
        [0.5, 0.5, 0.5, 1.0]
    } else {
        [0.0, 0.0, 0.0, 1.0]
    }
}

/// Next flowmap texel: xy = flow, z = magnitude.
pub fn step_texel(
    prev: Vec3,
    uv: Vec2,
    aspect: f32,
    pointer: Vec2,
    velocity: Vec2,
    params: &FlowmapParams,
) -> Vec3 {
    let mut cursor = uv - pointer;
    cursor.x *= aspect;
    let falloff = params.falloff.max(1e-6);
    let strength = (1.0 - cursor.length() / falloff).clamp(0.0, 1.0) * params.alpha;
    let stamp = velocity * VELOCITY_GAIN;
    let stamp = stamp.extend(1.0) * strength;
    let decayed = prev * params.dissipation;
    decayed.lerp(stamp, strength.min(1.0) * 0.5).clamp(Vec3::splat(-1.0), Vec3::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn far_texels_only_decay() {
        let p = FlowmapParams::default();
        let prev = Vec3::new(0.5, -0.5, 1.0);
        let next = step_texel(prev, Vec2::new(0.9, 0.9), 1.0, Vec2::new(0.1, 0.1), Vec2::new(0.01, 0.0), &p);
        assert_eq!(next, prev * p.dissipation);
    }

    #[test]
    fn impulse_under_pointer() {
        let p = FlowmapParams::default();
        let next = step_texel(Vec3::ZERO, Vec2::splat(0.5), 1.0, Vec2::splat(0.5), Vec2::new(0.01, 0.0), &p);
        assert!(next.x > 0.0);
        assert!(next.z > 0.0);
    }

    #[test]
    fn untouched_flow_fades_out() {
        let p = FlowmapParams::default();
        let mut t = Vec3::new(1.0, 1.0, 1.0);
        for _ in 0..300 {
            t = step_texel(t, Vec2::ZERO, 1.0, Vec2::ONE, Vec2::ZERO, &p);
        }
        assert!(t.length() < 1e-4);
    }
}
