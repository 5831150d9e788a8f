//! Radial pointer distortion for the post-processing demo.
//!
//! `displace` mirrors the distortion pass's fragment shader so the falloff
//! can be checked on the host.

use glam::Vec2;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DistortionParams {
    /// Radius in UV units (height-relative).
    pub radius: f32,
    pub strength: f32,
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self {
            radius: 0.25,
            strength: 0.08,
        }
    }
}

fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Sampling coordinate for `uv` with the pointer at `pointer`; `aspect` is
/// surface width / height.
pub fn displace(uv: Vec2, pointer: Vec2, aspect: f32, params: &DistortionParams) -> Vec2 {
    let mut d = uv - pointer;
    d.x *= aspect;
    let dist = d.length();
    if dist <= f32::EPSILON {
        return uv;
    }
    let falloff = 1.0 - smoothstep(0.0, params.radius, dist);
    let mut offset = d / dist * falloff * params.strength * dist / params.radius.max(1e-6);
    offset.x /= aspect;
    uv - offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_radius_is_untouched() {
        let p = DistortionParams::default();
        let uv = Vec2::new(0.9, 0.9);
        assert_eq!(displace(uv, Vec2::new(0.1, 0.1), 1.0, &p), uv);
    }

    #[test]
    fn inside_radius_pulls_towards_pointer() {
        let p = DistortionParams::default();
        let pointer = Vec2::new(0.5, 0.5);
        let uv = Vec2::new(0.6, 0.5);
        let out = displace(uv, pointer, 1.0, &p);
        assert!(out.x < uv.x && out.x > pointer.x);
        assert_eq!(out.y, uv.y);
        assert_eq!(displace(pointer, pointer, 1.0, &p), pointer);
    }
}
