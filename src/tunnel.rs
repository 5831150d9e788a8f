//! Rotating wireframe tunnel.

use std::f32::consts::TAU;

use glam::{Mat4, Vec3};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TunnelParams {
    pub radius: f32,
    pub length: f32,
    pub radial_segments: u32,
    pub length_segments: u32,
    /// Radians added to the roll angle each frame.
    pub rotation_speed: f32,
    /// Fraction of the length over which lines fade out.
    pub fade: f32,
}

impl Default for TunnelParams {
    fn default() -> Self {
        Self {
            radius: 2.0,
            length: 40.0,
            radial_segments: 24,
            length_segments: 40,
            rotation_speed: 0.002,
            fade: 0.8,
        }
    }
}

impl TunnelParams {
    fn same_shape(&self, other: &TunnelParams) -> bool {
        self.radius == other.radius
            && self.length == other.length
            && self.radial_segments == other.radial_segments
            && self.length_segments == other.length_segments
    }
}

pub const MIN_RADIAL_SEGMENTS: u32 = 3;
pub const MAX_RADIAL_SEGMENTS: u32 = 128;
pub const MIN_LENGTH_SEGMENTS: u32 = 1;
pub const MAX_LENGTH_SEGMENTS: u32 = 256;

/// Open cylinder along -z made of ring and length lines.
#[derive(Debug, Clone, PartialEq)]
pub struct WireCylinder {
    /// xyz triples.
    pub positions: Vec<f32>,
    /// Pairs of vertex indices, one pair per line.
    pub indices: Vec<u32>,
}

impl WireCylinder {
    pub fn build(params: &TunnelParams) -> Self {
        let radial = params
            .radial_segments
            .clamp(MIN_RADIAL_SEGMENTS, MAX_RADIAL_SEGMENTS);
        let rows = params
            .length_segments
            .clamp(MIN_LENGTH_SEGMENTS, MAX_LENGTH_SEGMENTS)
            + 1;
        let mut positions = Vec::with_capacity((radial * rows * 3) as usize);
        for j in 0..rows {
            let z = -params.length * j as f32 / (rows - 1) as f32;
            for i in 0..radial {
                let a = TAU * i as f32 / radial as f32;
                positions.extend_from_slice(&[params.radius * a.cos(), params.radius * a.sin(), z]);
            }
        }

        let mut indices = Vec::with_capacity((radial * (2 * rows - 1) * 2) as usize);
        for j in 0..rows {
            let row = j * radial;
            for i in 0..radial {
                indices.extend_from_slice(&[row + i, row + (i + 1) % radial]);
                if j + 1 < rows {
                    indices.extend_from_slice(&[row + i, row + radial + i]);
                }
            }
        }
        Self { positions, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn line_count(&self) -> usize {
        self.indices.len() / 2
    }
}

/// Tunnel state: geometry plus the running roll angle.
#[derive(Debug)]
pub struct Tunnel {
    params: TunnelParams,
    geometry: WireCylinder,
    generation: u64,
    pub angle: f32,
}

impl Tunnel {
    pub fn new(params: TunnelParams) -> Self {
        Self {
            geometry: WireCylinder::build(&params),
            params,
            generation: 0,
            angle: 0.0,
        }
    }

    pub fn params(&self) -> &TunnelParams {
        &self.params
    }

    pub fn geometry(&self) -> &WireCylinder {
        &self.geometry
    }

    /// Bumped each time the geometry is rebuilt; renderers re-upload when it
    /// changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Applies new parameters; discards and rebuilds the geometry when any
    /// shape parameter changed. Returns whether a rebuild happened.
    pub fn sync(&mut self, params: TunnelParams) -> bool {
        let rebuild = !self.params.same_shape(&params);
        self.params = params;
        if rebuild {
            self.geometry = WireCylinder::build(&self.params);
            self.generation += 1;
        }
        rebuild
    }

    pub fn tick(&mut self) {
        self.angle = (self.angle + self.params.rotation_speed) % TAU;
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_rotation_z(self.angle)
    }
}

/// Drag-to-orbit camera around the tunnel mouth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 5.0,
        }
    }
}

const ORBIT_SENSITIVITY: f32 = 0.005;
const PITCH_LIMIT: f32 = 1.4;

impl Orbit {
    /// Applies a pointer drag in CSS pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch + dy * ORBIT_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(sy * cp, sp, cy * cp) * self.distance
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_segments() {
        let p = TunnelParams {
            radial_segments: 8,
            length_segments: 4,
            ..TunnelParams::default()
        };
        let g = WireCylinder::build(&p);
        assert_eq!(g.vertex_count(), 8 * 5);
        assert_eq!(g.line_count(), 8 * 5 + 8 * 4);
        assert!(g.indices.iter().all(|&i| (i as usize) < g.vertex_count()));
    }

    #[test]
    fn segment_counts_are_clamped() {
        let p = TunnelParams {
            radial_segments: u32::MAX,
            length_segments: u32::MAX,
            ..TunnelParams::default()
        };
        let g = WireCylinder::build(&p);
        let rows = (MAX_LENGTH_SEGMENTS + 1) as usize;
        assert_eq!(g.vertex_count(), MAX_RADIAL_SEGMENTS as usize * rows);

        let g = WireCylinder::build(&TunnelParams {
            radial_segments: 0,
            length_segments: 0,
            ..TunnelParams::default()
        });
        assert_eq!(g.vertex_count(), (MIN_RADIAL_SEGMENTS * 2) as usize);
    }

    #[test]
    fn speed_change_keeps_geometry() {
        let mut t = Tunnel::new(TunnelParams::default());
        let faster = TunnelParams {
            rotation_speed: 0.05,
            ..*t.params()
        };
        assert!(!t.sync(faster));
        assert_eq!(t.generation(), 0);
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut o = Orbit::default();
        o.drag(120.0, -500.0);
        assert!((o.position().length() - o.distance).abs() < 1e-4);
        assert!(o.pitch >= -PITCH_LIMIT);
    }
}
