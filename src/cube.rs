//! Placeholder cube.

use glam::Mat4;

pub const SPIN_PER_FRAME: f32 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spinner {
    pub x: f32,
    pub y: f32,
}

impl Spinner {
    pub fn tick(&mut self) {
        self.x += SPIN_PER_FRAME;
        self.y += SPIN_PER_FRAME;
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_rotation_x(self.x) * Mat4::from_rotation_y(self.y)
    }
}

/// Unit cube as 36 non-indexed vertices: position xyz then normal xyz.
pub fn mesh() -> Vec<f32> {
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    ];
    let mut out = Vec::with_capacity(36 * 6);
    for (n, u, v) in FACES {
        let corner = |su: f32, sv: f32| {
            [
                (n[0] + u[0] * su + v[0] * sv) * 0.5,
                (n[1] + u[1] * su + v[1] * sv) * 0.5,
                (n[2] + u[2] * su + v[2] * sv) * 0.5,
            ]
        };
        let quad = [
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        ];
        for p in quad {
            out.extend_from_slice(&p);
            out.extend_from_slice(&n);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spins_on_two_axes() {
        let mut s = Spinner::default();
        for _ in 0..100 {
            s.tick();
        }
        assert!((s.x - 1.0).abs() < 1e-4);
        assert!((s.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn mesh_is_unit_cube() {
        let m = mesh();
        assert_eq!(m.len(), 36 * 6);
        for v in m.chunks(6) {
            assert!(v[..3].iter().all(|c| c.abs() <= 0.5 + 1e-6));
            // Every vertex lies on the face its normal points at.
            let d = v[0] * v[3] + v[1] * v[4] + v[2] * v[5];
            assert!((d - 0.5).abs() < 1e-6);
        }
    }
}
