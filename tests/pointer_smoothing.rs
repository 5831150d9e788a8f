#![cfg(not(target_arch = "wasm32"))]

use fx_wasm::pointer::{approach, PointerState, FOLLOW_FACTOR};
use glam::Vec2;
use proptest::prelude::*;

proptest! {
    #[test]
    fn approach_is_monotone_without_overshoot(
        start in -2000.0f32..2000.0,
        target in -2000.0f32..2000.0,
        factor in 0.01f32..=1.0,
    ) {
        let mut x = start;
        let mut gap = (target - x).abs();
        for _ in 0..200 {
            let next = approach(x, target, factor);
            let next_gap = (target - next).abs();
            prop_assert!(next_gap <= gap);
            // Never crosses the target.
            prop_assert!((next - target) * (start - target) >= 0.0);
            x = next;
            gap = next_gap;
        }
    }

    #[test]
    fn follow_factor_converges_in_bounded_frames(
        p0 in prop::array::uniform2(-1500.0f32..1500.0),
        p1 in prop::array::uniform2(-1500.0f32..1500.0),
    ) {
        let (p0, p1) = (Vec2::from(p0), Vec2::from(p1));
        let jump = (p1 - p0).length();
        let mut p = PointerState::new(p0, FOLLOW_FACTOR);
        p.set_target(p1);
        for _ in 0..130 {
            p.tick();
        }
        prop_assert!((p.current - p1).length() <= jump * 0.001 + 1e-3);
    }
}
