//! Hover-preview image plane that trails the pointer.

use glam::Vec2;
use serde::Deserialize;

use crate::pointer::{PointerState, FOLLOW_FACTOR};
use crate::tween::{Ease, Tween};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HoverParams {
    /// Opacity applied to every trigger while the pointer is over the page.
    pub dim_opacity: f32,
    pub fade_seconds: f32,
    /// Plane size in CSS pixels.
    pub width: f32,
    pub height: f32,
    /// Scales pointer lag (pixels) into ripple amplitude.
    pub ripple: f32,
}

impl Default for HoverParams {
    fn default() -> Self {
        Self {
            dim_opacity: 0.4,
            fade_seconds: 0.35,
            width: 320.0,
            height: 420.0,
            ripple: 0.0005,
        }
    }
}

#[derive(Debug)]
pub struct HoverPreview {
    pub params: HoverParams,
    trigger_count: usize,
    active: Option<usize>,
    page_hovered: bool,
    alpha: f32,
    fade: Option<Tween>,
    pointer: PointerState,
}

impl HoverPreview {
    pub fn new(trigger_count: usize, params: HoverParams) -> Self {
        Self {
            params,
            trigger_count,
            active: None,
            page_hovered: false,
            alpha: 0.0,
            fade: None,
            pointer: PointerState::new(Vec2::ZERO, FOLLOW_FACTOR),
        }
    }

    /// Pointer entered trigger `index`; returns whether the texture changes.
    pub fn enter_trigger(&mut self, index: usize) -> bool {
        if index >= self.trigger_count {
            return false;
        }
        let changed = self.active != Some(index);
        self.active = Some(index);
        self.fade_to(1.0);
        changed
    }

    /// The active texture is kept while the plane fades out.
    pub fn leave_trigger(&mut self) {
        self.fade_to(0.0);
    }

    pub fn enter_page(&mut self) {
        self.page_hovered = true;
    }

    pub fn leave_page(&mut self) {
        self.page_hovered = false;
    }

    pub fn pointer_move(&mut self, at: Vec2) {
        self.pointer.set_target(at);
    }

    fn fade_to(&mut self, to: f32) {
        self.fade =
            Some(Tween::new(self.alpha, to, self.params.fade_seconds).ease(Ease::PowerOut));
    }

    /// Advances one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.pointer.tick();
        if let Some(fade) = self.fade.as_mut() {
            let step = fade.advance(dt);
            self.alpha = step.value;
            if step.finished {
                self.fade = None;
            }
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn position(&self) -> Vec2 {
        self.pointer.current
    }

    /// Ripple amplitude for the vertex shader, from the pointer lag.
    pub fn ripple(&self) -> Vec2 {
        self.pointer.lag() * self.params.ripple
    }

    /// Opacity for every trigger element. Keyed on the page-wide hover flag,
    /// not on which trigger is under the pointer.
    pub fn trigger_opacity(&self) -> f32 {
        if self.page_hovered {
            self.params.dim_opacity
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fades_in_and_out() {
        let mut h = HoverPreview::new(2, HoverParams::default());
        assert!(h.enter_trigger(1));
        h.tick(1.0);
        assert_eq!(h.alpha(), 1.0);
        h.leave_trigger();
        h.tick(1.0);
        assert_eq!(h.alpha(), 0.0);
        assert_eq!(h.active(), Some(1));
        assert!(!h.enter_trigger(1));
        assert!(!h.enter_trigger(5));
    }

    #[test]
    fn dimming_is_page_wide() {
        let mut h = HoverPreview::new(3, HoverParams::default());
        assert_eq!(h.trigger_opacity(), 1.0);
        h.enter_page();
        assert_eq!(h.trigger_opacity(), h.params.dim_opacity);
        h.enter_trigger(0);
        assert_eq!(h.trigger_opacity(), h.params.dim_opacity);
        h.leave_page();
        assert_eq!(h.trigger_opacity(), 1.0);
    }

    #[test]
    fn ripple_follows_lag() {
        let mut h = HoverPreview::new(1, HoverParams::default());
        h.pointer_move(Vec2::new(200.0, 0.0));
        h.tick(0.016);
        assert!(h.ripple().x > 0.0);
        for _ in 0..500 {
            h.tick(0.016);
        }
        assert!(h.ripple().length() < 1e-3);
    }
}
