//! Scroll-driven product viewer: region state machine and its driver.
//!
//! Three regions, in page order:
//! 1. dolly the camera in,
//! 2. turn the pivot a quarter turn,
//! 3. spin the pivot until the reader scrolls back above the region.
//!
//! Each state keeps the rotation checkpoints it needs to undo itself when the
//! reader scrolls back out.

use std::f32::consts::{FRAC_PI_2, TAU};

use serde::Deserialize;

use crate::scroll::{Edge, RegionEvent};
use crate::tween::{Ease, Repeat, Tween, Tweens};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerParams {
    pub camera_far: f32,
    pub camera_near: f32,
    /// Pivot rotation added by region 2, radians.
    pub turn: f32,
    /// Seconds per full revolution in region 3.
    pub spin_period: f32,
    pub tween_seconds: f32,
    /// Trigger line as a fraction of viewport height.
    pub marker: f32,
}

impl Default for ViewerParams {
    fn default() -> Self {
        Self {
            camera_far: 6.0,
            camera_near: 3.5,
            turn: FRAC_PI_2,
            spin_period: 8.0,
            tween_seconds: 1.2,
            marker: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerState {
    BeforeFirst,
    InFirst {
        first_entered: f32,
    },
    InSecond {
        first_entered: f32,
        second_target: f32,
        second_completed: Option<f32>,
    },
    InThird {
        first_entered: f32,
        second_completed: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    Region(RegionEvent),
    /// A rotation tween started with `report: true` reached its target.
    RotationSettled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEffect {
    CameraTo(f32),
    RotateTo { to: f32, report: bool },
    StartSpin { from: f32 },
    CancelSpin,
}

/// Pure transition function. `rotation` is the pivot's current rotation.
/// Unexpected (state, event) pairs leave the state untouched.
pub fn transition(
    state: ViewerState,
    event: ViewerEvent,
    rotation: f32,
    params: &ViewerParams,
) -> (ViewerState, Vec<ViewerEffect>) {
    use ViewerEffect::*;
    use ViewerState::*;

    let region = match event {
        ViewerEvent::Region(ev) => Some((ev.region, ev.edge)),
        ViewerEvent::RotationSettled => None,
    };

    match (state, region) {
        (BeforeFirst, Some((0, Edge::Enter))) => (
            InFirst {
                first_entered: rotation,
            },
            vec![CameraTo(params.camera_near)],
        ),
        (InFirst { first_entered }, Some((0, Edge::LeaveBack))) => (
            BeforeFirst,
            vec![
                CameraTo(params.camera_far),
                RotateTo {
                    to: first_entered,
                    report: false,
                },
            ],
        ),
        (InFirst { first_entered }, Some((1, Edge::Enter))) => {
            // Relative to the region 1 checkpoint, not the live rotation,
            // so a half-finished restore does not shift the pose.
            let second_target = first_entered + params.turn;
            (
                InSecond {
                    first_entered,
                    second_target,
                    second_completed: None,
                },
                vec![RotateTo {
                    to: second_target,
                    report: true,
                }],
            )
        }
        (
            InSecond {
                first_entered,
                second_target,
                ..
            },
            None,
        ) => (
            InSecond {
                first_entered,
                second_target,
                second_completed: Some(rotation),
            },
            Vec::new(),
        ),
        (InSecond { first_entered, .. }, Some((1, Edge::LeaveBack))) => (
            InFirst { first_entered },
            vec![RotateTo {
                to: first_entered,
                report: false,
            }],
        ),
        (
            InSecond {
                first_entered,
                second_target,
                second_completed,
            },
            Some((2, Edge::Enter)),
        ) => {
            let second_completed = second_completed.unwrap_or(second_target);
            (
                InThird {
                    first_entered,
                    second_completed,
                },
                vec![StartSpin {
                    from: second_completed,
                }],
            )
        }
        (
            InThird {
                first_entered,
                second_completed,
            },
            Some((2, Edge::LeaveBack)),
        ) => (
            InSecond {
                first_entered,
                second_target: second_completed,
                second_completed: Some(second_completed),
            },
            vec![
                CancelSpin,
                RotateTo {
                    to: second_completed,
                    report: false,
                },
            ],
        ),
        (state, _) => (state, Vec::new()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    Camera,
    Rotation,
    Spin,
}

/// Drives the state machine and the tweens its effects start.
#[derive(Debug)]
pub struct Viewer {
    pub params: ViewerParams,
    state: ViewerState,
    camera_z: f32,
    rotation: f32,
    tweens: Tweens<Slot>,
    report_rotation: bool,
}

impl Viewer {
    pub fn new(params: ViewerParams) -> Self {
        Self {
            params,
            state: ViewerState::BeforeFirst,
            camera_z: params.camera_far,
            rotation: 0.0,
            tweens: Tweens::new(),
            report_rotation: false,
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn camera_z(&self) -> f32 {
        self.camera_z
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.tweens.is_running(Slot::Spin)
    }

    pub fn handle(&mut self, event: ViewerEvent) {
        let (next, effects) = transition(self.state, event, self.rotation, &self.params);
        self.state = next;
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: ViewerEffect) {
        let secs = self.params.tween_seconds;
        match effect {
            ViewerEffect::CameraTo(z) => {
                self.tweens
                    .start(Slot::Camera, Tween::new(self.camera_z, z, secs));
            }
            ViewerEffect::RotateTo { to, report } => {
                self.tweens.kill(Slot::Spin);
                self.tweens.start(
                    Slot::Rotation,
                    Tween::new(self.rotation, to, secs).ease(Ease::SineInOut),
                );
                self.report_rotation = report;
            }
            ViewerEffect::StartSpin { from } => {
                self.tweens.kill(Slot::Rotation);
                self.report_rotation = false;
                self.rotation = from;
                self.tweens.start(
                    Slot::Spin,
                    Tween::new(from, from + TAU, self.params.spin_period)
                        .ease(Ease::Linear)
                        .repeat(Repeat::Forever),
                );
            }
            ViewerEffect::CancelSpin => {
                self.tweens.kill(Slot::Spin);
            }
        }
    }

    /// Advances tweens by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let mut settled = false;
        for (slot, step) in self.tweens.advance(dt) {
            match slot {
                Slot::Camera => self.camera_z = step.value,
                Slot::Rotation | Slot::Spin => {
                    self.rotation = step.value;
                    if slot == Slot::Rotation && step.finished && self.report_rotation {
                        self.report_rotation = false;
                        settled = true;
                    }
                }
            }
        }
        if settled {
            self.handle(ViewerEvent::RotationSettled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(region: usize, edge: Edge) -> ViewerEvent {
        ViewerEvent::Region(RegionEvent { region, edge })
    }

    #[test]
    fn unknown_pairs_are_noops() {
        let p = ViewerParams::default();
        let (s, fx) = transition(ViewerState::BeforeFirst, region(2, Edge::LeaveBack), 1.0, &p);
        assert_eq!(s, ViewerState::BeforeFirst);
        assert!(fx.is_empty());
        let (s, fx) = transition(ViewerState::BeforeFirst, ViewerEvent::RotationSettled, 1.0, &p);
        assert_eq!(s, ViewerState::BeforeFirst);
        assert!(fx.is_empty());
    }

    #[test]
    fn first_region_dollies_and_restores() {
        let p = ViewerParams::default();
        let (s, fx) = transition(ViewerState::BeforeFirst, region(0, Edge::Enter), 0.3, &p);
        assert_eq!(s, ViewerState::InFirst { first_entered: 0.3 });
        assert_eq!(fx, vec![ViewerEffect::CameraTo(p.camera_near)]);
        let (s, fx) = transition(s, region(0, Edge::LeaveBack), 0.9, &p);
        assert_eq!(s, ViewerState::BeforeFirst);
        assert!(fx.contains(&ViewerEffect::RotateTo {
            to: 0.3,
            report: false
        }));
    }

    #[test]
    fn skipped_completion_uses_target() {
        let p = ViewerParams::default();
        let s = ViewerState::InSecond {
            first_entered: 0.0,
            second_target: 1.5,
            second_completed: None,
        };
        let (s, fx) = transition(s, region(2, Edge::Enter), 0.7, &p);
        assert_eq!(
            s,
            ViewerState::InThird {
                first_entered: 0.0,
                second_completed: 1.5
            }
        );
        assert_eq!(fx, vec![ViewerEffect::StartSpin { from: 1.5 }]);
    }

    #[test]
    fn second_target_ignores_live_rotation() {
        let p = ViewerParams::default();
        let s = ViewerState::InFirst { first_entered: 0.25 };
        let (s, fx) = transition(s, region(1, Edge::Enter), 0.9, &p);
        assert!(matches!(
            s,
            ViewerState::InSecond { second_target, .. } if second_target == 0.25 + p.turn
        ));
        assert_eq!(
            fx,
            vec![ViewerEffect::RotateTo {
                to: 0.25 + p.turn,
                report: true
            }]
        );
    }
}
