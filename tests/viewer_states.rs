use std::f32::consts::FRAC_PI_2;

use fx_wasm::scroll::{Edge, Region, RegionEvent, ScrollTracker};
use fx_wasm::viewer::{Viewer, ViewerEvent, ViewerParams, ViewerState};

fn event(region: usize, edge: Edge) -> ViewerEvent {
    ViewerEvent::Region(RegionEvent { region, edge })
}

fn settle(viewer: &mut Viewer) {
    for _ in 0..200 {
        viewer.advance(1.0 / 60.0);
    }
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

/// Viewer that has already turned away from its load-time rotation, so the
/// checkpoint taken on entering region 1 differs from zero.
fn turned_viewer() -> Viewer {
    let mut v = Viewer::new(ViewerParams::default());
    v.handle(event(0, Edge::Enter));
    v.handle(event(1, Edge::Enter));
    settle(&mut v);
    v.handle(event(1, Edge::LeaveBack));
    v.handle(event(0, Edge::LeaveBack));
    // Interrupt the restore halfway so the rotation sits off its checkpoint.
    v.advance(0.3);
    v
}

#[test]
fn leaving_second_region_restores_first_entry() {
    let mut v = turned_viewer();
    let at_first_entry = v.rotation();
    assert!(at_first_entry.abs() > 1e-3);

    v.handle(event(0, Edge::Enter));
    assert_eq!(
        v.state(),
        ViewerState::InFirst {
            first_entered: at_first_entry
        }
    );
    v.handle(event(1, Edge::Enter));
    settle(&mut v);
    assert!(close(v.rotation(), at_first_entry + FRAC_PI_2));

    v.handle(event(1, Edge::LeaveBack));
    settle(&mut v);
    assert!(close(v.rotation(), at_first_entry));
    assert!(!close(v.rotation(), 0.0));
}

#[test]
fn leaving_third_region_cancels_spin() {
    let mut v = Viewer::new(ViewerParams::default());
    v.handle(event(0, Edge::Enter));
    v.handle(event(1, Edge::Enter));
    settle(&mut v);
    let completed = v.rotation();
    assert!(matches!(
        v.state(),
        ViewerState::InSecond { second_completed: Some(c), .. } if close(c, completed)
    ));

    v.handle(event(2, Edge::Enter));
    assert!(v.is_spinning());
    for _ in 0..90 {
        v.advance(1.0 / 60.0);
    }
    assert!(!close(v.rotation(), completed));

    v.handle(event(2, Edge::LeaveBack));
    assert!(!v.is_spinning());
    settle(&mut v);
    assert!(!v.is_spinning());
    assert!(close(v.rotation(), completed));
}

#[test]
fn camera_dollies_with_first_region() {
    let p = ViewerParams::default();
    let mut v = Viewer::new(p);
    assert_eq!(v.camera_z(), p.camera_far);
    v.handle(event(0, Edge::Enter));
    settle(&mut v);
    assert!(close(v.camera_z(), p.camera_near));
    v.handle(event(0, Edge::LeaveBack));
    settle(&mut v);
    assert!(close(v.camera_z(), p.camera_far));
    assert_eq!(v.state(), ViewerState::BeforeFirst);
}

#[test]
fn scroll_jump_reaches_third_region() {
    let mut tracker = ScrollTracker::new(
        vec![
            Region::from_box(1000.0, 800.0),
            Region::from_box(1800.0, 800.0),
            Region::from_box(2600.0, 800.0),
        ],
        0.5,
        800.0,
    );
    let mut v = Viewer::new(ViewerParams::default());
    for ev in tracker.update(2500.0) {
        v.handle(ViewerEvent::Region(ev));
    }
    assert!(matches!(v.state(), ViewerState::InThird { .. }));
    assert!(v.is_spinning());

    for ev in tracker.update(0.0) {
        v.handle(ViewerEvent::Region(ev));
    }
    assert_eq!(v.state(), ViewerState::BeforeFirst);
    assert!(!v.is_spinning());
    settle(&mut v);
    assert!(close(v.rotation(), 0.0));
}

#[test]
fn crossing_second_region_edge_keeps_its_pose() {
    let p = ViewerParams::default();
    let mut v = Viewer::new(p);
    v.handle(event(0, Edge::Enter));
    let first_entered = v.rotation();

    for _ in 0..3 {
        v.handle(event(1, Edge::Enter));
        v.advance(0.3);
        v.handle(event(1, Edge::LeaveBack));
        v.advance(0.3);
    }
    v.handle(event(1, Edge::Enter));
    settle(&mut v);

    assert!(close(v.rotation(), first_entered + p.turn), "{}", v.rotation());
    assert!(matches!(
        v.state(),
        ViewerState::InSecond { second_completed: Some(c), .. } if close(c, first_entered + p.turn)
    ));
}
