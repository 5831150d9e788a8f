use fx_wasm::tunnel::{Tunnel, TunnelParams};

#[test]
fn radius_change_regenerates_geometry() {
    let mut tunnel = Tunnel::new(TunnelParams::default());
    let before = tunnel.geometry().clone();

    let next = TunnelParams {
        radius: 4.0,
        radial_segments: 12,
        length_segments: 7,
        ..*tunnel.params()
    };
    assert!(tunnel.sync(next));
    assert_eq!(tunnel.generation(), 1);

    let after = tunnel.geometry();
    assert_eq!(after.vertex_count(), 12 * 8);
    assert_ne!(after.vertex_count(), before.vertex_count());
    for v in after.positions.chunks(3) {
        let r = (v[0] * v[0] + v[1] * v[1]).sqrt();
        assert!((r - 4.0).abs() < 1e-4);
    }
}

#[test]
fn radius_alone_still_rebuilds() {
    let mut tunnel = Tunnel::new(TunnelParams::default());
    let segments = tunnel.geometry().vertex_count();
    let wider = TunnelParams {
        radius: 3.0,
        ..*tunnel.params()
    };
    assert!(tunnel.sync(wider));
    assert_eq!(tunnel.geometry().vertex_count(), segments);
    assert!((tunnel.geometry().positions[0] - 3.0).abs() < 1e-6);
    assert!(!tunnel.sync(wider));
}
