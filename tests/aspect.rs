#![cfg(target_arch = "wasm32")]

use fx_wasm::fit::cover_scale;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn sample(uv: (f32, f32), scale: [f32; 2]) -> (f32, f32) {
    ((uv.0 - 0.5) * scale[0] + 0.5, (uv.1 - 0.5) * scale[1] + 0.5)
}

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[wasm_bindgen_test]
fn cover_keeps_image_proportions() {
    let image = 1.5f32;
    for (w, h) in [(1920.0f32, 1080.0f32), (1080.0, 1920.0), (800.0, 800.0)] {
        let scale = cover_scale(image, w / h);
        // Sampled span of the image, in image pixels per surface pixel, must
        // match on both axes.
        let span_x = scale[0] * image / w;
        let span_y = scale[1] / h;
        assert!(approx_eq(span_x, span_y), "w={w} h={h} scale={scale:?}");
        // Sampling stays inside the image.
        for uv in [(0.0, 0.0), (1.0, 1.0), (0.5, 0.5)] {
            let (u, v) = sample(uv, scale);
            assert!((0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v));
        }
    }
}
