/// UV scale that makes an image of `image_aspect` (w/h) cover a surface of
/// `surface_aspect` without stretching. Sample with
/// `(uv - 0.5) * scale + 0.5`.
pub fn cover_scale(image_aspect: f32, surface_aspect: f32) -> [f32; 2] {
    if !(image_aspect > 0.0 && surface_aspect > 0.0) {
        return [1.0, 1.0];
    }
    if surface_aspect > image_aspect {
        [1.0, image_aspect / surface_aspect]
    } else {
        [surface_aspect / image_aspect, 1.0]
    }
}
