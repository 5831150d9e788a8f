use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::{Document, Event, MouseEvent, WebGlTexture};

use super::dom::{self, Listeners};
use super::frame_loop::{EffectHandle, FrameLoop};
use super::gl::{self, Precision, Program, RenderTarget};
use super::shaders;
use crate::distortion::DistortionParams;
use crate::fit::cover_scale;

pub const ANCHOR: &str = "[data-fx-distortion]";
const SRC_ATTR: &str = "data-src";

pub fn mount(document: &Document) -> Result<Option<EffectHandle>, JsValue> {
    let Some(anchor) = dom::query(document, ANCHOR)? else {
        return Ok(None);
    };
    let params: DistortionParams = dom::params(&anchor);
    let src = anchor
        .get_attribute(SRC_ATTR)
        .ok_or("distortion anchor has no data-src")?;

    let placed = dom::fill_canvas(document, &anchor)?;
    let canvas = placed.canvas().clone();
    dom::fit_canvas(&canvas);
    let gl = gl::context(&canvas)?;
    let base_pass = Program::new(&gl, shaders::FULLSCREEN_VERTEX, shaders::IMAGE_FRAGMENT)?;
    let distort_pass = Program::new(&gl, shaders::FULLSCREEN_VERTEX, shaders::POINTER_DISTORT_FRAGMENT)?;

    let image: Rc<RefCell<Option<(WebGlTexture, f32)>>> = Rc::new(RefCell::new(None));
    {
        let gl = gl.clone();
        let image = image.clone();
        dom::load_image(&src, move |img| match gl::image_texture(&gl, &img) {
            Ok(tex) => {
                let aspect = img.natural_width() as f32 / img.natural_height().max(1) as f32;
                *image.borrow_mut() = Some((tex, aspect));
            }
            Err(err) => log::warn!("distortion: {err}"),
        })?;
    }

    // Pointer parked far outside so nothing is displaced until it moves.
    let pointer = Rc::new(Cell::new([-10.0f32, -10.0]));
    let mut listeners = Listeners::new();
    {
        let pointer = pointer.clone();
        let canvas = canvas.clone();
        listeners.on(&anchor, "pointermove", move |ev: MouseEvent| {
            let rect = canvas.get_bounding_client_rect();
            if rect.width() > 0.0 && rect.height() > 0.0 {
                let u = (ev.client_x() as f64 - rect.left()) / rect.width();
                let v = 1.0 - (ev.client_y() as f64 - rect.top()) / rect.height();
                pointer.set([u as f32, v as f32]);
            }
        })?;
    }
    {
        let pointer = pointer.clone();
        listeners.on(&anchor, "pointerleave", move |_: MouseEvent| {
            pointer.set([-10.0, -10.0]);
        })?;
    }
    {
        let canvas = canvas.clone();
        listeners.on(&dom::window()?, "resize", move |_: Event| {
            dom::fit_canvas(&canvas);
        })?;
    }

    let mut base: Option<RenderTarget> = None;
    let frames = FrameLoop::start(move |_dt| {
        let image = image.borrow();
        let Some((texture, image_aspect)) = image.as_ref() else {
            return;
        };
        let (w, h) = (canvas.width(), canvas.height());
        if base.as_ref().map(|t| (t.width, t.height)) != Some((w, h)) {
            if let Some(old) = base.take() {
                old.delete(&gl);
            }
            match RenderTarget::new(&gl, w, h, Precision::Byte) {
                Ok(target) => base = Some(target),
                Err(err) => {
                    log::error!("distortion: {err}");
                    return;
                }
            }
        }
        let Some(target) = base.as_ref() else {
            return;
        };
        let aspect = w as f32 / h.max(1) as f32;

        target.bind(&gl);
        base_pass.bind(&gl);
        base_pass.texture(&gl, "u_image", 0, texture);
        base_pass.vec2(&gl, "u_cover", cover_scale(*image_aspect, aspect));
        gl::draw_fullscreen(&gl);

        gl::bind_screen(&gl, &canvas);
        distort_pass.bind(&gl);
        distort_pass.texture(&gl, "u_source", 0, &target.texture);
        distort_pass.vec2(&gl, "u_pointer", pointer.get());
        distort_pass.f32(&gl, "u_aspect", aspect);
        distort_pass.f32(&gl, "u_radius", params.radius);
        distort_pass.f32(&gl, "u_strength", params.strength);
        gl::draw_fullscreen(&gl);
    })?;

    let created = placed.keep();
    Ok(Some(
        EffectHandle::new("mouse-distortion", Some(frames), listeners)
            .on_stop(move || created.remove()),
    ))
}
