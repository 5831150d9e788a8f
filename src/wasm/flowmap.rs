use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsValue;
use web_sys::{Document, Event, HtmlCanvasElement, HtmlImageElement, MouseEvent, WebGl2RenderingContext as GL, WebGlTexture};

use super::dom::{self, Listeners};
use super::frame_loop::{EffectHandle, FrameLoop};
use super::gl::{self, Precision, Program, RenderTarget};
use super::shaders;
use crate::config::numeric_attr;
use crate::feedback::FeedbackPair;
use crate::fit::cover_scale;
use crate::flowmap::{self, FlowmapParams, FALLOFF_ATTR, VELOCITY_GAIN};
use crate::pointer::FlowPointer;

pub const ANCHOR: &str = "[data-fx-flowmap]";
const SRC_ATTR: &str = "data-src";

/// GPU state, allocated once the image has loaded.
struct Surfaces {
    image: WebGlTexture,
    image_aspect: f32,
    flow: FeedbackPair<RenderTarget>,
    display: FeedbackPair<RenderTarget>,
}

fn pair(gl: &GL, w: u32, h: u32, precision: Precision, clear: [f32; 4]) -> Result<FeedbackPair<RenderTarget>, JsValue> {
    let a = RenderTarget::new(gl, w, h, precision)?;
    let b = RenderTarget::new(gl, w, h, precision)?;
    a.clear(gl, clear);
    b.clear(gl, clear);
    Ok(FeedbackPair::new(a, b))
}

impl Surfaces {
    fn new(gl: &GL, image: &HtmlImageElement, canvas: &HtmlCanvasElement, params: &FlowmapParams) -> Result<Self, JsValue> {
        let texture = gl::image_texture(gl, image)?;
        let precision = Precision::best(gl);
        let size = params.size.max(8);
        Ok(Self {
            image: texture,
            image_aspect: image.natural_width() as f32 / image.natural_height().max(1) as f32,
            flow: pair(gl, size, size, precision, flowmap::zero_texel(precision.encoded()))?,
            display: pair(gl, canvas.width(), canvas.height(), Precision::Byte, [0.0; 4])?,
        })
    }

    /// Reallocates the display pair when the canvas changed size.
    fn fit(&mut self, gl: &GL, w: u32, h: u32) -> Result<(), JsValue> {
        let current = self.display.read();
        if current.width == w && current.height == h {
            return Ok(());
        }
        self.display.replace_with(|old| {
            old.delete(gl);
            let target = RenderTarget::new(gl, w, h, Precision::Byte)?;
            target.clear(gl, [0.0; 4]);
            Ok::<_, JsValue>(target)
        })
    }
}

struct Programs {
    flow: Program,
    distort: Program,
    blit: Program,
}

pub fn mount(document: &Document) -> Result<Option<EffectHandle>, JsValue> {
    let Some(anchor) = dom::query(document, ANCHOR)? else {
        return Ok(None);
    };
    let mut params: FlowmapParams = dom::params(&anchor);
    params.falloff = numeric_attr(anchor.get_attribute(FALLOFF_ATTR).as_deref(), params.falloff);
    let src = anchor
        .get_attribute(SRC_ATTR)
        .ok_or("flowmap anchor has no data-src")?;

    let placed = dom::fill_canvas(document, &anchor)?;
    let canvas = placed.canvas().clone();
    dom::fit_canvas(&canvas);
    let gl = gl::context(&canvas)?;
    let programs = Programs {
        flow: Program::new(&gl, shaders::FULLSCREEN_VERTEX, shaders::FLOWMAP_FRAGMENT)?,
        distort: Program::new(&gl, shaders::FULLSCREEN_VERTEX, shaders::FLOW_DISTORT_FRAGMENT)?,
        blit: Program::new(&gl, shaders::FULLSCREEN_VERTEX, shaders::BLIT_FRAGMENT)?,
    };

    let surfaces: Rc<RefCell<Option<Surfaces>>> = Rc::new(RefCell::new(None));
    {
        let gl = gl.clone();
        let canvas = canvas.clone();
        let surfaces = surfaces.clone();
        dom::load_image(&src, move |image| match Surfaces::new(&gl, &image, &canvas, &params) {
            Ok(s) => *surfaces.borrow_mut() = Some(s),
            Err(err) => log::error!("flowmap: allocating surfaces: {err:?}"),
        })?;
    }

    let pointer = Rc::new(RefCell::new(FlowPointer::new()));
    let mut listeners = Listeners::new();
    {
        let pointer = pointer.clone();
        let canvas = canvas.clone();
        listeners.on(&anchor, "pointermove", move |ev: MouseEvent| {
            let rect = canvas.get_bounding_client_rect();
            if rect.width() <= 0.0 || rect.height() <= 0.0 {
                return;
            }
            let u = (ev.client_x() as f64 - rect.left()) / rect.width();
            let v = 1.0 - (ev.client_y() as f64 - rect.top()) / rect.height();
            pointer.borrow_mut().move_to(Vec2::new(u as f32, v as f32));
        })?;
    }
    {
        let canvas = canvas.clone();
        listeners.on(&dom::window()?, "resize", move |_: Event| {
            dom::fit_canvas(&canvas);
        })?;
    }

    let frames = FrameLoop::start(move |_dt| {
        let mut slot = surfaces.borrow_mut();
        let Some(s) = slot.as_mut() else {
            return;
        };
        let (w, h) = (canvas.width(), canvas.height());
        if let Err(err) = s.fit(&gl, w, h) {
            log::error!("flowmap: resizing surfaces: {err:?}");
            return;
        }
        let mut p = pointer.borrow_mut();
        p.tick();
        let aspect = w as f32 / h.max(1) as f32;
        let encoded = if s.flow.read().precision.encoded() { 1.0 } else { 0.0 };

        // Flow field: decay last frame's flow and stamp the pointer impulse.
        s.flow.write().bind(&gl);
        let prog = &programs.flow;
        prog.bind(&gl);
        prog.texture(&gl, "u_previous", 0, &s.flow.read().texture);
        prog.vec2(&gl, "u_pointer", p.position.to_array());
        prog.vec2(&gl, "u_velocity", p.render_velocity.to_array());
        prog.f32(&gl, "u_aspect", aspect);
        prog.f32(&gl, "u_falloff", params.falloff);
        prog.f32(&gl, "u_alpha", params.alpha);
        prog.f32(&gl, "u_dissipation", params.dissipation);
        prog.f32(&gl, "u_gain", VELOCITY_GAIN);
        prog.f32(&gl, "u_encoded", encoded);
        gl::draw_fullscreen(&gl);
        s.flow.swap();

        // Image: per-channel offsets along the flow, blended with the
        // previous frame where the flow is strong.
        s.display.write().bind(&gl);
        let prog = &programs.distort;
        prog.bind(&gl);
        prog.texture(&gl, "u_image", 0, &s.image);
        prog.texture(&gl, "u_flow", 1, &s.flow.read().texture);
        prog.texture(&gl, "u_previous", 2, &s.display.read().texture);
        prog.vec2(&gl, "u_cover", cover_scale(s.image_aspect, aspect));
        prog.f32(&gl, "u_aberration", params.aberration);
        prog.f32(&gl, "u_blur", params.blur);
        prog.f32(&gl, "u_encoded", encoded);
        gl::draw_fullscreen(&gl);

        gl::bind_screen(&gl, &canvas);
        let prog = &programs.blit;
        prog.bind(&gl);
        prog.texture(&gl, "u_source", 0, &s.display.write().texture);
        gl::draw_fullscreen(&gl);
        s.display.swap();
    })?;

    let created = placed.keep();
    Ok(Some(
        EffectHandle::new("flowmap", Some(frames), listeners).on_stop(move || created.remove()),
    ))
}
