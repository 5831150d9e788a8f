use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, MouseEvent, WebGl2RenderingContext as GL, WebGlTexture};

use super::dom::{self, Listeners};
use super::frame_loop::{EffectHandle, FrameLoop};
use super::gl::{self, Attribute, Mesh, Program};
use super::shaders;
use crate::hover::{HoverParams, HoverPreview};

pub const TRIGGERS: &str = "[data-fx-hover]";
const SRC_ATTR: &str = "data-src";
const GRID: u32 = 32;

/// Unit-square grid (uv in [0, 1]) dense enough for the ripple to bend.
fn plane(segments: u32) -> (Vec<f32>, Vec<u32>) {
    let n = segments + 1;
    let mut uv = Vec::with_capacity((n * n * 2) as usize);
    for y in 0..n {
        for x in 0..n {
            uv.extend_from_slice(&[x as f32 / segments as f32, y as f32 / segments as f32]);
        }
    }
    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for y in 0..segments {
        for x in 0..segments {
            let i = y * n + x;
            indices.extend_from_slice(&[i, i + 1, i + n, i + 1, i + n + 1, i + n]);
        }
    }
    (uv, indices)
}

fn set_opacity(triggers: &[Element], opacity: f32) {
    for el in triggers {
        if let Some(el) = el.dyn_ref::<HtmlElement>() {
            el.style().set_property("opacity", &opacity.to_string()).ok();
        }
    }
}

pub fn mount(document: &Document) -> Result<Option<EffectHandle>, JsValue> {
    let triggers = dom::query_all(document, TRIGGERS)?;
    if triggers.is_empty() {
        return Ok(None);
    }
    let body = document.body().ok_or("no body")?;
    let params: HoverParams = dom::params(&triggers[0]);

    let placed = dom::viewport_canvas(document, &body, 50)?;
    let canvas = placed.canvas().clone();
    let (vw, vh) = dom::viewport_size()?;
    dom::size_canvas(&canvas, vw, vh);
    let gl = gl::context(&canvas)?;
    let program = Program::new(&gl, shaders::HOVER_VERTEX, shaders::HOVER_FRAGMENT)?;
    let (uv, indices) = plane(GRID);
    let mesh = Mesh::new(
        &gl,
        GL::TRIANGLES,
        &uv,
        Some(&indices),
        &[Attribute { location: 0, size: 2 }],
    )?;

    let textures: Rc<RefCell<Vec<Option<WebGlTexture>>>> =
        Rc::new(RefCell::new(vec![None; triggers.len()]));
    for (i, trigger) in triggers.iter().enumerate() {
        let Some(src) = trigger.get_attribute(SRC_ATTR) else {
            continue;
        };
        let gl = gl.clone();
        let textures = textures.clone();
        dom::load_image(&src, move |image| match gl::image_texture(&gl, &image) {
            Ok(tex) => textures.borrow_mut()[i] = Some(tex),
            Err(err) => log::warn!("hover preview {i}: {err}"),
        })?;
    }

    let state = Rc::new(RefCell::new(HoverPreview::new(triggers.len(), params)));
    let triggers = Rc::new(triggers);
    let mut listeners = Listeners::new();

    for (i, trigger) in triggers.iter().enumerate() {
        let on_enter = state.clone();
        listeners.on(trigger, "mouseenter", move |_: MouseEvent| {
            on_enter.borrow_mut().enter_trigger(i);
        })?;
        let on_leave = state.clone();
        listeners.on(trigger, "mouseleave", move |_: MouseEvent| {
            on_leave.borrow_mut().leave_trigger();
        })?;
    }
    {
        let state = state.clone();
        let triggers = triggers.clone();
        listeners.on(&body, "mouseenter", move |_: MouseEvent| {
            let mut s = state.borrow_mut();
            s.enter_page();
            set_opacity(&triggers, s.trigger_opacity());
        })?;
    }
    {
        let state = state.clone();
        let triggers = triggers.clone();
        listeners.on(&body, "mouseleave", move |_: MouseEvent| {
            let mut s = state.borrow_mut();
            s.leave_page();
            set_opacity(&triggers, s.trigger_opacity());
        })?;
    }
    {
        let state = state.clone();
        listeners.on(&dom::window()?, "mousemove", move |ev: MouseEvent| {
            state
                .borrow_mut()
                .pointer_move(Vec2::new(ev.client_x() as f32, ev.client_y() as f32));
        })?;
    }
    {
        let canvas = canvas.clone();
        listeners.on(&dom::window()?, "resize", move |_: Event| {
            if let Ok((w, h)) = dom::viewport_size() {
                dom::size_canvas(&canvas, w, h);
            }
        })?;
    }

    let frames = FrameLoop::start(move |dt| {
        let mut s = state.borrow_mut();
        s.tick(dt);

        gl::bind_screen(&gl, &canvas);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        let textures = textures.borrow();
        let Some(texture) = s.active().and_then(|i| textures[i].as_ref()) else {
            return;
        };
        if s.alpha() <= 0.0 {
            return;
        }
        // Plane geometry is laid out in CSS pixels.
        let dpr = dom::pixel_ratio() as f32;
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        program.bind(&gl);
        program.vec2(
            &gl,
            "u_resolution",
            [canvas.width() as f32 / dpr, canvas.height() as f32 / dpr],
        );
        program.vec2(&gl, "u_center", s.position().to_array());
        program.vec2(&gl, "u_size", [s.params.width, s.params.height]);
        program.vec2(&gl, "u_ripple", s.ripple().to_array());
        program.f32(&gl, "u_alpha", s.alpha());
        program.texture(&gl, "u_image", 0, texture);
        mesh.draw(&gl);
    })?;

    let restore = triggers.clone();
    let created = placed.keep();
    Ok(Some(
        EffectHandle::new("hover-preview", Some(frames), listeners).on_stop(move || {
            created.remove();
            set_opacity(&restore, 1.0);
        }),
    ))
}
