use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec2};
use wasm_bindgen::JsValue;
use web_sys::{Document, MouseEvent, WebGl2RenderingContext as GL};

use super::dom::{self, Listeners};
use super::frame_loop::{EffectHandle, FrameLoop};
use super::gl::{Attribute, Mesh, Program};
use super::panel::Panel;
use super::shaders;
use crate::tunnel::{Orbit, Tunnel, TunnelParams, WireCylinder};

pub const ANCHOR: &str = "[data-fx-tunnel]";
pub const PANEL: &str = "[data-fx-tunnel-panel]";

struct Drag {
    orbit: Orbit,
    last: Option<Vec2>,
}

fn upload(gl: &GL, geometry: &WireCylinder) -> Result<Mesh, JsValue> {
    Ok(Mesh::new(
        gl,
        GL::LINES,
        &geometry.positions,
        Some(&geometry.indices),
        &[Attribute { location: 0, size: 3 }],
    )?)
}

pub fn mount(document: &Document) -> Result<Option<EffectHandle>, JsValue> {
    let Some(anchor) = dom::query(document, ANCHOR)? else {
        return Ok(None);
    };
    let initial: TunnelParams = dom::params(&anchor);

    let placed = dom::fill_canvas(document, &anchor)?;
    let canvas = placed.canvas().clone();
    dom::fit_canvas(&canvas);
    let gl = super::gl::context(&canvas)?;
    let program = Program::new(&gl, shaders::TUNNEL_VERTEX, shaders::TUNNEL_FRAGMENT)?;

    let params = Rc::new(RefCell::new(initial));
    let drag = Rc::new(RefCell::new(Drag {
        orbit: Orbit::default(),
        last: None,
    }));
    let mut listeners = Listeners::new();

    let panel = dom::query(document, PANEL)?
        .map(|container| Panel::build(document, &container, params.clone(), &mut listeners))
        .transpose()?;

    {
        let drag = drag.clone();
        listeners.on(&canvas, "pointerdown", move |ev: MouseEvent| {
            drag.borrow_mut().last = Some(Vec2::new(ev.client_x() as f32, ev.client_y() as f32));
        })?;
    }
    {
        let drag = drag.clone();
        listeners.on(&dom::window()?, "pointermove", move |ev: MouseEvent| {
            let mut d = drag.borrow_mut();
            if let Some(last) = d.last {
                let at = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
                let delta = at - last;
                d.orbit.drag(delta.x, delta.y);
                d.last = Some(at);
            }
        })?;
    }
    {
        let drag = drag.clone();
        listeners.on(&dom::window()?, "pointerup", move |_: MouseEvent| {
            drag.borrow_mut().last = None;
        })?;
    }
    {
        let canvas = canvas.clone();
        listeners.on(&dom::window()?, "resize", move |_: web_sys::Event| {
            dom::fit_canvas(&canvas);
        })?;
    }

    let mut tunnel = Tunnel::new(initial);
    let mut lines = upload(&gl, tunnel.geometry())?;
    let frames = FrameLoop::start(move |_dt| {
        if tunnel.sync(*params.borrow()) {
            lines.delete(&gl);
            match upload(&gl, tunnel.geometry()) {
                Ok(mesh) => lines = mesh,
                Err(err) => {
                    log::error!("tunnel: rebuilding geometry: {err:?}");
                    return;
                }
            }
        }
        tunnel.tick();

        let orbit = drag.borrow().orbit;
        if let Some(panel) = &panel {
            panel.show_camera(orbit.position());
        }

        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        let projection = Mat4::perspective_rh_gl(60f32.to_radians(), w / h.max(1.0), 0.1, 500.0);
        super::gl::bind_screen(&gl, &canvas);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

        let p = tunnel.params();
        program.bind(&gl);
        program.mat4(&gl, "u_projection", &projection);
        program.mat4(&gl, "u_view", &orbit.view());
        program.mat4(&gl, "u_model", &tunnel.model());
        program.f32(&gl, "u_length", p.length);
        program.f32(&gl, "u_fade", p.fade);
        program.vec3(&gl, "u_color", [0.85, 0.9, 1.0]);
        lines.draw(&gl);
    })?;

    let created = placed.keep();
    Ok(Some(
        EffectHandle::new("tunnel", Some(frames), listeners).on_stop(move || created.remove()),
    ))
}
