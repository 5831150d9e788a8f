use glam::{Mat4, Vec3};
use wasm_bindgen::JsValue;
use web_sys::{Document, Event, WebGl2RenderingContext as GL};

use super::dom::{self, Listeners};
use super::frame_loop::{EffectHandle, FrameLoop};
use super::gl::{self, Attribute, Mesh, Program};
use super::shaders;
use crate::cube::{self, Spinner};

pub const ANCHOR: &str = "[data-fx-cube]";

pub fn mount(document: &Document) -> Result<Option<EffectHandle>, JsValue> {
    let Some(anchor) = dom::query(document, ANCHOR)? else {
        return Ok(None);
    };
    let placed = dom::fill_canvas(document, &anchor)?;
    let canvas = placed.canvas().clone();
    dom::fit_canvas(&canvas);
    let gl = gl::context(&canvas)?;
    let program = Program::new(&gl, shaders::MESH_VERTEX, shaders::MESH_FRAGMENT)?;
    let mesh = Mesh::new(
        &gl,
        GL::TRIANGLES,
        &cube::mesh(),
        None,
        &[
            Attribute { location: 0, size: 3 },
            Attribute { location: 1, size: 3 },
        ],
    )?;

    let mut listeners = Listeners::new();
    {
        let canvas = canvas.clone();
        listeners.on(&dom::window()?, "resize", move |_: Event| {
            dom::fit_canvas(&canvas);
        })?;
    }

    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 2.5), Vec3::ZERO, Vec3::Y);
    let mut spinner = Spinner::default();
    let frames = FrameLoop::start(move |_dt| {
        spinner.tick();
        let aspect = canvas.width() as f32 / canvas.height().max(1) as f32;
        gl::bind_screen(&gl, &canvas);
        gl.enable(GL::DEPTH_TEST);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        program.bind(&gl);
        program.mat4(
            &gl,
            "u_projection",
            &Mat4::perspective_rh_gl(50f32.to_radians(), aspect, 0.1, 100.0),
        );
        program.mat4(&gl, "u_view", &view);
        program.mat4(&gl, "u_model", &spinner.model());
        program.vec3(&gl, "u_color", [0.4, 0.7, 1.0]);
        program.vec3(&gl, "u_light", [0.5, 0.8, 1.0]);
        mesh.draw(&gl);
    })?;

    let created = placed.keep();
    Ok(Some(
        EffectHandle::new("cube", Some(frames), listeners).on_stop(move || created.remove()),
    ))
}
