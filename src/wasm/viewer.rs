use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, WebGl2RenderingContext as GL};

use super::dom::{self, Listeners};
use super::frame_loop::{EffectHandle, FrameLoop};
use super::gl::{self, Attribute, Mesh, Program};
use super::shaders;
use crate::model::ModelData;
use crate::scroll::{Region, ScrollTracker};
use crate::viewer::{Viewer, ViewerEvent, ViewerParams};

pub const ANCHOR: &str = "[data-fx-viewer]";
pub const REGIONS: &str = "[data-fx-region]";
const MODEL_ATTR: &str = "data-model";

/// Region boxes in document coordinates, in page order.
fn layout(regions: &[Element]) -> Vec<Region> {
    let scroll = dom::scroll_y();
    regions
        .iter()
        .map(|el| {
            let rect = el.get_bounding_client_rect();
            Region::from_box((rect.top() + scroll) as f32, rect.height() as f32)
        })
        .collect()
}

struct Scene {
    viewer: Viewer,
    tracker: ScrollTracker,
}

impl Scene {
    fn on_scroll(&mut self) {
        for event in self.tracker.update(dom::scroll_y() as f32) {
            log::debug!("viewer: {event:?}");
            self.viewer.handle(ViewerEvent::Region(event));
        }
    }
}

pub fn mount(document: &Document) -> Result<Option<EffectHandle>, JsValue> {
    let Some(anchor) = dom::query(document, ANCHOR)? else {
        return Ok(None);
    };
    let params: ViewerParams = dom::params(&anchor);
    let url = anchor
        .get_attribute(MODEL_ATTR)
        .ok_or("viewer anchor has no data-model")?;
    let regions = dom::query_all(document, REGIONS)?;

    let placed = dom::fill_canvas(document, &anchor)?;
    let canvas = placed.canvas().clone();
    dom::fit_canvas(&canvas);
    let gl = gl::context(&canvas)?;
    let program = Program::new(&gl, shaders::MESH_VERTEX, shaders::MESH_FRAGMENT)?;

    let mesh: Rc<RefCell<Option<Mesh>>> = Rc::new(RefCell::new(None));
    {
        let gl = gl.clone();
        let mesh = mesh.clone();
        spawn_local(async move {
            let model = match dom::fetch_text(&url).await {
                Ok(text) => ModelData::parse(&text).map_err(JsValue::from),
                Err(err) => Err(err),
            };
            let prepared = match model {
                Ok(model) => model.prepare(),
                Err(err) => {
                    log::warn!("viewer: loading {url}: {err:?}");
                    return;
                }
            };
            match Mesh::new(
                &gl,
                GL::TRIANGLES,
                &prepared.vertices,
                Some(&prepared.indices),
                &[
                    Attribute { location: 0, size: 3 },
                    Attribute { location: 1, size: 3 },
                ],
            ) {
                Ok(m) => *mesh.borrow_mut() = Some(m),
                Err(err) => log::error!("viewer: uploading mesh: {err}"),
            }
        });
    }

    let (_, vh) = dom::viewport_size()?;
    let scene = Rc::new(RefCell::new(Scene {
        viewer: Viewer::new(params),
        tracker: ScrollTracker::new(layout(&regions), params.marker, vh as f32),
    }));
    scene.borrow_mut().on_scroll();

    let regions = Rc::new(regions);
    let mut listeners = Listeners::new();
    {
        let scene = scene.clone();
        listeners.on(&dom::window()?, "scroll", move |_: Event| {
            scene.borrow_mut().on_scroll();
        })?;
    }
    {
        let scene = scene.clone();
        let canvas = canvas.clone();
        let regions = regions.clone();
        listeners.on(&dom::window()?, "resize", move |_: Event| {
            dom::fit_canvas(&canvas);
            let vh = dom::viewport_size().map(|(_, h)| h).unwrap_or(0.0);
            let mut scene = scene.borrow_mut();
            scene.tracker.relayout(layout(&regions), vh as f32);
            scene.on_scroll();
        })?;
    }

    let frames = FrameLoop::start(move |dt| {
        let mut scene = scene.borrow_mut();
        scene.viewer.advance(dt);

        gl::bind_screen(&gl, &canvas);
        gl.enable(GL::DEPTH_TEST);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        let mesh = mesh.borrow();
        let Some(mesh) = mesh.as_ref() else {
            return;
        };

        let aspect = canvas.width() as f32 / canvas.height().max(1) as f32;
        let eye = Vec3::new(0.0, 0.0, scene.viewer.camera_z());
        program.bind(&gl);
        program.mat4(
            &gl,
            "u_projection",
            &Mat4::perspective_rh_gl(45f32.to_radians(), aspect, 0.1, 100.0),
        );
        program.mat4(&gl, "u_view", &Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y));
        program.mat4(&gl, "u_model", &Mat4::from_rotation_y(scene.viewer.rotation()));
        program.vec3(&gl, "u_color", [0.9, 0.88, 0.85]);
        program.vec3(&gl, "u_light", [0.4, 1.0, 0.8]);
        mesh.draw(&gl);
    })?;

    let created = placed.keep();
    Ok(Some(
        EffectHandle::new("product-viewer", Some(frames), listeners)
            .on_stop(move || created.remove()),
    ))
}
