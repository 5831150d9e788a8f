use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, MouseEvent, MouseEventInit};

use super::dom::{self, Listeners};
use super::frame_loop::EffectHandle;
use crate::error::FxError;
use crate::fluid::{forward, FluidParams, SectionBounds, TriggerMode};

pub const ANCHOR: &str = "[data-fx-fluid]";
const TRIGGER_KEY: &str = "TRIGGER";

#[wasm_bindgen]
extern "C" {
    /// Solver script loaded by the page (`webgl-fluid`); it owns the canvas
    /// and its own frame loop from here on.
    #[wasm_bindgen(catch, js_name = WebGLFluid)]
    fn webgl_fluid(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<JsValue, JsValue>;
}

fn section_bounds(el: &web_sys::Element) -> SectionBounds {
    let r = el.get_bounding_client_rect();
    SectionBounds {
        left: r.left(),
        top: r.top(),
        width: r.width(),
        height: r.height(),
    }
}

fn set_trigger(config: &JsValue, mode: TriggerMode) {
    if let Err(err) = Reflect::set(config, &TRIGGER_KEY.into(), &mode.as_str().into()) {
        log::warn!("fluid: setting trigger: {err:?}");
    }
}

/// Replays a pointer sample on the solver canvas as a mouse move.
fn splat(canvas: &HtmlCanvasElement, x: f64, y: f64) -> Result<(), JsValue> {
    let init = MouseEventInit::new();
    init.set_client_x(x as i32);
    init.set_client_y(y as i32);
    init.set_bubbles(true);
    let event = MouseEvent::new_with_mouse_event_init_dict("mousemove", &init)?;
    canvas.dispatch_event(&event)?;
    Ok(())
}

pub fn mount(document: &Document) -> Result<Option<EffectHandle>, JsValue> {
    let Some(section) = dom::query(document, ANCHOR)? else {
        return Ok(None);
    };
    let params: FluidParams = dom::params(&section);

    let placed = dom::viewport_canvas(document, &section, -1)?;
    let canvas = placed.canvas().clone();
    let (vw, vh) = dom::viewport_size()?;
    dom::size_canvas(&canvas, vw, vh);

    let json = serde_json::to_string(&params).map_err(FxError::from)?;
    let config = js_sys::JSON::parse(&json)?;
    webgl_fluid(&canvas, &config)?;

    let config = Rc::new(config);
    let mut listeners = Listeners::new();
    {
        let section = section.clone();
        let canvas = canvas.clone();
        listeners.on(&dom::window()?, "pointermove", move |ev: MouseEvent| {
            let bounds = section_bounds(&section);
            if let Some((x, y)) = forward(&bounds, ev.client_x() as f64, ev.client_y() as f64) {
                if let Err(err) = splat(&canvas, x, y) {
                    log::warn!("fluid: forwarding pointer: {err:?}");
                }
            }
        })?;
    }
    for (event, inside) in [("pointerenter", true), ("pointerleave", false)] {
        let config = config.clone();
        listeners.on(&section, event, move |_: MouseEvent| {
            set_trigger(&config, TriggerMode::for_section(inside));
        })?;
    }

    let created = placed.keep();
    Ok(Some(
        EffectHandle::new("fluid-background", None, listeners).on_stop(move || created.remove()),
    ))
}
