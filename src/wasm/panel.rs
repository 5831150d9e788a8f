//! Minimal debug panel for the tunnel: sliders in, camera readout out.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlInputElement};

use super::dom::Listeners;
use crate::tunnel::{
    TunnelParams, MAX_LENGTH_SEGMENTS, MAX_RADIAL_SEGMENTS, MIN_LENGTH_SEGMENTS,
    MIN_RADIAL_SEGMENTS,
};

struct Knob {
    label: &'static str,
    min: f32,
    max: f32,
    step: f32,
    get: fn(&TunnelParams) -> f32,
    set: fn(&mut TunnelParams, f32),
}

const KNOBS: &[Knob] = &[
    Knob {
        label: "radius",
        min: 0.5,
        max: 10.0,
        step: 0.1,
        get: |p| p.radius,
        set: |p, v| p.radius = v,
    },
    Knob {
        label: "length",
        min: 5.0,
        max: 200.0,
        step: 1.0,
        get: |p| p.length,
        set: |p, v| p.length = v,
    },
    Knob {
        label: "radial segments",
        min: MIN_RADIAL_SEGMENTS as f32,
        max: MAX_RADIAL_SEGMENTS as f32,
        step: 1.0,
        get: |p| p.radial_segments as f32,
        set: |p, v| p.radial_segments = v as u32,
    },
    Knob {
        label: "length segments",
        min: MIN_LENGTH_SEGMENTS as f32,
        max: MAX_LENGTH_SEGMENTS as f32,
        step: 1.0,
        get: |p| p.length_segments as f32,
        set: |p, v| p.length_segments = v as u32,
    },
    Knob {
        label: "rotation speed",
        min: -0.05,
        max: 0.05,
        step: 0.0005,
        get: |p| p.rotation_speed,
        set: |p, v| p.rotation_speed = v,
    },
    Knob {
        label: "fade",
        min: 0.0,
        max: 1.0,
        step: 0.01,
        get: |p| p.fade,
        set: |p, v| p.fade = v,
    },
];

/// Rows are detached again when the panel is dropped.
pub struct Panel {
    rows: Vec<Element>,
    camera: [HtmlInputElement; 3],
}

fn input(
    document: &Document,
    container: &Element,
    rows: &mut Vec<Element>,
    label: &str,
) -> Result<HtmlInputElement, JsValue> {
    let row = document.create_element("label")?;
    row.set_text_content(Some(label));
    let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
    row.append_child(&input)?;
    container.append_child(&row)?;
    rows.push(row);
    Ok(input)
}

fn detach(rows: &[Element]) {
    for row in rows {
        row.remove();
    }
}

impl Panel {
    /// Populates `container`; slider edits write into `params`.
    pub fn build(
        document: &Document,
        container: &Element,
        params: Rc<RefCell<TunnelParams>>,
        listeners: &mut Listeners,
    ) -> Result<Self, JsValue> {
        let mut rows = Vec::new();
        let built = Self::populate(document, container, params, listeners, &mut rows);
        if built.is_err() {
            detach(&rows);
        }
        let camera = built?;
        Ok(Self { rows, camera })
    }

    fn populate(
        document: &Document,
        container: &Element,
        params: Rc<RefCell<TunnelParams>>,
        listeners: &mut Listeners,
        rows: &mut Vec<Element>,
    ) -> Result<[HtmlInputElement; 3], JsValue> {
        for knob in KNOBS {
            let slider = input(document, container, rows, knob.label)?;
            slider.set_type("range");
            slider.set_min(&knob.min.to_string());
            slider.set_max(&knob.max.to_string());
            slider.set_step(&knob.step.to_string());
            slider.set_value(&(knob.get)(&params.borrow()).to_string());

            let params = params.clone();
            let source = slider.clone();
            let set = knob.set;
            listeners.on(&slider, "input", move |_: Event| {
                if let Ok(v) = source.value().parse::<f32>() {
                    set(&mut params.borrow_mut(), v);
                }
            })?;
        }

        let mut camera = Vec::with_capacity(3);
        for axis in ["camera x", "camera y", "camera z"] {
            let field = input(document, container, rows, axis)?;
            field.set_read_only(true);
            camera.push(field);
        }
        camera
            .try_into()
            .map_err(|_| JsValue::from_str("camera fields"))
    }

    /// Mirrors the live camera position into the read-only fields.
    pub fn show_camera(&self, position: Vec3) {
        for (field, v) in self.camera.iter().zip(position.to_array()) {
            field.set_value(&format!("{v:.2}"));
        }
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        detach(&self.rows);
    }
}
