use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::Document;

mod cube;
mod dom;
mod flowmap;
mod fluid;
mod frame_loop;
mod gl;
mod hover;
mod mouse_distortion;
mod panel;
mod shaders;
mod tunnel;
mod viewer;

pub use frame_loop::EffectHandle;

/// The independent effect units a page may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Tunnel,
    HoverPreview,
    ProductViewer,
    Cube,
    Flowmap,
    MouseDistortion,
    FluidBackground,
}

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::Tunnel,
        Unit::HoverPreview,
        Unit::ProductViewer,
        Unit::Cube,
        Unit::Flowmap,
        Unit::MouseDistortion,
        Unit::FluidBackground,
    ];

    /// Selector of the element whose presence activates the unit.
    pub fn anchor(self) -> &'static str {
        match self {
            Unit::Tunnel => tunnel::ANCHOR,
            Unit::HoverPreview => hover::TRIGGERS,
            Unit::ProductViewer => viewer::ANCHOR,
            Unit::Cube => cube::ANCHOR,
            Unit::Flowmap => flowmap::ANCHOR,
            Unit::MouseDistortion => mouse_distortion::ANCHOR,
            Unit::FluidBackground => fluid::ANCHOR,
        }
    }

    /// Mounts the unit. `Ok(None)` when its anchor is absent: nothing is
    /// allocated and no listener is registered.
    pub fn mount(self, document: &Document) -> Result<Option<EffectHandle>, JsValue> {
        match self {
            Unit::Tunnel => tunnel::mount(document),
            Unit::HoverPreview => hover::mount(document),
            Unit::ProductViewer => viewer::mount(document),
            Unit::Cube => cube::mount(document),
            Unit::Flowmap => flowmap::mount(document),
            Unit::MouseDistortion => mouse_distortion::mount(document),
            Unit::FluidBackground => fluid::mount(document),
        }
    }
}

thread_local! {
    static MOUNTED: RefCell<Vec<EffectHandle>> = const { RefCell::new(Vec::new()) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let handles = mount_all(&dom::document()?);
    log::info!("{} effect unit(s) mounted", handles.len());
    MOUNTED.with(|m| m.borrow_mut().extend(handles));
    Ok(())
}

/// Mounts every unit whose anchor is on the page. A unit that fails to set
/// up is logged and skipped; the others still mount.
///
/// Units run only as long as their handles live; dropping the returned
/// handles stops them.
pub fn mount_all(document: &Document) -> Vec<EffectHandle> {
    let mut handles = Vec::new();
    for unit in Unit::ALL {
        match unit.mount(document) {
            Ok(Some(handle)) => {
                log::info!("{}: mounted", handle.name());
                handles.push(handle);
            }
            Ok(None) => log::debug!("{unit:?}: no {} on page", unit.anchor()),
            Err(err) => log::error!("{unit:?}: {err:?}"),
        }
    }
    handles
}

/// Stops every mounted unit (page teardown).
#[wasm_bindgen]
pub fn stop_effects() {
    let handles: Vec<EffectHandle> = MOUNTED.with(|m| m.borrow_mut().drain(..).collect());
    for handle in handles {
        handle.stop();
    }
}
