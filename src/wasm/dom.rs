//! DOM lookups, listener bookkeeping and one-shot asset loads.

use serde::de::DeserializeOwned;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlImageElement,
    Response, Window,
};

use crate::config::{self, CONFIG_ATTR};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| "no window".into())
}

pub fn document() -> Result<Document, JsValue> {
    window()?.document().ok_or_else(|| "no document".into())
}

pub fn query(root: &Document, selector: &str) -> Result<Option<Element>, JsValue> {
    root.query_selector(selector)
}

pub fn query_all(root: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = root.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Parameter record from the element's `data-fx-config` attribute.
pub fn params<T: DeserializeOwned + Default>(el: &Element) -> T {
    config::params_or_default(el.get_attribute(CONFIG_ATTR).as_deref())
}

pub fn pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| config::clamp_pixel_ratio(w.device_pixel_ratio()))
        .unwrap_or(1.0)
}

pub fn viewport_size() -> Result<(f64, f64), JsValue> {
    let w = window()?;
    let width = w.inner_width()?.as_f64().unwrap_or(0.0);
    let height = w.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width, height))
}

pub fn scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

/// A canvas a unit inserted, plus the parent style it had to change.
#[derive(Clone)]
pub struct Placement {
    pub canvas: HtmlCanvasElement,
    /// Parent whose inline `position` was overwritten, with the old value.
    relocated: Option<(HtmlElement, String)>,
}

impl Placement {
    /// Detaches the canvas and puts the parent's inline style back.
    pub fn remove(&self) {
        self.canvas.remove();
        if let Some((parent, previous)) = &self.relocated {
            let style = parent.style();
            let restored = if previous.is_empty() {
                style.remove_property("position").map(drop)
            } else {
                style.set_property("position", previous)
            };
            if let Err(err) = restored {
                log::warn!("restoring parent position: {err:?}");
            }
        }
    }
}

/// Undoes a placement on drop unless the unit finished mounting and called
/// `keep`.
pub struct PlacementGuard {
    placement: Placement,
    armed: bool,
}

impl PlacementGuard {
    fn new(placement: Placement) -> Self {
        Self {
            placement,
            armed: true,
        }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.placement.canvas
    }

    pub fn keep(mut self) -> Placement {
        self.armed = false;
        self.placement.clone()
    }
}

impl Drop for PlacementGuard {
    fn drop(&mut self) {
        if self.armed {
            self.placement.remove();
        }
    }
}

/// Creates a canvas that fills `parent` (absolutely positioned inside it).
pub fn fill_canvas(document: &Document, parent: &Element) -> Result<PlacementGuard, JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    let style = canvas.style();
    style.set_property("position", "absolute")?;
    style.set_property("inset", "0")?;
    style.set_property("width", "100%")?;
    style.set_property("height", "100%")?;
    style.set_property("display", "block")?;

    let mut relocated = None;
    if let Some(parent) = parent.dyn_ref::<HtmlElement>() {
        let computed = window()?
            .get_computed_style(parent)?
            .map(|s| s.get_property_value("position"))
            .transpose()?;
        if computed.as_deref() == Some("static") {
            let previous = parent.style().get_property_value("position")?;
            parent.style().set_property("position", "relative")?;
            relocated = Some((parent.clone(), previous));
        }
    }
    let guard = PlacementGuard::new(Placement { canvas, relocated });
    parent.append_child(guard.canvas())?;
    Ok(guard)
}

/// Creates a fixed canvas covering the viewport, ignoring pointer input.
pub fn viewport_canvas(
    document: &Document,
    parent: &Element,
    z_index: i32,
) -> Result<PlacementGuard, JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    let style = canvas.style();
    style.set_property("position", "fixed")?;
    style.set_property("top", "0")?;
    style.set_property("left", "0")?;
    style.set_property("width", "100vw")?;
    style.set_property("height", "100vh")?;
    style.set_property("pointer-events", "none")?;
    style.set_property("z-index", &z_index.to_string())?;
    let guard = PlacementGuard::new(Placement {
        canvas,
        relocated: None,
    });
    parent.insert_before(guard.canvas(), parent.first_child().as_ref())?;
    Ok(guard)
}

/// Sizes the backing store to `css` size at the device pixel ratio.
pub fn size_canvas(canvas: &HtmlCanvasElement, css_width: f64, css_height: f64) -> (u32, u32) {
    let (w, h) = config::surface_size(css_width, css_height, pixel_ratio());
    if canvas.width() != w || canvas.height() != h {
        canvas.set_width(w);
        canvas.set_height(h);
    }
    (w, h)
}

/// Sizes the canvas backing store to its own layout box.
pub fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
    let rect = canvas.get_bounding_client_rect();
    size_canvas(canvas, rect.width(), rect.height())
}

type Callback = Closure<dyn FnMut(Event)>;

/// Listeners registered by one effect unit; removed on `clear` or drop.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(EventTarget, &'static str, Callback)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener whose event is downcast to `E`; events of another
    /// type are ignored.
    pub fn on<E, F>(&mut self, target: &EventTarget, event: &'static str, mut f: F) -> Result<(), JsValue>
    where
        E: JsCast,
        F: FnMut(E) + 'static,
    {
        let closure = Closure::wrap(Box::new(move |ev: Event| {
            if let Ok(ev) = ev.dyn_into::<E>() {
                f(ev);
            }
        }) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.entries.push((target.clone(), event, closure));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        for (target, event, closure) in self.entries.drain(..) {
            if let Err(err) = target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            {
                log::warn!("removing {event} listener: {err:?}");
            }
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Starts loading an image; `on_load` runs once it decodes. A failed load
/// is logged and `on_load` never runs.
pub fn load_image<F>(url: &str, on_load: F) -> Result<(), JsValue>
where
    F: FnOnce(HtmlImageElement) + 'static,
{
    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));
    let loaded = image.clone();
    let onload = Closure::once_into_js(move || on_load(loaded));
    image.set_onload(Some(onload.unchecked_ref()));
    let src = url.to_owned();
    let onerror = Closure::once_into_js(move || log::warn!("image failed to load: {src}"));
    image.set_onerror(Some(onerror.unchecked_ref()));
    image.set_src(url);
    Ok(())
}

pub async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let response: Response = JsFuture::from(window()?.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(format!("HTTP {} for {url}", response.status()).into());
    }
    JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| "response body is not text".into())
}
