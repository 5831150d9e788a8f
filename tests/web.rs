#![cfg(target_arch = "wasm32")]

use fx_wasm::Unit;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas_count(document: &web_sys::Document) -> u32 {
    document.query_selector_all("canvas").unwrap().length()
}

#[wasm_bindgen_test]
fn absent_anchors_mount_nothing() {
    let document = web_sys::window().unwrap().document().unwrap();
    for unit in Unit::ALL {
        assert!(document.query_selector(unit.anchor()).unwrap().is_none());
    }
    let before = canvas_count(&document);

    for unit in Unit::ALL {
        let handle = unit.mount(&document).expect("mount must not fail without an anchor");
        assert!(handle.is_none(), "{unit:?} mounted without its anchor");
    }
    assert!(fx_wasm::mount_all(&document).is_empty());
    assert_eq!(canvas_count(&document), before);
}

fn cube_anchor(document: &web_sys::Document) -> web_sys::HtmlElement {
    let anchor: web_sys::HtmlElement = document
        .create_element("div")
        .unwrap()
        .dyn_into()
        .unwrap();
    anchor.set_attribute("data-fx-cube", "").unwrap();
    anchor.set_attribute("style", "width: 200px; height: 200px").unwrap();
    document.body().unwrap().append_child(&anchor).unwrap();
    anchor
}

fn untouched(anchor: &web_sys::HtmlElement) -> bool {
    anchor.query_selector_all("canvas").unwrap().length() == 0
        && anchor.style().get_property_value("position").unwrap().is_empty()
}

#[wasm_bindgen_test]
fn cube_mounts_and_stops() {
    let document = web_sys::window().unwrap().document().unwrap();
    let anchor = cube_anchor(&document);

    match Unit::Cube.mount(&document) {
        Ok(Some(handle)) => {
            assert_eq!(anchor.query_selector_all("canvas").unwrap().length(), 1);
            assert!(handle.is_running());
            assert_eq!(handle.listener_count(), 1);
            handle.stop();
            assert!(untouched(&anchor));
        }
        Ok(None) => panic!("anchor present but cube did not mount"),
        // Headless runners without WebGL2 fail here; the anchor must be left
        // as it was.
        Err(err) => {
            web_sys::console::log_1(&err);
            assert!(untouched(&anchor));
        }
    }
    anchor.remove();
}

#[wasm_bindgen_test]
fn dropped_handle_stops_its_loop() {
    let document = web_sys::window().unwrap().document().unwrap();
    let anchor = cube_anchor(&document);

    if let Ok(Some(handle)) = Unit::Cube.mount(&document) {
        let token = handle.cancel_token().expect("cube runs a frame loop");
        assert!(!token.is_cancelled());
        drop(handle);
        assert!(token.is_cancelled());
        assert!(untouched(&anchor));
    } else {
        assert!(untouched(&anchor));
    }
    anchor.remove();
}
