use crate::core::{glyphs_to_markup, Glyph, TextSurface};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// All elements matching `selector`, cast to `HtmlElement`; non-HTML matches are skipped.
pub fn query_all(document: &web::Document, selector: &str) -> Vec<web::HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        log::warn!("invalid selector {selector}");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<web::HtmlElement>().ok())
        .collect()
}

pub fn query_one(document: &web::Document, selector: &str) -> Option<web::HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

/// Attach a listener for the lifetime of the page.
pub fn listen<E>(target: &web::EventTarget, event: &str, handler: impl FnMut(E) + 'static)
where
    E: wasm_bindgen::convert::FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if let Err(e) =
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::error!("add_event_listener({event}) failed: {:?}", e);
    }
    closure.forget();
}

/// Whether the event's target is `container` or one of its descendants.
pub fn event_inside(ev: &web::Event, container: &web::Element) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Node>().ok())
        .map(|node| container.contains(Some(&node)))
        .unwrap_or(false)
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// A DOM element as a scramble target: reads `innerText`, writes `innerHTML`.
pub struct ElementSurface {
    element: web::HtmlElement,
}

impl ElementSurface {
    pub fn new(element: web::HtmlElement) -> Self {
        Self { element }
    }
}

impl TextSurface for ElementSurface {
    fn read_text(&self) -> String {
        self.element.inner_text()
    }

    fn write_frame(&mut self, glyphs: &[Glyph]) {
        self.element.set_inner_html(&glyphs_to_markup(glyphs));
    }
}
