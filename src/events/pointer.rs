use crate::core::pointer_offset;
use crate::dom;
use std::cell::Cell;
use std::rc::Rc;
use web_sys as web;

/// Normalized pointer offset in `[-0.5, 0.5]`, read by the background loop.
pub type PointerOffset = Rc<Cell<[f32; 2]>>;

pub fn wire_background_pointer(document: &web::Document) -> PointerOffset {
    let offset: PointerOffset = Rc::new(Cell::new([0.0, 0.0]));
    let shared = offset.clone();
    dom::listen(document, "mousemove", move |ev: web::MouseEvent| {
        let Some(w) = web::window() else {
            return;
        };
        let vw = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
        let vh = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
        shared.set(pointer_offset(ev.client_x() as f32, ev.client_y() as f32, vw, vh));
    });
    offset
}
