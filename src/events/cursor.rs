use crate::constants::{CURSOR_DOT_SELECTOR, CURSOR_RING_SELECTOR};
use crate::core::cursor::{px, ring_style, INTERACTIVE_SELECTOR, RING_LAG_MS};
use crate::dom;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn place(el: &web::HtmlElement, x: i32, y: i32) {
    let style = el.style();
    _ = style.set_property("left", &px(x));
    _ = style.set_property("top", &px(y));
}

fn apply_ring_style(ring: &web::HtmlElement, hovering: bool) {
    let s = ring_style(hovering);
    let style = ring.style();
    _ = style.set_property("transform", s.transform);
    _ = style.set_property("border-color", s.border_color);
}

/// Dot tracks the pointer directly; the ring trails it by `RING_LAG_MS`.
pub fn wire_cursor(window: &web::Window, document: &web::Document) {
    let (Some(dot), Some(ring)) = (
        dom::query_one(document, CURSOR_DOT_SELECTOR),
        dom::query_one(document, CURSOR_RING_SELECTOR),
    ) else {
        log::info!("[cursor] no cursor elements, follower disabled");
        return;
    };

    let timer_window = window.clone();
    let ring_follow = ring.clone();
    dom::listen(window, "mousemove", move |ev: web::MouseEvent| {
        let (x, y) = (ev.client_x(), ev.client_y());
        place(&dot, x, y);
        let ring = ring_follow.clone();
        let lagged = Closure::once_into_js(move || place(&ring, x, y));
        _ = timer_window.set_timeout_with_callback_and_timeout_and_arguments_0(
            lagged.unchecked_ref(),
            RING_LAG_MS,
        );
    });

    let interactive = dom::query_all(document, INTERACTIVE_SELECTOR);
    for el in &interactive {
        let ring_enter = ring.clone();
        dom::listen(el, "mouseenter", move |_ev: web::MouseEvent| {
            apply_ring_style(&ring_enter, true);
        });
        let ring_leave = ring.clone();
        dom::listen(el, "mouseleave", move |_ev: web::MouseEvent| {
            apply_ring_style(&ring_leave, false);
        });
    }
    log::info!("[cursor] follower wired, {} interactive elements", interactive.len());
}
