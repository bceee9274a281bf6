#![cfg(target_arch = "wasm32")]
use crate::core::ScrambleConfig;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod render;
mod scheduler;

fn wire_canvas_resize(window: &web::Window, canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    dom::listen(window, "resize", move |_ev: web::Event| {
        dom::sync_canvas_backing_size(&canvas_resize);
    });
}

async fn init_background(
    window: web::Window,
    document: web::Document,
    pointer: events::PointerOffset,
) -> anyhow::Result<()> {
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(constants::BG_CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::BG_CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&window, &canvas);

    let gpu = frame::init_gpu(&canvas)
        .await
        .ok_or_else(|| anyhow::anyhow!("background disabled: no GPU"))?;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        gpu,
        canvas,
        pointer,
        started: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("neon-fx starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    // Each effect is independent; one failing leaves the others running.
    let targets = events::collect_targets(&document);
    if let Err(e) = events::wire_scramble_targets(&targets, &ScrambleConfig::default()) {
        log::error!("[scramble] {:?}", e);
    }
    events::wire_cursor(&window, &document);
    events::wire_mobile_menu(&document);

    let pointer = events::wire_background_pointer(&document);
    spawn_local(async move {
        if let Err(e) = init_background(window, document, pointer).await {
            log::error!("[background] {:?}", e);
        }
    });

    Ok(())
}
