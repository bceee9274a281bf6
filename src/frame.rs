use crate::core::{scatter_particles, FieldPose, PARTICLE_COUNT, PARTICLE_SPREAD};
use crate::events::PointerOffset;
use crate::render;
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub gpu: render::GpuState<'a>,
    pub canvas: web::HtmlCanvasElement,
    pub pointer: PointerOffset,
    pub started: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let elapsed = self.started.elapsed().as_secs_f32();
        let pose = FieldPose::at(elapsed, self.pointer.get());
        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());
        match self.gpu.render(&pose) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.gpu.reconfigure(),
            Err(e) => log::warn!("[frame] render skipped: {:?}", e),
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    let positions = scatter_particles(&mut StdRng::from_entropy(), PARTICLE_COUNT, PARTICLE_SPREAD);
    match render::GpuState::new(leaked_canvas, &positions).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Endless rAF loop; the background never stops once started.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_tick(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_tick(&tick);
}

fn request_tick(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
