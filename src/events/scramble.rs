use crate::constants::{
    SCRAMBLE_DONE_CLASS, SCRAMBLE_HOVER_CLASS, SCRAMBLE_SELECTOR, SCRAMBLE_TEXT_ATTR,
};
use crate::core::{
    resolve_target_text, should_trigger_on_visible, ScrambleAnimator, ScrambleConfig,
};
use crate::dom::{self, ElementSurface};
use crate::scheduler::RafScheduler;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type ElementAnimator = ScrambleAnimator<ElementSurface, RafScheduler, StdRng>;

/// One element to scramble and whether hovering it replays the effect.
#[derive(Clone)]
pub struct ScrambleTarget {
    pub element: web::HtmlElement,
    pub hover_retrigger: bool,
}

pub fn collect_targets(document: &web::Document) -> Vec<ScrambleTarget> {
    dom::query_all(document, SCRAMBLE_SELECTOR)
        .into_iter()
        .map(|element| {
            let hover_retrigger = element.class_list().contains(SCRAMBLE_HOVER_CLASS);
            ScrambleTarget {
                element,
                hover_retrigger,
            }
        })
        .collect()
}

fn target_text(element: &web::HtmlElement) -> String {
    resolve_target_text(element.get_attribute(SCRAMBLE_TEXT_ATTR), element.inner_text())
}

/// Build an animator whose rAF callback advances itself.
fn build_animator(
    window: &web::Window,
    element: web::HtmlElement,
    config: &ScrambleConfig,
) -> anyhow::Result<Rc<RefCell<ElementAnimator>>> {
    let (scheduler, callback) = RafScheduler::new(window.clone());
    let animator = ScrambleAnimator::new(
        ElementSurface::new(element),
        scheduler,
        StdRng::from_entropy(),
        config.clone(),
    )?;
    let animator = Rc::new(RefCell::new(animator));
    let for_frame = animator.clone();
    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        for_frame.borrow_mut().on_frame();
    }) as Box<dyn FnMut()>));
    Ok(animator)
}

fn wire_visibility(
    target: &ScrambleTarget,
    animator: Rc<RefCell<ElementAnimator>>,
) -> anyhow::Result<()> {
    let element = target.element.clone();
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _obs: web::IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() else {
                    continue;
                };
                let done = element.class_list().contains(SCRAMBLE_DONE_CLASS);
                if should_trigger_on_visible(entry.is_intersecting(), done) {
                    let text = target_text(&element);
                    _ = animator.borrow_mut().begin_transition(&text);
                    _ = element.class_list().add_1(SCRAMBLE_DONE_CLASS);
                }
            }
        },
    ) as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);
    let observer = web::IntersectionObserver::new(callback.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("IntersectionObserver: {:?}", e))?;
    observer.observe(&target.element);
    callback.forget();
    Ok(())
}

fn wire_hover(target: &ScrambleTarget, animator: Rc<RefCell<ElementAnimator>>) {
    let element = target.element.clone();
    dom::listen(&target.element, "mouseenter", move |_ev: web::MouseEvent| {
        let text = target_text(&element);
        _ = animator.borrow_mut().begin_transition(&text);
    });
}

/// One animator per target, triggered on first visibility and optionally on hover.
pub fn wire_scramble_targets(
    targets: &[ScrambleTarget],
    config: &ScrambleConfig,
) -> anyhow::Result<usize> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let mut wired = 0;
    for target in targets {
        let animator = build_animator(&window, target.element.clone(), config)?;
        if let Err(e) = wire_visibility(target, animator.clone()) {
            log::error!("[scramble] visibility trigger unavailable: {:?}", e);
            continue;
        }
        if target.hover_retrigger {
            wire_hover(target, animator);
        }
        wired += 1;
    }
    log::info!("[scramble] wired {} of {} targets", wired, targets.len());
    Ok(wired)
}
