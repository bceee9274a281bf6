use crate::constants::{MOBILE_MENU_ID, NAV_LINKS_SELECTOR, NAV_LINK_ANCHOR_SELECTOR};
use crate::core::menu::{MenuClick, NavMenu, ACTIVE_CLASS};
use crate::dom;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

#[derive(Clone)]
struct MenuWiring {
    state: Rc<RefCell<NavMenu>>,
    toggle: web::HtmlElement,
    nav: web::HtmlElement,
}

impl MenuWiring {
    fn apply(&self, click: MenuClick) {
        let changed = self.state.borrow_mut().handle(click);
        if !changed {
            return;
        }
        let open = self.state.borrow().open;
        for el in [&self.toggle, &self.nav] {
            _ = el.class_list().toggle_with_force(ACTIVE_CLASS, open);
        }
        log::debug!("[menu] open={}", open);
    }
}

pub fn wire_mobile_menu(document: &web::Document) {
    let Some(toggle) = document
        .get_element_by_id(MOBILE_MENU_ID)
        .and_then(|el| wasm_bindgen::JsCast::dyn_into::<web::HtmlElement>(el).ok())
    else {
        return;
    };
    let Some(nav) = dom::query_one(document, NAV_LINKS_SELECTOR) else {
        log::warn!("[menu] #{} present but {} missing", MOBILE_MENU_ID, NAV_LINKS_SELECTOR);
        return;
    };
    let w = MenuWiring {
        state: Rc::new(RefCell::new(NavMenu::default())),
        toggle,
        nav,
    };

    let on_toggle = w.clone();
    dom::listen(&w.toggle, "click", move |_ev: web::MouseEvent| {
        on_toggle.apply(MenuClick::Toggle);
    });

    for link in dom::query_all(document, NAV_LINK_ANCHOR_SELECTOR) {
        let on_link = w.clone();
        dom::listen(&link, "click", move |_ev: web::MouseEvent| {
            on_link.apply(MenuClick::NavLink);
        });
    }

    let on_document = w.clone();
    dom::listen(document, "click", move |ev: web::MouseEvent| {
        on_document.apply(MenuClick::Document {
            inside_nav: dom::event_inside(&ev, &on_document.nav),
            inside_toggle: dom::event_inside(&ev, &on_document.toggle),
        });
    });
}
