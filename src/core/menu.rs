// Open/closed state of the mobile navigation menu.

pub const ACTIVE_CLASS: &str = "active";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavMenu {
    pub open: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuClick {
    Toggle,
    NavLink,
    /// Any click reaching the document, with whether it landed inside the
    /// nav links or the toggle button.
    Document { inside_nav: bool, inside_toggle: bool },
}

impl NavMenu {
    /// Apply a click and return whether the open state changed.
    pub fn handle(&mut self, click: MenuClick) -> bool {
        let next = match click {
            MenuClick::Toggle => !self.open,
            MenuClick::NavLink => false,
            MenuClick::Document {
                inside_nav,
                inside_toggle,
            } => {
                if inside_nav || inside_toggle {
                    self.open
                } else {
                    false
                }
            }
        };
        let changed = next != self.open;
        self.open = next;
        changed
    }
}
