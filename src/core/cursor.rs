// Styles and timing for the two-part custom cursor.

/// Delay before the ring catches up with the pointer.
pub const RING_LAG_MS: i32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingStyle {
    pub transform: &'static str,
    pub border_color: &'static str,
}

pub const RING_IDLE: RingStyle = RingStyle {
    transform: "scale(1) rotate(0deg)",
    border_color: "#00f2ff",
};

pub const RING_ACTIVE: RingStyle = RingStyle {
    transform: "scale(1.5) rotate(45deg)",
    border_color: "#bc13fe",
};

/// Elements that put the ring into its active state while hovered.
pub const INTERACTIVE_SELECTOR: &str = "a, button";

#[inline]
pub fn ring_style(hovering_interactive: bool) -> RingStyle {
    if hovering_interactive {
        RING_ACTIVE
    } else {
        RING_IDLE
    }
}

#[inline]
pub fn px(v: i32) -> String {
    format!("{}px", v)
}
