/// Page wiring and visual tuning constants for the web frontend.
///
/// Selectors and ids mirror the page markup; the rest keep magic numbers
/// out of the render loop.

// Element hooks
pub const BG_CANVAS_ID: &str = "bg-canvas";
pub const SCRAMBLE_SELECTOR: &str = ".scramble-text";
pub const SCRAMBLE_HOVER_CLASS: &str = "scramble-hover";
pub const SCRAMBLE_DONE_CLASS: &str = "scrambled-done";
pub const SCRAMBLE_TEXT_ATTR: &str = "data-text";
pub const CURSOR_DOT_SELECTOR: &str = ".cursor-dot";
pub const CURSOR_RING_SELECTOR: &str = ".cursor-ring";
pub const MOBILE_MENU_ID: &str = "mobile-menu";
pub const NAV_LINKS_SELECTOR: &str = ".nav-links";
pub const NAV_LINK_ANCHOR_SELECTOR: &str = ".nav-links a";

// Particle look
pub const PARTICLE_COLOR_HEX: u32 = 0x00f2ff; // neon cyan
pub const PARTICLE_OPACITY: f32 = 0.9;
pub const FOG_DENSITY: f32 = 0.001;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

#[derive(Clone, Copy, Debug)]
pub struct BloomSettings {
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
}

pub const BLOOM: BloomSettings = BloomSettings {
    threshold: 0.1,
    strength: 1.5, // high glow intensity
    radius: 0.5,
};
