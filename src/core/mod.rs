pub mod background;
pub mod cursor;
pub mod menu;
// Inspection accessors are only reached from the host tests.
#[cfg_attr(not(test), allow(dead_code))]
pub mod scramble;

pub use background::*;
pub use scramble::*;

// Shaders bundled as string constants
pub static PARTICLES_WGSL: &str = include_str!("../../shaders/particles.wgsl");
pub static POST_WGSL: &str = include_str!("../../shaders/post.wgsl");
