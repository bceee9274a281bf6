pub mod cursor;
pub mod menu;
pub mod pointer;
pub mod scramble;

pub use cursor::wire_cursor;
pub use menu::wire_mobile_menu;
pub use pointer::{wire_background_pointer, PointerOffset};
pub use scramble::{collect_targets, wire_scramble_targets, ScrambleTarget};
