mod core;
mod display;

pub use self::core::*;
pub use display::*;
