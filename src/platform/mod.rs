//! Browser platform glue
//!
//! Keyboard capture and asset loading. Event handlers only flip booleans;
//! the simulation samples them once per tick.

pub mod assets;
pub mod input;

pub use input::KeyState;
