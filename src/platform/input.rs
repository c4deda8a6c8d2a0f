//! Keyboard capture
//!
//! Listeners record key transitions into a shared `KeyState`; the frame
//! loop samples it into a `TickInput` once per tick. Unmapped keys are
//! no-ops.

use crate::sim::TickInput;

/// Currently-held keys
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub fire: bool,
}

impl KeyState {
    /// Record a key transition. Returns false for keys the game ignores.
    pub fn apply(&mut self, key: &str, pressed: bool) -> bool {
        match key {
            "ArrowUp" => self.up = pressed,
            "ArrowDown" => self.down = pressed,
            "ArrowLeft" => self.left = pressed,
            "ArrowRight" => self.right = pressed,
            "z" | "Z" => self.rotate_left = pressed,
            "c" | "C" => self.rotate_right = pressed,
            "x" | "X" => self.fire = pressed,
            _ => return false,
        }
        true
    }

    /// Snapshot for the next simulation tick
    pub fn sample(&self) -> TickInput {
        TickInput {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
            rotate_left: self.rotate_left,
            rotate_right: self.rotate_right,
            fire: self.fire,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::attach_keyboard;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    use super::KeyState;

    /// Wire keydown/keyup listeners on the window into `keys`
    pub fn attach_keyboard(keys: Rc<RefCell<KeyState>>) {
        let window = web_sys::window().expect("no window");

        {
            let keys = keys.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                keys.borrow_mut().apply(&event.key(), true);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                keys.borrow_mut().apply(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}
