//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - One tick per animation frame
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, is_colliding};
pub use state::{Bullet, Color, Enemy, FileKind, GamePhase, GameState, Glyph, Player, Sprite};
pub use tick::{TickInput, tick};
