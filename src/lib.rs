//! Filepurge - a CP437 charset arcade shooter
//!
//! Junk files drift in from the right edge of the disk; blast them to free
//! space, but every critical system file you hit corrupts the filesystem.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, scoring)
//! - `renderer`: Canvas 2D charset blitting
//! - `platform`: Browser glue (keyboard capture, asset loading)
//! - `highscores`: Best-run persistence in LocalStorage

pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use highscores::HighScore;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Charset cell size in world pixels
    pub const CHAR_WIDTH: f32 = 8.0;
    pub const CHAR_HEIGHT: f32 = 16.0;

    /// Charset sheet grid (columns x rows of cells)
    pub const SHEET_COLS: u32 = 32;
    pub const SHEET_ROWS: u32 = 8;

    /// World dimensions in world pixels
    pub const WORLD_WIDTH: f32 = 400.0;
    pub const WORLD_HEIGHT: f32 = 300.0;
    /// Canvas upscale factor
    pub const SCALE: f32 = 2.0;

    /// Per-tick speeds; one tick per animation frame, 60 Hz nominal
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 7.0;
    pub const ENEMY_SPEED: f32 = 2.0;

    /// Turn step applied per unlocked rotate input
    pub const ANGULAR_STEP: f32 = std::f32::consts::PI / 16.0;

    /// The player glyph's art leaves 4px of empty space at the cell bottom
    pub const PLAYER_BOTTOM_SLACK: f32 = 4.0;

    /// Muzzle distance from the player origin; the aim marker sits here
    pub const MUZZLE_OFFSET: f32 = 10.0;
    /// Aim marker pull-back on the frame a shot is fired
    pub const RECOIL_OFFSET: f32 = 7.0;

    /// Spawn window interval (500ms at 60 Hz)
    pub const SPAWN_INTERVAL_TICKS: u64 = 30;
    /// Total files generated per session
    pub const SPAWN_CAP: u32 = 100;

    /// Turn repeat lock (50ms)
    pub const ROTATE_LOCK_TICKS: u64 = 3;
    /// Fire repeat lock (200ms)
    pub const FIRE_LOCK_TICKS: u64 = 12;

    /// Disk kilobytes per file, freed or corrupted on a hit
    pub const FILE_SIZE_KB: u32 = 250;
    /// Corruption threshold that aborts the session
    pub const CORRUPTION_LIMIT: u32 = 5000;
}

/// Offset a point by `offset` along `direction` in screen coordinates.
///
/// The y axis grows downward, so the sine term is subtracted: a positive
/// angle aims up-screen.
#[inline]
pub fn angled_offset(pos: Vec2, direction: f32, offset: f32) -> Vec2 {
    Vec2::new(
        pos.x + offset * direction.cos(),
        pos.y - offset * direction.sin(),
    )
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::TAU;
    while angle >= TAU {
        angle -= TAU;
    }
    while angle < 0.0 {
        angle += TAU;
    }
    angle
}
