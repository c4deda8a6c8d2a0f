//! Axis-aligned collision detection
//!
//! Everything on the field occupies one charset cell, so overlap tests
//! reduce to axis-aligned bounding boxes.

use glam::Vec2;

use crate::consts::{CHAR_HEIGHT, CHAR_WIDTH};

/// An axis-aligned rectangle in world pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Bounding box of a charset cell at `pos`
    pub fn glyph_at(pos: Vec2) -> Self {
        Self::new(pos.x, pos.y, CHAR_WIDTH, CHAR_HEIGHT)
    }
}

/// AABB overlap test. Strict inequalities: rects that merely share an edge
/// do not collide.
#[inline]
pub fn is_colliding(r1: &Rect, r2: &Rect) -> bool {
    r1.x < r2.x + r2.w && r1.x + r1.w > r2.x && r1.y < r2.y + r2.h && r1.y + r1.h > r2.y
}
