//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::{angled_offset, wrap_angle};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every generated file has been cleared from the field
    Won,
    /// Corruption reached the abort threshold
    Lost,
}

/// Solid RGB color painted over a charset cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);
    pub const YELLOW: Color = Color(255, 255, 0);
    pub const RED: Color = Color(255, 0, 0);

    /// Draw a random opaque color
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Color(rng.random(), rng.random(), rng.random())
    }

    /// CSS hex string for canvas fill styles
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// How a charset cell is painted. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// (column, row) into the charset sheet
    pub cell: (u32, u32),
    pub color: Color,
    /// Filled behind the glyph when present
    pub background: Option<Color>,
}

impl Glyph {
    pub fn new(cell: (u32, u32), color: Color) -> Self {
        Self {
            cell,
            color,
            background: None,
        }
    }

    pub fn with_background(cell: (u32, u32), color: Color, background: Color) -> Self {
        Self {
            cell,
            color,
            background: Some(background),
        }
    }
}

/// A positioned glyph handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    pub pos: Vec2,
    pub glyph: Glyph,
}

/// What destroying a file does to the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Safe to purge; frees disk space
    Junk,
    /// System file; destroying it corrupts the filesystem
    Critical,
}

/// A file drifting across the field
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub kind: FileKind,
    pub glyph: Glyph,
}

/// A fired projectile traveling along a fixed heading
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Heading in radians, fixed at spawn
    pub direction: f32,
}

impl Bullet {
    pub fn new(id: u32, pos: Vec2, direction: f32) -> Self {
        Self { id, pos, direction }
    }

    /// Glyph bullets are drawn with
    pub fn glyph() -> Glyph {
        Glyph::new((7, 0), Color::YELLOW)
    }

    /// Advance one tick along the heading (screen coordinates, y down)
    pub fn travel(&mut self) {
        self.pos = angled_offset(self.pos, self.direction, BULLET_SPEED);
    }
}

/// The player cursor
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Facing angle in radians, wrapped into [0, 2π)
    pub direction: f32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(CHAR_WIDTH, WORLD_HEIGHT / 2.0),
            direction: 0.0,
        }
    }

    pub fn glyph() -> Glyph {
        Glyph::new((0, 2), Color::WHITE)
    }

    /// Glyph for the cosmetic aim marker
    pub fn aim_glyph() -> Glyph {
        Glyph::new((7, 0), Color::WHITE)
    }

    /// Point `offset` pixels ahead of the player along its facing angle
    pub fn angled_position(&self, offset: f32) -> Vec2 {
        angled_offset(self.pos, self.direction, offset)
    }

    /// Turn by `step` radians, wrapping into [0, 2π)
    pub fn rotate(&mut self, step: f32) {
        self.direction = wrap_angle(self.direction + step);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Per-session RNG; the only randomness source in the simulation
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Tick counter; the monotonic clock all deadlines compare against
    pub time_ticks: u64,
    pub player: Player,
    /// Cosmetic aim marker, re-derived from the player every tick
    pub aim: Vec2,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    /// Tick at which the next spawn window opens
    pub spawn_open_at: u64,
    /// Files generated so far; spawning halts at `SPAWN_CAP`
    pub spawned: u32,
    /// Disk kilobytes freed
    pub score: u32,
    /// Disk kilobytes corrupted
    pub corrupted: u32,
    /// Tick at which turn input unlocks
    pub rotate_open_at: u64,
    /// Tick at which fire input unlocks
    pub fire_open_at: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh session with the given seed
    pub fn new(seed: u64) -> Self {
        let player = Player::new();
        let aim = player.angled_position(MUZZLE_OFFSET);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ticks: 0,
            player,
            aim,
            enemies: Vec::new(),
            bullets: Vec::new(),
            spawn_open_at: SPAWN_INTERVAL_TICKS,
            spawned: 0,
            score: 0,
            corrupted: 0,
            rotate_open_at: 0,
            fire_open_at: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Everything the renderer should draw this frame, in paint order
    pub fn draw_list(&self) -> Vec<Sprite> {
        let mut sprites = Vec::with_capacity(2 + self.enemies.len() + self.bullets.len());
        sprites.push(Sprite {
            pos: self.player.pos,
            glyph: Player::glyph(),
        });
        sprites.push(Sprite {
            pos: self.aim,
            glyph: Player::aim_glyph(),
        });
        for enemy in &self.enemies {
            sprites.push(Sprite {
                pos: enemy.pos,
                glyph: enemy.glyph,
            });
        }
        for bullet in &self.bullets {
            sprites.push(Sprite {
                pos: bullet.pos,
                glyph: Bullet::glyph(),
            });
        }
        sprites
    }
}
