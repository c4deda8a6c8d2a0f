//! Per-frame simulation tick
//!
//! Advances one frame: spawn window, input application, movement,
//! collisions, then win/lose evaluation. Collections are never mutated
//! mid-iteration; removals are compacted after each pass.

use glam::Vec2;
use rand::Rng;

use super::collision::{Rect, is_colliding};
use super::state::{Bullet, Color, Enemy, FileKind, GamePhase, GameState, Glyph, Sprite};
use crate::consts::*;

/// Keyboard state sampled once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub fire: bool,
}

/// Advance the session by one frame and return the sprites to present.
///
/// Terminal phases are absorbing: once the session is won or lost, the
/// state is frozen and only the final draw list is returned.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<Sprite> {
    if state.phase != GamePhase::Playing {
        return state.draw_list();
    }

    state.time_ticks += 1;

    spawn_enemy(state);

    state.aim = state.player.angled_position(MUZZLE_OFFSET);
    apply_input(state, input);

    move_enemies(state);
    move_bullets(state);

    if state.phase == GamePhase::Playing
        && state.spawned == SPAWN_CAP
        && state.enemies.is_empty()
    {
        state.phase = GamePhase::Won;
    }

    state.draw_list()
}

/// Roll classification: rolls above 70 produce junk, the rest are critical
/// system files (boundary inclusive on the critical side).
fn classify_roll(roll: u32) -> FileKind {
    if roll > 70 {
        FileKind::Junk
    } else {
        FileKind::Critical
    }
}

/// Charset cells junk files never use: the blank cells (0,0) and (0,1),
/// and the sheet's bottom-right cell.
fn is_reserved_cell(cell: (u32, u32)) -> bool {
    matches!(cell, (0, 0) | (0, 1) | (31, 7))
}

/// Uniform random cell, re-rolled until it lands outside the reserved set
fn random_junk_cell<R: Rng>(rng: &mut R) -> (u32, u32) {
    loop {
        let cell = (
            rng.random_range(0..SHEET_COLS),
            rng.random_range(0..SHEET_ROWS),
        );
        if !is_reserved_cell(cell) {
            return cell;
        }
    }
}

/// Generate at most one file per open spawn window.
///
/// The window closes on the attempt whether or not spawning is still
/// allowed, so the effective rate never exceeds one file per interval.
fn spawn_enemy(state: &mut GameState) {
    if state.time_ticks < state.spawn_open_at {
        return;
    }
    state.spawn_open_at = state.time_ticks + SPAWN_INTERVAL_TICKS;

    if state.spawned >= SPAWN_CAP {
        return;
    }

    let kind = classify_roll(state.rng.random_range(0..100));
    let glyph = match kind {
        FileKind::Junk => Glyph::new(random_junk_cell(&mut state.rng), Color::WHITE),
        FileKind::Critical => {
            let cell = (
                state.rng.random_range(0..SHEET_COLS),
                state.rng.random_range(0..SHEET_ROWS),
            );
            let color = Color::random(&mut state.rng);
            Glyph::with_background(cell, color, Color::RED)
        }
    };

    let pos = Vec2::new(
        WORLD_WIDTH + CHAR_WIDTH,
        state.rng.random_range(0.0..WORLD_HEIGHT - CHAR_HEIGHT),
    );
    let id = state.next_entity_id();
    state.enemies.push(Enemy { id, pos, kind, glyph });
    state.spawned += 1;
}

/// Apply one tick of input: clamped axis movement, lock-gated turning and
/// fire.
fn apply_input(state: &mut GameState, input: &TickInput) {
    // Boundary checks happen before the move; a key held at an edge is a
    // no-op on that axis, never a clamp.
    if input.up && state.player.pos.y - PLAYER_SPEED >= 0.0 {
        state.player.pos.y -= PLAYER_SPEED;
    }
    if input.down
        && state.player.pos.y + PLAYER_SPEED
            <= WORLD_HEIGHT - CHAR_HEIGHT + PLAYER_BOTTOM_SLACK
    {
        state.player.pos.y += PLAYER_SPEED;
    }
    if input.left && state.player.pos.x - PLAYER_SPEED >= 0.0 {
        state.player.pos.x -= PLAYER_SPEED;
    }
    if input.right && state.player.pos.x + PLAYER_SPEED <= WORLD_WIDTH - CHAR_WIDTH {
        state.player.pos.x += PLAYER_SPEED;
    }

    if state.time_ticks >= state.rotate_open_at && (input.rotate_left || input.rotate_right) {
        // Both turn keys held apply both steps within the same gated
        // window, each wrapped independently.
        if input.rotate_left {
            state.player.rotate(ANGULAR_STEP);
        }
        if input.rotate_right {
            state.player.rotate(-ANGULAR_STEP);
        }
        state.rotate_open_at = state.time_ticks + ROTATE_LOCK_TICKS;
    }

    if input.fire && state.time_ticks >= state.fire_open_at {
        let muzzle = state.player.angled_position(MUZZLE_OFFSET);
        let direction = state.player.direction;
        let id = state.next_entity_id();
        state.bullets.push(Bullet::new(id, muzzle, direction));
        state.fire_open_at = state.time_ticks + FIRE_LOCK_TICKS;
        // Recoil: pull the aim marker in for this frame.
        state.aim = state.player.angled_position(RECOIL_OFFSET);
    }
}

/// March files left and despawn those that cleared the far edge
fn move_enemies(state: &mut GameState) {
    for enemy in &mut state.enemies {
        enemy.pos.x -= ENEMY_SPEED;
    }
    state.enemies.retain(|enemy| enemy.pos.x >= -CHAR_WIDTH);
}

/// Advance bullets, drop off-screen ones, and resolve hits.
///
/// Each bullet is consumed by at most one file; the first overlapping file
/// in the set is the one removed.
fn move_bullets(state: &mut GameState) {
    let bullets = std::mem::take(&mut state.bullets);
    let mut surviving = Vec::with_capacity(bullets.len());

    for mut bullet in bullets {
        bullet.travel();
        if bullet.pos.x > WORLD_WIDTH {
            continue;
        }

        let bullet_rect = Rect::glyph_at(bullet.pos);
        let hit = state
            .enemies
            .iter()
            .position(|enemy| is_colliding(&bullet_rect, &Rect::glyph_at(enemy.pos)));

        let Some(index) = hit else {
            surviving.push(bullet);
            continue;
        };

        match state.enemies.remove(index).kind {
            FileKind::Junk => state.score += FILE_SIZE_KB,
            FileKind::Critical => {
                state.corrupted += FILE_SIZE_KB;
                if state.corrupted >= CORRUPTION_LIMIT {
                    state.phase = GamePhase::Lost;
                    break;
                }
            }
        }
    }

    state.bullets = surviving;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn junk_at(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos,
            kind: FileKind::Junk,
            glyph: Glyph::new((5, 5), Color::WHITE),
        });
    }

    fn critical_at(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos,
            kind: FileKind::Critical,
            glyph: Glyph::with_background((5, 5), Color::WHITE, Color::RED),
        });
    }

    #[test]
    fn roll_boundary_classifies_kinds() {
        assert_eq!(classify_roll(71), FileKind::Junk);
        assert_eq!(classify_roll(99), FileKind::Junk);
        assert_eq!(classify_roll(70), FileKind::Critical);
        assert_eq!(classify_roll(0), FileKind::Critical);
    }

    #[test]
    fn junk_cells_avoid_reserved_cells() {
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..1000 {
            let cell = random_junk_cell(&mut rng);
            assert!(!is_reserved_cell(cell));
            assert!(cell.0 < SHEET_COLS && cell.1 < SHEET_ROWS);
        }
    }

    #[test]
    fn fire_spawns_bullet_at_muzzle() {
        let mut state = GameState::new(7);
        state.player.pos = Vec2::new(100.0, 150.0);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };

        tick(&mut state, &fire);
        assert_eq!(state.bullets.len(), 1);
        // Spawned at (110, 150), advanced one step on the spawn frame
        assert!((state.bullets[0].pos.x - 117.0).abs() < 1e-3);
        assert!((state.bullets[0].pos.y - 150.0).abs() < 1e-3);

        // Third tick after firing lands at 110 + 3 * 7 = 131
        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());
        assert!((state.bullets[0].pos.x - 131.0).abs() < 1e-3);
        assert!((state.bullets[0].pos.y - 150.0).abs() < 1e-3);
    }

    #[test]
    fn fire_is_lock_gated() {
        let mut state = GameState::new(7);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };

        // Held fire over one full lock window yields exactly two shots:
        // tick 1 and tick 1 + FIRE_LOCK_TICKS.
        for _ in 0..=FIRE_LOCK_TICKS {
            tick(&mut state, &fire);
        }
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn turn_input_is_step_locked() {
        let mut state = GameState::new(5);
        let turn = TickInput {
            rotate_left: true,
            ..Default::default()
        };

        tick(&mut state, &turn);
        assert!((state.player.direction - ANGULAR_STEP).abs() < 1e-5);

        // Still inside the lock window: no second step
        tick(&mut state, &turn);
        tick(&mut state, &turn);
        assert!((state.player.direction - ANGULAR_STEP).abs() < 1e-5);

        // Lock expired
        tick(&mut state, &turn);
        assert!((state.player.direction - 2.0 * ANGULAR_STEP).abs() < 1e-5);
    }

    #[test]
    fn both_turn_keys_apply_in_one_window() {
        let mut state = GameState::new(5);
        let both = TickInput {
            rotate_left: true,
            rotate_right: true,
            ..Default::default()
        };

        tick(&mut state, &both);
        // The steps cancel, but the lock is armed
        assert!(state.player.direction.abs() < 1e-5);
        assert_eq!(state.rotate_open_at, 1 + ROTATE_LOCK_TICKS);
    }

    #[test]
    fn movement_stops_at_world_edges() {
        let mut state = GameState::new(2);
        state.player.pos = Vec2::new(2.0, 2.0);
        let up_left = TickInput {
            up: true,
            left: true,
            ..Default::default()
        };
        tick(&mut state, &up_left);
        assert_eq!(state.player.pos, Vec2::new(2.0, 2.0));

        state.player.pos = Vec2::new(WORLD_WIDTH - CHAR_WIDTH - 2.0, 285.0);
        let down_right = TickInput {
            down: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &down_right);
        assert_eq!(
            state.player.pos,
            Vec2::new(WORLD_WIDTH - CHAR_WIDTH - 2.0, 285.0)
        );
    }

    #[test]
    fn movement_applies_away_from_edges() {
        let mut state = GameState::new(2);
        let start = state.player.pos;
        let input = TickInput {
            right: true,
            down: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(
            state.player.pos,
            Vec2::new(start.x + PLAYER_SPEED, start.y + PLAYER_SPEED)
        );
    }

    #[test]
    fn aim_marker_tracks_the_muzzle() {
        let mut state = GameState::new(3);
        state.player.pos = Vec2::new(100.0, 150.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.aim, state.player.angled_position(MUZZLE_OFFSET));

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire);
        assert_eq!(state.aim, state.player.angled_position(RECOIL_OFFSET));
    }

    #[test]
    fn files_enter_at_the_right_edge() {
        let mut state = GameState::new(3);
        let idle = TickInput::default();
        for _ in 0..SPAWN_INTERVAL_TICKS {
            tick(&mut state, &idle);
        }

        assert_eq!(state.spawned, 1);
        assert_eq!(state.enemies.len(), 1);
        let enemy = &state.enemies[0];
        // Entered off the right edge, marched one step this tick
        assert!((enemy.pos.x - (WORLD_WIDTH + CHAR_WIDTH - ENEMY_SPEED)).abs() < 1e-3);
        assert!(enemy.pos.y >= 0.0 && enemy.pos.y < WORLD_HEIGHT - CHAR_HEIGHT);
    }

    #[test]
    fn spawn_window_closes_after_attempt() {
        let mut state = GameState::new(8);
        let idle = TickInput::default();
        for _ in 0..(SPAWN_INTERVAL_TICKS * 2 - 1) {
            tick(&mut state, &idle);
        }
        assert_eq!(state.spawned, 1);

        tick(&mut state, &idle);
        assert_eq!(state.spawned, 2);
    }

    #[test]
    fn spawn_count_never_exceeds_cap() {
        let mut state = GameState::new(1234);
        let idle = TickInput::default();
        for _ in 0..(SPAWN_INTERVAL_TICKS * (SPAWN_CAP as u64 + 50)) {
            tick(&mut state, &idle);
            assert!(state.spawned <= SPAWN_CAP);
        }
        assert_eq!(state.spawned, SPAWN_CAP);
        // With nothing fired, every file drifts off and the run ends clean
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn purging_junk_scores() {
        let mut state = GameState::new(9);
        state.spawn_open_at = u64::MAX;
        junk_at(&mut state, Vec2::new(200.0, 150.0));
        let bullet_id = state.next_entity_id();
        state
            .bullets
            .push(Bullet::new(bullet_id, Vec2::new(190.0, 150.0), 0.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, FILE_SIZE_KB);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn bullet_is_consumed_by_one_file_only() {
        let mut state = GameState::new(9);
        state.spawn_open_at = u64::MAX;
        junk_at(&mut state, Vec2::new(200.0, 150.0));
        junk_at(&mut state, Vec2::new(201.0, 150.0));
        let bullet_id = state.next_entity_id();
        state
            .bullets
            .push(Bullet::new(bullet_id, Vec2::new(190.0, 150.0), 0.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, FILE_SIZE_KB);
        assert_eq!(state.enemies.len(), 1);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn bullets_despawn_off_the_right_edge() {
        let mut state = GameState::new(9);
        state.spawn_open_at = u64::MAX;
        let bullet_id = state.next_entity_id();
        state
            .bullets
            .push(Bullet::new(bullet_id, Vec2::new(WORLD_WIDTH - 1.0, 150.0), 0.0));

        tick(&mut state, &TickInput::default());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn corruption_limit_aborts_the_session() {
        let mut state = GameState::new(9);
        state.spawn_open_at = u64::MAX;
        state.corrupted = CORRUPTION_LIMIT - FILE_SIZE_KB;
        critical_at(&mut state, Vec2::new(200.0, 150.0));
        let bullet_id = state.next_entity_id();
        state
            .bullets
            .push(Bullet::new(bullet_id, Vec2::new(190.0, 150.0), 0.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Lost);
        assert_eq!(state.corrupted, CORRUPTION_LIMIT);

        // Terminal state is frozen
        let ticks = state.time_ticks;
        let score = state.score;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.score, score);
        assert_eq!(state.corrupted, CORRUPTION_LIMIT);
    }

    #[test]
    fn corrupting_below_limit_keeps_playing() {
        let mut state = GameState::new(9);
        state.spawn_open_at = u64::MAX;
        critical_at(&mut state, Vec2::new(200.0, 150.0));
        let bullet_id = state.next_entity_id();
        state
            .bullets
            .push(Bullet::new(bullet_id, Vec2::new(190.0, 150.0), 0.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.corrupted, FILE_SIZE_KB);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn clearing_the_last_file_wins_once() {
        let mut state = GameState::new(11);
        state.spawn_open_at = u64::MAX;
        state.spawned = SPAWN_CAP;
        junk_at(&mut state, Vec2::new(200.0, 150.0));
        let bullet_id = state.next_entity_id();
        state
            .bullets
            .push(Bullet::new(bullet_id, Vec2::new(190.0, 150.0), 0.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.score, FILE_SIZE_KB);

        // A later tick never re-triggers or mutates anything
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.score, FILE_SIZE_KB);
    }

    #[test]
    fn no_win_while_files_remain() {
        let mut state = GameState::new(11);
        state.spawn_open_at = u64::MAX;
        state.spawned = SPAWN_CAP;
        junk_at(&mut state, Vec2::new(200.0, 150.0));
        junk_at(&mut state, Vec2::new(200.0, 50.0));
        let bullet_id = state.next_entity_id();
        state
            .bullets
            .push(Bullet::new(bullet_id, Vec2::new(190.0, 150.0), 0.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn same_seed_same_run() {
        let script = [
            TickInput {
                fire: true,
                up: true,
                ..Default::default()
            },
            TickInput {
                rotate_left: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        let mut a = GameState::new(0xC0FFEE);
        let mut b = GameState::new(0xC0FFEE);
        for round in 0..400 {
            let input = &script[round % script.len()];
            tick(&mut a, input);
            tick(&mut b, input);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.spawned, b.spawned);
        assert_eq!(a.score, b.score);
        assert_eq!(a.corrupted, b.corrupted);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.kind, eb.kind);
            assert_eq!(ea.glyph, eb.glyph);
        }
    }
}
