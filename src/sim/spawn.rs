//! Enemy spawner
//!
//! Runs on its own schedule (see `Session`), not inside the frame step.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, SimState};
use crate::config::SimConfig;

/// Uniform point on one of the four arena edges
pub fn edge_point(arena: Vec2, rng: &mut impl Rng) -> Vec2 {
    match rng.random_range(0..4u32) {
        // Top
        0 => Vec2::new(rng.random_range(0.0..=arena.x), 0.0),
        // Right
        1 => Vec2::new(arena.x, rng.random_range(0.0..=arena.y)),
        // Bottom
        2 => Vec2::new(rng.random_range(0.0..=arena.x), arena.y),
        // Left
        _ => Vec2::new(0.0, rng.random_range(0.0..=arena.y)),
    }
}

/// Edge point, resampled to keep clear of the player when avoidance is on.
/// Falls back to the last sample if every attempt lands too close.
pub fn pick_spawn_point(
    arena: Vec2,
    player_pos: Vec2,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Vec2 {
    let mut pos = edge_point(arena, rng);
    if !config.spawn_avoid_player {
        return pos;
    }
    for _ in 1..config.spawn_max_attempts {
        if pos.distance(player_pos) >= config.spawn_min_player_distance {
            return pos;
        }
        pos = edge_point(arena, rng);
    }
    pos
}

/// Try to add one enemy. Does nothing unless playing and under the cap.
pub fn spawn_enemy(state: &mut SimState, rng: &mut impl Rng) -> Option<GameEvent> {
    if !state.is_playing() || state.enemies.len() >= state.enemy_cap() {
        return None;
    }

    let pos = pick_spawn_point(state.arena, state.player.pos, &state.config, rng);
    let volatile = rng.random_bool(f64::from(state.config.volatile_chance(state.level)));
    let speed = rng.random_range(state.config.enemy_min_speed..=state.config.enemy_max_speed);
    let id = state.add_enemy(pos, speed, volatile);

    log::debug!(
        "Spawned enemy {} at ({:.0}, {:.0}){}",
        id,
        pos.x,
        pos.y,
        if volatile { " [volatile]" } else { "" }
    );
    Some(GameEvent::EnemySpawned { id, volatile })
}

/// Per-frame spawn roll for `SpawnSchedule::PerFrameChance`
pub fn roll_frame_spawn(
    state: &mut SimState,
    base: f32,
    per_level: f32,
    rng: &mut impl Rng,
) -> Option<GameEvent> {
    let chance = (base + per_level * state.level as f32).clamp(0.0, 1.0);
    if rng.random_bool(f64::from(chance)) {
        spawn_enemy(state, rng)
    } else {
        None
    }
}
