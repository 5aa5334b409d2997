//! Per-frame simulation step
//!
//! Phases run in a fixed order: input, motion, collisions, lifecycle.
//! Removals are marked during collision checks and compacted once, so no
//! entity is skipped or checked twice.

use glam::Vec2;
use rand::Rng;

use super::collision::{Hitbox, in_blast, overlaps};
use super::powerup::PowerUpKind;
use super::special::burst_directions;
use super::state::{GameEvent, GamePhase, SimState};
use crate::in_bounds;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard movement axes (each component in -1..=1)
    pub move_axis: Vec2,
    /// Drag-to-move target in arena coordinates; overrides `move_axis`
    pub move_target: Option<Vec2>,
    /// Fire key held
    pub fire: bool,
    /// Tap-to-fire point in arena coordinates (implies fire)
    pub aim: Option<Vec2>,
    /// Special attack key
    pub special: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame of `dt` seconds.
///
/// Returns everything that happened, in order. All randomness comes through
/// `rng` so runs are reproducible from a seed.
pub fn tick(
    state: &mut SimState,
    input: &TickInput,
    dt: f32,
    rng: &mut impl Rng,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause {
        events.extend(state.toggle_pause());
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return events;
    }

    state.time_secs += f64::from(dt);

    let special_fired = apply_input(state, input, dt, &mut events);
    move_entities(state, dt);
    resolve_collisions(state, rng, &mut events);
    update_lifecycle(state, dt, special_fired, &mut events);

    events
}

/// Movement, firing and the special attack. Returns true if the special
/// attack went off this frame.
fn apply_input(
    state: &mut SimState,
    input: &TickInput,
    dt: f32,
    events: &mut Vec<GameEvent>,
) -> bool {
    let now = state.time_secs;
    let player = &mut state.player;
    let step = player.speed * dt;

    if let Some(target) = input.move_target {
        let to_target = target - player.pos;
        let dist = to_target.length();
        if dist > 0.0 {
            player.pos += to_target / dist * step.min(dist);
            player.facing = to_target.y.atan2(to_target.x);
        }
    } else {
        let axis = input.move_axis.clamp(Vec2::NEG_ONE, Vec2::ONE);
        if axis != Vec2::ZERO {
            let dir = axis.normalize();
            player.pos += dir * step;
            player.facing = dir.y.atan2(dir.x);
        }
    }
    player.clamp_to(state.arena);

    if input.fire || input.aim.is_some() {
        let aim_dir = input
            .aim
            .map(|p| (p - player.pos).normalize_or_zero())
            .filter(|d| *d != Vec2::ZERO);
        if let Some(dir) = aim_dir {
            player.facing = dir.y.atan2(dir.x);
        }
        if player.can_fire(now) {
            let dir = aim_dir.unwrap_or_else(|| player.facing_dir());
            player.last_shot = Some(now);
            let origin = player.pos;
            let vel = dir * state.config.projectile_speed;
            state.add_projectile(origin, vel, false);
            events.push(GameEvent::ShotFired);
        }
    }

    let fired = input.special && state.special.activate(state.config.special_cooldown);
    if fired {
        let origin = state.player.pos;
        let speed = state.config.projectile_speed;
        let count = state.config.special_burst_count;
        for dir in burst_directions(count) {
            state.add_projectile(origin, dir * speed, true);
        }
        log::debug!("Special attack fired ({} projectiles)", count);
        events.push(GameEvent::SpecialFired { projectiles: count });
    }
    fired
}

/// Enemies home toward the player; projectiles fly straight
fn move_entities(state: &mut SimState, dt: f32) {
    if !state.effects.enemies_frozen() {
        let target = state.player.pos;
        let multiplier = state.config.enemy_speed_multiplier(state.level);
        for enemy in &mut state.enemies {
            let dir = (target - enemy.pos).normalize_or_zero();
            enemy.pos += dir * enemy.speed * multiplier * dt;
        }
    }

    for projectile in &mut state.projectiles {
        projectile.pos += projectile.vel * dt;
    }
}

/// Remove one life, if any are left
fn damage_player(state: &mut SimState, events: &mut Vec<GameEvent>) {
    if state.lives > 0 {
        state.lives -= 1;
        events.push(GameEvent::PlayerHit {
            lives_left: state.lives,
        });
    }
}

fn resolve_collisions(state: &mut SimState, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    let now = state.time_secs;
    let mut enemy_dead = vec![false; state.enemies.len()];
    let mut projectile_dead = vec![false; state.projectiles.len()];
    // (id, position, volatile) of every enemy shot down
    let mut kills: Vec<(u32, Vec2, bool)> = Vec::new();
    let mut detonations: Vec<Vec2> = Vec::new();
    let mut contact_hits = 0;

    // Projectiles vs enemies: each projectile takes out at most one enemy
    for (pi, projectile) in state.projectiles.iter().enumerate() {
        for (ei, enemy) in state.enemies.iter().enumerate() {
            if enemy_dead[ei] {
                continue;
            }
            if overlaps(projectile.pos, projectile.hitbox(), enemy.pos, enemy.hitbox) {
                enemy_dead[ei] = true;
                projectile_dead[pi] = true;
                kills.push((enemy.id, enemy.pos, enemy.volatile));
                break;
            }
        }
    }

    // Fuses and player contact for the survivors
    let fuse = state.config.fuse_secs;
    for (ei, enemy) in state.enemies.iter().enumerate() {
        if enemy_dead[ei] {
            continue;
        }
        if enemy.fuse_expired(now, fuse) {
            enemy_dead[ei] = true;
            detonations.push(enemy.pos);
        } else if overlaps(enemy.pos, enemy.hitbox, state.player.pos, state.player.hitbox) {
            enemy_dead[ei] = true;
            events.push(GameEvent::EnemyContact { id: enemy.id });
            if enemy.volatile {
                // Ramming detonates; the blast does the damage
                detonations.push(enemy.pos);
            } else {
                contact_hits += 1;
            }
        }
    }
    for _ in 0..contact_hits {
        damage_player(state, events);
    }

    // Compact
    let mut flags = enemy_dead.into_iter();
    state.enemies.retain(|_| !flags.next().unwrap_or(false));
    let mut flags = projectile_dead.into_iter();
    state.projectiles.retain(|_| !flags.next().unwrap_or(false));

    for (id, pos, volatile) in kills {
        credit_kill(state, id, pos, volatile, rng, events);
    }

    for pos in detonations {
        state.add_explosion(pos);
        events.push(GameEvent::Detonation { pos });
    }

    // Live blasts hurt the player once each
    let mut hits = 0;
    for explosion in &mut state.explosions {
        if explosion.damaged_player {
            continue;
        }
        if in_blast(
            explosion.pos,
            explosion.radius,
            state.player.pos,
            state.player.hitbox,
        ) {
            explosion.damaged_player = true;
            hits += 1;
        }
    }
    for _ in 0..hits {
        damage_player(state, events);
    }

    // Pickups
    let player_pos = state.player.pos;
    let player_box = state.player.hitbox;
    let mut collected: Vec<PowerUpKind> = Vec::new();
    state.powerups.retain(|p| {
        let touching = overlaps(
            p.pos,
            Hitbox::Circle { radius: p.radius },
            player_pos,
            player_box,
        );
        if touching {
            collected.push(p.kind);
        }
        !touching
    });
    for kind in collected {
        kind.apply(&mut state.player, &mut state.effects, &state.config);
        log::debug!("Collected {}", kind.name());
        events.push(GameEvent::PowerUpCollected { kind });
    }
}

/// Score, kill bank and power-up drop for one destroyed enemy
fn credit_kill(
    state: &mut SimState,
    id: u32,
    pos: Vec2,
    volatile: bool,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let points = if volatile {
        state.config.score_per_volatile_kill
    } else {
        state.config.score_per_kill
    };
    state.score += points;
    state.kills += 1;
    events.push(GameEvent::EnemyKilled {
        id,
        pos,
        volatile,
        points,
    });

    if state
        .special
        .record_kill(state.config.special_kill_threshold)
    {
        events.push(GameEvent::SpecialReady);
    }

    if volatile && state.config.powerups_enabled {
        if let Some(kind) = PowerUpKind::roll(rng) {
            state.add_powerup(kind, pos);
            events.push(GameEvent::PowerUpDropped { kind, pos });
        }
    }
}

/// Cleanup, timers, level scaling and game over.
/// A cooldown started this frame begins counting on the next one.
fn update_lifecycle(
    state: &mut SimState,
    dt: f32,
    special_fired: bool,
    events: &mut Vec<GameEvent>,
) {
    let now = state.time_secs;
    let arena = state.arena;
    state.projectiles.retain(|p| in_bounds(p.pos, arena));

    for kind in state.effects.tick(dt) {
        kind.expire(&mut state.player, &mut state.effects);
        events.push(GameEvent::PowerUpExpired { kind });
    }

    let lifetime = f64::from(state.config.explosion_lifetime);
    state.explosions.retain(|e| now - e.created_at < lifetime);
    let ttl = f64::from(state.config.powerup_ttl);
    state.powerups.retain(|p| now - p.spawned_at < ttl);

    // One level per threshold crossed
    while state.score >= u64::from(state.level) * state.config.level_score_step {
        state.level += 1;
        let base = state.config.fire_interval_for_level(state.level);
        state.player.base_fire_interval = base;
        state.player.fire_interval = if state.effects.is_active(PowerUpKind::DoubleFireRate) {
            base * state.config.fire_rate_multiplier
        } else {
            base
        };
        log::info!("Level {} (score {})", state.level, state.score);
        events.push(GameEvent::LevelUp { level: state.level });
    }

    if !special_fired
        && state
            .special
            .tick(dt, state.config.special_kill_threshold)
    {
        events.push(GameEvent::SpecialReady);
    }

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        log::info!("Game over: score {}, level {}", state.score, state.level);
        events.push(GameEvent::GameOver {
            score: state.score,
            level: state.level,
        });
    }
}

/// Distance at which the autopilot backs away from an enemy
const AUTOPILOT_PANIC_RADIUS: f32 = 150.0;

/// Attract-mode driver: backs away from the nearest enemy while shooting at
/// it, detours for nearby pickups, fires the special as soon as it's up.
pub fn autopilot_input(state: &SimState) -> TickInput {
    let player = state.player.pos;
    let mut input = TickInput {
        special: state.special.is_ready(),
        ..Default::default()
    };

    let nearest = state.enemies.iter().min_by(|a, b| {
        a.pos
            .distance_squared(player)
            .partial_cmp(&b.pos.distance_squared(player))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    if let Some(enemy) = nearest {
        input.aim = Some(enemy.pos);
        if enemy.pos.distance(player) < AUTOPILOT_PANIC_RADIUS {
            input.move_axis = (player - enemy.pos).normalize_or_zero();
            return input;
        }
    }

    input.move_target = state
        .powerups
        .iter()
        .find(|p| p.pos.distance(player) < AUTOPILOT_PANIC_RADIUS * 1.5)
        .map(|p| p.pos)
        .or(Some(state.arena / 2.0));
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SimConfig, Theme};
    use crate::consts::SIM_DT;
    use crate::sim::SpecialPhase;
    use crate::sim::spawn::spawn_enemy;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fresh(theme: Theme) -> (SimState, Pcg32) {
        (
            SimState::new(SimConfig::default(), theme),
            Pcg32::seed_from_u64(12345),
        )
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    /// Far from the centered player
    const CORNER: Vec2 = Vec2::new(50.0, 50.0);

    #[test]
    fn test_projectile_kills_enemy() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.add_enemy(CORNER, 0.0, false);
        state.add_projectile(CORNER, Vec2::ZERO, false);

        let events = tick(&mut state, &idle(), SIM_DT, &mut rng);

        assert_eq!(state.score, 100);
        assert_eq!(state.kills, 1);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.lives, 3);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_volatile_kill_scores_more() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.add_enemy(CORNER, 0.0, true);
        state.add_projectile(CORNER, Vec2::ZERO, false);

        tick(&mut state, &idle(), SIM_DT, &mut rng);

        assert_eq!(state.score, 150);
        assert_eq!(state.kills, 1);
        assert!(state.enemies.is_empty());
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_one_projectile_one_kill() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.add_enemy(CORNER, 0.0, false);
        state.add_enemy(CORNER, 0.0, false);
        state.add_projectile(CORNER, Vec2::ZERO, false);

        tick(&mut state, &idle(), SIM_DT, &mut rng);

        assert_eq!(state.kills, 1);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_adjacent_kills_not_skipped() {
        // Two overlapping pairs in one frame; removing the first must not
        // hide the second
        let (mut state, mut rng) = fresh(Theme::Neon);
        let other = Vec2::new(700.0, 50.0);
        state.add_enemy(CORNER, 0.0, false);
        state.add_enemy(other, 0.0, false);
        state.add_projectile(CORNER, Vec2::ZERO, false);
        state.add_projectile(other, Vec2::ZERO, false);

        tick(&mut state, &idle(), SIM_DT, &mut rng);

        assert_eq!(state.kills, 2);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_box_theme_kill() {
        let (mut state, mut rng) = fresh(Theme::Tanks);
        state.add_enemy(CORNER, 0.0, false);
        // Inside the square's corner region, outside its inscribed circle
        state.add_projectile(CORNER + Vec2::new(17.0, 17.0), Vec2::ZERO, false);

        tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert_eq!(state.kills, 1);
    }

    #[test]
    fn test_enemy_contact_costs_life() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        let pos = state.player.pos;
        state.add_enemy(pos + Vec2::new(10.0, 0.0), 0.0, false);

        let events = tick(&mut state, &idle(), SIM_DT, &mut rng);

        assert_eq!(state.lives, 2);
        assert!(state.enemies.is_empty());
        assert!(events.contains(&GameEvent::PlayerHit { lives_left: 2 }));
    }

    #[test]
    fn test_each_contact_costs_one_life() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        let pos = state.player.pos;
        state.add_enemy(pos + Vec2::new(5.0, 0.0), 0.0, false);
        state.add_enemy(pos - Vec2::new(5.0, 0.0), 0.0, false);

        let events = tick(&mut state, &idle(), SIM_DT, &mut rng);

        let hits: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PlayerHit { lives_left } => Some(*lives_left),
                _ => None,
            })
            .collect();
        assert_eq!(hits, vec![2, 1]);
        assert_eq!(state.lives, 1);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyContact { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_enemies_home_toward_player() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.add_enemy(Vec2::new(0.0, 300.0), 60.0, false);
        let before = state.enemies[0].pos.distance(state.player.pos);

        tick(&mut state, &idle(), SIM_DT, &mut rng);

        let after = state.enemies[0].pos.distance(state.player.pos);
        assert!((before - after - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_freeze_stops_enemies() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.add_enemy(Vec2::new(0.0, 300.0), 60.0, false);
        PowerUpKind::FreezeEnemies.apply(&mut state.player, &mut state.effects, &state.config);

        tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert_eq!(state.enemies[0].pos, Vec2::new(0.0, 300.0));
    }

    #[test]
    fn test_fuse_detonates_and_damages_once() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        let near = state.player.pos + Vec2::new(50.0, 0.0);
        state.add_enemy(near, 0.0, true);
        state.time_secs = f64::from(state.config.fuse_secs);

        let events = tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert!(state.enemies.is_empty());
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.lives, 2);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Detonation { .. })));

        // The blast lingers but doesn't hit again
        tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.lives, 2);

        // And expires after its lifetime
        for _ in 0..30 {
            tick(&mut state, &idle(), SIM_DT, &mut rng);
        }
        assert!(state.explosions.is_empty());
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_distant_detonation_is_harmless() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.add_enemy(CORNER, 0.0, true);
        state.time_secs = 10.0;

        tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_volatile_ram_detonates() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        let pos = state.player.pos;
        state.add_enemy(pos, 0.0, true);

        tick(&mut state, &idle(), SIM_DT, &mut rng);

        assert_eq!(state.lives, 2);
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn test_fire_respects_interval() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT, &mut rng);
        assert_eq!(state.projectiles.len(), 1);
        // Default facing is up the screen
        assert!(state.projectiles[0].vel.y < 0.0);

        tick(&mut state, &fire, SIM_DT, &mut rng);
        assert_eq!(state.projectiles.len(), 1);

        // 0.6s later another shot is allowed
        for _ in 0..36 {
            tick(&mut state, &fire, SIM_DT, &mut rng);
        }
        assert!(state.projectiles.len() >= 2);
    }

    #[test]
    fn test_aim_sets_direction() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        let aim = state.player.pos + Vec2::new(100.0, 0.0);
        let input = TickInput {
            aim: Some(aim),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut rng);
        assert_eq!(state.projectiles.len(), 1);
        let dir = state.projectiles[0].vel.normalize();
        assert!((dir - Vec2::X).length() < 1e-4);
    }

    #[test]
    fn test_offscreen_projectiles_removed() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.add_projectile(Vec2::new(799.0, 300.0), Vec2::new(420.0, 0.0), false);
        tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_player_movement_clamped() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        let left = TickInput {
            move_axis: Vec2::new(-1.0, 0.0),
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &left, SIM_DT, &mut rng);
        }
        assert_eq!(state.player.pos.x, 0.0);
    }

    #[test]
    fn test_drag_target_no_overshoot() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        let target = state.player.pos + Vec2::new(2.0, 0.0);
        let input = TickInput {
            move_target: Some(target),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut rng);
        assert_eq!(state.player.pos, target);
    }

    #[test]
    fn test_level_up_once_per_threshold() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.score = 990;
        state.add_enemy(CORNER, 0.0, false);
        state.add_projectile(CORNER, Vec2::ZERO, false);

        let events = tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert_eq!(state.level, 2);
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
        assert!(
            (state.player.base_fire_interval - state.config.fire_interval * 0.9).abs() < 1e-6
        );

        let events = tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert_eq!(state.level, 2);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelUp { .. })));
    }

    #[test]
    fn test_multiple_thresholds_in_one_frame() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.score = 2950;
        state.add_enemy(CORNER, 0.0, false);
        state.add_projectile(CORNER, Vec2::ZERO, false);

        let events = tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert_eq!(state.level, 4);
        let level_ups: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .collect();
        assert_eq!(level_ups.len(), 3);
    }

    #[test]
    fn test_special_attack_cycle() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.special.kills_since_use = state.config.special_kill_threshold - 1;
        state.add_enemy(CORNER, 0.0, false);
        state.add_projectile(CORNER, Vec2::ZERO, false);

        let events = tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert!(events.contains(&GameEvent::SpecialReady));
        assert!(state.special.is_ready());

        let fire_special = TickInput {
            special: true,
            ..Default::default()
        };
        let events = tick(&mut state, &fire_special, SIM_DT, &mut rng);
        assert!(events.contains(&GameEvent::SpecialFired { projectiles: 16 }));
        assert_eq!(state.projectiles.iter().filter(|p| p.special).count(), 16);
        assert!(!state.special.is_ready());
        assert_eq!(state.special.kills_since_use, 0);
        assert!(matches!(state.special.phase, SpecialPhase::Cooldown { .. }));

        // Pressing again during cooldown does nothing
        let events = tick(&mut state, &fire_special, SIM_DT, &mut rng);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::SpecialFired { .. })));
    }

    #[test]
    fn test_powerup_pickup_and_expiry() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        let pos = state.player.pos;
        state.add_powerup(PowerUpKind::SpeedBoost, pos);

        let events = tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert!(events.contains(&GameEvent::PowerUpCollected {
            kind: PowerUpKind::SpeedBoost
        }));
        assert!(state.powerups.is_empty());
        assert!(state.player.speed > state.player.base_speed);

        let frames = (state.config.powerup_duration / SIM_DT).ceil() as usize + 1;
        let mut expired = false;
        for _ in 0..frames {
            let events = tick(&mut state, &idle(), SIM_DT, &mut rng);
            expired |= events.contains(&GameEvent::PowerUpExpired {
                kind: PowerUpKind::SpeedBoost,
            });
        }
        assert!(expired);
        assert_eq!(state.player.speed, state.player.base_speed);
    }

    #[test]
    fn test_uncollected_powerup_times_out() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.add_powerup(PowerUpKind::FreezeEnemies, CORNER);
        state.time_secs += f64::from(state.config.powerup_ttl);
        tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_game_over_once() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.lives = 1;
        let pos = state.player.pos;
        state.add_enemy(pos, 0.0, false);
        state.add_enemy(pos, 0.0, false);

        let events = tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count(),
            1
        );

        // Nothing moves afterwards
        let events = tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert!(events.is_empty());
    }

    #[test]
    fn test_tick_pause() {
        let (mut state, mut rng) = fresh(Theme::Neon);
        state.add_enemy(CORNER, 60.0, false);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Paused);
        let frozen_at = state.enemies[0].pos;
        let time = state.time_secs;

        tick(&mut state, &idle(), SIM_DT, &mut rng);
        assert_eq!(state.enemies[0].pos, frozen_at);
        assert_eq!(state.time_secs, time);

        // Unpause
        tick(&mut state, &pause, SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_ne!(state.enemies[0].pos, frozen_at);
    }

    #[test]
    fn test_determinism() {
        let run = |seed: u64| {
            let mut state = SimState::new(SimConfig::default(), Theme::Neon);
            let mut rng = Pcg32::seed_from_u64(seed);
            let fire = TickInput {
                fire: true,
                move_axis: Vec2::new(0.3, -1.0),
                ..Default::default()
            };
            for frame in 0..600 {
                if frame % 60 == 0 {
                    spawn_enemy(&mut state, &mut rng);
                }
                tick(&mut state, &fire, SIM_DT, &mut rng);
            }
            (state.score, state.lives, state.enemies.len(), state.player.pos)
        };
        assert_eq!(run(99999), run(99999));
    }

    #[test]
    fn test_autopilot_scores() {
        let mut state = SimState::new(SimConfig::default(), Theme::Neon);
        let mut rng = Pcg32::seed_from_u64(2024);
        for frame in 0..1800 {
            if frame % 60 == 0 {
                spawn_enemy(&mut state, &mut rng);
            }
            let input = autopilot_input(&state);
            tick(&mut state, &input, SIM_DT, &mut rng);
        }
        assert!(state.kills > 0);
        assert!(state.score > 0);
    }

    #[test]
    fn test_autopilot_flees_close_enemy() {
        let mut state = SimState::new(SimConfig::default(), Theme::Neon);
        let pos = state.player.pos;
        state.add_enemy(pos + Vec2::new(50.0, 0.0), 0.0, false);
        let input = autopilot_input(&state);
        assert!(input.move_axis.x < 0.0);
        assert_eq!(input.aim, Some(pos + Vec2::new(50.0, 0.0)));
        assert!(input.move_target.is_none());
    }

    fn stress_config() -> SimConfig {
        SimConfig {
            special_kill_threshold: 3,
            special_cooldown: 1.0,
            volatile_base_chance: 0.3,
            ..SimConfig::default()
        }
    }

    fn input_strategy() -> impl Strategy<Value = TickInput> {
        (
            -1.0f32..=1.0,
            -1.0f32..=1.0,
            any::<bool>(),
            proptest::option::of((0.0f32..800.0, 0.0f32..600.0)),
            any::<bool>(),
        )
            .prop_map(|(x, y, fire, aim, special)| TickInput {
                move_axis: Vec2::new(x, y),
                move_target: None,
                fire,
                aim: aim.map(|(ax, ay)| Vec2::new(ax, ay)),
                special,
                pause: false,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_invariants_hold(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(input_strategy(), 1..400),
        ) {
            let mut state = SimState::new(stress_config(), Theme::Neon);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut game_overs = 0;
            let mut last_fired: Option<f64> = None;

            for (frame, input) in inputs.iter().enumerate() {
                if frame % 3 == 0 {
                    spawn_enemy(&mut state, &mut rng);
                }
                let (score, level, lives, kills) =
                    (state.score, state.level, state.lives, state.kills);
                let events = tick(&mut state, input, SIM_DT, &mut rng);

                prop_assert!(state.enemies.len() <= state.enemy_cap());
                prop_assert!(state.score >= score);
                prop_assert!(state.level >= level);
                prop_assert!(state.lives <= lives);
                // Level tracks score thresholds exactly
                prop_assert!(state.score < u64::from(state.level) * state.config.level_score_step);
                // One kill and one score credit per destroyed pair
                let kill_points: Vec<u64> = events
                    .iter()
                    .filter_map(|e| match e {
                        GameEvent::EnemyKilled { points, .. } => Some(*points),
                        _ => None,
                    })
                    .collect();
                prop_assert_eq!(state.kills - kills, kill_points.len() as u32);
                prop_assert_eq!(state.score - score, kill_points.iter().sum::<u64>());

                for event in &events {
                    match event {
                        GameEvent::GameOver { .. } => game_overs += 1,
                        GameEvent::SpecialFired { .. } => {
                            prop_assert!(!state.special.is_ready());
                            last_fired = Some(state.time_secs);
                        }
                        GameEvent::SpecialReady => {
                            prop_assert!(
                                state.special.kills_since_use >= state.config.special_kill_threshold
                            );
                            if let Some(t) = last_fired {
                                let cooldown = f64::from(state.config.special_cooldown);
                                prop_assert!(state.time_secs - t >= cooldown - 1e-3);
                            }
                        }
                        _ => {}
                    }
                }
                if state.phase == GamePhase::GameOver {
                    prop_assert_eq!(state.lives, 0);
                }
            }
            prop_assert!(game_overs <= 1);
        }
    }
}
