//! Edge Siege - a top-down arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Per-frame simulation step (spawn, motion, collisions, scaling)
//! - `session`: Drives the step, spawn timer, pause/restart and high score
//! - `config`: Data-driven game balance and theme selection
//! - `highscores`: Single persisted best score
//! - `web`: Browser facade (wasm32 only)

pub mod config;
pub mod error;
pub mod highscores;
pub mod session;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{Difficulty, SimConfig, Theme};
pub use error::GameError;
pub use highscores::{HighScore, HighScoreStore, MemoryStore};
pub use session::Session;

use glam::Vec2;

/// Game configuration constants (defaults for `SimConfig`)
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta accepted before clamping (tab switches etc.)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default arena size
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const START_LIVES: u32 = 3;
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Seconds between shots (600 ms)
    pub const FIRE_INTERVAL: f32 = 0.6;
    pub const MIN_FIRE_INTERVAL: f32 = 0.1;
    pub const FIRE_RATE_SCALE_PER_LEVEL: f32 = 0.9;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 420.0;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 15.0;
    pub const ENEMY_MIN_SPEED: f32 = 60.0;
    pub const ENEMY_MAX_SPEED: f32 = 120.0;
    /// Enemy speed multiplier gained per level above 1
    pub const ENEMY_SPEED_SCALE_PER_LEVEL: f32 = 0.1;
    /// Population cap is `ENEMY_CAP_BASE + level`
    pub const ENEMY_CAP_BASE: u32 = 7;
    /// Largest accepted `enemy_cap_base`
    pub const MAX_ENEMY_CAP_BASE: u32 = 1000;

    /// Scoring
    pub const SCORE_PER_KILL: u64 = 100;
    pub const SCORE_PER_VOLATILE_KILL: u64 = 150;
    pub const LEVEL_SCORE_STEP: u64 = 1000;

    /// Spawner
    pub const SPAWN_INTERVAL: f32 = 1.0;
    pub const SPAWN_MIN_PLAYER_DISTANCE: f32 = 150.0;
    pub const SPAWN_MAX_ATTEMPTS: u32 = 30;

    /// Volatile enemies
    pub const VOLATILE_BASE_CHANCE: f32 = 0.1;
    pub const VOLATILE_CHANCE_PER_LEVEL: f32 = 0.02;
    pub const VOLATILE_MAX_CHANCE: f32 = 0.3;
    pub const FUSE_SECS: f32 = 3.0;
    pub const EXPLOSION_RADIUS: f32 = 60.0;
    pub const EXPLOSION_LIFETIME: f32 = 0.4;

    /// Special attack
    pub const SPECIAL_KILL_THRESHOLD: u32 = 30;
    pub const SPECIAL_COOLDOWN: f32 = 15.0;
    pub const SPECIAL_BURST_COUNT: u32 = 16;

    /// Power-ups
    pub const POWERUP_RADIUS: f32 = 12.0;
    pub const POWERUP_TTL: f32 = 8.0;
    pub const POWERUP_DURATION: f32 = 5.0;
    pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;
    pub const FIRE_RATE_MULTIPLIER: f32 = 0.5;
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Whether a point lies inside `[0, size]` on both axes
#[inline]
pub fn in_bounds(pos: Vec2, size: Vec2) -> bool {
    pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= size.x && pos.y <= size.y
}
