//! Game balance and theme selection
//!
//! Everything tunable lives in `SimConfig`. Presets cover the common cases;
//! a JSON document can override any subset of fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};
use crate::sim::Hitbox;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier applied to enemy speed range
    fn enemy_speed_factor(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.3,
        }
    }

    /// Lives at the start of a run
    fn start_lives(&self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Normal => START_LIVES,
            Difficulty::Hard => 2,
        }
    }
}

/// Cosmetic variant of the game. Also decides the collision primitive for
/// the player and enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    /// Glowing circles on black
    Neon,
    /// Top-down tanks; square hulls collide as boxes
    Tanks,
    Desert,
    Arctic,
    Jungle,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Neon,
        Theme::Tanks,
        Theme::Desert,
        Theme::Arctic,
        Theme::Jungle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Neon => "neon",
            Theme::Tanks => "tanks",
            Theme::Desert => "desert",
            Theme::Arctic => "arctic",
            Theme::Jungle => "jungle",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| GameError::UnknownTheme(s.to_string()))
    }

    /// Whether bodies are drawn (and collide) as squares
    pub fn uses_boxes(&self) -> bool {
        matches!(self, Theme::Tanks)
    }

    /// Hitbox for a body of the given nominal size
    pub fn body_hitbox(&self, size: f32) -> Hitbox {
        if self.uses_boxes() {
            Hitbox::Box {
                half: Vec2::splat(size),
            }
        } else {
            Hitbox::Circle { radius: size }
        }
    }
}

/// When the spawner fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnSchedule {
    /// One attempt every `secs` seconds, independent of frame rate
    Interval { secs: f32 },
    /// Each frame spawns with probability `base + per_level * level`
    PerFrameChance { base: f32, per_level: f32 },
}

impl Default for SpawnSchedule {
    fn default() -> Self {
        SpawnSchedule::Interval {
            secs: SPAWN_INTERVAL,
        }
    }
}

/// Full simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub difficulty: Difficulty,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Player ===
    pub start_lives: u32,
    pub player_size: f32,
    pub player_speed: f32,
    /// Seconds between shots at level 1
    pub fire_interval: f32,
    pub min_fire_interval: f32,
    pub fire_rate_scale_per_level: f32,
    pub projectile_radius: f32,
    pub projectile_speed: f32,

    // === Enemies ===
    pub enemy_size: f32,
    pub enemy_min_speed: f32,
    pub enemy_max_speed: f32,
    pub enemy_speed_scale_per_level: f32,
    pub enemy_cap_base: u32,

    // === Spawner ===
    pub spawn_schedule: SpawnSchedule,
    /// Resample spawn points that land too close to the player
    pub spawn_avoid_player: bool,
    pub spawn_min_player_distance: f32,
    pub spawn_max_attempts: u32,

    // === Volatile enemies ===
    pub volatile_base_chance: f32,
    pub volatile_chance_per_level: f32,
    pub volatile_max_chance: f32,
    pub fuse_secs: f32,
    pub explosion_radius: f32,
    pub explosion_lifetime: f32,

    // === Scoring ===
    pub score_per_kill: u64,
    pub score_per_volatile_kill: u64,
    pub level_score_step: u64,

    // === Special attack ===
    pub special_kill_threshold: u32,
    pub special_cooldown: f32,
    pub special_burst_count: u32,

    // === Power-ups ===
    pub powerups_enabled: bool,
    pub powerup_radius: f32,
    pub powerup_ttl: f32,
    pub powerup_duration: f32,
    pub speed_boost_multiplier: f32,
    pub fire_rate_multiplier: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            start_lives: START_LIVES,
            player_size: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            fire_interval: FIRE_INTERVAL,
            min_fire_interval: MIN_FIRE_INTERVAL,
            fire_rate_scale_per_level: FIRE_RATE_SCALE_PER_LEVEL,
            projectile_radius: PROJECTILE_RADIUS,
            projectile_speed: PROJECTILE_SPEED,

            enemy_size: ENEMY_RADIUS,
            enemy_min_speed: ENEMY_MIN_SPEED,
            enemy_max_speed: ENEMY_MAX_SPEED,
            enemy_speed_scale_per_level: ENEMY_SPEED_SCALE_PER_LEVEL,
            enemy_cap_base: ENEMY_CAP_BASE,

            spawn_schedule: SpawnSchedule::default(),
            spawn_avoid_player: true,
            spawn_min_player_distance: SPAWN_MIN_PLAYER_DISTANCE,
            spawn_max_attempts: SPAWN_MAX_ATTEMPTS,

            volatile_base_chance: VOLATILE_BASE_CHANCE,
            volatile_chance_per_level: VOLATILE_CHANCE_PER_LEVEL,
            volatile_max_chance: VOLATILE_MAX_CHANCE,
            fuse_secs: FUSE_SECS,
            explosion_radius: EXPLOSION_RADIUS,
            explosion_lifetime: EXPLOSION_LIFETIME,

            score_per_kill: SCORE_PER_KILL,
            score_per_volatile_kill: SCORE_PER_VOLATILE_KILL,
            level_score_step: LEVEL_SCORE_STEP,

            special_kill_threshold: SPECIAL_KILL_THRESHOLD,
            special_cooldown: SPECIAL_COOLDOWN,
            special_burst_count: SPECIAL_BURST_COUNT,

            powerups_enabled: true,
            powerup_radius: POWERUP_RADIUS,
            powerup_ttl: POWERUP_TTL,
            powerup_duration: POWERUP_DURATION,
            speed_boost_multiplier: SPEED_BOOST_MULTIPLIER,
            fire_rate_multiplier: FIRE_RATE_MULTIPLIER,
        }
    }
}

impl SimConfig {
    /// Create a config from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut config = Self::default();
        config.apply_preset(preset);
        config
    }

    /// Apply a difficulty preset on top of the current values
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.start_lives = preset.start_lives();
        let factor = preset.enemy_speed_factor();
        self.enemy_min_speed = ENEMY_MIN_SPEED * factor;
        self.enemy_max_speed = ENEMY_MAX_SPEED * factor;

        if preset == Difficulty::Hard {
            self.volatile_base_chance = 0.15;
            self.spawn_schedule = SpawnSchedule::Interval { secs: 0.75 };
        }
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, msg: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(GameError::InvalidConfig(msg.to_string()))
            }
        }

        check(
            self.arena_width > 0.0 && self.arena_height > 0.0,
            "arena must have positive size",
        )?;
        check(self.start_lives > 0, "start_lives must be at least 1")?;
        check(self.player_size > 0.0, "player_size must be positive")?;
        check(self.enemy_size > 0.0, "enemy_size must be positive")?;
        check(
            self.enemy_min_speed >= 0.0 && self.enemy_min_speed <= self.enemy_max_speed,
            "enemy speed range is empty",
        )?;
        check(
            self.fire_interval > 0.0 && self.min_fire_interval > 0.0,
            "fire intervals must be positive",
        )?;
        check(
            self.fire_rate_scale_per_level > 0.0 && self.fire_rate_scale_per_level <= 1.0,
            "fire_rate_scale_per_level must be in (0, 1]",
        )?;
        check(self.level_score_step > 0, "level_score_step must be positive")?;
        check(
            (0.0..=1.0).contains(&self.volatile_base_chance)
                && (0.0..=1.0).contains(&self.volatile_max_chance),
            "volatile chances must be probabilities",
        )?;
        check(
            self.explosion_lifetime > 0.0 && self.fuse_secs > 0.0,
            "fuse and explosion lifetime must be positive",
        )?;
        check(
            self.enemy_cap_base <= MAX_ENEMY_CAP_BASE,
            "enemy_cap_base is too large",
        )?;
        check(self.special_burst_count > 0, "special_burst_count must be positive")?;
        match self.spawn_schedule {
            // At most one spawn per frame
            SpawnSchedule::Interval { secs } => check(
                secs >= SIM_DT,
                "spawn interval must be at least one frame",
            ),
            SpawnSchedule::PerFrameChance { base, per_level } => check(
                base >= 0.0 && per_level >= 0.0,
                "spawn chances must be non-negative",
            ),
        }
    }

    /// Arena size as a vector
    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Enemy population cap for a level
    pub fn enemy_cap(&self, level: u32) -> usize {
        self.enemy_cap_base.saturating_add(level) as usize
    }

    /// Fraction of spawns flagged volatile at a level
    pub fn volatile_chance(&self, level: u32) -> f32 {
        let grown =
            self.volatile_base_chance + self.volatile_chance_per_level * level.saturating_sub(1) as f32;
        grown.min(self.volatile_max_chance).clamp(0.0, 1.0)
    }

    /// Enemy speed multiplier at a level
    pub fn enemy_speed_multiplier(&self, level: u32) -> f32 {
        1.0 + self.enemy_speed_scale_per_level * level.saturating_sub(1) as f32
    }

    /// Baseline seconds between shots at a level
    pub fn fire_interval_for_level(&self, level: u32) -> f32 {
        let scaled = self.fire_interval
            * self
                .fire_rate_scale_per_level
                .powi(level.saturating_sub(1) as i32);
        scaled.max(self.min_fire_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(SimConfig::default().validate().is_ok());
        for preset in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert!(SimConfig::from_preset(preset).validate().is_ok());
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "start_lives": 9, "enemy_cap_base": 3 }"#).unwrap();
        assert_eq!(config.start_lives, 9);
        assert_eq!(config.enemy_cap(1), 4);
        assert_eq!(config.score_per_kill, SCORE_PER_KILL);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = SimConfig::from_json(r#"{ "arena_width": 0.0 }"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));

        let err = SimConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, GameError::Json(_)));
    }

    #[test]
    fn test_huge_enemy_cap_rejected() {
        let err = SimConfig::from_json(r#"{ "enemy_cap_base": 4294967295 }"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }

    #[test]
    fn test_enemy_cap_saturates() {
        let config = SimConfig {
            enemy_cap_base: u32::MAX,
            ..SimConfig::default()
        };
        assert_eq!(config.enemy_cap(5), u32::MAX as usize);
    }

    #[test]
    fn test_tiny_spawn_interval_rejected() {
        let err = SimConfig::from_json(r#"{ "spawn_schedule": { "Interval": { "secs": 1e-9 } } }"#)
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));

        let config = SimConfig {
            spawn_schedule: SpawnSchedule::Interval { secs: SIM_DT },
            ..SimConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_volatile_chance_capped() {
        let config = SimConfig::default();
        assert!((config.volatile_chance(1) - VOLATILE_BASE_CHANCE).abs() < 1e-6);
        assert!(config.volatile_chance(5) > config.volatile_chance(1));
        assert!((config.volatile_chance(100) - VOLATILE_MAX_CHANCE).abs() < 1e-6);
    }

    #[test]
    fn test_fire_interval_scaling_floors() {
        let config = SimConfig::default();
        assert!((config.fire_interval_for_level(1) - FIRE_INTERVAL).abs() < 1e-6);
        assert!((config.fire_interval_for_level(2) - FIRE_INTERVAL * 0.9).abs() < 1e-6);
        assert_eq!(config.fire_interval_for_level(200), MIN_FIRE_INTERVAL);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(Theme::parse("Tanks").unwrap(), Theme::Tanks);
        assert_eq!(Theme::parse(" arctic ").unwrap(), Theme::Arctic);
        assert!(matches!(
            Theme::parse("space"),
            Err(GameError::UnknownTheme(_))
        ));
        assert!(Theme::Tanks.uses_boxes());
        assert!(!Theme::Neon.uses_boxes());
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("medium"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }
}
