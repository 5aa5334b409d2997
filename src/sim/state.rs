//! Game state and core simulation types
//!
//! Everything the frame step reads or writes lives in `SimState`; there is
//! no ambient state anywhere else in the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use super::powerup::{ActiveEffects, PowerUpKind};
use super::special::{SpecialAttack, SpecialPhase};
use crate::config::{SimConfig, Theme};
use crate::direction_from_angle;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Lives ran out
    GameOver,
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub hitbox: Hitbox,
    /// Speed without power-ups (pixels/s)
    pub base_speed: f32,
    /// Current speed (pixels/s)
    pub speed: f32,
    /// Seconds between shots for the current level, without power-ups
    pub base_fire_interval: f32,
    /// Current seconds between shots
    pub fire_interval: f32,
    /// Simulation time of the last shot
    pub last_shot: Option<f64>,
    /// Facing angle (radians), used when firing without an aim point
    pub facing: f32,
}

impl Player {
    pub fn new(config: &SimConfig, theme: Theme, pos: Vec2) -> Self {
        Self {
            pos,
            hitbox: theme.body_hitbox(config.player_size),
            base_speed: config.player_speed,
            speed: config.player_speed,
            base_fire_interval: config.fire_interval,
            fire_interval: config.fire_interval,
            last_shot: None,
            // Facing up the screen
            facing: -std::f32::consts::FRAC_PI_2,
        }
    }

    /// Whether the fire interval has elapsed since the last shot
    pub fn can_fire(&self, now: f64) -> bool {
        self.last_shot
            .is_none_or(|t| now - t >= f64::from(self.fire_interval))
    }

    pub fn facing_dir(&self) -> Vec2 {
        direction_from_angle(self.facing)
    }

    /// Keep the avatar inside the arena
    pub fn clamp_to(&mut self, arena: Vec2) {
        self.pos = self.pos.clamp(Vec2::ZERO, arena);
    }
}

/// A projectile (regular shot or special burst)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Fired by the special attack
    pub special: bool,
}

impl Projectile {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::Circle {
            radius: self.radius,
        }
    }
}

/// A homing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub hitbox: Hitbox,
    /// Base speed (pixels/s), before the level multiplier
    pub speed: f32,
    /// Self-detonates once its fuse runs out
    pub volatile: bool,
    /// Simulation time of creation
    pub spawned_at: f64,
}

impl Enemy {
    /// Whether a volatile enemy's fuse has run out
    pub fn fuse_expired(&self, now: f64, fuse_secs: f32) -> bool {
        self.volatile && now - self.spawned_at >= f64::from(fuse_secs)
    }
}

/// A short-lived blast left by a volatile enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub created_at: f64,
    /// Set once the blast has cost the player a life
    pub damaged_player: bool,
}

/// A power-up waiting to be collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
    pub spawned_at: f64,
}

/// Things that happened during a step, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, volatile: bool },
    ShotFired,
    EnemyKilled {
        id: u32,
        pos: Vec2,
        volatile: bool,
        points: u64,
    },
    /// Enemy rammed the player
    EnemyContact { id: u32 },
    Detonation { pos: Vec2 },
    PlayerHit { lives_left: u32 },
    PowerUpDropped { kind: PowerUpKind, pos: Vec2 },
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    LevelUp { level: u32 },
    SpecialReady,
    SpecialFired { projectiles: u32 },
    Paused,
    Resumed,
    GameOver { score: u64, level: u32 },
}

/// Read-only view for the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    pub lives: u32,
    pub kills: u32,
    pub special_ready: bool,
    /// Seconds left on the special cooldown (0 when not cooling down)
    pub special_cooldown: f32,
    /// Kills still needed before the special unlocks
    pub kills_to_special: u32,
    pub phase: GamePhase,
    /// Active timed effects and their remaining seconds
    pub effects: Vec<(PowerUpKind, f32)>,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub config: SimConfig,
    pub theme: Theme,
    /// Arena size (pixels)
    pub arena: Vec2,
    pub phase: GamePhase,
    /// Simulation clock (seconds since start)
    pub time_secs: f64,
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    /// Total kills this run
    pub kills: u32,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    pub powerups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    pub special: SpecialAttack,
    /// Next entity ID
    next_id: u32,
}

impl SimState {
    /// Fresh run: player centered, no enemies
    pub fn new(config: SimConfig, theme: Theme) -> Self {
        let arena = config.arena_size();
        let player = Player::new(&config, theme, arena / 2.0);
        Self {
            theme,
            arena,
            phase: GamePhase::Playing,
            time_secs: 0.0,
            score: 0,
            level: 1,
            lives: config.start_lives,
            kills: 0,
            player,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            explosions: Vec::new(),
            powerups: Vec::new(),
            effects: ActiveEffects::default(),
            special: SpecialAttack::new(),
            next_id: 1,
            config,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Enemy population cap at the current level
    pub fn enemy_cap(&self) -> usize {
        self.config.enemy_cap(self.level)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Place an enemy. Ignores the cap; the spawner checks it.
    pub fn add_enemy(&mut self, pos: Vec2, speed: f32, volatile: bool) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            pos,
            hitbox: self.theme.body_hitbox(self.config.enemy_size),
            speed,
            volatile,
            spawned_at: self.time_secs,
        });
        id
    }

    pub fn add_projectile(&mut self, pos: Vec2, vel: Vec2, special: bool) -> u32 {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile {
            id,
            pos,
            vel,
            radius: self.config.projectile_radius,
            special,
        });
        id
    }

    pub fn add_explosion(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.explosions.push(Explosion {
            id,
            pos,
            radius: self.config.explosion_radius,
            created_at: self.time_secs,
            damaged_player: false,
        });
        id
    }

    pub fn add_powerup(&mut self, kind: PowerUpKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.powerups.push(PowerUp {
            id,
            kind,
            pos,
            radius: self.config.powerup_radius,
            spawned_at: self.time_secs,
        });
        id
    }

    /// Flip between Playing and Paused. No effect after game over.
    pub fn toggle_pause(&mut self) -> Option<GameEvent> {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                Some(GameEvent::Paused)
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                Some(GameEvent::Resumed)
            }
            GamePhase::GameOver => None,
        }
    }

    /// The drawable surface changed size; re-anchor the player at the center
    pub fn resize(&mut self, width: f32, height: f32) {
        self.arena = Vec2::new(width.max(1.0), height.max(1.0));
        self.player.pos = self.arena / 2.0;
    }

    pub fn hud(&self, high_score: u64) -> Hud {
        let threshold = self.config.special_kill_threshold;
        Hud {
            score: self.score,
            high_score: high_score.max(self.score),
            level: self.level,
            lives: self.lives,
            kills: self.kills,
            special_ready: self.special.is_ready(),
            special_cooldown: match self.special.phase {
                SpecialPhase::Cooldown { remaining } => remaining,
                _ => 0.0,
            },
            kills_to_special: threshold.saturating_sub(self.special.kills_since_use),
            phase: self.phase,
            effects: self.effects.active(),
        }
    }
}
