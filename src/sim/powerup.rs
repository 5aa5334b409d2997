//! Power-up kinds and their timed effects
//!
//! Each kind has an explicit `apply` and `expire`; expiring always restores
//! the player's baseline stat for that kind.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Player;
use crate::config::SimConfig;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Enemies stop moving
    FreezeEnemies,
    /// Fire interval shortened by `fire_rate_multiplier`
    DoubleFireRate,
    /// Movement speed raised by `speed_boost_multiplier`
    SpeedBoost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::FreezeEnemies,
        PowerUpKind::DoubleFireRate,
        PowerUpKind::SpeedBoost,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::FreezeEnemies => "Freeze",
            PowerUpKind::DoubleFireRate => "Rapid Fire",
            PowerUpKind::SpeedBoost => "Speed Boost",
        }
    }

    /// Display color as 0xRRGGBB
    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::FreezeEnemies => 0x00ffff,
            PowerUpKind::DoubleFireRate => 0xffa500,
            PowerUpKind::SpeedBoost => 0x00ff00,
        }
    }

    /// Chance of dropping on a volatile kill
    pub fn drop_chance(&self) -> f32 {
        match self {
            PowerUpKind::FreezeEnemies => 0.1,
            PowerUpKind::DoubleFireRate => 0.15,
            PowerUpKind::SpeedBoost => 0.15,
        }
    }

    /// One roll against the combined drop table
    pub fn roll(rng: &mut impl Rng) -> Option<Self> {
        let mut roll: f32 = rng.random();
        for kind in Self::ALL {
            if roll < kind.drop_chance() {
                return Some(kind);
            }
            roll -= kind.drop_chance();
        }
        None
    }

    /// Start (or refresh) the effect
    pub fn apply(self, player: &mut Player, effects: &mut ActiveEffects, config: &SimConfig) {
        *effects.remaining_mut(self) = config.powerup_duration;
        match self {
            PowerUpKind::FreezeEnemies => {}
            PowerUpKind::DoubleFireRate => {
                player.fire_interval = player.base_fire_interval * config.fire_rate_multiplier;
            }
            PowerUpKind::SpeedBoost => {
                player.speed = player.base_speed * config.speed_boost_multiplier;
            }
        }
    }

    /// End the effect and restore the baseline
    pub fn expire(self, player: &mut Player, effects: &mut ActiveEffects) {
        *effects.remaining_mut(self) = 0.0;
        match self {
            PowerUpKind::FreezeEnemies => {}
            PowerUpKind::DoubleFireRate => player.fire_interval = player.base_fire_interval,
            PowerUpKind::SpeedBoost => player.speed = player.base_speed,
        }
    }
}

/// Seconds left on each timed effect (0 = inactive)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub freeze: f32,
    pub rapid_fire: f32,
    pub speed_boost: f32,
}

impl ActiveEffects {
    pub fn remaining(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::FreezeEnemies => self.freeze,
            PowerUpKind::DoubleFireRate => self.rapid_fire,
            PowerUpKind::SpeedBoost => self.speed_boost,
        }
    }

    fn remaining_mut(&mut self, kind: PowerUpKind) -> &mut f32 {
        match kind {
            PowerUpKind::FreezeEnemies => &mut self.freeze,
            PowerUpKind::DoubleFireRate => &mut self.rapid_fire,
            PowerUpKind::SpeedBoost => &mut self.speed_boost,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.remaining(kind) > 0.0
    }

    pub fn enemies_frozen(&self) -> bool {
        self.is_active(PowerUpKind::FreezeEnemies)
    }

    /// Active effects with their remaining seconds
    pub fn active(&self) -> Vec<(PowerUpKind, f32)> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
            .map(|k| (k, self.remaining(k)))
            .collect()
    }

    /// Count timers down; returns the kinds whose timer ran out this step.
    /// Callers must `expire` each returned kind.
    pub fn tick(&mut self, dt: f32) -> Vec<PowerUpKind> {
        let mut elapsed = Vec::new();
        for kind in PowerUpKind::ALL {
            let t = self.remaining_mut(kind);
            if *t > 0.0 {
                *t -= dt;
                if *t <= 0.0 {
                    *t = 0.0;
                    elapsed.push(kind);
                }
            }
        }
        elapsed
    }
}
