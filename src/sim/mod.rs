//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - State passed in explicitly, no globals
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod powerup;
pub mod spawn;
pub mod special;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, overlaps};
pub use powerup::{ActiveEffects, PowerUpKind};
pub use spawn::{roll_frame_spawn, spawn_enemy};
pub use special::{SpecialAttack, SpecialPhase};
pub use state::{
    Enemy, Explosion, GameEvent, GamePhase, Hud, Player, PowerUp, Projectile, SimState,
};
pub use tick::{TickInput, autopilot_input, tick};
