//! Special attack charge
//!
//! LOCKED -> READY once enough kills are banked and no cooldown is running.
//! Activation fires the burst, zeroes the kill bank and starts the cooldown
//! in one step. When the cooldown ends the attack is LOCKED again (or READY
//! straight away if the bank already meets the threshold).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::direction_from_angle;

/// Special attack phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpecialPhase {
    Locked,
    Ready,
    Cooldown { remaining: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialAttack {
    pub phase: SpecialPhase,
    /// Kills since the last activation (kills during cooldown count)
    pub kills_since_use: u32,
}

impl Default for SpecialAttack {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecialAttack {
    pub fn new() -> Self {
        Self {
            phase: SpecialPhase::Locked,
            kills_since_use: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == SpecialPhase::Ready
    }

    pub fn in_cooldown(&self) -> bool {
        matches!(self.phase, SpecialPhase::Cooldown { .. })
    }

    /// Bank a kill. Returns true if this made the attack ready.
    pub fn record_kill(&mut self, threshold: u32) -> bool {
        self.kills_since_use = self.kills_since_use.saturating_add(1);
        self.unlock_if_charged(threshold)
    }

    /// Advance the cooldown. Returns true if the attack became ready.
    pub fn tick(&mut self, dt: f32, threshold: u32) -> bool {
        if let SpecialPhase::Cooldown { remaining } = &mut self.phase {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.phase = SpecialPhase::Locked;
            }
        }
        self.unlock_if_charged(threshold)
    }

    /// Fire if ready. Returns false (and changes nothing) otherwise.
    pub fn activate(&mut self, cooldown: f32) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.kills_since_use = 0;
        self.phase = SpecialPhase::Cooldown {
            remaining: cooldown,
        };
        true
    }

    fn unlock_if_charged(&mut self, threshold: u32) -> bool {
        if self.phase == SpecialPhase::Locked && self.kills_since_use >= threshold {
            self.phase = SpecialPhase::Ready;
            return true;
        }
        false
    }
}

/// Evenly spaced unit vectors for a burst of `count` projectiles
pub fn burst_directions(count: u32) -> impl Iterator<Item = Vec2> {
    let step = std::f32::consts::TAU / count.max(1) as f32;
    (0..count).map(move |i| direction_from_angle(i as f32 * step))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlocks_at_threshold() {
        let mut special = SpecialAttack::new();
        for _ in 0..29 {
            assert!(!special.record_kill(30));
        }
        assert!(!special.is_ready());
        assert!(special.record_kill(30));
        assert!(special.is_ready());
    }

    #[test]
    fn test_activate_requires_ready() {
        let mut special = SpecialAttack::new();
        assert!(!special.activate(15.0));
        assert_eq!(special.phase, SpecialPhase::Locked);
    }

    #[test]
    fn test_full_cycle() {
        let mut special = SpecialAttack::new();
        for _ in 0..3 {
            special.record_kill(3);
        }
        assert!(special.activate(10.0));
        assert!(!special.is_ready());
        assert!(special.in_cooldown());
        assert_eq!(special.kills_since_use, 0);

        // Kills during cooldown bank but don't unlock
        for _ in 0..5 {
            assert!(!special.record_kill(3));
        }
        assert!(!special.tick(9.0, 3));
        assert!(special.in_cooldown());

        // Cooldown ends with the bank already full: straight to ready
        assert!(special.tick(1.5, 3));
        assert!(special.is_ready());
    }

    #[test]
    fn test_cooldown_end_without_kills_locks() {
        let mut special = SpecialAttack::new();
        special.phase = SpecialPhase::Ready;
        special.activate(1.0);
        assert!(!special.tick(2.0, 3));
        assert_eq!(special.phase, SpecialPhase::Locked);
    }

    #[test]
    fn test_burst_directions() {
        let dirs: Vec<Vec2> = burst_directions(4).collect();
        assert_eq!(dirs.len(), 4);
        assert!((dirs[0] - Vec2::X).length() < 1e-5);
        assert!((dirs[1] - Vec2::Y).length() < 1e-5);
        let sum: Vec2 = dirs.iter().copied().sum();
        assert!(sum.length() < 1e-4);
    }
}
