//! Fighter identity, health and kinematic state.
//!
//! Positions are feet anchors (bottom-center of the hurtbox) in screen
//! coordinates: +x right, +y down, ground at `config.ground_y`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::elements::ElementalMode;

/// Player slot. Doubles as the deterministic resolution order:
/// whenever both fighters act in the same frame, slot one goes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::One => "P1",
            Self::Two => "P2",
        }
    }
}

/// Horizontal facing. Attacks reach out and knock back in this direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Identity of one fighter: slot, facing and current elemental stance.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Fighter {
    pub slot: PlayerSlot,
    pub facing: Facing,
    pub mode: ElementalMode,
}

impl Fighter {
    /// A freshly spawned fighter faces the opponent and starts in Fire.
    pub fn new(slot: PlayerSlot) -> Self {
        Self {
            slot,
            facing: match slot {
                PlayerSlot::One => Facing::Right,
                PlayerSlot::Two => Facing::Left,
            },
            mode: ElementalMode::Fire,
        }
    }
}

/// Fighter position: feet anchor in stage pixels.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Position(pub Vec2);

/// Velocity in px/s. Knockback is added on top of whatever is already
/// here, so consecutive hits stack.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec2,
}

/// Health pool.
///
/// Invariant: 0 ≤ current ≤ max, clamped on every mutation.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }

    pub fn is_ko(&self) -> bool {
        self.current <= 0.0
    }

    pub fn reset(&mut self) {
        self.current = self.max;
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

/// Cooldown gate between swings. Milliseconds, never below zero.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct AttackCooldown {
    pub remaining_ms: f32,
}

impl AttackCooldown {
    pub fn ready(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    pub fn arm(&mut self, duration_ms: f32) {
        self.remaining_ms = duration_ms;
    }

    pub fn tick(&mut self, delta_ms: f32) {
        if self.remaining_ms > 0.0 {
            self.remaining_ms = (self.remaining_ms - delta_ms).max(0.0);
        }
    }

    pub fn clear(&mut self) {
        self.remaining_ms = 0.0;
    }
}

/// System: count attack cooldowns down each tick.
pub fn tick_cooldowns(time: Res<Time>, mut cooldowns: Query<&mut AttackCooldown>) {
    let delta_ms = time.delta_secs() * 1000.0;
    for mut cooldown in cooldowns.iter_mut() {
        cooldown.tick(delta_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_clamps_at_zero() {
        let mut health = Health::new(100.0);
        health.take_damage(30.0);
        assert_eq!(health.current, 70.0);
        assert!(!health.is_ko());

        health.take_damage(1000.0);
        assert_eq!(health.current, 0.0);
        assert!(health.is_ko());
    }

    #[test]
    fn negative_damage_cannot_heal() {
        let mut health = Health::new(100.0);
        health.take_damage(40.0);
        health.take_damage(-25.0);
        assert_eq!(health.current, 60.0);
    }

    #[test]
    fn cooldown_counts_down_and_clamps() {
        let mut cooldown = AttackCooldown::default();
        assert!(cooldown.ready());

        cooldown.arm(500.0);
        assert!(!cooldown.ready());

        cooldown.tick(300.0);
        assert_eq!(cooldown.remaining_ms, 200.0);

        cooldown.tick(300.0);
        assert_eq!(cooldown.remaining_ms, 0.0);
        assert!(cooldown.ready());
    }

    #[test]
    fn fighters_spawn_facing_each_other() {
        assert_eq!(Fighter::new(PlayerSlot::One).facing, Facing::Right);
        assert_eq!(Fighter::new(PlayerSlot::Two).facing, Facing::Left);
    }

    #[test]
    fn slot_order_and_opponents() {
        assert_eq!(PlayerSlot::One.index(), 0);
        assert_eq!(PlayerSlot::Two.index(), 1);
        assert_eq!(PlayerSlot::One.opponent(), PlayerSlot::Two);
        assert_eq!(PlayerSlot::Two.opponent(), PlayerSlot::One);
    }
}
