//! Elemental stances (Fire / Water) and the attack math they drive.
//!
//! The stance set is closed and known at compile time, so each stance is
//! an enum variant backed by a constant profile table rather than a
//! boxed strategy object. `compute_attack` and `mitigate` are pure:
//! same inputs, same outputs, no hidden state, so the resolver may call
//! them any number of times per frame without coordination.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Facing;
use crate::config::{BalanceConfig, ConfigError};

/// Elemental stance a fighter is currently in.
///
/// Fire trades defense for damage and tempo; Water is the inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum ElementalMode {
    #[default]
    Fire,
    Water,
}

impl ElementalMode {
    /// The other stance. Mode switching is a toggle.
    pub fn toggled(self) -> Self {
        match self {
            Self::Fire => Self::Water,
            Self::Water => Self::Fire,
        }
    }

    /// Constant multiplier table for this stance.
    pub fn profile(self) -> &'static ModeProfile {
        match self {
            Self::Fire => &FIRE_PROFILE,
            Self::Water => &WATER_PROFILE,
        }
    }

    /// Presentation tag for stance-colored effects.
    pub fn particle(self) -> ParticleKind {
        match self {
            Self::Fire => ParticleKind::Fire,
            Self::Water => ParticleKind::Water,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Water => "Water",
        }
    }
}

/// Multiplier table for one stance.
///
/// `defense_multiplier` divides incoming damage: Fire's 0.7 makes hits
/// land harder on a Fire fighter, Water's 1.5 softens them.
/// `attack_speed_multiplier` divides the attack window and cooldown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModeProfile {
    pub damage_multiplier: f32,
    pub defense_multiplier: f32,
    pub attack_speed_multiplier: f32,
    /// Scale on the horizontal knockback impulse.
    pub knockback_scale: f32,
    /// Vertical knockback component (px/s, negative = up).
    pub knockback_lift: f32,
    /// Scale on the hit-stun the defender receives.
    pub stun_scale: f32,
}

pub const FIRE_PROFILE: ModeProfile = ModeProfile {
    damage_multiplier: 1.5,
    defense_multiplier: 0.7,
    attack_speed_multiplier: 1.2,
    knockback_scale: 1.3,
    knockback_lift: -50.0,
    stun_scale: 1.0,
};

pub const WATER_PROFILE: ModeProfile = ModeProfile {
    damage_multiplier: 0.8,
    defense_multiplier: 1.5,
    attack_speed_multiplier: 0.9,
    knockback_scale: 0.8,
    knockback_lift: -30.0,
    stun_scale: 0.8,
};

impl ModeProfile {
    /// Invariants `mitigate` and the state machine rely on.
    pub fn validate(&self, mode: ElementalMode) -> Result<(), ConfigError> {
        if self.defense_multiplier <= 0.0 {
            return Err(ConfigError::BadDefenseMultiplier {
                mode,
                value: self.defense_multiplier,
            });
        }
        if self.attack_speed_multiplier <= 0.0 {
            return Err(ConfigError::BadAttackSpeedMultiplier {
                mode,
                value: self.attack_speed_multiplier,
            });
        }
        if self.damage_multiplier < 0.0 {
            return Err(ConfigError::BadDamageMultiplier {
                mode,
                value: self.damage_multiplier,
            });
        }
        Ok(())
    }
}

/// Outcome of one swing, before the defender's mitigation.
///
/// Transient: produced by `compute_attack`, consumed by the resolver in
/// the same frame, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackResult {
    pub damage: f32,
    /// Impulse added to the defender's velocity. Horizontal sign
    /// follows the attacker's facing.
    pub knockback: Vec2,
    pub hit_stun_ms: f32,
    pub particle: ParticleKind,
}

/// Presentation tag carried on hit events; the external particle
/// spawner maps these to its own visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Fire,
    Water,
    Hit,
    Spark,
}

/// Raw result of a swing in the given stance.
pub fn compute_attack(mode: ElementalMode, facing: Facing, config: &BalanceConfig) -> AttackResult {
    let profile = mode.profile();
    AttackResult {
        damage: config.base_attack_damage * profile.damage_multiplier,
        knockback: Vec2::new(
            config.knockback_impulse * profile.knockback_scale * facing.sign(),
            profile.knockback_lift,
        ),
        hit_stun_ms: config.hit_stun_ms * profile.stun_scale,
        particle: mode.particle(),
    }
}

/// Damage actually taken by a defender in the given stance.
///
/// Divides by the stance's defense multiplier; profile validation
/// guarantees the divisor is positive.
pub fn mitigate(mode: ElementalMode, incoming_damage: f32) -> f32 {
    incoming_damage / mode.profile().defense_multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BalanceConfig {
        BalanceConfig::default()
    }

    #[test]
    fn fire_deals_one_and_a_half_times_base() {
        let result = compute_attack(ElementalMode::Fire, Facing::Right, &config());
        assert_eq!(result.damage, 15.0);
        assert_eq!(result.particle, ParticleKind::Fire);
    }

    #[test]
    fn water_deals_four_fifths_of_base() {
        let result = compute_attack(ElementalMode::Water, Facing::Right, &config());
        assert_eq!(result.damage, 8.0);
        assert_eq!(result.hit_stun_ms, 160.0);
    }

    #[test]
    fn knockback_sign_follows_facing() {
        let right = compute_attack(ElementalMode::Fire, Facing::Right, &config());
        let left = compute_attack(ElementalMode::Fire, Facing::Left, &config());

        assert!(right.knockback.x > 0.0);
        assert!(left.knockback.x < 0.0);
        assert_eq!(right.knockback.x, -left.knockback.x);
        // Both lift upward (screen coordinates, -y is up)
        assert!(right.knockback.y < 0.0);
        assert_eq!(right.knockback.y, left.knockback.y);
    }

    #[test]
    fn fire_takes_more_damage_water_takes_less() {
        assert_eq!(mitigate(ElementalMode::Water, 15.0), 10.0);
        let through_fire = mitigate(ElementalMode::Fire, 15.0);
        assert!((through_fire - 15.0 / 0.7).abs() < 1e-5);
        assert!(through_fire > 15.0);
    }

    #[test]
    fn attack_and_mitigate_are_idempotent() {
        let a = compute_attack(ElementalMode::Water, Facing::Left, &config());
        let b = compute_attack(ElementalMode::Water, Facing::Left, &config());
        assert_eq!(a, b);
        assert_eq!(
            mitigate(ElementalMode::Fire, 42.0),
            mitigate(ElementalMode::Fire, 42.0)
        );
    }

    #[test]
    fn toggling_flips_between_the_two_stances() {
        assert_eq!(ElementalMode::Fire.toggled(), ElementalMode::Water);
        assert_eq!(ElementalMode::Water.toggled(), ElementalMode::Fire);
    }

    #[test]
    fn profiles_pass_validation() {
        assert!(FIRE_PROFILE.validate(ElementalMode::Fire).is_ok());
        assert!(WATER_PROFILE.validate(ElementalMode::Water).is_ok());
    }

    #[test]
    fn zero_defense_multiplier_is_rejected() {
        let broken = ModeProfile {
            defense_multiplier: 0.0,
            ..FIRE_PROFILE
        };
        assert!(matches!(
            broken.validate(ElementalMode::Fire),
            Err(ConfigError::BadDefenseMultiplier { .. })
        ));
    }
}
