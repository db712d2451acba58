//! Balance configuration for the bout simulation.
//!
//! One resource holds every tunable number: stage geometry, fighter
//! kinematics, attack timing, knockback. Durations are milliseconds
//! (timers tick with `delta * 1000`), distances are stage pixels,
//! speeds are pixels per second.
//!
//! Validation runs once at plugin build. Bad balance data is a
//! programmer/config error, not a runtime condition: the app refuses
//! to start instead of clamping its way through a broken ruleset.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::PlayerSlot;
use crate::elements::ElementalMode;

/// Simulation tick rate (Hz). The fixed timestep is the only timing
/// authority; identical input sequences at this rate replay identically.
pub const SIMULATION_HZ: f64 = 60.0;

/// Tunable balance numbers for a bout.
///
/// Inserted as a resource by `SimulationPlugin`. Hosts may deserialize
/// a preset and hand it to the plugin instead of the defaults.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct BalanceConfig {
    /// Stage width in pixels (fighters are clamped inside).
    pub stage_width: f32,
    /// Ground line y. Screen coordinates: +y points down, so airborne
    /// fighters have y < ground_y.
    pub ground_y: f32,

    /// Fighter hurtbox width (pixels).
    pub fighter_width: f32,
    /// Fighter hurtbox height (pixels).
    pub fighter_height: f32,
    /// Horizontal walk speed (px/s).
    pub walk_speed: f32,
    /// Vertical impulse applied on jump (px/s, negative = up).
    pub jump_impulse: f32,
    /// Gravity (px/s², positive = down).
    pub gravity: f32,

    /// Health both fighters start a round with.
    pub max_health: f32,
    /// Damage of one swing before mode multipliers and mitigation.
    pub base_attack_damage: f32,
    /// Horizontal reach of the attack hitbox, measured from the
    /// fighter's leading edge (pixels).
    pub attack_reach: f32,
    /// Height of the attack hitbox (pixels), centered on the torso.
    pub attack_height: f32,
    /// Active attack window (ms) before mode speed scaling.
    pub attack_duration_ms: f32,
    /// Cooldown after a swing (ms) before mode speed scaling.
    pub attack_cooldown_ms: f32,
    /// Hit-stun applied to the defender (ms) before mode scaling.
    pub hit_stun_ms: f32,
    /// Knockback impulse added to the defender's velocity (px/s).
    pub knockback_impulse: f32,
    /// Damage factor applied on top of mitigation while blocking.
    /// Uniform across modes.
    pub block_damage_factor: f32,

    /// Spawn x for slot one (feet anchor).
    pub spawn_x_one: f32,
    /// Spawn x for slot two.
    pub spawn_x_two: f32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            stage_width: 1024.0,
            ground_y: 480.0,
            fighter_width: 80.0,
            fighter_height: 120.0,
            walk_speed: 300.0,
            jump_impulse: -500.0,
            gravity: 1200.0,
            max_health: 100.0,
            base_attack_damage: 10.0,
            attack_reach: 100.0,
            attack_height: 60.0,
            attack_duration_ms: 300.0,
            attack_cooldown_ms: 500.0,
            hit_stun_ms: 200.0,
            knockback_impulse: 200.0,
            block_damage_factor: 0.5,
            spawn_x_one: 240.0,
            spawn_x_two: 784.0,
        }
    }
}

impl BalanceConfig {
    /// Check every invariant the simulation relies on.
    ///
    /// Mode profiles are validated here too: mitigation divides by the
    /// defense multiplier, so a non-positive one would be a division
    /// hazard baked into the ruleset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health <= 0.0 {
            return Err(ConfigError::NonPositive("max_health", self.max_health));
        }
        if self.fighter_width <= 0.0 {
            return Err(ConfigError::NonPositive("fighter_width", self.fighter_width));
        }
        if self.fighter_height <= 0.0 {
            return Err(ConfigError::NonPositive("fighter_height", self.fighter_height));
        }
        if self.stage_width < self.fighter_width {
            return Err(ConfigError::StageTooNarrow {
                stage_width: self.stage_width,
                fighter_width: self.fighter_width,
            });
        }
        for (name, value) in [
            ("base_attack_damage", self.base_attack_damage),
            ("attack_reach", self.attack_reach),
            ("attack_height", self.attack_height),
            ("attack_duration_ms", self.attack_duration_ms),
            ("attack_cooldown_ms", self.attack_cooldown_ms),
            ("hit_stun_ms", self.hit_stun_ms),
            ("knockback_impulse", self.knockback_impulse),
            ("walk_speed", self.walk_speed),
            ("gravity", self.gravity),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative(name, value));
            }
        }
        if self.block_damage_factor <= 0.0 || self.block_damage_factor > 1.0 {
            return Err(ConfigError::BlockFactorOutOfRange(self.block_damage_factor));
        }
        for mode in [ElementalMode::Fire, ElementalMode::Water] {
            mode.profile().validate(mode)?;
        }
        Ok(())
    }

    /// Spawn position (feet anchor, on the ground line) for a slot.
    pub fn spawn_position(&self, slot: PlayerSlot) -> Vec2 {
        let x = match slot {
            PlayerSlot::One => self.spawn_x_one,
            PlayerSlot::Two => self.spawn_x_two,
        };
        Vec2::new(x, self.ground_y)
    }
}

/// Malformed balance data. Raised at construction, never mid-bout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be positive (got {1})")]
    NonPositive(&'static str, f32),
    #[error("{0} must not be negative (got {1})")]
    Negative(&'static str, f32),
    #[error("block_damage_factor must be in (0, 1] (got {0})")]
    BlockFactorOutOfRange(f32),
    #[error("stage width {stage_width} cannot fit a fighter of width {fighter_width}")]
    StageTooNarrow { stage_width: f32, fighter_width: f32 },
    #[error("{mode:?} defense multiplier must be positive (got {value})")]
    BadDefenseMultiplier { mode: ElementalMode, value: f32 },
    #[error("{mode:?} attack speed multiplier must be positive (got {value})")]
    BadAttackSpeedMultiplier { mode: ElementalMode, value: f32 },
    #[error("{mode:?} damage multiplier must not be negative (got {value})")]
    BadDamageMultiplier { mode: ElementalMode, value: f32 },
}
