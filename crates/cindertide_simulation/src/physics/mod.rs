//! 2D kinematics for the fighters.
//!
//! Screen-space integration: +y points down, gravity is positive,
//! jumps are negative impulses. The ground line and stage walls are
//! hard clamps; there is no collision response between the fighters
//! themselves (passing through each other is intended; only hitboxes
//! interact).
//!
//! Order inside the tick: steering → gravity → integration. The state
//! machine runs after integration, so transitions always see settled
//! positions.

use bevy::prelude::*;

use crate::components::{Facing, Fighter, PhysicsBody, Position};
use crate::config::BalanceConfig;
use crate::input::PlayerInput;
use crate::state::FighterState;

/// Tolerance for the ground check, in pixels.
const GROUND_EPSILON: f32 = 0.5;

/// Whether a feet anchor rests on the ground line.
pub fn is_grounded(position: Vec2, config: &BalanceConfig) -> bool {
    position.y >= config.ground_y - GROUND_EPSILON
}

/// System: translate input into horizontal velocity, facing and jumps.
///
/// Steering only applies in `Idle`/`Move`. Attacking and blocking
/// plant the fighter; a stunned fighter keeps whatever velocity the
/// knockback gave it until the stun expires.
pub fn steer_fighters(
    config: Res<BalanceConfig>,
    mut fighters: Query<(
        &mut Fighter,
        &FighterState,
        &PlayerInput,
        &Position,
        &mut PhysicsBody,
    )>,
) {
    for (mut fighter, state, input, position, mut body) in fighters.iter_mut() {
        match state {
            FighterState::Idle | FighterState::Move => {}
            FighterState::Attack { .. } | FighterState::Block => {
                body.velocity.x = 0.0;
                continue;
            }
            FighterState::Hit { .. } => continue,
        }

        let axis = input.horizontal();
        body.velocity.x = axis * config.walk_speed;
        if axis > 0.0 {
            fighter.facing = Facing::Right;
        } else if axis < 0.0 {
            fighter.facing = Facing::Left;
        }

        if input.just_pressed_jump() && is_grounded(position.0, &config) {
            body.velocity.y = config.jump_impulse;
        }
    }
}

/// System: pull airborne fighters back down.
pub fn apply_gravity(
    time: Res<Time>,
    config: Res<BalanceConfig>,
    mut fighters: Query<(&Position, &mut PhysicsBody)>,
) {
    let delta = time.delta_secs();
    for (position, mut body) in fighters.iter_mut() {
        if !is_grounded(position.0, &config) {
            body.velocity.y += config.gravity * delta;
        }
    }
}

/// System: integrate velocity into position, then clamp to the stage.
///
/// Landing zeroes vertical velocity; the walls zero horizontal
/// velocity so knockback cannot pin a fighter into the boundary.
pub fn integrate_positions(
    time: Res<Time>,
    config: Res<BalanceConfig>,
    mut fighters: Query<(&mut Position, &mut PhysicsBody)>,
) {
    let delta = time.delta_secs();
    let half_width = config.fighter_width / 2.0;

    for (mut position, mut body) in fighters.iter_mut() {
        position.0 += body.velocity * delta;

        if position.0.y > config.ground_y {
            position.0.y = config.ground_y;
            body.velocity.y = 0.0;
        }

        let min_x = half_width;
        let max_x = config.stage_width - half_width;
        if position.0.x < min_x {
            position.0.x = min_x;
            body.velocity.x = 0.0;
        } else if position.0.x > max_x {
            position.0.x = max_x;
            body.velocity.x = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f32 = 1.0 / 60.0;

    #[test]
    fn grounded_on_the_line_airborne_above_it() {
        let config = BalanceConfig::default();
        assert!(is_grounded(Vec2::new(100.0, config.ground_y), &config));
        assert!(!is_grounded(Vec2::new(100.0, config.ground_y - 50.0), &config));
    }

    #[test]
    fn jump_arc_returns_to_the_ground() {
        let config = BalanceConfig::default();
        let mut position = Vec2::new(300.0, config.ground_y);
        let mut velocity = Vec2::new(0.0, config.jump_impulse);

        let mut left_ground = false;
        // Integrate the same way the systems do, one tick at a time
        for _ in 0..120 {
            if !is_grounded(position, &config) {
                velocity.y += config.gravity * TICK;
            }
            position += velocity * TICK;
            if position.y > config.ground_y {
                position.y = config.ground_y;
                velocity.y = 0.0;
            }
            if position.y < config.ground_y - GROUND_EPSILON {
                left_ground = true;
            }
        }

        assert!(left_ground, "jump never left the ground");
        assert_eq!(position.y, config.ground_y);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn walls_stop_horizontal_motion() {
        let config = BalanceConfig::default();
        let half = config.fighter_width / 2.0;
        let mut position = Vec2::new(half + 1.0, config.ground_y);
        let mut velocity = Vec2::new(-1000.0, 0.0);

        for _ in 0..10 {
            position += velocity * TICK;
            if position.x < half {
                position.x = half;
                velocity.x = 0.0;
            }
        }

        assert_eq!(position.x, half);
        assert_eq!(velocity.x, 0.0);
    }
}
