//! Per-frame input snapshots.
//!
//! The host (keyboard mapping, gamepad, test script) writes one
//! `InputFrame` resource per render frame; the simulation copies it
//! into per-fighter `PlayerInput` components at the top of every fixed
//! tick and never writes back. Keeping the previous snapshot alongside
//! the current one gives press-edge detection without any host help.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Fighter;

/// Raw button state for one player. Pure data, written by the host.
///
/// `down` held doubles as the block input (crouch-block).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub attack: bool,
    pub switch_mode: bool,
}

/// Host-facing resource: the current snapshot for both slots.
#[derive(Resource, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputFrame {
    pub players: [InputState; 2],
}

/// Current + previous snapshot for one fighter.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    pub current: InputState,
    pub previous: InputState,
}

impl PlayerInput {
    /// Horizontal axis: -1.0, 0.0 or 1.0. Opposite directions cancel.
    pub fn horizontal(&self) -> f32 {
        let mut axis = 0.0;
        if self.current.left {
            axis -= 1.0;
        }
        if self.current.right {
            axis += 1.0;
        }
        axis
    }

    pub fn just_pressed_attack(&self) -> bool {
        self.current.attack && !self.previous.attack
    }

    pub fn just_pressed_switch(&self) -> bool {
        self.current.switch_mode && !self.previous.switch_mode
    }

    pub fn just_pressed_jump(&self) -> bool {
        self.current.up && !self.previous.up
    }

    pub fn blocking(&self) -> bool {
        self.current.down
    }
}

/// System: latch the host's `InputFrame` into each fighter, shifting
/// the old snapshot into `previous`. Runs first in the tick.
pub fn sample_inputs(frame: Res<InputFrame>, mut fighters: Query<(&Fighter, &mut PlayerInput)>) {
    for (fighter, mut input) in fighters.iter_mut() {
        input.previous = input.current;
        input.current = frame.players[fighter.slot.index()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_axis_cancels_opposites() {
        let mut input = PlayerInput::default();
        input.current.left = true;
        input.current.right = true;
        assert_eq!(input.horizontal(), 0.0);

        input.current.right = false;
        assert_eq!(input.horizontal(), -1.0);
    }

    #[test]
    fn attack_edge_fires_once_per_press() {
        let mut input = PlayerInput::default();
        input.current.attack = true;
        assert!(input.just_pressed_attack());

        // Held across the next snapshot: no second edge
        input.previous = input.current;
        assert!(!input.just_pressed_attack());

        // Released, then pressed again
        input.previous.attack = false;
        assert!(input.just_pressed_attack());
    }

    #[test]
    fn down_held_is_blocking() {
        let mut input = PlayerInput::default();
        assert!(!input.blocking());
        input.current.down = true;
        assert!(input.blocking());
    }
}
