//! Fighter state machine.
//!
//! One closed tagged union per fighter instead of per-state objects:
//! transitions live in a single function, the compiler checks
//! exhaustiveness, and per-state data (attack clock, remaining stun)
//! rides on the variant itself.
//!
//! Transition priority, evaluated once per tick after physics:
//! 1. `Hit` counts its stun down and preempts everything else
//! 2. `Attack` advances its clock; on completion the cooldown arms
//! 3. attack press (edge) from `Idle`/`Move` with a ready cooldown
//! 4. block held
//! 5. horizontal input → `Move`, otherwise `Idle`
//!
//! Gated inputs (attack during cooldown, attack while stunned) are
//! silently ignored: no error, no side effect.

use bevy::prelude::*;

use crate::components::{AttackCooldown, Fighter};
use crate::config::BalanceConfig;
use crate::events::ModeChanged;
use crate::input::PlayerInput;
use crate::logger;

/// Behavior state of one fighter.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum FighterState {
    Idle,
    Move,
    /// Swinging. The hitbox stays armed until it lands once
    /// (`hitbox_spent`), so a single swing can never hit twice.
    Attack { elapsed_ms: f32, hitbox_spent: bool },
    /// Stunned by a hit; counts down to `Idle`.
    Hit { stun_remaining_ms: f32 },
    /// Guarding: damage taken is further reduced. Held by input,
    /// overridden by `Hit`.
    Block,
}

impl Default for FighterState {
    fn default() -> Self {
        Self::Idle
    }
}

impl FighterState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Move => "move",
            Self::Attack { .. } => "attack",
            Self::Hit { .. } => "hit",
            Self::Block => "block",
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Block)
    }

    /// True while the swing's hitbox is live (armed and unspent).
    pub fn hitbox_active(&self) -> bool {
        matches!(
            self,
            Self::Attack {
                hitbox_spent: false,
                ..
            }
        )
    }

    fn accepts_steering(&self) -> bool {
        matches!(self, Self::Idle | Self::Move | Self::Block)
    }
}

/// One tick of the transition function for a single fighter.
///
/// Pure with respect to its arguments; the system below maps it over
/// both fighters. Returns the state to switch to, or `None` to stay.
pub fn next_state(
    state: &mut FighterState,
    input: &PlayerInput,
    cooldown: &mut AttackCooldown,
    attack_speed: f32,
    config: &BalanceConfig,
    delta_ms: f32,
) -> Option<FighterState> {
    // Timed states first: stun and the attack clock preempt input.
    match state {
        FighterState::Hit { stun_remaining_ms } => {
            *stun_remaining_ms -= delta_ms;
            if *stun_remaining_ms > 0.0 {
                return None;
            }
            *state = FighterState::Idle;
            // Fall through: input may immediately steer out of Idle.
        }
        FighterState::Attack { elapsed_ms, .. } => {
            *elapsed_ms += delta_ms;
            if *elapsed_ms < config.attack_duration_ms / attack_speed {
                return None;
            }
            cooldown.arm(config.attack_cooldown_ms / attack_speed);
            *state = FighterState::Idle;
        }
        _ => {}
    }

    if !state.accepts_steering() {
        return None;
    }

    if input.just_pressed_attack()
        && cooldown.ready()
        && matches!(state, FighterState::Idle | FighterState::Move)
    {
        return Some(FighterState::Attack {
            elapsed_ms: 0.0,
            hitbox_spent: false,
        });
    }
    if input.blocking() {
        return Some(FighterState::Block);
    }
    if input.horizontal() != 0.0 {
        return Some(FighterState::Move);
    }
    Some(FighterState::Idle)
}

/// System: advance every fighter's state machine by one tick.
pub fn update_fighter_states(
    time: Res<Time>,
    config: Res<BalanceConfig>,
    mut fighters: Query<(
        &Fighter,
        &mut FighterState,
        &mut AttackCooldown,
        &PlayerInput,
    )>,
) {
    let delta_ms = time.delta_secs() * 1000.0;

    for (fighter, mut state, mut cooldown, input) in fighters.iter_mut() {
        let attack_speed = fighter.mode.profile().attack_speed_multiplier;
        if let Some(next) = next_state(
            &mut state,
            input,
            &mut cooldown,
            attack_speed,
            &config,
            delta_ms,
        ) {
            if *state != next {
                *state = next;
            }
        }
    }
}

/// System: toggle the elemental stance on a switch press.
///
/// Allowed in every state except `Hit`; does not reset the state
/// machine; an in-progress swing keeps its clock and hitbox.
pub fn switch_modes(
    mut fighters: Query<(&mut Fighter, &FighterState, &PlayerInput)>,
    mut mode_events: EventWriter<ModeChanged>,
) {
    for (mut fighter, state, input) in fighters.iter_mut() {
        if !input.just_pressed_switch() || state.is_hit() {
            continue;
        }
        fighter.mode = fighter.mode.toggled();
        mode_events.write(ModeChanged {
            slot: fighter.slot,
            mode: fighter.mode,
        });
        logger::log_info(&format!(
            "{} switched to {} mode",
            fighter.slot.label(),
            fighter.mode.name()
        ));
    }
}
