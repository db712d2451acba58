//! Combat module: the per-tick pipeline and hit resolution.
//!
//! Frame order (one chained sequence, FixedUpdate, 60 Hz):
//! 1. `apply_reset`: honor a pending round reset
//! 2. `sample_inputs`: latch the host's input snapshot
//! 3. `steer_fighters` / `apply_gravity` / `integrate_positions`
//! 4. `tick_cooldowns`: attack gates count down
//! 5. `update_fighter_states`: transition rules, fixed priority
//! 6. `switch_modes`: stance toggles (never while stunned)
//! 7. `resolve_hits`: hitbox vs hurtbox, damage, knockback, stun
//! 8. `check_match_over` / `tick_round_clock`
//! 9. `dispatch_observers`: presentation callbacks, state settled
//!
//! Steps 2–8 are gated on `MatchState::running()`; pause and KO freeze
//! the whole round in place. Reset and observer dispatch stay live so
//! a finished round can still be restarted and announced.

use bevy::prelude::*;

pub mod hitbox;
pub mod resolve;


pub use hitbox::{hitbox, hurtbox, Rect};
pub use resolve::{mitigated_damage, resolve_hits};

use crate::components::tick_cooldowns;
use crate::events::{dispatch_observers, HealthChanged, HitLanded, MatchEnded, ModeChanged};
use crate::input::sample_inputs;
use crate::match_flow::{apply_reset, check_match_over, simulation_running, tick_round_clock};
use crate::physics::{apply_gravity, integrate_positions, steer_fighters};
use crate::state::{switch_modes, update_fighter_states};

/// Registers combat events and the full fixed-tick pipeline.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HealthChanged>()
            .add_event::<ModeChanged>()
            .add_event::<HitLanded>()
            .add_event::<MatchEnded>();

        app.add_systems(
            FixedUpdate,
            (
                apply_reset,
                (
                    sample_inputs,
                    steer_fighters,
                    apply_gravity,
                    integrate_positions,
                    tick_cooldowns,
                    update_fighter_states,
                    switch_modes,
                    resolve_hits,
                    check_match_over,
                    tick_round_clock,
                )
                    .chain()
                    .run_if(simulation_running),
                dispatch_observers,
            )
                .chain(),
        );
    }
}
