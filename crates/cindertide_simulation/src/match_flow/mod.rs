//! Round lifecycle: pause, KO detection, reset.
//!
//! `MatchState::running()` gates the whole simulation chain. Pausing
//! (or a finished round) therefore freezes every timer and transition
//! at once; the fixed timestep simply stops reaching the systems.

use bevy::prelude::*;

use crate::components::{AttackCooldown, Fighter, Health, PhysicsBody, PlayerSlot, Position};
use crate::config::BalanceConfig;
use crate::elements::ElementalMode;
use crate::events::{HealthChanged, MatchEnded, ModeChanged};
use crate::input::PlayerInput;
use crate::logger;
use crate::state::FighterState;

/// Lifecycle of the current round.
#[derive(Resource, Debug, Clone, Default)]
pub struct MatchState {
    pub paused: bool,
    pub finished: bool,
    /// Set on KO. `None` while running, and on a double KO.
    pub winner: Option<PlayerSlot>,
    /// Simulation-time round clock, milliseconds.
    pub round_time_ms: f32,
    reset_requested: bool,
}

impl MatchState {
    /// Whether simulation systems should run this tick.
    pub fn running(&self) -> bool {
        !self.paused && !self.finished
    }

    /// Ask for a fresh round; honored at the top of the next tick.
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }
}

/// Run condition for the simulation chain.
pub fn simulation_running(state: Res<MatchState>) -> bool {
    state.running()
}

/// System: detect a KO and end the round.
///
/// Both fighters hitting zero in the same tick is a double KO: the
/// round ends with no winner.
pub fn check_match_over(
    mut match_state: ResMut<MatchState>,
    fighters: Query<(&Fighter, &Health)>,
    mut ended_events: EventWriter<MatchEnded>,
) {
    if match_state.finished {
        return;
    }

    let mut survivor = None;
    let mut ko_count = 0;
    for (fighter, health) in fighters.iter() {
        if health.is_ko() {
            ko_count += 1;
        } else {
            survivor = Some(fighter.slot);
        }
    }
    if ko_count == 0 {
        return;
    }

    let winner = if ko_count == 1 { survivor } else { None };
    match_state.finished = true;
    match_state.winner = winner;
    ended_events.write(MatchEnded { winner });

    match winner {
        Some(slot) => logger::log_info(&format!("{} wins the round", slot.label())),
        None => logger::log_info("double KO, no winner"),
    }
}

/// System: advance the round clock.
pub fn tick_round_clock(time: Res<Time>, mut match_state: ResMut<MatchState>) {
    match_state.round_time_ms += time.delta_secs() * 1000.0;
}

/// System: rebuild both fighters for a fresh round when a reset was
/// requested. Runs before the gated chain so it also works while the
/// round is finished or paused.
///
/// Republishes health and mode events so presentation resyncs without
/// polling.
pub fn apply_reset(
    config: Res<BalanceConfig>,
    mut match_state: ResMut<MatchState>,
    mut fighters: Query<(
        &mut Fighter,
        &mut Position,
        &mut PhysicsBody,
        &mut Health,
        &mut FighterState,
        &mut AttackCooldown,
        &mut PlayerInput,
    )>,
    mut health_events: EventWriter<HealthChanged>,
    mut mode_events: EventWriter<ModeChanged>,
) {
    if !match_state.reset_requested {
        return;
    }
    *match_state = MatchState::default();

    for (mut fighter, mut position, mut body, mut health, mut state, mut cooldown, mut input) in
        fighters.iter_mut()
    {
        *fighter = Fighter::new(fighter.slot);
        position.0 = config.spawn_position(fighter.slot);
        body.velocity = Vec2::ZERO;
        health.reset();
        *state = FighterState::Idle;
        cooldown.clear();
        *input = PlayerInput::default();

        health_events.write(HealthChanged {
            slot: fighter.slot,
            current: health.current,
            max: health.max,
            damage: 0.0,
        });
        mode_events.write(ModeChanged {
            slot: fighter.slot,
            mode: ElementalMode::Fire,
        });
    }

    logger::log_info("round reset");
}
