//! CINDERTIDE Simulation Core
//!
//! Headless, deterministic combat core of a 2-player elemental fighting
//! game: per-fighter state machines, Fire/Water stance strategy, and
//! the hit-resolution pipeline between them, all on a 60 Hz fixed
//! timestep. Rendering, particles, HUD and input-device mapping live in
//! the host; they talk to this crate through the `InputFrame` resource,
//! read-only component queries, and the `Broadcaster` observer registry.
//!
//! Determinism: identical `InputFrame` sequences replay to identical
//! fighter state (within floating-point determinism). All mutation
//! happens inside one chained `FixedUpdate` sequence; nothing outside
//! it may write to a fighter.

use bevy::prelude::*;

pub mod combat;
pub mod components;
pub mod config;
pub mod elements;
pub mod events;
pub mod input;
pub mod logger;
pub mod match_flow;
pub mod physics;
pub mod state;

pub use combat::{hitbox, hurtbox, mitigated_damage, resolve_hits, CombatPlugin, Rect};
pub use components::{
    tick_cooldowns, AttackCooldown, Facing, Fighter, Health, PhysicsBody, PlayerSlot, Position,
};
pub use config::{BalanceConfig, ConfigError, SIMULATION_HZ};
pub use elements::{
    compute_attack, mitigate, AttackResult, ElementalMode, ModeProfile, ParticleKind,
};
pub use events::{
    dispatch_observers, Broadcaster, CombatObserver, HealthChanged, HitLanded, MatchEnded,
    ModeChanged, ObserverId,
};
pub use input::{sample_inputs, InputFrame, InputState, PlayerInput};
pub use match_flow::{
    apply_reset, check_match_over, simulation_running, tick_round_clock, MatchState,
};
pub use physics::{apply_gravity, integrate_positions, is_grounded, steer_fighters};
pub use state::{next_state, switch_modes, update_fighter_states, FighterState};

/// Top-level simulation plugin: fixed timestep, validated balance
/// config, resources, and the combat pipeline.
///
/// A host may insert its own `BalanceConfig` resource before adding the
/// plugin; it is validated here either way, and a broken config panics
/// at startup rather than limping into a bout.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<BalanceConfig>() {
            app.insert_resource(BalanceConfig::default());
        }
        let config = app.world().resource::<BalanceConfig>();
        if let Err(error) = config.validate() {
            panic!("invalid balance configuration: {error}");
        }

        app.insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .init_resource::<InputFrame>()
            .init_resource::<MatchState>()
            .init_resource::<Broadcaster>()
            .add_plugins(CombatPlugin);
    }
}

/// Minimal Bevy app for headless runs and reproducibility checks.
pub fn create_headless_app() -> App {
    logger::init_console_logger();
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin);
    app
}

/// Spawn one fighter with the full component bundle for its slot.
pub fn spawn_fighter(world: &mut World, slot: PlayerSlot) -> Entity {
    let config = world.resource::<BalanceConfig>().clone();
    world
        .spawn((
            Fighter::new(slot),
            Position(config.spawn_position(slot)),
            PhysicsBody::default(),
            Health::new(config.max_health),
            FighterState::default(),
            AttackCooldown::default(),
            PlayerInput::default(),
        ))
        .id()
}

/// Spawn both fighters at their corners.
pub fn spawn_fighters(world: &mut World) -> (Entity, Entity) {
    (
        spawn_fighter(world, PlayerSlot::One),
        spawn_fighter(world, PlayerSlot::Two),
    )
}

/// Deterministic byte snapshot of both fighters, slot order.
///
/// Two runs fed identical input sequences must produce identical
/// snapshots tick for tick; the replay test compares these.
pub fn fighters_snapshot(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(&Fighter, &Position, &PhysicsBody, &Health, &FighterState)>();
    let mut rows: Vec<_> = query.iter(world).collect();
    rows.sort_by_key(|(fighter, ..)| fighter.slot.index());

    let mut snapshot = Vec::new();
    for (fighter, position, body, health, state) in rows {
        snapshot.extend_from_slice(
            format!(
                "{}|{:?}|{:?}|{:?}|{:?}|{:.3}|{}\n",
                fighter.slot.label(),
                fighter.mode,
                fighter.facing,
                position.0,
                body.velocity,
                health.current,
                state.name(),
            )
            .as_bytes(),
        );
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_fighters_start_symmetric() {
        let mut world = World::new();
        world.insert_resource(BalanceConfig::default());
        let (one, two) = spawn_fighters(&mut world);

        let f1 = world.get::<Fighter>(one).unwrap();
        let f2 = world.get::<Fighter>(two).unwrap();
        assert_eq!(f1.slot, PlayerSlot::One);
        assert_eq!(f2.slot, PlayerSlot::Two);
        assert_eq!(f1.mode, ElementalMode::Fire);
        assert_eq!(f2.mode, ElementalMode::Fire);

        let h1 = world.get::<Health>(one).unwrap();
        assert_eq!(h1.current, h1.max);

        let p1 = world.get::<Position>(one).unwrap();
        let p2 = world.get::<Position>(two).unwrap();
        assert!(p1.0.x < p2.0.x);
        assert_eq!(p1.0.y, p2.0.y);
    }

    #[test]
    fn snapshot_is_stable_for_identical_worlds() {
        let build = || {
            let mut world = World::new();
            world.insert_resource(BalanceConfig::default());
            spawn_fighters(&mut world);
            world
        };
        let mut a = build();
        let mut b = build();
        assert_eq!(fighters_snapshot(&mut a), fighters_snapshot(&mut b));
        assert!(!fighters_snapshot(&mut a).is_empty());
    }
}
