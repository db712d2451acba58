//! Combat events and the observer bridge to presentation.
//!
//! Inside the simulation, events are ordinary Bevy events. Presentation
//! code (health bars, HUD, particle spawners) does not read Bevy event
//! queues; it attaches observers to the `Broadcaster` resource and gets
//! synchronous callbacks at the end of every tick, after all mutations
//! have settled.
//!
//! Observer failures are isolated: a panicking observer is caught,
//! logged and skipped, and the remaining observers still get the event.
//! Observers receive immutable snapshots only; there is no route from
//! a callback back into fighter state.

use std::panic::{catch_unwind, AssertUnwindSafe};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::PlayerSlot;
use crate::elements::{ElementalMode, ParticleKind};
use crate::logger;

// ============================================================================
// Events
// ============================================================================

/// A fighter's health changed. `current` is the post-mitigation value.
#[derive(Event, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthChanged {
    pub slot: PlayerSlot,
    pub current: f32,
    pub max: f32,
    pub damage: f32,
}

/// A fighter toggled its elemental stance.
#[derive(Event, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeChanged {
    pub slot: PlayerSlot,
    pub mode: ElementalMode,
}

/// A swing connected. Carries what a particle spawner needs: where,
/// and which effect palette.
#[derive(Event, Debug, Clone, Copy)]
pub struct HitLanded {
    pub attacker: Entity,
    pub defender: Entity,
    pub position: Vec2,
    pub particle: ParticleKind,
}

/// The bout ended. `None` winner means a double KO.
#[derive(Event, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchEnded {
    pub winner: Option<PlayerSlot>,
}

// ============================================================================
// Observer registry
// ============================================================================

/// Presentation-side listener. Every hook has a default no-op body so
/// an observer only implements what it cares about.
pub trait CombatObserver: Send + Sync {
    fn on_health_changed(&mut self, _event: &HealthChanged) {}
    fn on_mode_changed(&mut self, _event: &ModeChanged) {}
    fn on_hit_landed(&mut self, _event: &HitLanded) {}
    fn on_match_ended(&mut self, _event: &MatchEnded) {}
}

/// Handle returned by `attach`, used to detach later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Explicit listener registry with synchronous dispatch.
///
/// Ids are unique, so no observer is delivered to twice per event;
/// delivery order is attachment order, stable within a frame.
#[derive(Resource, Default)]
pub struct Broadcaster {
    observers: Vec<(ObserverId, Box<dyn CombatObserver>)>,
    next_id: u64,
}

impl Broadcaster {
    pub fn attach(&mut self, observer: Box<dyn CombatObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Unknown ids are ignored (already detached).
    pub fn detach(&mut self, id: ObserverId) {
        self.observers.retain(|(existing, _)| *existing != id);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn notify_health_changed(&mut self, event: &HealthChanged) {
        self.deliver("health change", |observer| observer.on_health_changed(event));
    }

    pub fn notify_mode_changed(&mut self, event: &ModeChanged) {
        self.deliver("mode change", |observer| observer.on_mode_changed(event));
    }

    pub fn notify_hit_landed(&mut self, event: &HitLanded) {
        self.deliver("hit", |observer| observer.on_hit_landed(event));
    }

    pub fn notify_match_ended(&mut self, event: &MatchEnded) {
        self.deliver("match end", |observer| observer.on_match_ended(event));
    }

    /// Fan one event out to every observer, isolating failures: a
    /// panicking observer never takes the frame (or its neighbors) down.
    fn deliver(&mut self, what: &str, mut call: impl FnMut(&mut dyn CombatObserver)) {
        for (id, observer) in self.observers.iter_mut() {
            let outcome = catch_unwind(AssertUnwindSafe(|| call(observer.as_mut())));
            if outcome.is_err() {
                logger::log_error(&format!(
                    "observer {id:?} panicked during {what} notification; skipping it this frame"
                ));
            }
        }
    }
}

/// System: drain this tick's events into the observer registry.
/// Runs last, so every callback sees fully settled state.
pub fn dispatch_observers(
    mut broadcaster: ResMut<Broadcaster>,
    mut health_events: EventReader<HealthChanged>,
    mut mode_events: EventReader<ModeChanged>,
    mut hit_events: EventReader<HitLanded>,
    mut ended_events: EventReader<MatchEnded>,
) {
    for event in health_events.read() {
        broadcaster.notify_health_changed(event);
    }
    for event in mode_events.read() {
        broadcaster.notify_mode_changed(event);
    }
    for event in hit_events.read() {
        broadcaster.notify_hit_landed(event);
    }
    for event in ended_events.read() {
        broadcaster.notify_match_ended(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct CountingObserver {
        health_events: Arc<AtomicU32>,
    }

    impl CombatObserver for CountingObserver {
        fn on_health_changed(&mut self, _event: &HealthChanged) {
            self.health_events.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct PanickingObserver;

    impl CombatObserver for PanickingObserver {
        fn on_health_changed(&mut self, _event: &HealthChanged) {
            panic!("broken health bar");
        }
    }

    fn health_event() -> HealthChanged {
        HealthChanged {
            slot: PlayerSlot::One,
            current: 90.0,
            max: 100.0,
            damage: 10.0,
        }
    }

    #[test]
    fn attached_observers_receive_events() {
        let count = Arc::new(AtomicU32::new(0));
        let mut broadcaster = Broadcaster::default();
        broadcaster.attach(Box::new(CountingObserver {
            health_events: Arc::clone(&count),
        }));

        broadcaster.notify_health_changed(&health_event());
        broadcaster.notify_health_changed(&health_event());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn detached_observers_stop_receiving() {
        let count = Arc::new(AtomicU32::new(0));
        let mut broadcaster = Broadcaster::default();
        let id = broadcaster.attach(Box::new(CountingObserver {
            health_events: Arc::clone(&count),
        }));

        broadcaster.notify_health_changed(&health_event());
        broadcaster.detach(id);
        broadcaster.notify_health_changed(&health_event());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(broadcaster.observer_count(), 0);
    }

    #[test]
    fn panicking_observer_does_not_starve_the_rest() {
        let count = Arc::new(AtomicU32::new(0));
        let mut broadcaster = Broadcaster::default();
        // Panicking observer attached first, so it runs first
        broadcaster.attach(Box::new(PanickingObserver));
        broadcaster.attach(Box::new(CountingObserver {
            health_events: Arc::clone(&count),
        }));

        broadcaster.notify_health_changed(&health_event());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(broadcaster.observer_count(), 2);
    }

    #[test]
    fn ids_stay_unique_after_detach() {
        let mut broadcaster = Broadcaster::default();
        let first = broadcaster.attach(Box::new(PanickingObserver));
        broadcaster.detach(first);
        let second = broadcaster.attach(Box::new(PanickingObserver));
        assert_ne!(first, second);
    }
}
