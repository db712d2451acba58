//! Hit resolution.
//!
//! Runs once per tick after the state machines. Two phases:
//!
//! 1. **Detect** against a frame-start snapshot of both fighters, in
//!    slot order. Using the snapshot means a hit applied for slot one
//!    cannot un-detect slot two's simultaneous hit; mutual hits both
//!    land, deterministically.
//! 2. **Apply** in the same order: mitigation, block reduction, health
//!    clamp, additive knockback, forced `Hit` state, hitbox consumed.
//!
//! Effects are fully applied before any event leaves the frame, so
//! observers never see a fighter mid-mutation.

use bevy::prelude::*;

use crate::combat::hitbox::{hitbox, hurtbox};
use crate::components::{Facing, Fighter, Health, PhysicsBody, PlayerSlot, Position};
use crate::config::BalanceConfig;
use crate::elements::{compute_attack, mitigate, ElementalMode, ParticleKind};
use crate::events::{HealthChanged, HitLanded};
use crate::logger;
use crate::state::FighterState;

/// Frame-start view of one fighter, taken before any hit applies.
struct FighterSnapshot {
    entity: Entity,
    slot: PlayerSlot,
    mode: ElementalMode,
    facing: Facing,
    position: Vec2,
    blocking: bool,
    hitbox_live: bool,
}

/// A detected hit, waiting to be applied.
struct PendingHit {
    attacker: Entity,
    defender: Entity,
    defender_slot: PlayerSlot,
    damage: f32,
    knockback: Vec2,
    hit_stun_ms: f32,
    particle: ParticleKind,
    impact: Vec2,
}

/// Damage the defender actually takes, given both stances and whether
/// the defender was guarding when the swing connected.
pub fn mitigated_damage(
    raw_damage: f32,
    defender_mode: ElementalMode,
    defender_blocking: bool,
    config: &BalanceConfig,
) -> f32 {
    let mut damage = mitigate(defender_mode, raw_damage);
    if defender_blocking {
        damage *= config.block_damage_factor;
    }
    damage
}

/// System: scan live hitboxes against opposing hurtboxes and apply
/// every connecting swing.
pub fn resolve_hits(
    config: Res<BalanceConfig>,
    mut fighters: Query<(
        Entity,
        &Fighter,
        &Position,
        &mut PhysicsBody,
        &mut Health,
        &mut FighterState,
    )>,
    mut health_events: EventWriter<HealthChanged>,
    mut hit_events: EventWriter<HitLanded>,
) {
    let mut snapshots: Vec<FighterSnapshot> = fighters
        .iter()
        .map(|(entity, fighter, position, _, _, state)| FighterSnapshot {
            entity,
            slot: fighter.slot,
            mode: fighter.mode,
            facing: fighter.facing,
            position: position.0,
            blocking: state.is_blocking(),
            hitbox_live: state.hitbox_active(),
        })
        .collect();
    snapshots.sort_by_key(|snapshot| snapshot.slot.index());

    let mut pending: Vec<PendingHit> = Vec::new();
    for attacker in snapshots.iter().filter(|snapshot| snapshot.hitbox_live) {
        let swing = hitbox(attacker.position, attacker.facing, &config);

        for defender in &snapshots {
            if defender.entity == attacker.entity {
                continue;
            }
            let body = hurtbox(defender.position, &config);
            if !swing.overlaps(&body) {
                continue;
            }

            let raw = compute_attack(attacker.mode, attacker.facing, &config);
            pending.push(PendingHit {
                attacker: attacker.entity,
                defender: defender.entity,
                defender_slot: defender.slot,
                damage: mitigated_damage(raw.damage, defender.mode, defender.blocking, &config),
                knockback: raw.knockback,
                hit_stun_ms: raw.hit_stun_ms,
                particle: raw.particle,
                impact: swing.intersection(&body).center(),
            });
        }
    }

    for hit in pending {
        if let Ok((_, fighter, _, mut body, mut health, mut state)) = fighters.get_mut(hit.defender)
        {
            health.take_damage(hit.damage);
            body.velocity += hit.knockback;
            *state = FighterState::Hit {
                stun_remaining_ms: hit.hit_stun_ms,
            };

            health_events.write(HealthChanged {
                slot: hit.defender_slot,
                current: health.current,
                max: health.max,
                damage: hit.damage,
            });
            hit_events.write(HitLanded {
                attacker: hit.attacker,
                defender: hit.defender,
                position: hit.impact,
                particle: hit.particle,
            });

            logger::log(&format!(
                "{} took {:.1} damage ({:.1} HP left)",
                fighter.slot.label(),
                hit.damage,
                health.current
            ));
        }

        // One hit per swing. The attacker may have been knocked out of
        // the attack by a mutual hit; then there is nothing to consume.
        if let Ok((_, _, _, _, _, mut state)) = fighters.get_mut(hit.attacker) {
            if let FighterState::Attack { hitbox_spent, .. } = &mut *state {
                *hitbox_spent = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_at_most_halves_the_mitigated_damage() {
        let config = BalanceConfig::default();
        for mode in [ElementalMode::Fire, ElementalMode::Water] {
            let open = mitigated_damage(15.0, mode, false, &config);
            let guarded = mitigated_damage(15.0, mode, true, &config);
            assert!(guarded < open);
            assert_eq!(guarded, open * config.block_damage_factor);
        }
    }

    #[test]
    fn mitigation_divides_by_the_defense_multiplier() {
        let config = BalanceConfig::default();
        // 10 * 1.5 raw fire damage into a water defender
        assert_eq!(mitigated_damage(15.0, ElementalMode::Water, false, &config), 10.0);
    }
}
