//! Headless CINDERTIDE bout.
//!
//! Runs the simulation without any renderer: two scripted fighters
//! close in, trade swings and guards, and the loop exits on KO.
//! Virtual time runs above real time so the demo finishes quickly.

use std::time::{Duration, Instant};

use bevy::prelude::*;
use cindertide_simulation::{
    create_headless_app, spawn_fighters, Fighter, Health, InputFrame, MatchState, PlayerSlot,
    Position,
};

fn main() {
    let mut app = create_headless_app();
    spawn_fighters(app.world_mut());
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .set_relative_speed(8.0);

    println!("CINDERTIDE headless bout (fixed 60 Hz, scripted fighters)");

    let wall_clock = Instant::now();
    let mut last_report_s = -1;
    loop {
        let frame = script_inputs(app.world_mut());
        *app.world_mut().resource_mut::<InputFrame>() = frame;
        app.update();

        let round_time_ms = app.world().resource::<MatchState>().round_time_ms;
        let round_s = (round_time_ms / 1000.0) as i64;
        if round_s > last_report_s {
            last_report_s = round_s;
            report_health(app.world_mut(), round_s);
        }

        if app.world().resource::<MatchState>().finished {
            break;
        }
        if wall_clock.elapsed() > Duration::from_secs(60) {
            println!("bout timed out, stopping");
            break;
        }
    }

    match app.world().resource::<MatchState>().winner {
        Some(slot) => println!("winner: {}", slot.label()),
        None => println!("no winner"),
    }
}

/// Minimal bout script: close in until within striking distance, then
/// P1 pressures with attack pulses while P2 mixes guarding, counter
/// pokes and one stance switch.
fn script_inputs(world: &mut World) -> InputFrame {
    let mut query = world.query::<(&Fighter, &Position)>();
    let mut p1_x = 0.0;
    let mut p2_x = 0.0;
    for (fighter, position) in query.iter(world) {
        match fighter.slot {
            PlayerSlot::One => p1_x = position.0.x,
            PlayerSlot::Two => p2_x = position.0.x,
        }
    }
    let t_ms = world.resource::<MatchState>().round_time_ms;
    let gap = p2_x - p1_x;

    let mut frame = InputFrame::default();
    if gap.abs() > 130.0 {
        frame.players[0].right = gap > 0.0;
        frame.players[0].left = gap < 0.0;
    } else {
        // 50 ms pulses so every press is a fresh edge
        frame.players[0].attack = t_ms % 300.0 < 50.0;
    }

    if gap.abs() > 150.0 {
        frame.players[1].left = gap > 0.0;
        frame.players[1].right = gap < 0.0;
    } else {
        frame.players[1].down = t_ms % 1500.0 < 500.0;
        frame.players[1].attack = t_ms % 700.0 < 50.0;
    }
    // One stance switch to Water early on
    frame.players[1].switch_mode = (3000.0..3050.0).contains(&t_ms);

    frame
}

fn report_health(world: &mut World, round_s: i64) {
    let mut query = world.query::<(&Fighter, &Health)>();
    let mut line = format!("t={round_s:>3}s");
    let mut rows: Vec<_> = query.iter(world).collect();
    rows.sort_by_key(|(fighter, _)| fighter.slot.index());
    for (fighter, health) in rows {
        line.push_str(&format!(
            "  {} {:>5.1}/{:.0} ({})",
            fighter.slot.label(),
            health.current,
            health.max,
            fighter.mode.name()
        ));
    }
    println!("{line}");
}
