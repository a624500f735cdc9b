//! Simulation runner: advances the clock and runs the tick phases.
//!
//! Clock progression happens here, outside systems. Each minute runs the
//! phase schedule once against the current `now`, then advances the clock,
//! so every system in a tick observes the same timestamp.

use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::ParkClock;
use crate::systems::{
    activity_step::activity_step_system, admissions::admissions_system,
    attraction_step::attraction_step_system, commit::commit_system, decision::decision_system,
    estimates::estimates_system, snapshot::snapshot_system, timers::timers_system,
};

/// Builds the tick schedule: the phase systems in their required order.
///
/// The chain gives the ordering guarantees the tick depends on: decisions
/// read estimates refreshed this minute, attraction steps read queues
/// after this minute's arrivals committed, timers age last, and the
/// snapshot captures the settled state.
pub fn park_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            admissions_system,
            estimates_system,
            decision_system,
            commit_system,
            attraction_step_system,
            activity_step_system,
            timers_system,
            snapshot_system,
        )
            .chain(),
    );
    schedule
}

/// Runs one simulated minute. Returns `false` once the day is over.
pub fn run_minute(world: &mut World, schedule: &mut Schedule) -> bool {
    if world.resource::<ParkClock>().day_over() {
        return false;
    }
    schedule.run(world);
    world.resource_mut::<ParkClock>().advance();
    true
}

/// Runs the remaining minutes of the day. Returns how many ticks ran.
pub fn run_day(world: &mut World, schedule: &mut Schedule) -> u32 {
    let mut minutes = 0;
    while run_minute(world, schedule) {
        minutes += 1;
    }
    log::debug!("simulated day complete after {minutes} minutes");
    minutes
}
