//! Test helpers for common scenario setup.
//!
//! Deterministic miniature parks used across test modules: a single ride
//! next to the gate, an eager archetype that always prefers attractions,
//! and a world builder that pins arrivals to exact minutes.

use bevy_ecs::prelude::World;

use crate::archetypes::{ArchetypeSpec, ArchetypeTable};
use crate::arrivals::ArrivalSchedule;
use crate::clock::MINUTES_PER_HOUR;
use crate::scenario::{build_scenario, ActivitySpec, AttractionSpec, ScenarioParams};

/// An archetype that always goes for a ride, never repeats-averse, and is
/// patient enough that no wait threshold interferes with a test.
pub fn committed_rider_archetype() -> ArchetypeSpec {
    ArchetypeSpec {
        name: "committed_rider".into(),
        stay_time_preference: 600,
        allow_repeats: true,
        attraction_preference: 1.0,
        wait_threshold: 1000,
        wait_discount_beta: 0.9975,
        percent_no_child_rides: 0.0,
        percent_no_adult_rides: 0.0,
        percent_no_preference: 1.0,
    }
}

/// One ride and one plaza in a single area with zero walking distance, so
/// decisions commit the same minute they are made.
pub fn single_ride_params(operating_hours: u32) -> ScenarioParams {
    let mut hourly_percents: Vec<(String, u32)> = (0..operating_hours)
        .map(|hour| (format!("{hour}:00"), 0))
        .collect();
    hourly_percents[0].1 = 100;
    ScenarioParams {
        attractions: vec![AttractionSpec {
            name: "Test Ride".into(),
            park_area: "Main".into(),
            run_time: 5,
            hourly_throughput: 60,
            popularity: 5,
            expedited_queue: false,
            expedited_queue_ratio: 0.0,
            child_eligible: true,
            adult_eligible: true,
        }],
        activities: vec![ActivitySpec {
            name: "plaza".into(),
            park_area: "Main".into(),
            popularity: 5,
            mean_time: 10,
        }],
        park_map: vec![("Main".into(), vec![("Main".into(), 0)])],
        entrance_park_area: "Main".into(),
        hourly_percents,
        archetype_table: ArchetypeTable::new(vec![committed_rider_archetype()]),
        archetype_distribution: vec![("committed_rider".into(), 100)],
        total_daily_agents: 1,
        perfect_arrivals: true,
        exp_ability_pct: 0.0,
        exp_wait_threshold: 30,
        exp_limit: 1,
        seed: 0,
    }
}

/// Build a world for `params` and pin arrivals to exact minute slots.
///
/// # Panics
///
/// Panics if the slot vector does not cover the whole day or its total
/// does not match the spawned agent count.
pub fn world_with_exact_arrivals(mut params: ScenarioParams, per_minute: Vec<u32>) -> World {
    assert_eq!(
        per_minute.len() as u32,
        params.hourly_percents.len() as u32 * MINUTES_PER_HOUR,
        "arrival slots must cover every minute of the day"
    );
    params.total_daily_agents = per_minute.iter().sum();
    params.perfect_arrivals = true;

    let mut world = World::new();
    build_scenario(&mut world, params).expect("test scenario must build");
    world.insert_resource(ArrivalSchedule::from_minutes(per_minute));
    world
}
