use bevy_ecs::prelude::World;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::activity::{Activity, ActivityRegistry};
use crate::archetypes::ArchetypeSpec;
use crate::arrivals::ArrivalSchedule;
use crate::attraction::{Attraction, AttractionRegistry};
use crate::clock::ParkClock;
use crate::distributions::{sample_normal, weighted_choice};
use crate::ecs::{Agent, AgentLog, AgentRoster, AgeClass, Behavior, PassWallet, VisitHistory};
use crate::map::ParkMap;
use crate::telemetry::ParkHistory;

use super::error::ScenarioError;
use super::params::{DecisionRng, ScenarioParams, SimSeed};

/// Validate the scenario and populate `world` with every resource and
/// agent entity the runner needs. Nothing is inserted if validation fails.
pub fn build_scenario(world: &mut World, params: ScenarioParams) -> Result<(), ScenarioError> {
    validate_attractions(&params)?;
    params.archetype_table.validate()?;
    let archetypes = resolve_archetype_distribution(&params)?;
    let map = build_park_map(&params)?;

    // Registries hold entities in ascending popularity order; decision
    // sweeps and the RNG streams that feed them depend on this ordering.
    let mut attractions = AttractionRegistry::default();
    let mut attraction_specs: Vec<_> = params.attractions.iter().collect();
    attraction_specs.sort_by_key(|spec| spec.popularity);
    for spec in attraction_specs {
        let area = map
            .area_id(&spec.park_area)
            .ok_or_else(|| ScenarioError::UnknownParkArea {
                name: spec.park_area.clone(),
                referrer: spec.name.clone(),
            })?;
        attractions.push(Attraction::new(spec, area));
    }

    let mut activities = ActivityRegistry::default();
    let mut activity_specs: Vec<_> = params.activities.iter().collect();
    activity_specs.sort_by_key(|spec| spec.popularity);
    for spec in activity_specs {
        let area = map
            .area_id(&spec.park_area)
            .ok_or_else(|| ScenarioError::UnknownParkArea {
                name: spec.park_area.clone(),
                referrer: spec.name.clone(),
            })?;
        activities.push(Activity::new(spec, area));
    }

    let schedule = ArrivalSchedule::generate(
        &params.hourly_percents,
        params.total_daily_agents,
        params.perfect_arrivals,
        params.seed,
    )?;
    let clock = ParkClock::new(schedule.operating_hours());
    let history = ParkHistory::new(attractions.len(), activities.len());

    let archetype_weights: Vec<f64> = archetypes.iter().map(|(_, weight)| *weight).collect();
    let total_agents = schedule.total() as usize;
    let mut decision_rng = StdRng::seed_from_u64(params.seed);
    let mut roster = Vec::with_capacity(total_agents);
    for agent_id in 0..total_agents {
        let (archetype, _) = archetypes[weighted_choice(&mut decision_rng, &archetype_weights)];
        let age_class = select_age_class(&mut decision_rng, archetype);

        let mut agent_rng = StdRng::seed_from_u64(params.seed.wrapping_add(agent_id as u64));
        let exp_ability = agent_rng.gen::<f64>() < params.exp_ability_pct;
        let stay_mean = archetype.stay_time_preference as f64;
        let stay_time_preference =
            sample_normal(&mut agent_rng, stay_mean, stay_mean / 4.0).max(0.0) as u32;

        let entity = world
            .spawn((
                Agent::new(agent_id),
                Behavior {
                    archetype: archetype.name.clone(),
                    age_class,
                    stay_time_preference,
                    allow_repeats: archetype.allow_repeats,
                    attraction_preference: archetype.attraction_preference,
                    wait_threshold: archetype.wait_threshold,
                    wait_discount_beta: archetype.wait_discount_beta,
                    exp_pass_ability: exp_ability,
                    exp_wait_threshold: params.exp_wait_threshold,
                    exp_limit: params.exp_limit,
                },
                PassWallet::default(),
                VisitHistory::new(attractions.len(), activities.len()),
                AgentLog::default(),
            ))
            .id();
        roster.push(entity);
    }

    log::info!(
        "built scenario: {} agents, {} attractions, {} activities, {} operating hours, seed {}",
        total_agents,
        attractions.len(),
        activities.len(),
        schedule.operating_hours(),
        params.seed
    );

    world.insert_resource(clock);
    world.insert_resource(schedule);
    world.insert_resource(map);
    world.insert_resource(attractions);
    world.insert_resource(activities);
    world.insert_resource(history);
    world.insert_resource(AgentRoster(roster));
    world.insert_resource(SimSeed(params.seed));
    world.insert_resource(DecisionRng(decision_rng));
    Ok(())
}

fn validate_attractions(params: &ScenarioParams) -> Result<(), ScenarioError> {
    for spec in &params.attractions {
        if !(1..=10).contains(&spec.popularity) {
            return Err(ScenarioError::PopularityOutOfRange {
                name: spec.name.clone(),
                got: spec.popularity,
            });
        }
        if !(0.0..=1.0).contains(&spec.expedited_queue_ratio) {
            return Err(ScenarioError::ExpQueueRatio {
                name: spec.name.clone(),
                got: spec.expedited_queue_ratio,
            });
        }
    }
    Ok(())
}

fn resolve_archetype_distribution(
    params: &ScenarioParams,
) -> Result<Vec<(&ArchetypeSpec, f64)>, ScenarioError> {
    let weight_sum: u32 = params
        .archetype_distribution
        .iter()
        .map(|(_, weight)| weight)
        .sum();
    if weight_sum != 100 {
        return Err(ScenarioError::ArchetypeDistribution { got: weight_sum });
    }
    params
        .archetype_distribution
        .iter()
        .map(|(name, weight)| {
            params
                .archetype_table
                .get(name)
                .map(|spec| (spec, *weight as f64))
                .ok_or_else(|| ScenarioError::UnknownArchetype { name: name.clone() })
        })
        .collect()
}

fn select_age_class<R: Rng>(rng: &mut R, archetype: &ArchetypeSpec) -> AgeClass {
    let weights = [
        archetype.percent_no_child_rides,
        archetype.percent_no_adult_rides,
        archetype.percent_no_preference,
    ];
    match weighted_choice(rng, &weights) {
        0 => AgeClass::NoChildRides,
        1 => AgeClass::NoAdultRides,
        _ => AgeClass::NoPreference,
    }
}

fn build_park_map(params: &ScenarioParams) -> Result<ParkMap, ScenarioError> {
    let areas: Vec<String> = params.park_map.iter().map(|(name, _)| name.clone()).collect();
    let area_id = |name: &str| areas.iter().position(|area| area == name);

    let mut travel = vec![vec![0u32; areas.len()]; areas.len()];
    for (from_index, (from, row)) in params.park_map.iter().enumerate() {
        for (to_index, to) in areas.iter().enumerate() {
            let minutes = row
                .iter()
                .find(|(name, _)| name == to)
                .map(|(_, minutes)| *minutes)
                .ok_or_else(|| ScenarioError::MissingTravelTime {
                    from: from.clone(),
                    to: to.clone(),
                })?;
            travel[from_index][to_index] = minutes;
        }
    }

    let entrance = area_id(&params.entrance_park_area).ok_or_else(|| {
        ScenarioError::UnknownParkArea {
            name: params.entrance_park_area.clone(),
            referrer: "entrance".into(),
        }
    })?;

    Ok(ParkMap::new(areas, travel, entrance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::AgentAction;

    #[test]
    fn default_scenario_builds() {
        let mut world = World::new();
        build_scenario(&mut world, ScenarioParams::default().with_seed(42)).unwrap();

        let schedule = world.resource::<ArrivalSchedule>();
        assert_eq!(schedule.total(), 5000);
        let roster = world.resource::<AgentRoster>();
        assert_eq!(roster.0.len(), 5000);
        let clock = world.resource::<ParkClock>();
        assert_eq!(clock.park_close(), 720);
        let attractions = world.resource::<AttractionRegistry>();
        assert_eq!(attractions.len(), 8);
        // Ascending popularity: the insect show first, Ride of Passage last.
        assert_eq!(attractions.get(0).popularity, 3);
        assert_eq!(attractions.get(7).popularity, 10);
    }

    #[test]
    fn agents_start_outside_the_park() {
        let mut world = World::new();
        build_scenario(
            &mut world,
            ScenarioParams::default()
                .with_total_daily_agents(50)
                .with_seed(7),
        )
        .unwrap();

        let roster: Vec<_> = world.resource::<AgentRoster>().0.clone();
        for entity in roster {
            let agent = world.get::<Agent>(entity).unwrap();
            assert!(!agent.within_park);
            assert_eq!(agent.action, AgentAction::Idling);
            assert!(world.get::<PassWallet>(entity).unwrap().is_empty());
        }
    }

    #[test]
    fn popularity_out_of_range_is_rejected() {
        let mut params = ScenarioParams::default();
        params.attractions[0].popularity = 11;
        let err = build_scenario(&mut World::new(), params).unwrap_err();
        assert!(matches!(err, ScenarioError::PopularityOutOfRange { got: 11, .. }));
    }

    #[test]
    fn exp_ratio_out_of_range_is_rejected() {
        let mut params = ScenarioParams::default();
        params.attractions[2].expedited_queue_ratio = 1.2;
        let err = build_scenario(&mut World::new(), params).unwrap_err();
        assert!(matches!(err, ScenarioError::ExpQueueRatio { .. }));
    }

    #[test]
    fn unknown_attraction_area_is_rejected() {
        let mut params = ScenarioParams::default();
        params.attractions[0].park_area = "Atlantis".into();
        let err = build_scenario(&mut World::new(), params).unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownParkArea { .. }));
    }

    #[test]
    fn unknown_entrance_is_rejected() {
        let mut params = ScenarioParams::default();
        params.entrance_park_area = "Backlot".into();
        let err = build_scenario(&mut World::new(), params).unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownParkArea { .. }));
    }

    #[test]
    fn archetype_distribution_must_sum_to_one_hundred() {
        let mut params = ScenarioParams::default();
        params.archetype_distribution[0].1 = 11;
        let err = build_scenario(&mut World::new(), params).unwrap_err();
        assert_eq!(err, ScenarioError::ArchetypeDistribution { got: 101 });
    }

    #[test]
    fn unknown_archetype_in_distribution_is_rejected() {
        let mut params = ScenarioParams::default();
        params.archetype_distribution[0].0 = "coaster_ghost".into();
        params.archetype_distribution[0].1 = 10;
        let err = build_scenario(&mut World::new(), params).unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownArchetype { .. }));
    }

    #[test]
    fn incomplete_travel_matrix_is_rejected() {
        let mut params = ScenarioParams::default();
        params.park_map[1].1.retain(|(to, _)| to != "Asia");
        let err = build_scenario(&mut World::new(), params).unwrap_err();
        assert!(matches!(err, ScenarioError::MissingTravelTime { .. }));
    }
}
