//! Decision phase: every idle agent picks its next move.
//!
//! The procedure per agent: leave check (always past close, stochastic past
//! the preferred stay), redemption of any due pass, then the
//! attraction-or-activity branch. Attraction selection scores candidates
//! with a wait- and distance-discounted utility, samples from a normalized
//! softmax, and validates the sample against pass-seeking, patience, and
//! pass-collision rules before committing to travel.

use bevy_ecs::prelude::{Query, Res, ResMut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::activity::ActivityRegistry;
use crate::attraction::{AttractionRegistry, PassStatus};
use crate::clock::ParkClock;
use crate::distributions::{sample_normal, weighted_choice};
use crate::ecs::{
    Agent, AgentAction, AgentRoster, AgeClass, AttractionId, ActivityId, Behavior, Destination,
    PassWallet, VisitHistory,
};
use crate::map::ParkMap;
use crate::scenario::{DecisionRng, SimSeed};

/// What an idle agent intends to do next; committed once travel resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Leave,
    Travel(Destination),
    GetPass(AttractionId),
    RedeemPass(AttractionId),
}

/// Utility of one candidate attraction: diminishing returns in prior and
/// planned visits, exponentially discounted by posted wait, linearly
/// penalized by walking distance. A beta of 0.9885 halves utility over a
/// 60-minute wait.
pub fn calculate_utility(
    popularity: u32,
    n_past: u32,
    n_future: u32,
    wait_discount_beta: f64,
    wait_time: u32,
    distance: u32,
) -> f64 {
    let mut utility = 10.0 * popularity as f64 / (1.0 + n_past as f64 + n_future as f64);
    utility *= wait_discount_beta.powi(wait_time as i32);
    utility - 3.0 * distance as f64
}

/// Softmax over standardized utilities (sigma clamped to >= 1), keeping the
/// selection temperature stable across popularity regimes.
pub fn normalized_softmax(utilities: &[f64]) -> Vec<f64> {
    let count = utilities.len() as f64;
    let mean = utilities.iter().sum::<f64>() / count;
    let variance = utilities
        .iter()
        .map(|utility| (utility - mean).powi(2))
        .sum::<f64>()
        / count;
    let sigma = variance.sqrt().max(1.0);
    let exponentials: Vec<f64> = utilities
        .iter()
        .map(|utility| ((utility - mean) / sigma).exp())
        .collect();
    let total: f64 = exponentials.iter().sum();
    exponentials
        .into_iter()
        .map(|value| value / total)
        .collect()
}

/// Stochastic leave check: the longer past the preferred stay, the likelier
/// the draw (N(0,1) * 60, a 95% band of roughly +/-117 minutes) is beaten.
fn decides_to_leave(
    seed: u64,
    agent_id: usize,
    time: u32,
    arrival_time: u32,
    stay_time_preference: u32,
) -> bool {
    let over_stay = (time - arrival_time) as f64 - stay_time_preference as f64;
    let mut rng = StdRng::seed_from_u64(
        seed.wrapping_add(agent_id as u64).wrapping_add(time as u64),
    );
    let draw = sample_normal(&mut rng, 0.0, 1.0) * 60.0;
    over_stay > draw
}

/// Full decision procedure for one idle agent.
#[allow(clippy::too_many_arguments)]
pub fn decide<R: Rng>(
    agent: &Agent,
    behavior: &Behavior,
    wallet: &PassWallet,
    history: &VisitHistory,
    attractions: &AttractionRegistry,
    activities: &ActivityRegistry,
    map: &ParkMap,
    time: u32,
    park_closed: bool,
    seed: u64,
    rng: &mut R,
) -> Choice {
    if park_closed {
        return Choice::Leave;
    }
    if let Some(arrival) = agent.arrival_time {
        if time != arrival
            && decides_to_leave(seed, agent.id, time, arrival, behavior.stay_time_preference)
        {
            return Choice::Leave;
        }
    }

    if let Some(attraction) = wallet.first_due() {
        return Choice::RedeemPass(attraction);
    }

    let can_get_exp = wallet.len() < behavior.exp_limit && behavior.exp_pass_ability;
    let coinflip: f64 = rng.gen();
    if coinflip <= behavior.attraction_preference || can_get_exp {
        if let Some(choice) =
            select_attraction(agent, behavior, wallet, history, attractions, map, rng)
        {
            return choice;
        }
    }
    Choice::Travel(Destination::Activity(select_activity(activities, rng)))
}

/// Sample-then-validate attraction selection. Returns `None` when every
/// candidate is filtered out, which sends the agent to an activity.
fn select_attraction<R: Rng>(
    agent: &Agent,
    behavior: &Behavior,
    wallet: &PassWallet,
    history: &VisitHistory,
    attractions: &AttractionRegistry,
    map: &ParkMap,
    rng: &mut R,
) -> Option<Choice> {
    let area = agent.park_area?;

    let eligible: Vec<AttractionId> = (0..attractions.len())
        .filter(|id| {
            let attraction = attractions.get(*id);
            if wallet.holds(*id) {
                return false;
            }
            if !behavior.allow_repeats && history.rides_completed[*id] > 0 {
                return false;
            }
            match behavior.age_class {
                AgeClass::NoChildRides => attraction.adult_eligible,
                AgeClass::NoAdultRides => attraction.child_eligible,
                AgeClass::NoPreference => true,
            }
        })
        .collect();
    if eligible.is_empty() {
        return None;
    }

    let mut candidates = Vec::with_capacity(eligible.len());
    let mut utilities = Vec::with_capacity(eligible.len());
    for id in eligible {
        let attraction = attractions.get(id);
        let utility = calculate_utility(
            attraction.popularity,
            history.rides_completed[id],
            u32::from(wallet.holds(id)),
            behavior.wait_discount_beta,
            attraction.wait_time(),
            map.travel_time(area, attraction.park_area),
        );
        if utility > 0.0 {
            candidates.push(id);
            utilities.push(utility);
        }
    }

    while !candidates.is_empty() {
        let probabilities = normalized_softmax(&utilities);
        let pick = weighted_choice(rng, &probabilities);
        let id = candidates[pick];
        let attraction = attractions.get(id);
        let wait = attraction.wait_time();
        if wait > behavior.exp_wait_threshold
            && behavior.exp_pass_ability
            && wallet.len() < behavior.exp_limit
            && attraction.expedited_queue
            && attraction.pass_status() == PassStatus::Open
        {
            return Some(Choice::GetPass(id));
        } else if wait > behavior.wait_threshold + 6 * attraction.popularity {
            candidates.remove(pick);
            utilities.remove(pick);
        } else if wallet
            .iter()
            .any(|pass| pass.return_delay < (wait + attraction.run_time) as i32)
        {
            // Waiting here would make the agent miss a pending return window.
            candidates.remove(pick);
            utilities.remove(pick);
        } else {
            return Some(Choice::Travel(Destination::Attraction(id)));
        }
    }
    None
}

/// Weighted choice among all activities by raw popularity.
fn select_activity<R: Rng>(activities: &ActivityRegistry, rng: &mut R) -> ActivityId {
    let weights: Vec<f64> = activities
        .iter()
        .map(|activity| activity.popularity as f64)
        .collect();
    weighted_choice(rng, &weights)
}

pub fn decision_system(
    clock: Res<ParkClock>,
    seed: Res<SimSeed>,
    mut rng: ResMut<DecisionRng>,
    attractions: Res<AttractionRegistry>,
    activities: Res<ActivityRegistry>,
    map: Res<ParkMap>,
    roster: Res<AgentRoster>,
    mut agents: Query<(&mut Agent, &Behavior, &PassWallet, &VisitHistory)>,
) {
    for &entity in &roster.0 {
        let Ok((mut agent, behavior, wallet, history)) = agents.get_mut(entity) else {
            continue;
        };
        if !agent.within_park || agent.action != AgentAction::Idling {
            continue;
        }
        let Some(current_area) = agent.park_area else {
            continue;
        };
        let choice = decide(
            &agent,
            behavior,
            wallet,
            history,
            &attractions,
            &activities,
            &map,
            clock.now(),
            clock.is_closed(),
            seed.0,
            &mut rng.0,
        );
        let destination_area = match choice {
            Choice::Leave | Choice::Travel(Destination::Gate) => map.entrance(),
            Choice::Travel(Destination::Attraction(id))
            | Choice::GetPass(id)
            | Choice::RedeemPass(id) => attractions.get(id).park_area,
            Choice::Travel(Destination::Activity(id)) => activities.get(id).park_area,
        };
        let travel_time = map.travel_time(current_area, destination_area);
        let action = match choice {
            Choice::Leave => AgentAction::Leaving,
            Choice::Travel(destination) => AgentAction::Traveling(destination),
            Choice::GetPass(id) => AgentAction::GettingPass(id),
            Choice::RedeemPass(id) => AgentAction::RedeemingPass(id),
        };
        agent.set_destination(action, travel_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Pass;
    use crate::scenario::{ActivitySpec, AttractionSpec};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry(specs: &[(&str, u32, u32, u32, bool)]) -> AttractionRegistry {
        // (name, run_time, hourly_throughput, popularity, expedited)
        let mut attractions = AttractionRegistry::default();
        for &(name, run_time, throughput, popularity, expedited) in specs {
            attractions.push(crate::attraction::Attraction::new(
                &AttractionSpec {
                    name: name.into(),
                    park_area: "Main".into(),
                    run_time,
                    hourly_throughput: throughput,
                    popularity,
                    expedited_queue: expedited,
                    expedited_queue_ratio: if expedited { 0.5 } else { 0.0 },
                    child_eligible: true,
                    adult_eligible: true,
                },
                0,
            ));
        }
        attractions
    }

    fn activities() -> ActivityRegistry {
        let mut registry = ActivityRegistry::default();
        registry.push(crate::activity::Activity::new(
            &ActivitySpec {
                name: "show".into(),
                park_area: "Main".into(),
                popularity: 5,
                mean_time: 30,
            },
            0,
        ));
        registry
    }

    fn one_area_map() -> ParkMap {
        ParkMap::new(vec!["Main".into()], vec![vec![0]], 0)
    }

    fn eager_behavior() -> Behavior {
        Behavior {
            archetype: "test".into(),
            age_class: AgeClass::NoPreference,
            stay_time_preference: 600,
            allow_repeats: true,
            attraction_preference: 1.0,
            wait_threshold: 400,
            wait_discount_beta: 0.9975,
            exp_pass_ability: false,
            exp_wait_threshold: 30,
            exp_limit: 1,
        }
    }

    fn in_park_agent() -> Agent {
        let mut agent = Agent::new(0);
        let mut log = crate::ecs::AgentLog::default();
        agent.arrive_at_park(0, 0, &mut log);
        agent
    }

    #[test]
    fn utility_discounts_wait_and_distance() {
        let base = calculate_utility(10, 0, 0, 0.9885, 0, 0);
        assert!((base - 100.0).abs() < 1e-9);
        let waited = calculate_utility(10, 0, 0, 0.9885, 60, 0);
        assert!((waited / base - 0.5).abs() < 0.01);
        let walked = calculate_utility(10, 0, 0, 0.9885, 0, 5);
        assert!((base - walked - 15.0).abs() < 1e-9);
        let repeated = calculate_utility(10, 3, 0, 0.9885, 0, 0);
        assert!((repeated - 25.0).abs() < 1e-9);
    }

    #[test]
    fn softmax_sums_to_one_and_prefers_higher_utility() {
        let probabilities = normalized_softmax(&[50.0, 90.0, 10.0]);
        let total: f64 = probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(probabilities[1] > probabilities[0]);
        assert!(probabilities[0] > probabilities[2]);
    }

    #[test]
    fn softmax_of_identical_utilities_is_uniform() {
        let probabilities = normalized_softmax(&[42.0, 42.0, 42.0]);
        for probability in probabilities {
            assert!((probability - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn park_close_forces_leaving() {
        let agent = in_park_agent();
        let behavior = eager_behavior();
        let mut rng = StdRng::seed_from_u64(0);
        let choice = decide(
            &agent,
            &behavior,
            &PassWallet::default(),
            &VisitHistory::new(1, 1),
            &registry(&[("ride", 5, 60, 5, false)]),
            &activities(),
            &one_area_map(),
            720,
            true,
            0,
            &mut rng,
        );
        assert_eq!(choice, Choice::Leave);
    }

    #[test]
    fn due_pass_is_redeemed_before_anything_else() {
        let agent = in_park_agent();
        let behavior = eager_behavior();
        let mut wallet = PassWallet::default();
        wallet.push(Pass { attraction: 0, return_delay: 0 });
        let mut rng = StdRng::seed_from_u64(0);
        let choice = decide(
            &agent,
            &behavior,
            &wallet,
            &VisitHistory::new(1, 1),
            &registry(&[("ride", 5, 60, 5, false)]),
            &activities(),
            &one_area_map(),
            0,
            false,
            0,
            &mut rng,
        );
        assert_eq!(choice, Choice::RedeemPass(0));
    }

    #[test]
    fn pending_return_window_drops_colliding_candidate() {
        // Held pass due in 15; the only candidate posts wait 20 with
        // run_time 10, so queueing would overshoot the window.
        let agent = in_park_agent();
        let behavior = eager_behavior();
        let mut wallet = PassWallet::default();
        wallet.push(Pass { attraction: 1, return_delay: 15 });
        let mut attractions = registry(&[("ride", 10, 60, 5, false), ("passed", 10, 60, 6, false)]);
        for agent_id in 0..20 {
            attractions.get_mut(0).add_to_queue(agent_id);
        }
        attractions.get_mut(0).update_wait_times();
        assert_eq!(attractions.get(0).wait_time(), 20);
        let mut rng = StdRng::seed_from_u64(0);
        let choice = decide(
            &agent,
            &behavior,
            &wallet,
            &VisitHistory::new(2, 1),
            &attractions,
            &activities(),
            &one_area_map(),
            0,
            false,
            0,
            &mut rng,
        );
        assert_eq!(choice, Choice::Travel(Destination::Activity(0)));
    }

    #[test]
    fn long_wait_triggers_pass_seeking() {
        let agent = in_park_agent();
        let mut behavior = eager_behavior();
        behavior.exp_pass_ability = true;
        let mut attractions = registry(&[("ride", 5, 120, 5, true)]);
        for agent_id in 0..80 {
            attractions.get_mut(0).add_to_queue(agent_id);
        }
        attractions.get_mut(0).update_wait_times();
        assert!(attractions.get(0).wait_time() > behavior.exp_wait_threshold);
        let mut rng = StdRng::seed_from_u64(0);
        let choice = decide(
            &agent,
            &behavior,
            &PassWallet::default(),
            &VisitHistory::new(1, 1),
            &attractions,
            &activities(),
            &one_area_map(),
            0,
            false,
            0,
            &mut rng,
        );
        assert_eq!(choice, Choice::GetPass(0));
    }

    #[test]
    fn impatient_agent_falls_back_to_an_activity() {
        let agent = in_park_agent();
        let mut behavior = eager_behavior();
        behavior.wait_threshold = 10;
        let mut attractions = registry(&[("ride", 5, 60, 5, false)]);
        for agent_id in 0..50 {
            attractions.get_mut(0).add_to_queue(agent_id);
        }
        attractions.get_mut(0).update_wait_times();
        // Posted wait 50 > threshold 10 + 6 * popularity 5 = 40.
        assert_eq!(attractions.get(0).wait_time(), 50);
        let mut rng = StdRng::seed_from_u64(0);
        let choice = decide(
            &agent,
            &behavior,
            &PassWallet::default(),
            &VisitHistory::new(1, 1),
            &attractions,
            &activities(),
            &one_area_map(),
            0,
            false,
            0,
            &mut rng,
        );
        assert_eq!(choice, Choice::Travel(Destination::Activity(0)));
    }

    #[test]
    fn no_repeats_filter_empties_the_candidate_set() {
        let agent = in_park_agent();
        let mut behavior = eager_behavior();
        behavior.allow_repeats = false;
        let mut history = VisitHistory::new(1, 1);
        history.rides_completed[0] = 1;
        let mut rng = StdRng::seed_from_u64(0);
        let choice = decide(
            &agent,
            &behavior,
            &PassWallet::default(),
            &history,
            &registry(&[("ride", 5, 60, 5, false)]),
            &activities(),
            &one_area_map(),
            0,
            false,
            0,
            &mut rng,
        );
        assert_eq!(choice, Choice::Travel(Destination::Activity(0)));
    }

    #[test]
    fn age_class_filter_keeps_agents_off_ineligible_rides() {
        let agent = in_park_agent();
        let mut behavior = eager_behavior();
        behavior.age_class = AgeClass::NoChildRides;
        let mut attractions = AttractionRegistry::default();
        attractions.push(crate::attraction::Attraction::new(
            &AttractionSpec {
                name: "kiddie carousel".into(),
                park_area: "Main".into(),
                run_time: 3,
                hourly_throughput: 300,
                popularity: 6,
                expedited_queue: false,
                expedited_queue_ratio: 0.0,
                child_eligible: true,
                adult_eligible: false,
            },
            0,
        ));
        let mut rng = StdRng::seed_from_u64(0);
        let choice = decide(
            &agent,
            &behavior,
            &PassWallet::default(),
            &VisitHistory::new(1, 1),
            &attractions,
            &activities(),
            &one_area_map(),
            0,
            false,
            0,
            &mut rng,
        );
        assert_eq!(choice, Choice::Travel(Destination::Activity(0)));
    }

    #[test]
    fn leave_draw_is_deterministic_per_seed_and_minute() {
        for time in [100u32, 400, 700] {
            assert_eq!(
                decides_to_leave(42, 7, time, 0, 240),
                decides_to_leave(42, 7, time, 0, 240),
            );
        }
    }

    #[test]
    fn agents_overstaying_far_beyond_preference_leave() {
        // 500 minutes past a 60-minute preference beats any plausible draw.
        let mut leaves = 0;
        for agent_id in 0..50 {
            if decides_to_leave(1, agent_id, 560, 0, 60) {
                leaves += 1;
            }
        }
        assert!(leaves >= 49, "only {leaves} of 50 left");
    }
}
