//! Commit phase: agents whose travel has resolved take their chosen action.
//!
//! Runs after decisions and before attraction steps, so a ride dispatching
//! this minute loads travelers who arrived this minute.

use bevy_ecs::prelude::{Query, Res, ResMut};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activity::ActivityRegistry;
use crate::attraction::AttractionRegistry;
use crate::clock::ParkClock;
use crate::ecs::{Agent, AgentAction, AgentLog, AgentRoster, Destination, PassWallet};
use crate::scenario::SimSeed;
use crate::telemetry::ParkHistory;

pub fn commit_system(
    clock: Res<ParkClock>,
    seed: Res<SimSeed>,
    roster: Res<AgentRoster>,
    mut attractions: ResMut<AttractionRegistry>,
    mut activities: ResMut<ActivityRegistry>,
    mut history: ResMut<ParkHistory>,
    mut agents: Query<(&mut Agent, &mut PassWallet, &mut AgentLog)>,
) {
    let time = clock.now();
    for &entity in &roster.0 {
        let Ok((mut agent, mut wallet, mut log)) = agents.get_mut(entity) else {
            continue;
        };
        if !agent.within_park || agent.time_to_destination > 0 {
            continue;
        }
        match agent.action {
            AgentAction::Leaving => {
                for pass in wallet.take_all() {
                    attractions.get_mut(pass.attraction).skip_pass();
                }
                agent.leave_park(time, &mut log);
                history.left_agents += 1;
            }
            AgentAction::Traveling(Destination::Attraction(id)) => {
                let attraction = attractions.get_mut(id);
                agent.enter_queue(id, attraction.park_area, time, &attraction.name, &mut log);
                attraction.add_to_queue(agent.id);
            }
            AgentAction::Traveling(Destination::Activity(id)) => {
                let activity = activities.get_mut(id);
                agent.begin_activity(id, activity.park_area, time, &activity.name, &mut log);
                let pending: Vec<i32> =
                    wallet.iter().map(|pass| pass.return_delay).collect();
                let mut dwell_rng = StdRng::seed_from_u64(
                    seed.0
                        .wrapping_add(agent.id as u64)
                        .wrapping_add(time as u64),
                );
                activity.add_visitor(agent.id, &mut dwell_rng, &pending);
            }
            AgentAction::Traveling(Destination::Gate) => {}
            AgentAction::RedeemingPass(id) => {
                if !wallet.holds(id) {
                    let attraction = attractions.get(id);
                    panic!(
                        "agent {} tried to redeem a pass it does not hold for {}",
                        agent.id, attraction.name
                    );
                }
                let attraction = attractions.get_mut(id);
                agent.enter_exp_queue(id, attraction.park_area, time, &attraction.name, &mut log);
                attraction.add_to_exp_queue(agent.id);
            }
            AgentAction::GettingPass(id) => {
                let attraction = attractions.get_mut(id);
                attraction.remove_pass();
                let return_delay = attraction.exp_return_time().saturating_sub(time);
                agent.receive_pass(
                    id,
                    attraction.park_area,
                    return_delay,
                    time,
                    &attraction.name,
                    &mut wallet,
                    &mut log,
                );
                history.distributed_passes += 1;
            }
            AgentAction::Idling
            | AgentAction::Queueing(_)
            | AgentAction::Riding(_)
            | AgentAction::Browsing(_) => {}
        }
    }
}
