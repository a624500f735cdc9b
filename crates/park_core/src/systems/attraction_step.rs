//! Attraction step phase: cycle boundaries dispatch and reload each ride.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::activity::ActivityRegistry;
use crate::attraction::AttractionRegistry;
use crate::clock::ParkClock;
use crate::ecs::{Agent, AgentAction, AgentLog, AgentRoster, PassWallet, VisitHistory};
use crate::telemetry::ParkHistory;

pub fn attraction_step_system(
    clock: Res<ParkClock>,
    roster: Res<AgentRoster>,
    mut attractions: ResMut<AttractionRegistry>,
    mut activities: ResMut<ActivityRegistry>,
    mut history: ResMut<ParkHistory>,
    mut agents: Query<(&mut Agent, &mut PassWallet, &mut VisitHistory, &mut AgentLog)>,
) {
    let time = clock.now();
    for attraction_id in 0..attractions.len() {
        let (exiting, loaded) = attractions.get_mut(attraction_id).step();
        if exiting.is_empty() && loaded.is_empty() {
            continue;
        }
        let name = attractions.get(attraction_id).name.clone();

        for agent_id in exiting {
            let Ok((mut agent, _, mut visits, mut log)) = agents.get_mut(roster.0[agent_id])
            else {
                continue;
            };
            agent.exited_attraction(attraction_id, time, &name, &mut visits, &mut log);
        }

        for agent_id in loaded {
            let Ok((mut agent, mut wallet, mut visits, mut log)) =
                agents.get_mut(roster.0[agent_id])
            else {
                continue;
            };
            // An expedited return can interrupt a browsing agent whose
            // dwell estimate outlived the window; pull them out first.
            if let AgentAction::Browsing(activity_id) = agent.action {
                let activity = activities.get_mut(activity_id);
                activity.force_exit(agent.id);
                let activity_name = activity.name.clone();
                agent.exited_activity(activity_id, time, &activity_name, &mut visits, &mut log);
            }
            let redeemed = agent.boarded_attraction(attraction_id, time, &name, &mut wallet, &mut log);
            if redeemed {
                history.redeemed_passes += 1;
                attractions.get_mut(attraction_id).redeem_pass();
            }
        }
    }
}
