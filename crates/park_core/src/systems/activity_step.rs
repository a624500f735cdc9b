//! Activity step phase: visitors whose dwell ran out surface and idle.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::activity::ActivityRegistry;
use crate::clock::ParkClock;
use crate::ecs::{Agent, AgentLog, AgentRoster, VisitHistory};

pub fn activity_step_system(
    clock: Res<ParkClock>,
    roster: Res<AgentRoster>,
    mut activities: ResMut<ActivityRegistry>,
    mut agents: Query<(&mut Agent, &mut VisitHistory, &mut AgentLog)>,
) {
    let time = clock.now();
    for activity_id in 0..activities.len() {
        let exiting = activities.get_mut(activity_id).step();
        if exiting.is_empty() {
            continue;
        }
        let name = activities.get(activity_id).name.clone();
        for agent_id in exiting {
            let Ok((mut agent, mut visits, mut log)) = agents.get_mut(roster.0[agent_id]) else {
                continue;
            };
            agent.exited_activity(activity_id, time, &name, &mut visits, &mut log);
        }
    }
}
