//! Admissions phase: the minute's scheduled arrivals walk through the gate.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::arrivals::ArrivalSchedule;
use crate::clock::ParkClock;
use crate::ecs::{Agent, AgentLog, AgentRoster};
use crate::map::ParkMap;

/// Admit `schedule[now]` pre-generated agents at the entrance area. No one
/// enters at or after the closing minute.
pub fn admissions_system(
    clock: Res<ParkClock>,
    mut schedule: ResMut<ArrivalSchedule>,
    map: Res<ParkMap>,
    roster: Res<AgentRoster>,
    mut agents: Query<(&mut Agent, &mut AgentLog)>,
) {
    if clock.now() >= clock.park_close() {
        return;
    }
    for agent_id in schedule.admit(clock.now()) {
        let Ok((mut agent, mut log)) = agents.get_mut(roster.0[agent_id]) else {
            continue;
        };
        agent.arrive_at_park(clock.now(), map.entrance(), &mut log);
    }
}
