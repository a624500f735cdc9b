//! Timer phase: ages every counter after all state transitions settled.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::activity::ActivityRegistry;
use crate::attraction::AttractionRegistry;
use crate::ecs::{Agent, AgentRoster, PassWallet};

pub fn timers_system(
    roster: Res<AgentRoster>,
    mut attractions: ResMut<AttractionRegistry>,
    mut activities: ResMut<ActivityRegistry>,
    mut agents: Query<(&mut Agent, &mut PassWallet)>,
) {
    for &entity in &roster.0 {
        let Ok((mut agent, mut wallet)) = agents.get_mut(entity) else {
            continue;
        };
        if !agent.within_park {
            continue;
        }
        agent.time_spent_at_location += 1;
        wallet.age();
        agent.time_to_destination = agent.time_to_destination.saturating_sub(1);
    }
    for attraction in attractions.iter_mut() {
        attraction.pass_time();
    }
    for activity in activities.iter_mut() {
        activity.pass_time();
    }
}
