//! Snapshot phase: one history sample per series per minute.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::activity::ActivityRegistry;
use crate::attraction::AttractionRegistry;
use crate::ecs::Agent;
use crate::telemetry::ParkHistory;

pub fn snapshot_system(
    attractions: Res<AttractionRegistry>,
    activities: Res<ActivityRegistry>,
    mut history: ResMut<ParkHistory>,
    agents: Query<&Agent>,
) {
    for (id, attraction) in attractions.iter().enumerate() {
        let series = &mut history.attractions[id];
        series.queue_length.push(attraction.queue_len() as u32);
        series.queue_wait_time.push(attraction.wait_time());
        series.exp_queue_length.push(attraction.exp_queue_len() as u32);
        series.exp_queue_wait_time.push(attraction.exp_wait_time());
        series.exp_return_time.push(attraction.exp_return_time());
    }
    for (id, activity) in activities.iter().enumerate() {
        history.activity_visitors[id].push(activity.visitor_count() as u32);
    }
    let active = agents.iter().filter(|agent| agent.within_park).count() as u32;
    history.total_active_agents.push(active);
    let left = history.left_agents;
    history.total_left_agents.push(left);
}
