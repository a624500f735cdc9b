//! Park history: time-indexed metrics capture.
//!
//! One sample per series per minute, pushed by the snapshot phase, plus
//! the global pass counters. The reporting collaborator consumes this
//! resource as-is; the day-summary helpers cover the aggregations it asks
//! for most.

use bevy_ecs::prelude::Resource;

use crate::ecs::{ActivityId, AttractionId};

/// Per-attraction minute series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttractionSeries {
    pub queue_length: Vec<u32>,
    pub queue_wait_time: Vec<u32>,
    pub exp_queue_length: Vec<u32>,
    pub exp_queue_wait_time: Vec<u32>,
    pub exp_return_time: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Resource)]
pub struct ParkHistory {
    pub attractions: Vec<AttractionSeries>,
    /// Visitor headcount per activity per minute.
    pub activity_visitors: Vec<Vec<u32>>,
    pub total_active_agents: Vec<u32>,
    pub total_left_agents: Vec<u32>,
    /// Running count of agents who have left, snapshotted each minute.
    pub left_agents: u32,
    pub distributed_passes: u32,
    pub redeemed_passes: u32,
}

impl ParkHistory {
    pub fn new(attraction_count: usize, activity_count: usize) -> Self {
        Self {
            attractions: vec![AttractionSeries::default(); attraction_count],
            activity_visitors: vec![Vec::new(); activity_count],
            ..Self::default()
        }
    }

    /// Minutes recorded so far.
    pub fn recorded_minutes(&self) -> usize {
        self.total_active_agents.len()
    }

    /// Mean posted standby wait for an attraction through minute `through`.
    pub fn average_queue_wait(&self, id: AttractionId, through: u32) -> f64 {
        Self::average(&self.attractions[id].queue_wait_time, through)
    }

    /// Mean posted expedited wait for an attraction through minute `through`.
    pub fn average_exp_queue_wait(&self, id: AttractionId, through: u32) -> f64 {
        Self::average(&self.attractions[id].exp_queue_wait_time, through)
    }

    /// Mean visitor headcount for an activity through minute `through`.
    pub fn average_activity_visitors(&self, id: ActivityId, through: u32) -> f64 {
        Self::average(&self.activity_visitors[id], through)
    }

    fn average(series: &[u32], through: u32) -> f64 {
        let window = &series[..series.len().min(through as usize + 1)];
        if window.is_empty() {
            return 0.0;
        }
        window.iter().map(|value| *value as f64).sum::<f64>() / window.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_cover_only_the_requested_window() {
        let mut history = ParkHistory::new(1, 0);
        history.attractions[0].queue_wait_time = vec![0, 10, 20, 90];
        assert_eq!(history.average_queue_wait(0, 2), 10.0);
        assert_eq!(history.average_queue_wait(0, 100), 30.0);
    }

    #[test]
    fn empty_series_average_is_zero() {
        let history = ParkHistory::new(1, 1);
        assert_eq!(history.average_queue_wait(0, 10), 0.0);
        assert_eq!(history.average_activity_visitors(0, 10), 0.0);
    }
}
