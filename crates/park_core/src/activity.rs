//! Activities: untimed dwell locations (shows, food, merchandise).
//!
//! An activity has no queue and no capacity; each visitor gets a private
//! remaining-dwell counter sampled at entry. Agents surface when the
//! counter reaches zero, or immediately via [`Activity::force_exit`] when
//! the orchestrator pulls a browsing agent onto a ride.

use std::collections::HashMap;

use bevy_ecs::prelude::Resource;
use rand::Rng;

use crate::distributions::sample_normal;
use crate::ecs::{ActivityId, AgentId, AreaId};
use crate::scenario::ActivitySpec;

#[derive(Debug, Clone)]
struct Visitor {
    agent: AgentId,
    remaining: u32,
}

#[derive(Debug, Clone)]
pub struct Activity {
    pub name: String,
    pub park_area: AreaId,
    pub popularity: u32,
    /// Mean dwell in minutes.
    pub mean_time: u32,
    visitors: Vec<Visitor>,
}

impl Activity {
    pub fn new(spec: &ActivitySpec, park_area: AreaId) -> Self {
        Self {
            name: spec.name.clone(),
            park_area,
            popularity: spec.popularity,
            mean_time: spec.mean_time,
            visitors: Vec::new(),
        }
    }

    pub fn visitor_count(&self) -> usize {
        self.visitors.len()
    }

    pub fn visitor_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.visitors.iter().map(|visitor| visitor.agent)
    }

    /// Record an entry and sample the visitor's remaining dwell.
    ///
    /// The dwell is drawn around the activity's mean and capped at the
    /// earliest pending expedited return so a browsing pass holder normally
    /// surfaces in time to travel; `force_exit` stays the backstop when the
    /// window estimate was too optimistic.
    pub fn add_visitor<R: Rng>(
        &mut self,
        agent: AgentId,
        rng: &mut R,
        pending_returns: &[i32],
    ) -> u32 {
        let mean = self.mean_time as f64;
        let mut dwell = sample_normal(rng, mean, mean / 4.0).round().max(1.0) as u32;
        if let Some(earliest) = pending_returns
            .iter()
            .filter(|delay| **delay > 0)
            .min()
        {
            dwell = dwell.min((*earliest as u32).max(1));
        }
        self.visitors.push(Visitor { agent, remaining: dwell });
        dwell
    }

    /// Yield agents whose dwell has run out, removing them.
    pub fn step(&mut self) -> Vec<AgentId> {
        let mut exiting = Vec::new();
        self.visitors.retain(|visitor| {
            if visitor.remaining == 0 {
                exiting.push(visitor.agent);
                false
            } else {
                true
            }
        });
        exiting
    }

    /// Remove a visitor immediately.
    pub fn force_exit(&mut self, agent: AgentId) {
        let Some(index) = self.visitors.iter().position(|visitor| visitor.agent == agent) else {
            panic!("agent {agent} forced out of {} without being there", self.name);
        };
        self.visitors.remove(index);
    }

    /// Pass one minute of dwell for every visitor.
    pub fn pass_time(&mut self) {
        for visitor in &mut self.visitors {
            visitor.remaining = visitor.remaining.saturating_sub(1);
        }
    }
}

/// All activities, indexed by [`ActivityId`] in ascending popularity order.
#[derive(Debug, Default, Resource)]
pub struct ActivityRegistry {
    activities: Vec<Activity>,
    by_name: HashMap<String, ActivityId>,
}

impl ActivityRegistry {
    pub fn push(&mut self, activity: Activity) -> ActivityId {
        let id = self.activities.len();
        self.by_name.insert(activity.name.clone(), id);
        self.activities.push(activity);
        id
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn get(&self, id: ActivityId) -> &Activity {
        &self.activities[id]
    }

    pub fn get_mut(&mut self, id: ActivityId) -> &mut Activity {
        &mut self.activities[id]
    }

    pub fn id_of(&self, name: &str) -> Option<ActivityId> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Activity> {
        self.activities.iter_mut()
    }
}
