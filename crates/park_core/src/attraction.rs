//! Attractions: ride queues with fixed throughput, batch loading, and a
//! self-tuning expedited return window.
//!
//! A ride operates in whole cycles: every `run_time` minutes it expels all
//! riders and reloads from the expedited queue head, then the standby queue
//! head. Cycle capacity stays real-valued (`hourly_throughput * run_time /
//! 60`) so fractional throughput aggregates across cycles without drift;
//! floors are applied only at the points the estimators and the loader
//! call for them.

use std::collections::HashMap;
use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;

use crate::ecs::{AgentId, AreaId, AttractionId};
use crate::scenario::AttractionSpec;

/// Whether an attraction still issues expedited passes today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone)]
pub struct Attraction {
    pub name: String,
    pub park_area: AreaId,
    /// Minutes per ride cycle.
    pub run_time: u32,
    pub hourly_throughput: u32,
    pub popularity: u32,
    pub child_eligible: bool,
    pub adult_eligible: bool,
    pub expedited_queue: bool,
    pub exp_queue_ratio: f64,
    capacity: f64,
    queue: VecDeque<AgentId>,
    exp_queue: VecDeque<AgentId>,
    riders: Vec<AgentId>,
    run_time_remaining: u32,
    wait_time: u32,
    exp_wait_time: u32,
    exp_return_time: u32,
    pass_status: PassStatus,
    passes_distributed: u32,
    passes_redeemed: u32,
    passes_skipped: u32,
}

impl Attraction {
    pub fn new(spec: &AttractionSpec, park_area: AreaId) -> Self {
        let capacity = spec.hourly_throughput as f64 * spec.run_time as f64 / 60.0;
        let pass_status = if spec.expedited_queue_ratio > 0.0 {
            PassStatus::Open
        } else {
            PassStatus::Closed
        };
        Self {
            name: spec.name.clone(),
            park_area,
            run_time: spec.run_time,
            hourly_throughput: spec.hourly_throughput,
            popularity: spec.popularity,
            child_eligible: spec.child_eligible,
            adult_eligible: spec.adult_eligible,
            expedited_queue: spec.expedited_queue,
            exp_queue_ratio: spec.expedited_queue_ratio,
            capacity,
            queue: VecDeque::new(),
            exp_queue: VecDeque::new(),
            riders: Vec::new(),
            run_time_remaining: 0,
            wait_time: 0,
            exp_wait_time: 0,
            exp_return_time: 0,
            pass_status,
            passes_distributed: 0,
            passes_redeemed: 0,
            passes_skipped: 0,
        }
    }

    /// Riders per cycle, real-valued.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Posted standby wait in minutes.
    pub fn wait_time(&self) -> u32 {
        self.wait_time
    }

    /// Posted expedited wait in minutes.
    pub fn exp_wait_time(&self) -> u32 {
        self.exp_wait_time
    }

    /// Absolute minute offered to the next pass taker.
    pub fn exp_return_time(&self) -> u32 {
        self.exp_return_time
    }

    pub fn pass_status(&self) -> PassStatus {
        self.pass_status
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn exp_queue_len(&self) -> usize {
        self.exp_queue.len()
    }

    pub fn queue_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.queue.iter().copied()
    }

    pub fn exp_queue_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.exp_queue.iter().copied()
    }

    pub fn riders(&self) -> &[AgentId] {
        &self.riders
    }

    pub fn run_time_remaining(&self) -> u32 {
        self.run_time_remaining
    }

    pub fn passes_distributed(&self) -> u32 {
        self.passes_distributed
    }

    pub fn passes_redeemed(&self) -> u32 {
        self.passes_redeemed
    }

    pub fn passes_skipped(&self) -> u32 {
        self.passes_skipped
    }

    pub fn add_to_queue(&mut self, agent: AgentId) {
        self.queue.push_back(agent);
    }

    /// FIFO append to the expedited queue; returns the posted expedited wait.
    pub fn add_to_exp_queue(&mut self, agent: AgentId) -> u32 {
        self.exp_queue.push_back(agent);
        self.exp_wait_time
    }

    /// Record a pass issuance.
    pub fn remove_pass(&mut self) {
        self.passes_distributed += 1;
    }

    /// Record a pass redeemed on boarding.
    pub fn redeem_pass(&mut self) {
        self.passes_redeemed += 1;
    }

    /// Record a pass abandoned by an agent leaving the park.
    pub fn skip_pass(&mut self) {
        self.passes_skipped += 1;
    }

    /// Recompute posted wait estimates assuming saturated queues served at
    /// theoretical capacity. Floor division over whole cycles; the capacity
    /// keeps its real value inside the division.
    pub fn update_wait_times(&mut self) {
        if self.expedited_queue {
            let standby_seats = self.capacity * (1.0 - self.exp_queue_ratio);
            let exp_seats = self.capacity * self.exp_queue_ratio;
            if standby_seats > 0.0 {
                self.wait_time = (self.queue.len() as f64 / standby_seats).floor() as u32
                    * self.run_time
                    + self.run_time_remaining;
            } else {
                self.wait_time = self.run_time_remaining;
            }
            if exp_seats > 0.0 {
                self.exp_wait_time = (self.exp_queue.len() as f64 / exp_seats).floor() as u32
                    * self.run_time
                    + self.run_time_remaining;
            }
        } else {
            self.wait_time = (self.queue.len() as f64 / self.capacity).floor() as u32
                * self.run_time
                + self.run_time_remaining;
        }
    }

    /// Recompute the return time offered to the next pass taker.
    ///
    /// The window never decreases and always lands on a 5-minute boundary
    /// strictly greater than `time`. Once the earliest postable window
    /// passes `park_close - 60`, no more passes are issued today.
    pub fn update_exp_return_window(&mut self, time: u32, park_close: u32) {
        if !self.expedited_queue || self.exp_queue_ratio <= 0.0 {
            return;
        }
        let unredeemed = self.passes_distributed as i64
            - self.passes_redeemed as i64
            - self.passes_skipped as i64;
        let minutes_to_process =
            unredeemed as f64 * self.run_time as f64 / (self.capacity * self.exp_queue_ratio);
        let est_clear = time as f64 + minutes_to_process;
        let next_five = time + (5 - time % 5);
        let floor_post = next_five.max(self.exp_return_time);
        let min_post = est_clear.max(floor_post as f64);
        let max_post = park_close.saturating_sub(60);
        if min_post > max_post as f64 {
            self.pass_status = PassStatus::Closed;
        } else if est_clear < floor_post as f64 {
            self.exp_return_time = floor_post;
        } else {
            // Snap up to the next 5-minute boundary strictly past the estimate.
            self.exp_return_time = ((est_clear / 5.0).floor() as u32 + 1) * 5;
        }
    }

    /// Run one cycle boundary if the current cycle has finished: expel all
    /// riders, load the expedited queue head up to its seat share, give any
    /// unused expedited seats back to standby, and restart the cycle.
    /// Returns `(exiting, loaded)` agent ids; both empty mid-cycle.
    pub fn step(&mut self) -> (Vec<AgentId>, Vec<AgentId>) {
        if self.run_time_remaining != 0 {
            return (Vec::new(), Vec::new());
        }

        let exiting = std::mem::take(&mut self.riders);
        self.run_time_remaining = self.run_time;

        let max_exp = (self.capacity * self.exp_queue_ratio) as usize;
        let max_std = if self.exp_queue.len() < max_exp {
            (self.capacity - self.exp_queue.len() as f64) as usize
        } else {
            (self.capacity - max_exp as f64) as usize
        };

        let exp_take = max_exp.min(self.exp_queue.len());
        self.riders.extend(self.exp_queue.drain(..exp_take));
        let std_take = max_std.min(self.queue.len());
        self.riders.extend(self.queue.drain(..std_take));

        (exiting, self.riders.clone())
    }

    /// Pass one minute of ride time.
    pub fn pass_time(&mut self) {
        self.run_time_remaining = self.run_time_remaining.saturating_sub(1);
    }
}

/// All attractions, indexed by [`AttractionId`] in ascending popularity
/// order; the name map exists for I/O only.
#[derive(Debug, Default, Resource)]
pub struct AttractionRegistry {
    attractions: Vec<Attraction>,
    by_name: HashMap<String, AttractionId>,
}

impl AttractionRegistry {
    pub fn push(&mut self, attraction: Attraction) -> AttractionId {
        let id = self.attractions.len();
        self.by_name.insert(attraction.name.clone(), id);
        self.attractions.push(attraction);
        id
    }

    pub fn len(&self) -> usize {
        self.attractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attractions.is_empty()
    }

    pub fn get(&self, id: AttractionId) -> &Attraction {
        &self.attractions[id]
    }

    pub fn get_mut(&mut self, id: AttractionId) -> &mut Attraction {
        &mut self.attractions[id]
    }

    pub fn id_of(&self, name: &str) -> Option<AttractionId> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attraction> {
        self.attractions.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Attraction> {
        self.attractions.iter_mut()
    }
}
