//! Entity Component System: components and state enums for park visitors.
//!
//! This module defines the per-agent data structures of the simulation:
//!
//! - **Components**: `Agent`, `Behavior`, `PassWallet`, `VisitHistory`, `AgentLog`
//! - **State Enums**: `AgentAction`, `Location`, `Destination`, `AgeClass`
//!
//! Components are attached to agent entities in the ECS world; the phase
//! systems query and mutate them in roster order. Attractions and
//! activities live in indexed registries, not entities, so agents refer to
//! them by integer id.

use bevy_ecs::prelude::{Component, Entity, Resource};

pub type AgentId = usize;
pub type AttractionId = usize;
pub type ActivityId = usize;
pub type AreaId = usize;

/// Agent entities in arrival order; index equals [`AgentId`]. Systems walk
/// this roster instead of raw queries so the per-tick processing order is
/// the same on every run.
#[derive(Debug, Default, Resource)]
pub struct AgentRoster(pub Vec<Entity>);

/// Demographic class restricting which attractions an agent will board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeClass {
    /// Skips child-only attractions.
    NoChildRides,
    /// Skips adult-only attractions.
    NoAdultRides,
    NoPreference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    OutsidePark,
    Gate,
    Attraction(AttractionId),
    Activity(ActivityId),
}

/// Where a traveling agent is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Gate,
    Attraction(AttractionId),
    Activity(ActivityId),
}

/// Closed set of agent actions; the orchestrator's commit phase matches on
/// this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentAction {
    Idling,
    Traveling(Destination),
    Queueing(AttractionId),
    Riding(AttractionId),
    Browsing(ActivityId),
    GettingPass(AttractionId),
    RedeemingPass(AttractionId),
    Leaving,
}

/// One expedited pass: the attraction it is for and the minutes until its
/// return window opens. The delay keeps counting down past zero; a
/// non-positive value signals the pass is ready to redeem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pass {
    pub attraction: AttractionId,
    pub return_delay: i32,
}

/// Ordered expedited-pass holdings. Removal is by attraction id with
/// first-match semantics, so the earliest-held pass wins when an agent
/// holds duplicates.
#[derive(Debug, Clone, Default, Component)]
pub struct PassWallet {
    passes: Vec<Pass>,
}

impl PassWallet {
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pass> {
        self.passes.iter()
    }

    pub fn holds(&self, attraction: AttractionId) -> bool {
        self.passes.iter().any(|pass| pass.attraction == attraction)
    }

    pub fn push(&mut self, pass: Pass) {
        self.passes.push(pass);
    }

    /// Earliest-held pass whose return window has opened.
    pub fn first_due(&self) -> Option<AttractionId> {
        self.passes
            .iter()
            .find(|pass| pass.return_delay <= 0)
            .map(|pass| pass.attraction)
    }

    /// Remove the earliest-held pass for `attraction`, if any.
    pub fn remove_first(&mut self, attraction: AttractionId) -> Option<Pass> {
        let index = self
            .passes
            .iter()
            .position(|pass| pass.attraction == attraction)?;
        Some(self.passes.remove(index))
    }

    /// Surrender every held pass (used when the agent leaves the park).
    pub fn take_all(&mut self) -> Vec<Pass> {
        std::mem::take(&mut self.passes)
    }

    /// Age every held pass by one minute; delays keep counting past zero.
    pub fn age(&mut self) {
        for pass in &mut self.passes {
            pass.return_delay -= 1;
        }
    }
}

/// Per-agent visit counters, indexed by attraction / activity id.
#[derive(Debug, Clone, Component)]
pub struct VisitHistory {
    pub rides_completed: Vec<u32>,
    pub activity_visits: Vec<u32>,
    pub activity_minutes: Vec<u32>,
}

impl VisitHistory {
    pub fn new(attraction_count: usize, activity_count: usize) -> Self {
        Self {
            rides_completed: vec![0; attraction_count],
            activity_visits: vec![0; activity_count],
            activity_minutes: vec![0; activity_count],
        }
    }

    pub fn total_rides(&self) -> u32 {
        self.rides_completed.iter().sum()
    }
}

/// Running text log of an agent's day; byte-stable across replays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Component)]
pub struct AgentLog(pub String);

impl AgentLog {
    fn note(&mut self, line: String) {
        self.0.push_str(&line);
        self.0.push(' ');
    }
}

/// Static behavior parameters, fixed at scenario build time.
#[derive(Debug, Clone, Component)]
pub struct Behavior {
    pub archetype: String,
    pub age_class: AgeClass,
    /// Preferred total stay in minutes, drawn once per agent.
    pub stay_time_preference: u32,
    pub allow_repeats: bool,
    /// Probability of preferring an attraction over an activity.
    pub attraction_preference: f64,
    /// Base queue patience in minutes.
    pub wait_threshold: u32,
    /// Exponential wait discount applied to utility.
    pub wait_discount_beta: f64,
    pub exp_pass_ability: bool,
    /// Posted wait beyond which the agent seeks an expedited pass.
    pub exp_wait_threshold: u32,
    /// Maximum simultaneously held expedited passes.
    pub exp_limit: usize,
}

/// Volatile per-visitor state.
#[derive(Debug, Clone, Component)]
pub struct Agent {
    pub id: AgentId,
    pub within_park: bool,
    pub arrival_time: Option<u32>,
    pub exit_time: Option<u32>,
    pub location: Location,
    pub park_area: Option<AreaId>,
    pub action: AgentAction,
    pub time_to_destination: u32,
    pub time_spent_at_location: u32,
}

impl Agent {
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            within_park: false,
            arrival_time: None,
            exit_time: None,
            location: Location::OutsidePark,
            park_area: None,
            action: AgentAction::Idling,
            time_to_destination: 0,
            time_spent_at_location: 0,
        }
    }

    pub fn arrive_at_park(&mut self, time: u32, entrance: AreaId, log: &mut AgentLog) {
        self.within_park = true;
        self.arrival_time = Some(time);
        self.location = Location::Gate;
        self.park_area = Some(entrance);
        self.action = AgentAction::Idling;
        self.time_spent_at_location = 0;
        log.note(format!("Agent arrived at park at time {time}."));
    }

    /// Record a decided action and the travel delay before it commits.
    pub fn set_destination(&mut self, action: AgentAction, travel_time: u32) {
        self.action = action;
        self.time_to_destination = travel_time;
    }

    pub fn leave_park(&mut self, time: u32, log: &mut AgentLog) {
        self.within_park = false;
        self.location = Location::OutsidePark;
        self.park_area = None;
        self.action = AgentAction::Idling;
        self.time_to_destination = 0;
        self.exit_time = Some(time);
        self.time_spent_at_location = 0;
        log.note(format!("Agent left park at {time}."));
    }

    pub fn enter_queue(&mut self, attraction: AttractionId, area: AreaId, time: u32, name: &str, log: &mut AgentLog) {
        self.location = Location::Attraction(attraction);
        self.park_area = Some(area);
        self.action = AgentAction::Queueing(attraction);
        self.time_to_destination = 0;
        self.time_spent_at_location = 0;
        log.note(format!("Agent entered queue for {name} at time {time}."));
    }

    pub fn enter_exp_queue(&mut self, attraction: AttractionId, area: AreaId, time: u32, name: &str, log: &mut AgentLog) {
        self.location = Location::Attraction(attraction);
        self.park_area = Some(area);
        self.action = AgentAction::Queueing(attraction);
        self.time_to_destination = 0;
        self.time_spent_at_location = 0;
        log.note(format!("Agent entered exp queue for {name} at time {time}."));
    }

    pub fn begin_activity(&mut self, activity: ActivityId, area: AreaId, time: u32, name: &str, log: &mut AgentLog) {
        self.location = Location::Activity(activity);
        self.park_area = Some(area);
        self.action = AgentAction::Browsing(activity);
        self.time_to_destination = 0;
        self.time_spent_at_location = 0;
        log.note(format!("Agent visited the activity {name} at time {time}."));
    }

    /// Take possession of an expedited pass at the attraction and return to
    /// idling with the assigned return delay on record.
    #[allow(clippy::too_many_arguments)]
    pub fn receive_pass(
        &mut self,
        attraction: AttractionId,
        area: AreaId,
        return_delay: u32,
        time: u32,
        name: &str,
        wallet: &mut PassWallet,
        log: &mut AgentLog,
    ) {
        self.location = Location::Attraction(attraction);
        self.park_area = Some(area);
        self.action = AgentAction::Idling;
        self.time_to_destination = 0;
        self.time_spent_at_location = 0;
        wallet.push(Pass {
            attraction,
            return_delay: return_delay as i32,
        });
        log.note(format!(
            "Agent picked up an expedited pass for {name} at time {time}."
        ));
        log.note(format!(
            "The expedited queue return time is in {return_delay} minutes."
        ));
    }

    /// Board the ride; redeems a held pass for this attraction if any.
    /// Returns true when a pass was redeemed.
    pub fn boarded_attraction(
        &mut self,
        attraction: AttractionId,
        time: u32,
        name: &str,
        wallet: &mut PassWallet,
        log: &mut AgentLog,
    ) -> bool {
        self.action = AgentAction::Riding(attraction);
        self.time_spent_at_location = 0;
        if wallet.remove_first(attraction).is_some() {
            log.note(format!(
                "Agent boarded {name} and redeemed their expedited queue pass at time {time}."
            ));
            true
        } else {
            log.note(format!("Agent boarded {name} at time {time}."));
            false
        }
    }

    pub fn exited_attraction(
        &mut self,
        attraction: AttractionId,
        time: u32,
        name: &str,
        history: &mut VisitHistory,
        log: &mut AgentLog,
    ) {
        self.action = AgentAction::Idling;
        history.rides_completed[attraction] += 1;
        self.time_spent_at_location = 0;
        log.note(format!("Agent exited {name} at time {time}."));
    }

    pub fn exited_activity(
        &mut self,
        activity: ActivityId,
        time: u32,
        name: &str,
        history: &mut VisitHistory,
        log: &mut AgentLog,
    ) {
        self.action = AgentAction::Idling;
        history.activity_visits[activity] += 1;
        history.activity_minutes[activity] += self.time_spent_at_location;
        self.time_spent_at_location = 0;
        log.note(format!("Agent exited the activity {name} at time {time}."));
    }
}
