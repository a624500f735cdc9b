//! # Theme-Park Day Simulation Core
//!
//! A discrete-event, minute-step agent-based simulator of a theme-park day.
//!
//! ## Overview
//!
//! This crate provides the core simulation engine, including:
//!
//! - **Minute Clock**: Fixed-step timeline over one operating day
//! - **ECS Framework**: Entity Component System for agent state management
//! - **Attractions**: Ride queues with batch loading and a self-tuning
//!   expedited return window
//! - **Agent Decisions**: Utility-weighted softmax selection with
//!   eligibility filters and pass-seeking logic
//! - **History**: Per-minute metrics capture for every attraction,
//!   activity, and the park as a whole
//!
//! ## Key Concepts
//!
//! - **Tick**: One simulated minute, executed as a strict sequence of
//!   phase systems so every agent observes the same start-of-tick state
//! - **Deterministic**: Every random draw is seeded from the scenario seed
//!   plus the subject id (and time where applicable), so replays are
//!   bit-identical
//! - **Scalable**: Indexed registries support thousands of concurrent agents
//!
//! ## Example
//!
//! ```rust,no_run
//! use bevy_ecs::prelude::World;
//! use park_core::scenario::{build_scenario, ScenarioParams};
//! use park_core::runner::{park_schedule, run_day};
//!
//! let mut world = World::new();
//! build_scenario(&mut world, ScenarioParams::default().with_seed(42)).unwrap();
//!
//! let mut schedule = park_schedule();
//! let minutes = run_day(&mut world, &mut schedule);
//! ```

pub mod activity;
pub mod archetypes;
pub mod arrivals;
pub mod attraction;
pub mod clock;
pub mod distributions;
pub mod ecs;
pub mod map;
pub mod runner;
pub mod scenario;
pub mod systems;
pub mod telemetry;

#[cfg(test)]
pub mod test_helpers;
