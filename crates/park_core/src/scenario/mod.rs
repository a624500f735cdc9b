//! Scenario setup: input parameter types, eager validation, and world
//! construction.
//!
//! Configuration faults are caught here, before the first tick; nothing
//! inside the simulation loop validates input.

mod build;
mod error;
mod params;

pub use build::build_scenario;
pub use error::ScenarioError;
pub use params::{
    ActivitySpec, AttractionSpec, DecisionRng, ScenarioParams, SimSeed,
};
