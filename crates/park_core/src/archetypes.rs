//! Behavior archetypes: labeled parameter bundles governing stay length,
//! patience, attraction affinity, and age-class distribution.
//!
//! The reference table mirrors a typical spread of park visitors, from
//! ride enthusiasts who stay all day to activity-focused visitors who
//! leave early.

use serde::{Deserialize, Serialize};

use crate::scenario::ScenarioError;

/// Age-class percents of an archetype must sum to 1 within this fuzzy
/// floating-point band.
const AGE_CLASS_SUM_MIN: f64 = 0.98;
const AGE_CLASS_SUM_MAX: f64 = 1.00;

/// Parameters of one behavior archetype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeSpec {
    pub name: String,
    /// Mean preferred stay in minutes; each agent draws around this.
    pub stay_time_preference: u32,
    pub allow_repeats: bool,
    /// Probability in [0, 1] of favoring attractions over activities.
    pub attraction_preference: f64,
    /// Minutes the agent will tolerate in a standby queue.
    pub wait_threshold: u32,
    /// Utility discount per minute of posted wait (stable range 0.98-0.998).
    pub wait_discount_beta: f64,
    pub percent_no_child_rides: f64,
    pub percent_no_adult_rides: f64,
    pub percent_no_preference: f64,
}

impl ArchetypeSpec {
    fn age_class_sum(&self) -> f64 {
        self.percent_no_child_rides + self.percent_no_adult_rides + self.percent_no_preference
    }
}

/// Static table of behavior archetypes, keyed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeTable {
    archetypes: Vec<ArchetypeSpec>,
}

impl ArchetypeTable {
    pub fn new(archetypes: Vec<ArchetypeSpec>) -> Self {
        Self { archetypes }
    }

    pub fn get(&self, name: &str) -> Option<&ArchetypeSpec> {
        self.archetypes.iter().find(|spec| spec.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchetypeSpec> {
        self.archetypes.iter()
    }

    /// Check every archetype's age-class percents sum to 1 within the
    /// fuzzy-float band and give at least one class a positive share.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for spec in &self.archetypes {
            let sum = spec.age_class_sum();
            if !(AGE_CLASS_SUM_MIN..=AGE_CLASS_SUM_MAX).contains(&sum) {
                return Err(ScenarioError::AgeClassSum {
                    name: spec.name.clone(),
                    got: sum,
                });
            }
            if spec.percent_no_child_rides <= 0.0
                && spec.percent_no_adult_rides <= 0.0
                && spec.percent_no_preference <= 0.0
            {
                return Err(ScenarioError::AgeClassUnset {
                    name: spec.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// The reference archetype spread.
    pub fn reference() -> Self {
        Self::new(vec![
            // Stays all day, rides as much as possible, barely minds waiting.
            ArchetypeSpec {
                name: "ride_enthusiast".into(),
                stay_time_preference: 540,
                allow_repeats: true,
                attraction_preference: 0.6,
                wait_threshold: 400,
                wait_discount_beta: 0.9975,
                percent_no_child_rides: 0.18,
                percent_no_adult_rides: 0.02,
                percent_no_preference: 0.8,
            },
            // Rides a lot, visits activities occasionally, waits a while.
            ArchetypeSpec {
                name: "ride_favorer".into(),
                stay_time_preference: 480,
                allow_repeats: true,
                attraction_preference: 0.5,
                wait_threshold: 300,
                wait_discount_beta: 0.9925,
                percent_no_child_rides: 0.2,
                percent_no_adult_rides: 0.2,
                percent_no_preference: 0.6,
            },
            // Long stay, attractions and activities equally, reasonable patience.
            ArchetypeSpec {
                name: "park_tourer".into(),
                stay_time_preference: 420,
                allow_repeats: false,
                attraction_preference: 0.4,
                wait_threshold: 240,
                wait_discount_beta: 0.995,
                percent_no_child_rides: 0.05,
                percent_no_adult_rides: 0.05,
                percent_no_preference: 0.9,
            },
            // Short stay, attractions and activities equally, impatient.
            ArchetypeSpec {
                name: "park_visitor".into(),
                stay_time_preference: 360,
                allow_repeats: false,
                attraction_preference: 0.3,
                wait_threshold: 180,
                wait_discount_beta: 0.9925,
                percent_no_child_rides: 0.3,
                percent_no_adult_rides: 0.3,
                percent_no_preference: 0.4,
            },
            // Short stay, prefers activities, reasonable patience.
            ArchetypeSpec {
                name: "activity_favorer".into(),
                stay_time_preference: 300,
                allow_repeats: false,
                attraction_preference: 0.2,
                wait_threshold: 120,
                wait_discount_beta: 0.99,
                percent_no_child_rides: 0.1,
                percent_no_adult_rides: 0.8,
                percent_no_preference: 0.1,
            },
            // Mostly activities, reasonable patience.
            ArchetypeSpec {
                name: "activity_enthusiast".into(),
                stay_time_preference: 240,
                allow_repeats: false,
                attraction_preference: 0.2,
                wait_threshold: 90,
                wait_discount_beta: 0.9875,
                percent_no_child_rides: 0.0,
                percent_no_adult_rides: 0.9,
                percent_no_preference: 0.1,
            },
        ])
    }
}
