use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::archetypes::ArchetypeTable;

/// One ride as the scenario input describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttractionSpec {
    pub name: String,
    pub park_area: String,
    /// Minutes per ride cycle.
    pub run_time: u32,
    pub hourly_throughput: u32,
    /// 1..=10; drives both agent utility and registry ordering.
    pub popularity: u32,
    pub expedited_queue: bool,
    pub expedited_queue_ratio: f64,
    pub child_eligible: bool,
    pub adult_eligible: bool,
}

/// One dwell location as the scenario input describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySpec {
    pub name: String,
    pub park_area: String,
    pub popularity: u32,
    /// Mean dwell in minutes.
    pub mean_time: u32,
}

/// Scenario seed, exposed to systems that derive per-event RNG streams.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimSeed(pub u64);

/// The process-scoped random stream used for archetype, age-class,
/// activity, and softmax sampling. Per-event draws (stay time, leave
/// decisions, dwell) use fresh streams seeded from [`SimSeed`] instead.
#[derive(Debug, Resource)]
pub struct DecisionRng(pub StdRng);

/// Parameters for building a simulation scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub attractions: Vec<AttractionSpec>,
    pub activities: Vec<ActivitySpec>,
    /// `(area, [(area, minutes)])` rows; the diagonal is the intra-area walk.
    pub park_map: Vec<(String, Vec<(String, u32)>)>,
    pub entrance_park_area: String,
    /// Ordered `(hour label, percent)` pairs summing to 100; the final
    /// entry is park close and must be zero.
    pub hourly_percents: Vec<(String, u32)>,
    pub archetype_table: ArchetypeTable,
    /// `(archetype, weight)` pairs summing to 100.
    pub archetype_distribution: Vec<(String, u32)>,
    pub total_daily_agents: u32,
    /// Force the schedule total to match `total_daily_agents` exactly.
    pub perfect_arrivals: bool,
    /// Share of agents able to acquire expedited passes.
    pub exp_ability_pct: f64,
    /// Posted wait beyond which pass-capable agents seek a pass.
    pub exp_wait_threshold: u32,
    /// Maximum simultaneously held passes per agent.
    pub exp_limit: usize,
    pub seed: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            attractions: default_attractions(),
            activities: default_activities(),
            park_map: default_park_map(),
            entrance_park_area: "Oasis".into(),
            hourly_percents: vec![
                ("10:00 AM".into(), 10),
                ("11:00 AM".into(), 20),
                ("12:00 PM".into(), 17),
                ("1:00 PM".into(), 20),
                ("2:00 PM".into(), 15),
                ("3:00 PM".into(), 10),
                ("4:00 PM".into(), 1),
                ("5:00 PM".into(), 5),
                ("6:00 PM".into(), 1),
                ("7:00 PM".into(), 1),
                ("8:00 PM".into(), 0),
                ("9:00 PM".into(), 0),
                ("10:00 PM".into(), 0),
            ],
            archetype_table: ArchetypeTable::reference(),
            archetype_distribution: vec![
                ("ride_enthusiast".into(), 10),
                ("ride_favorer".into(), 15),
                ("park_tourer".into(), 25),
                ("park_visitor".into(), 30),
                ("activity_favorer".into(), 15),
                ("activity_enthusiast".into(), 5),
            ],
            total_daily_agents: 5000,
            perfect_arrivals: true,
            exp_ability_pct: 0.9,
            exp_wait_threshold: 30,
            exp_limit: 1,
            seed: 0,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_total_daily_agents(mut self, total: u32) -> Self {
        self.total_daily_agents = total;
        self
    }

    pub fn with_perfect_arrivals(mut self, perfect: bool) -> Self {
        self.perfect_arrivals = perfect;
        self
    }

    /// Replace the hourly arrival curve.
    pub fn with_hourly_percents(mut self, percents: Vec<(String, u32)>) -> Self {
        self.hourly_percents = percents;
        self
    }

    /// Cap on simultaneously held expedited passes.
    pub fn with_exp_limit(mut self, limit: usize) -> Self {
        self.exp_limit = limit;
        self
    }

    /// Share of agents with pass-acquisition ability.
    pub fn with_exp_ability_pct(mut self, pct: f64) -> Self {
        self.exp_ability_pct = pct;
        self
    }
}

fn default_attractions() -> Vec<AttractionSpec> {
    vec![
        AttractionSpec {
            name: "Ride of Passage".into(),
            park_area: "Pandora".into(),
            run_time: 7,
            hourly_throughput: 1646,
            popularity: 10,
            expedited_queue: true,
            expedited_queue_ratio: 0.8,
            child_eligible: true,
            adult_eligible: true,
        },
        AttractionSpec {
            name: "Serengeti Safari".into(),
            park_area: "Africa".into(),
            run_time: 20,
            hourly_throughput: 3240,
            popularity: 9,
            expedited_queue: true,
            expedited_queue_ratio: 0.8,
            child_eligible: true,
            adult_eligible: true,
        },
        AttractionSpec {
            name: "Annapurna Adventure".into(),
            park_area: "Asia".into(),
            run_time: 3,
            hourly_throughput: 2040,
            popularity: 8,
            expedited_queue: true,
            expedited_queue_ratio: 0.8,
            child_eligible: false,
            adult_eligible: true,
        },
        AttractionSpec {
            name: "Kaveri Rapids".into(),
            park_area: "Asia".into(),
            run_time: 5,
            hourly_throughput: 2160,
            popularity: 7,
            expedited_queue: true,
            expedited_queue_ratio: 0.8,
            child_eligible: true,
            adult_eligible: true,
        },
        AttractionSpec {
            name: "Agave River Journey".into(),
            park_area: "Pandora".into(),
            run_time: 5,
            hourly_throughput: 1440,
            popularity: 6,
            expedited_queue: true,
            expedited_queue_ratio: 0.8,
            child_eligible: true,
            adult_eligible: true,
        },
        AttractionSpec {
            name: "Dinosaur".into(),
            park_area: "Dinoland USA".into(),
            run_time: 4,
            hourly_throughput: 2520,
            popularity: 5,
            expedited_queue: true,
            expedited_queue_ratio: 0.8,
            child_eligible: false,
            adult_eligible: true,
        },
        AttractionSpec {
            name: "Primeval Hurl".into(),
            park_area: "Dinoland USA".into(),
            run_time: 2,
            hourly_throughput: 1440,
            popularity: 4,
            expedited_queue: true,
            expedited_queue_ratio: 0.8,
            child_eligible: true,
            adult_eligible: true,
        },
        AttractionSpec {
            name: "It's Difficult to Be an Insect".into(),
            park_area: "Discovery Island".into(),
            run_time: 13,
            hourly_throughput: 1985,
            popularity: 3,
            expedited_queue: true,
            expedited_queue_ratio: 0.8,
            child_eligible: true,
            adult_eligible: true,
        },
    ]
}

fn default_activities() -> Vec<ActivitySpec> {
    vec![
        ActivitySpec {
            name: "sightseeing".into(),
            park_area: "Discovery Island".into(),
            popularity: 5,
            mean_time: 5,
        },
        ActivitySpec {
            name: "show".into(),
            park_area: "Discovery Island".into(),
            popularity: 5,
            mean_time: 30,
        },
        ActivitySpec {
            name: "merchandise".into(),
            park_area: "Discovery Island".into(),
            popularity: 5,
            mean_time: 30,
        },
        ActivitySpec {
            name: "food".into(),
            park_area: "Discovery Island".into(),
            popularity: 5,
            mean_time: 45,
        },
    ]
}

fn map_row(from: &str, entries: &[(&str, u32)]) -> (String, Vec<(String, u32)>) {
    (
        from.into(),
        entries
            .iter()
            .map(|(to, minutes)| ((*to).into(), *minutes))
            .collect(),
    )
}

fn default_park_map() -> Vec<(String, Vec<(String, u32)>)> {
    vec![
        map_row(
            "Discovery Island",
            &[
                ("Discovery Island", 1),
                ("Pandora", 5),
                ("Africa", 5),
                ("Asia", 5),
                ("Dinoland USA", 5),
                ("Oasis", 3),
            ],
        ),
        map_row(
            "Pandora",
            &[
                ("Discovery Island", 5),
                ("Pandora", 2),
                ("Africa", 8),
                ("Asia", 10),
                ("Dinoland USA", 10),
                ("Oasis", 8),
            ],
        ),
        map_row(
            "Africa",
            &[
                ("Discovery Island", 5),
                ("Pandora", 8),
                ("Africa", 2),
                ("Asia", 6),
                ("Dinoland USA", 10),
                ("Oasis", 8),
            ],
        ),
        map_row(
            "Asia",
            &[
                ("Discovery Island", 5),
                ("Pandora", 10),
                ("Africa", 6),
                ("Asia", 2),
                ("Dinoland USA", 5),
                ("Oasis", 8),
            ],
        ),
        map_row(
            "Dinoland USA",
            &[
                ("Discovery Island", 5),
                ("Pandora", 10),
                ("Africa", 10),
                ("Asia", 5),
                ("Dinoland USA", 1),
                ("Oasis", 8),
            ],
        ),
        map_row(
            "Oasis",
            &[
                ("Discovery Island", 3),
                ("Pandora", 8),
                ("Africa", 8),
                ("Asia", 8),
                ("Dinoland USA", 8),
                ("Oasis", 1),
            ],
        ),
    ]
}
