use thiserror::Error;

/// Configuration faults, raised eagerly at scenario build time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("attraction `{name}` popularity {got} is outside 1..=10")]
    PopularityOutOfRange { name: String, got: u32 },

    #[error("attraction `{name}` expedited queue ratio {got} is outside 0.0..=1.0")]
    ExpQueueRatio { name: String, got: f64 },

    #[error("hourly arrival percents sum to {got}, expected 100")]
    HourlyPercents { got: u32 },

    #[error("arrival schedule spans {got} hours, but the park cannot be open more than 24")]
    TooManyOperatingHours { got: usize },

    #[error("closing hour has nonzero arrivals ({got}%)")]
    ClosingHourArrivals { got: u32 },

    #[error("archetype `{name}` age-class percents sum to {got:.3}, expected 0.98..=1.00")]
    AgeClassSum { name: String, got: f64 },

    #[error("archetype `{name}` gives no age class a positive share")]
    AgeClassUnset { name: String },

    #[error("archetype distribution sums to {got}, expected 100")]
    ArchetypeDistribution { got: u32 },

    #[error("archetype distribution references unknown archetype `{name}`")]
    UnknownArchetype { name: String },

    #[error("unknown park area `{name}` referenced by `{referrer}`")]
    UnknownParkArea { name: String, referrer: String },

    #[error("park map row `{from}` has no travel time to `{to}`")]
    MissingTravelTime { from: String, to: String },
}
