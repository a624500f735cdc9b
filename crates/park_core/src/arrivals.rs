//! Arrival schedule: per-minute Poisson arrivals derived from hourly
//! percentages.
//!
//! Each labeled hour contributes a fixed percent of the day's visitors;
//! its 60 minute slots are drawn from Poisson(hourly total / 60) with a
//! fresh RNG seeded `base_seed + hour`, keeping hours independent yet
//! reproducible. `perfect_arrivals` then nudges random nonzero slots until
//! the day total matches the configured count exactly.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::MINUTES_PER_HOUR;
use crate::distributions::sample_poisson;
use crate::scenario::ScenarioError;

#[derive(Debug, Clone, PartialEq, Eq, Resource)]
pub struct ArrivalSchedule {
    per_minute: Vec<u32>,
    next_agent: usize,
}

impl ArrivalSchedule {
    /// Build the day's schedule from ordered `(hour label, percent)` pairs.
    pub fn generate(
        hourly_percents: &[(String, u32)],
        total_daily_agents: u32,
        perfect_arrivals: bool,
        seed: u64,
    ) -> Result<Self, ScenarioError> {
        let percent_sum: u32 = hourly_percents.iter().map(|(_, pct)| pct).sum();
        if percent_sum != 100 {
            return Err(ScenarioError::HourlyPercents { got: percent_sum });
        }
        if hourly_percents.len() > 24 {
            return Err(ScenarioError::TooManyOperatingHours {
                got: hourly_percents.len(),
            });
        }
        match hourly_percents.last() {
            Some((_, pct)) if *pct != 0 => {
                return Err(ScenarioError::ClosingHourArrivals { got: *pct });
            }
            _ => {}
        }

        let mut per_minute = Vec::with_capacity(hourly_percents.len() * MINUTES_PER_HOUR as usize);
        for (hour, (_, pct)) in hourly_percents.iter().enumerate() {
            let hour_agents = total_daily_agents as f64 * *pct as f64 * 0.01;
            let lambda = hour_agents / MINUTES_PER_HOUR as f64;
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(hour as u64));
            for _ in 0..MINUTES_PER_HOUR {
                per_minute.push(sample_poisson(&mut rng, lambda));
            }
        }

        if perfect_arrivals {
            let mut rng = StdRng::seed_from_u64(seed);
            let actual: i64 = per_minute.iter().map(|count| *count as i64).sum();
            let dif = actual - total_daily_agents as i64;
            for _ in 0..dif.abs() {
                let candidates: Vec<usize> = per_minute
                    .iter()
                    .enumerate()
                    .filter(|(_, count)| **count > 0)
                    .map(|(minute, _)| minute)
                    .collect();
                let minute = if candidates.is_empty() {
                    // Degenerate draw of all-zero minutes: spread the
                    // remainder over the open day.
                    let open_minutes = per_minute.len() - MINUTES_PER_HOUR as usize;
                    rng.gen_range(0..open_minutes.max(1))
                } else {
                    candidates[rng.gen_range(0..candidates.len())]
                };
                if dif > 0 {
                    per_minute[minute] -= 1;
                } else {
                    per_minute[minute] += 1;
                }
            }
            debug_assert_eq!(
                per_minute.iter().map(|count| *count as i64).sum::<i64>(),
                total_daily_agents as i64
            );
        }

        Ok(Self {
            per_minute,
            next_agent: 0,
        })
    }

    /// Schedule with explicit per-minute counts (used by collaborators that
    /// replay a recorded day rather than drawing one).
    pub fn from_minutes(per_minute: Vec<u32>) -> Self {
        Self {
            per_minute,
            next_agent: 0,
        }
    }

    pub fn arrivals_at(&self, minute: u32) -> u32 {
        self.per_minute
            .get(minute as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Day total over every minute slot.
    pub fn total(&self) -> u32 {
        self.per_minute.iter().sum()
    }

    /// Arrivals admitted so far minus the ones still waiting to enter.
    pub fn admitted(&self) -> usize {
        self.next_agent
    }

    pub fn operating_hours(&self) -> u32 {
        self.per_minute.len() as u32 / MINUTES_PER_HOUR
    }

    /// Hand out the agent-id range that enters at `minute`, advancing the
    /// admission cursor.
    pub fn admit(&mut self, minute: u32) -> std::ops::Range<usize> {
        let count = self.arrivals_at(minute) as usize;
        let start = self.next_agent;
        self.next_agent += count;
        start..self.next_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(percents: &[u32]) -> Vec<(String, u32)> {
        percents
            .iter()
            .enumerate()
            .map(|(hour, pct)| (format!("{hour}:00"), *pct))
            .collect()
    }

    #[test]
    fn percents_must_sum_to_one_hundred() {
        let err = ArrivalSchedule::generate(&hours(&[50, 40, 0]), 100, false, 1).unwrap_err();
        assert_eq!(err, ScenarioError::HourlyPercents { got: 90 });
    }

    #[test]
    fn closing_hour_must_be_empty() {
        let err = ArrivalSchedule::generate(&hours(&[50, 50]), 100, false, 1).unwrap_err();
        assert_eq!(err, ScenarioError::ClosingHourArrivals { got: 50 });
    }

    #[test]
    fn day_longer_than_24_hours_is_rejected() {
        let mut percents = vec![4u32; 25];
        percents[24] = 0;
        percents[0] = 8;
        let err = ArrivalSchedule::generate(&hours(&percents), 100, false, 1).unwrap_err();
        assert_eq!(err, ScenarioError::TooManyOperatingHours { got: 25 });
    }

    #[test]
    fn perfect_arrivals_hits_the_exact_total() {
        let percents = hours(&[10, 20, 17, 20, 15, 10, 1, 5, 1, 1, 0, 0, 0]);
        let schedule = ArrivalSchedule::generate(&percents, 5000, true, 5).unwrap();
        assert_eq!(schedule.total(), 5000);
        assert_eq!(schedule.operating_hours(), 13);
    }

    #[test]
    fn same_seed_reproduces_the_schedule() {
        let percents = hours(&[60, 40, 0]);
        let a = ArrivalSchedule::generate(&percents, 800, true, 42).unwrap();
        let b = ArrivalSchedule::generate(&percents, 800, true, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_agents_yield_an_empty_day() {
        let schedule = ArrivalSchedule::generate(&hours(&[100, 0]), 0, true, 9).unwrap();
        assert_eq!(schedule.total(), 0);
        assert_eq!(schedule.arrivals_at(30), 0);
    }

    #[test]
    fn admission_cursor_walks_the_id_space() {
        let mut schedule = ArrivalSchedule::from_minutes(vec![2, 0, 3]);
        assert_eq!(schedule.admit(0), 0..2);
        assert_eq!(schedule.admit(1), 2..2);
        assert_eq!(schedule.admit(2), 2..5);
        assert_eq!(schedule.admitted(), 5);
    }
}
