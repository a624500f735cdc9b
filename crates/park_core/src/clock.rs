//! Simulation time: a minute-step park-day timeline.
//!
//! All timestamps are in **minutes since park open**. The clock is advanced
//! by the runner after each tick, outside systems, so every system within a
//! tick observes the same `now`.

use bevy_ecs::prelude::Resource;

/// Minutes per operating hour.
pub const MINUTES_PER_HOUR: u32 = 60;

/// Park clock: current minute, the closing minute, and the simulation
/// horizon (the park keeps cycling rides for one hour past close so queued
/// agents can finish and leave).
#[derive(Debug, Clone, Copy, Resource)]
pub struct ParkClock {
    now: u32,
    park_close: u32,
    horizon: u32,
}

impl ParkClock {
    /// Clock for a day spanning `operating_hours` schedule entries; the
    /// final entry is closing time and contributes no open minutes.
    pub fn new(operating_hours: u32) -> Self {
        Self {
            now: 0,
            park_close: operating_hours.saturating_sub(1) * MINUTES_PER_HOUR,
            horizon: operating_hours * MINUTES_PER_HOUR,
        }
    }

    /// Current simulation time in minutes since open.
    pub fn now(&self) -> u32 {
        self.now
    }

    /// Closing minute: arrivals stop and idle agents head for the gate.
    pub fn park_close(&self) -> u32 {
        self.park_close
    }

    /// Total minutes the simulation runs (one tick each).
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// True once the closing minute has been reached.
    pub fn is_closed(&self) -> bool {
        self.now >= self.park_close
    }

    /// True once every tick of the day has run.
    pub fn day_over(&self) -> bool {
        self.now >= self.horizon
    }

    /// Advance one minute. Called by the runner, never by systems.
    pub fn advance(&mut self) {
        self.now += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_minute_excludes_final_schedule_hour() {
        let clock = ParkClock::new(13);
        assert_eq!(clock.park_close(), 720);
        assert_eq!(clock.horizon(), 780);
    }

    #[test]
    fn closes_exactly_at_closing_minute() {
        let mut clock = ParkClock::new(2);
        assert!(!clock.is_closed());
        for _ in 0..60 {
            clock.advance();
        }
        assert_eq!(clock.now(), 60);
        assert!(clock.is_closed());
        assert!(!clock.day_over());
        for _ in 0..60 {
            clock.advance();
        }
        assert!(clock.day_over());
    }
}
