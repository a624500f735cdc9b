//! Estimates phase: refresh posted waits and expedited return windows.
//!
//! Runs before the decision phase so every agent deciding this minute sees
//! the same start-of-tick estimates.

use bevy_ecs::prelude::{Res, ResMut};

use crate::attraction::AttractionRegistry;
use crate::clock::ParkClock;

pub fn estimates_system(clock: Res<ParkClock>, mut attractions: ResMut<AttractionRegistry>) {
    for attraction in attractions.iter_mut() {
        attraction.update_wait_times();
        attraction.update_exp_return_window(clock.now(), clock.park_close());
    }
}
