//! Tick phases: the ordered sweeps that make up one simulated minute.
//!
//! Each phase is a system; the runner chains them so that within a tick:
//!
//! - decisions read wait estimates recomputed earlier in the same tick,
//! - attraction steps read queues after this tick's travel arrivals
//!   committed (a ride dispatching at minute `t` reloads from queues that
//!   already include travelers who arrived at `t`),
//! - timers age after all state transitions,
//! - the history snapshot sees the settled end-of-tick state.
//!
//! Systems walk the agent roster in id order rather than iterating
//! queries, so the draws taken from the shared decision stream land on the
//! same agents in every run.

pub mod activity_step;
pub mod admissions;
pub mod attraction_step;
pub mod commit;
pub mod decision;
pub mod estimates;
pub mod snapshot;
pub mod timers;
