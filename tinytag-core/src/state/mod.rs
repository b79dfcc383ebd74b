//! Connectivity state machine
//!
//! Owns the authoritative operating state. Transitions are an exhaustive
//! match over (state, input) in [`machine::transition`]; the
//! [`ConnectivityMachine`] wrapper adds timers and the stale-event
//! generation around that pure table.

pub mod connectivity;
pub mod events;
pub mod machine;

pub use connectivity::{ConnectivityMachine, Reaction};
pub use events::{Command, Commands, Input};
pub use machine::{transition, Context, OperatingState, Step, TimerAction};
