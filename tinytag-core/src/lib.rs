//! Board-agnostic control core for the TinyTag tracking tag
//!
//! This crate contains all decision logic that does not depend on
//! specific hardware implementations:
//!
//! - Device capability traits (motion source, radio stack, LEDs, timer)
//! - Sensor sampler with a consecutive-failure budget
//! - Motion classifier (baseline tracking + debounce hysteresis)
//! - Radio mailbox and lifecycle adapter
//! - Connectivity state machine
//! - Feedback driver (LED pattern and sample cadence)
//! - Configuration and diagnostics
//!
//! [`controller::Tag`] ties them together into the per-tick control loop.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod logging;

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod feedback;
pub mod motion;
pub mod radio;
pub mod sensor;
pub mod state;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use controller::Tag;
pub use state::OperatingState;
