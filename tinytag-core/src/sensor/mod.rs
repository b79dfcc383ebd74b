//! Sensor sampling
//!
//! One accelerometer read per timer tick, converted into a [`MotionSample`].

pub mod sample;
pub mod sampler;

pub use sample::{axis_from_registers, AxisCounts, MotionSample, MICRO_G_PER_COUNT, ONE_G_COUNTS};
pub use sampler::{SampleOutcome, Sampler};
