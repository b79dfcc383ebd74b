//! Motion presence classification
//!
//! Turns the raw sample stream into debounced "motion started" /
//! "motion stopped" events.

pub mod classifier;

pub use classifier::{magnitude, MotionChangeEvent, MotionClassifier};
