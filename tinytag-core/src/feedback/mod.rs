//! LED feedback and sample cadence
//!
//! [`feedback_for`] is a pure mapping from the operating state to what the
//! tag should show and how often it should sample. [`FeedbackDriver`] turns
//! that into peripheral commands, never repeating one that is already in
//! effect.

pub mod driver;
pub mod pattern;

pub use driver::FeedbackDriver;
pub use pattern::{feedback_for, Feedback, LedPattern, LED_COUNT};
