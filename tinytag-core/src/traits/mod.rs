//! Device capability traits
//!
//! These traits define the interface between the control core and the
//! peripheral drivers, so the core can run against fakes on the host.

pub mod indicator;
pub mod motion;
pub mod radio;

pub use indicator::{IndicatorSink, SampleTimer};
pub use motion::{MotionSource, RawAxes, SensorBusError};
pub use radio::{RadioError, RadioStack};
