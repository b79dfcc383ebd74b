//! Inputs to and commands from the state machine

use heapless::Vec;

use crate::motion::MotionChangeEvent;
use crate::radio::RadioEvent;

/// Everything that can drive a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Input {
    Motion(MotionChangeEvent),
    Radio(RadioEvent),
    /// Sampler exhausted its failure budget
    SensorUnavailable,
    /// First good read after the sensor was unavailable
    SensorRecovered,
    /// Advertising ran for the configured timeout without a peer
    IdleTimeout,
}

impl From<MotionChangeEvent> for Input {
    fn from(event: MotionChangeEvent) -> Self {
        Input::Motion(event)
    }
}

impl From<RadioEvent> for Input {
    fn from(event: RadioEvent) -> Self {
        Input::Radio(event)
    }
}

/// Fire-and-forget radio command issued after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    StartAdvertising,
    StopAdvertising,
    AcceptConnection,
    DropConnection,
}

impl Command {
    /// Whether issuing this command abandons in-flight radio activity
    pub fn abandons(&self) -> bool {
        matches!(self, Command::StopAdvertising | Command::DropConnection)
    }
}

/// Commands produced by one transition
pub type Commands = Vec<Command, 2>;
