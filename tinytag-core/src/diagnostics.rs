//! Diagnostic counters
//!
//! Nothing in the control loop is fatal; every degraded path increments a
//! counter here instead. A [`DiagnosticsSnapshot`] can be encoded with
//! postcard for telemetry.

use serde::{Deserialize, Serialize};

use crate::state::OperatingState;

/// Upper bound on the encoded size of a [`DiagnosticsSnapshot`]
pub const MAX_SNAPSHOT_BLOB: usize = 64;

/// Saturating event counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    /// State changes taken
    pub transitions: u32,
    /// Inputs the current state does not accept
    pub ignored_inputs: u32,
    /// Radio events stamped with an abandoned generation
    pub stale_events: u32,
    /// Repeated stack notifications collapsed within one tick
    pub duplicate_events: u32,
    /// Notifications lost to a full mailbox or backlog
    pub mailbox_overflows: u32,
    pub sensor_read_failures: u32,
    /// Times the sensor was declared unavailable
    pub sensor_unavailable: u32,
    pub radio_command_failures: u32,
    pub led_commands: u32,
    pub timer_reconfigs: u32,
}

impl Diagnostics {
    pub const fn new() -> Self {
        Self {
            transitions: 0,
            ignored_inputs: 0,
            stale_events: 0,
            duplicate_events: 0,
            mailbox_overflows: 0,
            sensor_read_failures: 0,
            sensor_unavailable: 0,
            radio_command_failures: 0,
            led_commands: 0,
            timer_reconfigs: 0,
        }
    }
}

/// Increment a counter without wrapping
pub(crate) fn bump(counter: &mut u32) {
    *counter = counter.saturating_add(1);
}

/// Point-in-time view of the tag for telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiagnosticsSnapshot {
    pub state: OperatingState,
    pub fault: bool,
    pub counters: Diagnostics,
}

impl DiagnosticsSnapshot {
    /// Encode as a postcard blob
    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> Option<&'a mut [u8]> {
        postcard::to_slice(self, buf).ok()
    }

    /// Decode a postcard blob
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        postcard::from_bytes(bytes).ok()
    }
}
