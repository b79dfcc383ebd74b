//! Fake peripherals for host-side tests
//!
//! Deterministic stand-ins for every capability trait, so the control loop
//! can be driven sample by sample without hardware.

use heapless::Deque;

use crate::radio::StackNotification;
use crate::sensor::AxisCounts;
use crate::state::Command;
use crate::traits::{
    IndicatorSink, MotionSource, RadioError, RadioStack, RawAxes, SampleTimer, SensorBusError,
};

/// Queued readings a [`ScriptedMotion`] can hold
pub const SCRIPT_CAPACITY: usize = 64;

/// Encode axis counts the way the accelerometer lays them out
pub fn registers_from_axes(axes: AxisCounts) -> RawAxes {
    let mut raw = [0u8; 6];
    for (chunk, value) in raw.chunks_exact_mut(2).zip(axes.as_array()) {
        chunk.copy_from_slice(&(value << 4).to_le_bytes());
    }
    raw
}

/// Motion source replaying a script, then holding a resting reading
#[derive(Debug)]
pub struct ScriptedMotion {
    script: Deque<Result<RawAxes, SensorBusError>, SCRIPT_CAPACITY>,
    rest: RawAxes,
    reads: u32,
}

impl ScriptedMotion {
    /// Source that reads `rest` whenever the script is empty
    pub fn resting(rest: AxisCounts) -> Self {
        Self {
            script: Deque::new(),
            rest: registers_from_axes(rest),
            reads: 0,
        }
    }

    /// Queue `count` readings of `axes`
    pub fn push(&mut self, axes: AxisCounts, count: usize) -> &mut Self {
        for _ in 0..count {
            self.enqueue(Ok(registers_from_axes(axes)));
        }
        self
    }

    /// Queue `count` failed reads
    pub fn fail(&mut self, error: SensorBusError, count: usize) -> &mut Self {
        for _ in 0..count {
            self.enqueue(Err(error));
        }
        self
    }

    /// Change the reading returned once the script runs out
    pub fn set_rest(&mut self, rest: AxisCounts) {
        self.rest = registers_from_axes(rest);
    }

    /// Reads performed so far
    pub fn reads(&self) -> u32 {
        self.reads
    }

    /// Scripted readings not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn enqueue(&mut self, reading: Result<RawAxes, SensorBusError>) {
        assert!(self.script.push_back(reading).is_ok(), "motion script full");
    }
}

impl MotionSource for ScriptedMotion {
    fn read_raw(&mut self) -> Result<RawAxes, SensorBusError> {
        self.reads += 1;
        self.script.pop_front().unwrap_or(Ok(self.rest))
    }
}

/// Radio stack that records commands and replays queued notifications
#[derive(Debug, Default)]
pub struct FakeRadio {
    initialized: bool,
    advertising: bool,
    connected: bool,
    pending: Deque<StackNotification, 16>,
    fail_next: Option<RadioError>,
    start_advertising: u32,
    stop_advertising: u32,
    accept_connection: u32,
    drop_connection: u32,
    sent: u32,
}

impl FakeRadio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `notification` on the next `process` call
    pub fn notify(&mut self, notification: StackNotification) {
        assert!(self.pending.push_back(notification).is_ok(), "radio queue full");
    }

    /// Make the next command fail with `error`
    pub fn fail_next(&mut self, error: RadioError) {
        self.fail_next = Some(error);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_advertising(&self) -> bool {
        self.advertising
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Successful calls of `command` so far
    pub fn count(&self, command: Command) -> u32 {
        match command {
            Command::StartAdvertising => self.start_advertising,
            Command::StopAdvertising => self.stop_advertising,
            Command::AcceptConnection => self.accept_connection,
            Command::DropConnection => self.drop_connection,
        }
    }

    /// Payloads accepted by `send_data`
    pub fn sent(&self) -> u32 {
        self.sent
    }

    fn command(&mut self) -> Result<(), RadioError> {
        match self.fail_next.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl RadioStack for FakeRadio {
    fn init(&mut self) -> Result<(), RadioError> {
        self.command()?;
        self.initialized = true;
        Ok(())
    }

    fn process(&mut self, notify: &mut dyn FnMut(StackNotification)) {
        while let Some(notification) = self.pending.pop_front() {
            match notification {
                StackNotification::ConnectionComplete { status: 0 } => {
                    self.advertising = false;
                    self.connected = true;
                }
                StackNotification::DisconnectionComplete { .. } => self.connected = false,
                _ => {}
            }
            notify(notification);
        }
    }

    fn start_advertising(&mut self) -> Result<(), RadioError> {
        self.command()?;
        self.advertising = true;
        self.start_advertising += 1;
        Ok(())
    }

    fn stop_advertising(&mut self) -> Result<(), RadioError> {
        self.command()?;
        self.advertising = false;
        self.stop_advertising += 1;
        Ok(())
    }

    fn accept_connection(&mut self) -> Result<(), RadioError> {
        self.command()?;
        self.accept_connection += 1;
        Ok(())
    }

    fn drop_connection(&mut self) -> Result<(), RadioError> {
        self.command()?;
        self.connected = false;
        self.drop_connection += 1;
        Ok(())
    }

    fn send_data(&mut self, _payload: &[u8]) -> Result<(), RadioError> {
        self.command()?;
        self.sent += 1;
        Ok(())
    }
}

/// LED sink remembering the last mask
#[derive(Debug, Default)]
pub struct RecordingLeds {
    last: Option<u16>,
    writes: u32,
}

impl RecordingLeds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<u16> {
        self.last
    }

    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl IndicatorSink for RecordingLeds {
    fn set_leds(&mut self, mask: u16) {
        self.last = Some(mask);
        self.writes += 1;
    }
}

/// Sample timer remembering the last period
#[derive(Debug, Default)]
pub struct RecordingTimer {
    last: Option<u16>,
    writes: u32,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<u16> {
        self.last
    }

    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl SampleTimer for RecordingTimer {
    fn set_period_ms(&mut self, period_ms: u16) {
        self.last = Some(period_ms);
        self.writes += 1;
    }
}
