//! Radio stack trait
//!
//! The link layer (HCI/ACI processing, advertising payloads, connection
//! parameters) lives behind this trait. The core only drives its lifecycle.

use crate::radio::StackNotification;

/// Errors returned by radio commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// Stack is busy with a previous command
    Busy,
    /// Operation needs an active connection
    NotConnected,
    /// Stack-specific status code
    Stack(u8),
}

/// High-level radio stack interface
pub trait RadioStack {
    /// Bring the stack up (radio powered, not advertising)
    fn init(&mut self) -> Result<(), RadioError>;

    /// Run the stack's event processing once
    ///
    /// Reports every lifecycle notification produced during this call
    /// through `notify`. Must not block waiting for events.
    fn process(&mut self, notify: &mut dyn FnMut(StackNotification));

    /// Begin broadcasting discoverable advertisements
    fn start_advertising(&mut self) -> Result<(), RadioError>;

    /// Stop broadcasting
    fn stop_advertising(&mut self) -> Result<(), RadioError>;

    /// Accept the connection request from a discovered peer
    fn accept_connection(&mut self) -> Result<(), RadioError>;

    /// Terminate the current connection or connection attempt
    fn drop_connection(&mut self) -> Result<(), RadioError>;

    /// Send an opaque payload to the connected peer
    fn send_data(&mut self, payload: &[u8]) -> Result<(), RadioError>;
}
