//! Radio events

/// HCI status and disconnection reason codes the adapter distinguishes
pub mod hci {
    pub const SUCCESS: u8 = 0x00;
    /// Link supervision timeout
    pub const CONNECTION_TIMEOUT: u8 = 0x08;
    pub const REMOTE_USER_TERMINATED: u8 = 0x13;
    pub const LOCAL_HOST_TERMINATED: u8 = 0x16;
    /// Link-layer response timeout
    pub const LL_RESPONSE_TIMEOUT: u8 = 0x22;
    pub const CONNECTION_FAILED_TO_ESTABLISH: u8 = 0x3E;
}

/// Raw lifecycle notification as reported by the radio stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackNotification {
    /// A central is requesting a connection
    PeerSeen,
    /// Connection setup finished with an HCI status
    ConnectionComplete { status: u8 },
    /// Connection ended with an HCI reason
    DisconnectionComplete { reason: u8 },
}

/// Lifecycle event consumed by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioEvent {
    PeerDiscovered,
    Connected,
    /// Explicit termination by either side
    Disconnected,
    /// Supervision timeout or no response
    LinkLost,
}

impl StackNotification {
    /// Translate into a [`RadioEvent`]
    pub fn translate(self) -> RadioEvent {
        match self {
            StackNotification::PeerSeen => RadioEvent::PeerDiscovered,
            StackNotification::ConnectionComplete { status: hci::SUCCESS } => RadioEvent::Connected,
            StackNotification::ConnectionComplete { status } => termination(status),
            StackNotification::DisconnectionComplete { reason } => termination(reason),
        }
    }
}

fn termination(code: u8) -> RadioEvent {
    match code {
        hci::CONNECTION_TIMEOUT | hci::LL_RESPONSE_TIMEOUT | hci::CONNECTION_FAILED_TO_ESTABLISH => {
            RadioEvent::LinkLost
        }
        _ => RadioEvent::Disconnected,
    }
}

/// A value tagged with the state machine generation it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stamped<T> {
    pub generation: u32,
    pub value: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_seen() {
        assert_eq!(StackNotification::PeerSeen.translate(), RadioEvent::PeerDiscovered);
    }

    #[test]
    fn test_connection_complete() {
        assert_eq!(
            StackNotification::ConnectionComplete { status: hci::SUCCESS }.translate(),
            RadioEvent::Connected
        );
        assert_eq!(
            StackNotification::ConnectionComplete {
                status: hci::CONNECTION_FAILED_TO_ESTABLISH
            }
            .translate(),
            RadioEvent::LinkLost
        );
        assert_eq!(
            StackNotification::ConnectionComplete { status: 0x0C }.translate(),
            RadioEvent::Disconnected
        );
    }

    #[test]
    fn test_timeouts_are_link_loss() {
        for reason in [hci::CONNECTION_TIMEOUT, hci::LL_RESPONSE_TIMEOUT] {
            assert_eq!(
                StackNotification::DisconnectionComplete { reason }.translate(),
                RadioEvent::LinkLost
            );
        }
    }

    #[test]
    fn test_terminations_are_disconnects() {
        for reason in [hci::REMOTE_USER_TERMINATED, hci::LOCAL_HOST_TERMINATED, 0x05] {
            assert_eq!(
                StackNotification::DisconnectionComplete { reason }.translate(),
                RadioEvent::Disconnected
            );
        }
    }
}
