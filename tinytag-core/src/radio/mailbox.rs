//! Radio notification mailbox
//!
//! Radio callbacks may run on an interrupt-adjacent path. They only ever
//! post into this bounded queue; the control loop drains it synchronously at
//! the top of each tick, so no transition ever observes a half-updated event.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;

use super::events::{Stamped, StackNotification};

/// Mailbox capacity
pub const MAILBOX_DEPTH: usize = 8;

/// Bounded, generation-stamping notification queue
///
/// Use `CriticalSectionRawMutex` when posting from interrupts.
pub struct RadioMailbox<M: RawMutex> {
    channel: Channel<M, Stamped<StackNotification>, MAILBOX_DEPTH>,
    generation: Mutex<M, Cell<u32>>,
    overflows: Mutex<M, Cell<u32>>,
}

impl<M: RawMutex> RadioMailbox<M> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            generation: Mutex::new(Cell::new(0)),
            overflows: Mutex::new(Cell::new(0)),
        }
    }

    /// Queue a notification, stamped with the current generation
    ///
    /// Returns false (and counts an overflow) when the mailbox is full.
    pub fn post(&self, notification: StackNotification) -> bool {
        let stamped = Stamped {
            generation: self.generation(),
            value: notification,
        };

        match self.channel.try_send(stamped) {
            Ok(()) => true,
            Err(_) => {
                self.overflows.lock(|c| c.set(c.get().saturating_add(1)));
                false
            }
        }
    }

    /// Take the oldest queued notification
    pub fn take(&self) -> Option<Stamped<StackNotification>> {
        self.channel.try_receive().ok()
    }

    /// Generation newly posted notifications are stamped with
    pub fn generation(&self) -> u32 {
        self.generation.lock(|g| g.get())
    }

    /// Advance the stamp after the state machine abandons radio activity
    pub fn set_generation(&self, generation: u32) {
        self.generation.lock(|g| g.set(generation));
    }

    /// Notifications dropped since the last call
    pub fn take_overflows(&self) -> u32 {
        self.overflows.lock(|c| c.replace(0))
    }
}

impl<M: RawMutex> Default for RadioMailbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_fifo_order() {
        let mailbox = RadioMailbox::<NoopRawMutex>::new();
        mailbox.post(StackNotification::PeerSeen);
        mailbox.post(StackNotification::ConnectionComplete { status: 0 });

        assert_eq!(mailbox.take().map(|s| s.value), Some(StackNotification::PeerSeen));
        assert_eq!(
            mailbox.take().map(|s| s.value),
            Some(StackNotification::ConnectionComplete { status: 0 })
        );
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_generation_stamp() {
        let mailbox = RadioMailbox::<NoopRawMutex>::new();
        mailbox.post(StackNotification::PeerSeen);
        mailbox.set_generation(3);
        mailbox.post(StackNotification::PeerSeen);

        assert_eq!(mailbox.take().map(|s| s.generation), Some(0));
        assert_eq!(mailbox.take().map(|s| s.generation), Some(3));
    }

    #[test]
    fn test_overflow_counted() {
        let mailbox = RadioMailbox::<NoopRawMutex>::new();
        for _ in 0..MAILBOX_DEPTH {
            assert!(mailbox.post(StackNotification::PeerSeen));
        }
        assert!(!mailbox.post(StackNotification::PeerSeen));
        assert!(!mailbox.post(StackNotification::PeerSeen));

        assert_eq!(mailbox.take_overflows(), 2);
        assert_eq!(mailbox.take_overflows(), 0);
    }
}
