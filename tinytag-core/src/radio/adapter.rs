//! Radio lifecycle adapter
//!
//! Drains the mailbox once per tick and hands the state machine at most one
//! event. Repeated notifications for the same logical transition within a
//! drain are collapsed; events stamped with an abandoned generation are
//! dropped.

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::Deque;

use super::events::{RadioEvent, Stamped};
use super::mailbox::{RadioMailbox, MAILBOX_DEPTH};
use crate::diagnostics::{bump, Diagnostics};

/// Translated events waiting for a tick
#[derive(Debug, Default)]
pub struct LifecycleAdapter {
    pending: Deque<Stamped<RadioEvent>, MAILBOX_DEPTH>,
}

impl LifecycleAdapter {
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
        }
    }

    /// Events waiting behind the one returned this tick
    pub fn backlog(&self) -> usize {
        self.pending.len()
    }

    /// Next current event for this tick, if any
    pub fn poll<M: RawMutex>(
        &mut self,
        mailbox: &RadioMailbox<M>,
        generation: u32,
        diagnostics: &mut Diagnostics,
    ) -> Option<RadioEvent> {
        self.drain(mailbox, diagnostics);

        while let Some(stamped) = self.pending.pop_front() {
            if stamped.generation == generation {
                return Some(stamped.value);
            }
            log_trace!(
                "stale {:?} (generation {} != {})",
                stamped.value,
                stamped.generation,
                generation
            );
            bump(&mut diagnostics.stale_events);
        }

        None
    }

    fn drain<M: RawMutex>(&mut self, mailbox: &RadioMailbox<M>, diagnostics: &mut Diagnostics) {
        let mut previous: Option<Stamped<RadioEvent>> = None;

        while let Some(notification) = mailbox.take() {
            let stamped = Stamped {
                generation: notification.generation,
                value: notification.value.translate(),
            };

            if previous == Some(stamped) {
                bump(&mut diagnostics.duplicate_events);
                continue;
            }
            previous = Some(stamped);

            if self.pending.push_back(stamped).is_err() {
                log_warn!("radio backlog full, dropping {:?}", stamped.value);
                bump(&mut diagnostics.mailbox_overflows);
            }
        }
    }
}
