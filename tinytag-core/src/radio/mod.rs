//! Radio lifecycle handling
//!
//! Stack callbacks post raw notifications into a [`RadioMailbox`]; once per
//! tick the [`LifecycleAdapter`] drains it, translates status codes and
//! collapses duplicates into the small [`RadioEvent`] vocabulary the state
//! machine consumes.

pub mod adapter;
pub mod events;
pub mod mailbox;

pub use adapter::LifecycleAdapter;
pub use events::{hci, RadioEvent, Stamped, StackNotification};
pub use mailbox::{RadioMailbox, MAILBOX_DEPTH};
