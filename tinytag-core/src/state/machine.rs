//! Transition table
//!
//! Every (state, input) cell is spelled out so the compiler checks coverage.
//! `None` means the input is not accepted in that state: no state change and
//! no command.

use serde::{Deserialize, Serialize};

use super::events::{Command, Commands, Input};
use crate::motion::MotionChangeEvent::{Started, Stopped};
use crate::radio::RadioEvent;

/// Operating states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingState {
    /// Radio quiet, slow sampling
    #[default]
    Idle,
    /// Broadcasting, waiting for a peer
    Advertising,
    /// Peer discovered, connection being set up
    Connecting,
    /// Link up
    Connected,
}

impl OperatingState {
    /// Whether the radio is expected to be doing anything in this state
    pub fn radio_active(&self) -> bool {
        !matches!(self, OperatingState::Idle)
    }
}

/// Flags that refine the table beyond the state itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Context {
    /// Last motion presence reported by the classifier
    pub motion_present: bool,
    /// Sensor fault latched; motion cannot wake the radio
    pub fault: bool,
    /// Advertising or connecting again after a link loss
    pub reconnecting: bool,
    /// Reconnect attempts left before giving up
    pub retries_left: u8,
    /// Reconnect attempts granted per established link
    pub retry_budget: u8,
}

impl Context {
    pub const fn new(retry_budget: u8) -> Self {
        Self {
            motion_present: false,
            fault: false,
            reconnecting: false,
            retries_left: retry_budget,
            retry_budget,
        }
    }

    /// Fold what an input says about the world into the flags
    ///
    /// Applied whether or not the state accepts the input.
    pub fn observe(self, input: Input) -> Self {
        match input {
            Input::Motion(Started) => Self {
                motion_present: true,
                ..self
            },
            Input::Motion(Stopped) | Input::SensorUnavailable | Input::SensorRecovered => Self {
                motion_present: false,
                ..self
            },
            Input::Radio(_) | Input::IdleTimeout => self,
        }
    }

    fn fresh_link(self) -> Self {
        Self {
            reconnecting: false,
            retries_left: self.retry_budget,
            ..self
        }
    }

    fn faulted(self) -> Self {
        Self {
            fault: true,
            motion_present: false,
            ..self.fresh_link()
        }
    }

    fn cleared(self) -> Self {
        Self {
            fault: false,
            ..self
        }
    }
}

/// What to do with the shared deadline timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerAction {
    Keep,
    /// Restart the advertising idle-timeout / connected inactivity window
    Restart,
}

/// Outcome of an accepted input
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    pub next: OperatingState,
    pub ctx: Context,
    pub commands: Commands,
    pub timer: TimerAction,
}

impl Step {
    fn to(next: OperatingState, ctx: Context) -> Self {
        Self {
            next,
            ctx,
            commands: Commands::new(),
            timer: TimerAction::Keep,
        }
    }

    fn issue(mut self, command: Command) -> Self {
        // No row issues more than one command
        let _ = self.commands.push(command);
        self
    }

    fn restart_timer(mut self) -> Self {
        self.timer = TimerAction::Restart;
        self
    }
}

/// Decide the next state for `input`
pub fn transition(state: OperatingState, ctx: Context, input: Input) -> Option<Step> {
    use Command::*;
    use Input::*;
    use OperatingState::{Advertising, Connecting, Idle};

    match (state, input) {
        (Idle, Motion(Started)) if ctx.fault => None,
        (Idle, Motion(Started)) => Some(
            Step::to(Advertising, ctx.fresh_link())
                .issue(StartAdvertising)
                .restart_timer(),
        ),
        (Idle, Motion(Stopped)) => None,
        (Idle, Radio(_)) => None,
        (Idle, SensorUnavailable) if ctx.fault => None,
        (Idle, SensorUnavailable) => Some(Step::to(Idle, ctx.faulted()).issue(StopAdvertising)),
        (Idle, SensorRecovered) if ctx.fault => Some(Step::to(Idle, ctx.cleared())),
        (Idle, SensorRecovered) => None,
        (Idle, IdleTimeout) => None,

        (Advertising, Motion(Started)) => Some(Step::to(Advertising, ctx).restart_timer()),
        // Stillness does not end advertising early; the idle timeout does
        (Advertising, Motion(Stopped)) => None,
        (Advertising, Radio(RadioEvent::PeerDiscovered)) => {
            Some(Step::to(Connecting, ctx).issue(AcceptConnection))
        }
        (Advertising, Radio(RadioEvent::Connected)) if ctx.reconnecting => Some(
            Step::to(OperatingState::Connected, ctx.fresh_link()).restart_timer(),
        ),
        (Advertising, Radio(RadioEvent::Connected)) => None,
        (Advertising, Radio(RadioEvent::Disconnected)) => None,
        (Advertising, Radio(RadioEvent::LinkLost)) if ctx.reconnecting => {
            Some(retry_or_give_up(Advertising, ctx))
        }
        (Advertising, Radio(RadioEvent::LinkLost)) => None,
        (Advertising, SensorUnavailable) => {
            Some(Step::to(Idle, ctx.faulted()).issue(StopAdvertising))
        }
        (Advertising, SensorRecovered) => None,
        (Advertising, IdleTimeout) => Some(Step::to(Idle, ctx.fresh_link()).issue(StopAdvertising)),

        (Connecting, Motion(_)) => None,
        (Connecting, Radio(RadioEvent::PeerDiscovered)) => None,
        (Connecting, Radio(RadioEvent::Connected)) => Some(
            Step::to(OperatingState::Connected, ctx.fresh_link()).restart_timer(),
        ),
        (Connecting, Radio(RadioEvent::Disconnected)) => Some(
            Step::to(Advertising, ctx)
                .issue(StartAdvertising)
                .restart_timer(),
        ),
        (Connecting, Radio(RadioEvent::LinkLost)) if ctx.reconnecting => {
            Some(retry_or_give_up(Connecting, ctx))
        }
        (Connecting, Radio(RadioEvent::LinkLost)) => Some(
            Step::to(Advertising, ctx)
                .issue(StartAdvertising)
                .restart_timer(),
        ),
        (Connecting, SensorUnavailable) => {
            Some(Step::to(Idle, ctx.faulted()).issue(DropConnection))
        }
        (Connecting, SensorRecovered | IdleTimeout) => None,

        (OperatingState::Connected, Motion(Started)) => {
            Some(Step::to(OperatingState::Connected, ctx).restart_timer())
        }
        (OperatingState::Connected, Motion(Stopped)) => None,
        (
            OperatingState::Connected,
            Radio(RadioEvent::PeerDiscovered | RadioEvent::Connected),
        ) => None,
        (OperatingState::Connected, Radio(RadioEvent::Disconnected)) if ctx.motion_present => Some(
            Step::to(Advertising, ctx)
                .issue(StartAdvertising)
                .restart_timer(),
        ),
        (OperatingState::Connected, Radio(RadioEvent::Disconnected)) => {
            Some(Step::to(Idle, ctx.fresh_link()))
        }
        (OperatingState::Connected, Radio(RadioEvent::LinkLost)) => {
            Some(retry_or_give_up(OperatingState::Connected, ctx))
        }
        (OperatingState::Connected, SensorUnavailable) => {
            Some(Step::to(Idle, ctx.faulted()).issue(DropConnection))
        }
        (OperatingState::Connected, SensorRecovered | IdleTimeout) => None,
    }
}

/// Spend one reconnect attempt, or give up to Idle when none are left
fn retry_or_give_up(from: OperatingState, ctx: Context) -> Step {
    use OperatingState::{Advertising, Idle};

    if ctx.retries_left > 0 {
        let ctx = Context {
            reconnecting: true,
            retries_left: ctx.retries_left - 1,
            ..ctx
        };
        let step = Step::to(Advertising, ctx).restart_timer();
        match from {
            Advertising => step,
            _ => step.issue(Command::StartAdvertising),
        }
    } else {
        let step = Step::to(Idle, ctx.fresh_link());
        match from {
            Advertising => step.issue(Command::StopAdvertising),
            _ => step,
        }
    }
}
