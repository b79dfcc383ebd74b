//! Stateful wrapper around the transition table

use super::events::{Command, Commands, Input};
use super::machine::{transition, Context, OperatingState, TimerAction};
use crate::config::{AdvertisingConfig, LinkConfig};

/// Result of handing one input to the machine
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reaction {
    pub from: OperatingState,
    pub to: OperatingState,
    /// Radio commands to issue, in order
    pub commands: Commands,
    /// False when the current state does not accept the input
    pub accepted: bool,
}

impl Reaction {
    /// Whether the operating state changed
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Connectivity state machine
#[derive(Debug, Clone)]
pub struct ConnectivityMachine {
    state: OperatingState,
    ctx: Context,
    /// Bumped whenever radio activity is abandoned
    generation: u32,
    /// Start of the advertising idle-timeout / connected inactivity window
    window_start_ms: u32,
    idle_timeout_ms: u32,
}

impl ConnectivityMachine {
    pub fn new(advertising: &AdvertisingConfig, link: &LinkConfig) -> Self {
        Self {
            state: OperatingState::Idle,
            ctx: Context::new(link.retries),
            generation: 0,
            window_start_ms: 0,
            idle_timeout_ms: advertising.idle_timeout_ms,
        }
    }

    pub fn state(&self) -> OperatingState {
        self.state
    }

    pub fn context(&self) -> Context {
        self.ctx
    }

    pub fn fault(&self) -> bool {
        self.ctx.fault
    }

    /// Generation radio events must carry to be considered current
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Apply one input
    pub fn handle(&mut self, input: Input, now_ms: u32) -> Reaction {
        let from = self.state;
        self.ctx = self.ctx.observe(input);

        let Some(step) = transition(from, self.ctx, input) else {
            log_trace!("{:?} ignored in {:?}", input, from);
            return Reaction {
                from,
                to: from,
                commands: Commands::new(),
                accepted: false,
            };
        };

        let abandons = step.commands.iter().any(Command::abandons);
        if abandons || (step.next == OperatingState::Idle && from.radio_active()) {
            self.generation = self.generation.wrapping_add(1);
        }

        if step.timer == TimerAction::Restart {
            self.window_start_ms = now_ms;
        }

        if step.next != from {
            log_debug!("{:?} -> {:?} on {:?}", from, step.next, input);
        }

        self.state = step.next;
        self.ctx = step.ctx;

        Reaction {
            from,
            to: step.next,
            commands: step.commands,
            accepted: true,
        }
    }

    /// Timer-driven input due at `now_ms`, if any
    pub fn poll_timers(&self, now_ms: u32) -> Option<Input> {
        match self.state {
            OperatingState::Advertising if self.window_elapsed_ms(now_ms) >= self.idle_timeout_ms => {
                Some(Input::IdleTimeout)
            }
            _ => None,
        }
    }

    /// Time since the window was last restarted (last wake while
    /// advertising, last motion or link-up while connected)
    pub fn window_elapsed_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.window_start_ms)
    }
}
