//! Per-tick control loop
//!
//! [`Tag`] owns every component and the peripherals. One call to
//! [`Tag::tick`] per sample-timer interrupt:
//!
//! 1. Take one accelerometer reading and classify it
//! 2. Let the radio stack run, posting its notifications to the mailbox
//! 3. Drain at most one radio event
//! 4. Apply inputs in a fixed order: radio, sensor health, motion, timers
//! 5. Issue the resulting radio commands and refresh feedback
//!
//! Animated LED patterns advance one frame per tick, before any transition;
//! a transition restarts its new pattern from the first frame.
//!
//! Nothing here blocks except the sensor read and the radio calls, and none
//! of those happen inside a transition.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::{ConfigError, TagConfig};
use crate::diagnostics::{bump, Diagnostics, DiagnosticsSnapshot};
use crate::feedback::{feedback_for, FeedbackDriver};
use crate::motion::{MotionChangeEvent, MotionClassifier};
use crate::radio::{LifecycleAdapter, RadioEvent, RadioMailbox};
use crate::sensor::{MotionSample, SampleOutcome, Sampler};
use crate::state::{Command, ConnectivityMachine, Input, OperatingState, Reaction};
use crate::traits::{IndicatorSink, MotionSource, RadioError, RadioStack, SampleTimer};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Reading taken this tick, if the read succeeded
    pub sample: Option<MotionSample>,
    pub motion: Option<MotionChangeEvent>,
    pub radio: Option<RadioEvent>,
    /// Operating state after the tick
    pub state: OperatingState,
}

/// The tag control core
pub struct Tag<'m, S, R, L, T, M>
where
    M: RawMutex,
{
    config: TagConfig,
    source: S,
    radio: R,
    leds: L,
    timer: T,
    mailbox: &'m RadioMailbox<M>,
    sampler: Sampler,
    classifier: MotionClassifier,
    adapter: LifecycleAdapter,
    machine: ConnectivityMachine,
    feedback: FeedbackDriver,
    diagnostics: Diagnostics,
}

impl<'m, S, R, L, T, M> Tag<'m, S, R, L, T, M>
where
    S: MotionSource,
    R: RadioStack,
    L: IndicatorSink,
    T: SampleTimer,
    M: RawMutex,
{
    /// Assemble the core around its peripherals
    ///
    /// `mailbox` is the queue the radio callbacks post into. The
    /// configuration is validated here so that no tick can trip over it.
    pub fn new(
        config: TagConfig,
        source: S,
        radio: R,
        leds: L,
        timer: T,
        mailbox: &'m RadioMailbox<M>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            sampler: Sampler::new(config.sampler),
            classifier: MotionClassifier::new(config.motion),
            adapter: LifecycleAdapter::new(),
            machine: ConnectivityMachine::new(&config.advertising, &config.link),
            feedback: FeedbackDriver::new(),
            diagnostics: Diagnostics::new(),
            config,
            source,
            radio,
            leds,
            timer,
            mailbox,
        })
    }

    /// Bring up the radio and show the initial (Idle) feedback
    pub fn start(&mut self) -> Result<(), RadioError> {
        self.radio.init()?;
        self.mailbox.set_generation(self.machine.generation());
        self.refresh_feedback();
        log_info!("tag started");
        Ok(())
    }

    /// Run one control tick at `now_ms`
    pub fn tick(&mut self, now_ms: u32) -> TickReport {
        let (sample, sensor_input, motion) = self.sample(now_ms);
        self.feedback.animate(&mut self.leds, &mut self.diagnostics);

        let mailbox = self.mailbox;
        self.radio.process(&mut |notification| {
            mailbox.post(notification);
        });

        let overflows = mailbox.take_overflows();
        if overflows > 0 {
            log_warn!("radio mailbox dropped {} notifications", overflows);
            self.diagnostics.mailbox_overflows =
                self.diagnostics.mailbox_overflows.saturating_add(overflows);
        }

        let radio = self
            .adapter
            .poll(mailbox, self.machine.generation(), &mut self.diagnostics);

        if let Some(event) = radio {
            self.apply(Input::Radio(event), now_ms);
        }
        if let Some(input) = sensor_input {
            self.apply(input, now_ms);
        }
        if let Some(event) = motion {
            self.apply(Input::Motion(event), now_ms);
        }
        if let Some(input) = self.machine.poll_timers(now_ms) {
            self.apply(input, now_ms);
        }

        TickReport {
            sample,
            motion,
            radio,
            state: self.machine.state(),
        }
    }

    /// Send an opaque payload to the connected peer
    pub fn send_data(&mut self, payload: &[u8]) -> Result<(), RadioError> {
        if self.machine.state() != OperatingState::Connected {
            return Err(RadioError::NotConnected);
        }
        self.radio.send_data(payload)
    }

    pub fn state(&self) -> OperatingState {
        self.machine.state()
    }

    /// Whether a sensor fault is latched
    pub fn fault(&self) -> bool {
        self.machine.fault()
    }

    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    /// Current counters, with the state they were taken in
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            state: self.machine.state(),
            fault: self.machine.fault(),
            counters: self.diagnostics,
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    pub fn leds(&self) -> &L {
        &self.leds
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Read the sensor and fold the result into the classifier
    fn sample(
        &mut self,
        now_ms: u32,
    ) -> (Option<MotionSample>, Option<Input>, Option<MotionChangeEvent>) {
        match self.sampler.sample(&mut self.source, now_ms) {
            SampleOutcome::Sample(sample) => {
                let motion = self.classifier.classify(&sample);
                (Some(sample), None, motion)
            }
            SampleOutcome::Missed(e) => {
                log_warn!(
                    "sensor read failed: {:?} ({} in a row)",
                    e,
                    self.sampler.consecutive_failures()
                );
                bump(&mut self.diagnostics.sensor_read_failures);
                (None, None, None)
            }
            SampleOutcome::Unavailable(e) => {
                log_warn!("sensor unavailable after {:?}", e);
                bump(&mut self.diagnostics.sensor_read_failures);
                bump(&mut self.diagnostics.sensor_unavailable);
                (None, Some(Input::SensorUnavailable), None)
            }
            SampleOutcome::Recovered(sample) => {
                log_info!("sensor recovered");
                self.classifier.reset();
                let motion = self.classifier.classify(&sample);
                (Some(sample), Some(Input::SensorRecovered), motion)
            }
        }
    }

    fn apply(&mut self, input: Input, now_ms: u32) {
        let reaction = self.machine.handle(input, now_ms);

        if !reaction.accepted {
            bump(&mut self.diagnostics.ignored_inputs);
            return;
        }
        if reaction.changed() {
            bump(&mut self.diagnostics.transitions);
        }

        self.execute(&reaction);
        self.mailbox.set_generation(self.machine.generation());
        self.refresh_feedback();
    }

    fn execute(&mut self, reaction: &Reaction) {
        for command in reaction.commands.iter() {
            let result = match command {
                Command::StartAdvertising => self.radio.start_advertising(),
                Command::StopAdvertising => self.radio.stop_advertising(),
                Command::AcceptConnection => self.radio.accept_connection(),
                Command::DropConnection => self.radio.drop_connection(),
            };

            if let Err(e) = result {
                log_warn!("radio command {:?} failed: {:?}", command, e);
                bump(&mut self.diagnostics.radio_command_failures);
            }
        }
    }

    fn refresh_feedback(&mut self) {
        let feedback = feedback_for(
            self.machine.state(),
            self.machine.fault(),
            &self.config.intervals,
        );
        self.feedback
            .update(feedback, &mut self.leds, &mut self.timer, &mut self.diagnostics);
    }
}
