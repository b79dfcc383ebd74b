//! Feedback driver

use super::pattern::{Feedback, LedPattern};
use crate::diagnostics::{bump, Diagnostics};
use crate::traits::{IndicatorSink, SampleTimer};

/// Issues LED and timer commands for the current feedback
///
/// Remembers what was last sent so an unchanged mask or period is never
/// sent again.
#[derive(Debug, Clone, Default)]
pub struct FeedbackDriver {
    pattern: Option<LedPattern>,
    step: u32,
    mask: Option<u16>,
    interval_ms: Option<u16>,
}

impl FeedbackDriver {
    pub const fn new() -> Self {
        Self {
            pattern: None,
            step: 0,
            mask: None,
            interval_ms: None,
        }
    }

    /// Pattern currently shown
    pub fn pattern(&self) -> Option<LedPattern> {
        self.pattern
    }

    /// Sample period currently configured
    pub fn interval_ms(&self) -> Option<u16> {
        self.interval_ms
    }

    /// Bring the peripherals in line with `feedback`
    ///
    /// Call on every transition. A new pattern starts from its first frame.
    pub fn update<L: IndicatorSink, T: SampleTimer>(
        &mut self,
        feedback: Feedback,
        leds: &mut L,
        timer: &mut T,
        diagnostics: &mut Diagnostics,
    ) {
        if self.interval_ms != Some(feedback.sample_interval_ms) {
            log_debug!("sample interval {} ms", feedback.sample_interval_ms);
            timer.set_period_ms(feedback.sample_interval_ms);
            self.interval_ms = Some(feedback.sample_interval_ms);
            bump(&mut diagnostics.timer_reconfigs);
        }

        if self.pattern != Some(feedback.pattern) {
            self.pattern = Some(feedback.pattern);
            self.step = 0;
            self.show(leds, diagnostics);
        }
    }

    /// Advance an animated pattern by one frame
    ///
    /// Call once per sample tick.
    pub fn animate<L: IndicatorSink>(&mut self, leds: &mut L, diagnostics: &mut Diagnostics) {
        if self.pattern.is_some_and(|p| p.is_animated()) {
            self.step = self.step.wrapping_add(1);
            self.show(leds, diagnostics);
        }
    }

    fn show<L: IndicatorSink>(&mut self, leds: &mut L, diagnostics: &mut Diagnostics) {
        let Some(pattern) = self.pattern else {
            return;
        };

        let mask = pattern.frame(self.step);
        if self.mask != Some(mask) {
            leds.set_leds(mask);
            self.mask = Some(mask);
            bump(&mut diagnostics.led_commands);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SampleIntervals;
    use crate::feedback::feedback_for;
    use crate::state::OperatingState;
    use crate::testing::{RecordingLeds, RecordingTimer};

    fn feedback(state: OperatingState) -> Feedback {
        feedback_for(state, false, &SampleIntervals::default())
    }

    #[test]
    fn test_first_update_issues_both() {
        let mut driver = FeedbackDriver::new();
        let mut leds = RecordingLeds::new();
        let mut timer = RecordingTimer::new();
        let mut diag = Diagnostics::new();

        driver.update(feedback(OperatingState::Idle), &mut leds, &mut timer, &mut diag);
        assert_eq!(leds.last(), Some(0));
        assert_eq!(timer.last(), Some(500));
        assert_eq!((diag.led_commands, diag.timer_reconfigs), (1, 1));
    }

    #[test]
    fn test_repeated_update_is_silent() {
        let mut driver = FeedbackDriver::new();
        let mut leds = RecordingLeds::new();
        let mut timer = RecordingTimer::new();
        let mut diag = Diagnostics::new();

        for _ in 0..5 {
            driver.update(feedback(OperatingState::Connected), &mut leds, &mut timer, &mut diag);
            driver.animate(&mut leds, &mut diag);
        }
        assert_eq!(leds.writes(), 1);
        assert_eq!(timer.writes(), 1);
    }

    #[test]
    fn test_shared_interval_not_reissued() {
        let mut driver = FeedbackDriver::new();
        let mut leds = RecordingLeds::new();
        let mut timer = RecordingTimer::new();
        let mut diag = Diagnostics::new();

        driver.update(feedback(OperatingState::Advertising), &mut leds, &mut timer, &mut diag);
        driver.update(feedback(OperatingState::Connecting), &mut leds, &mut timer, &mut diag);
        assert_eq!(timer.writes(), 1);
        assert_eq!(leds.last(), Some(0xFFFF));
    }

    #[test]
    fn test_animation_advances() {
        let mut driver = FeedbackDriver::new();
        let mut leds = RecordingLeds::new();
        let mut timer = RecordingTimer::new();
        let mut diag = Diagnostics::new();

        driver.update(feedback(OperatingState::Advertising), &mut leds, &mut timer, &mut diag);
        assert_eq!(leds.last(), Some(0x0003));
        driver.animate(&mut leds, &mut diag);
        assert_eq!(leds.last(), Some(0x0006));
        assert_eq!(leds.writes(), 2);
    }

    #[test]
    fn test_same_mask_across_patterns_not_reissued() {
        let mut driver = FeedbackDriver::new();
        let mut leds = RecordingLeds::new();
        let mut timer = RecordingTimer::new();
        let mut diag = Diagnostics::new();

        // FastBlink and Solid both open on all LEDs
        driver.update(feedback(OperatingState::Connecting), &mut leds, &mut timer, &mut diag);
        driver.update(feedback(OperatingState::Connected), &mut leds, &mut timer, &mut diag);
        assert_eq!(leds.writes(), 1);
        assert_eq!(driver.pattern(), Some(LedPattern::Solid));
    }
}
