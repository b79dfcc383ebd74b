//! LED patterns

use crate::config::SampleIntervals;
use crate::state::OperatingState;

/// LEDs on the ring
pub const LED_COUNT: u32 = 16;

const ALL: u16 = 0xFFFF;
/// Every other LED
const ALTERNATE: u16 = 0x5555;
/// Two adjacent LEDs chasing around the ring
const COMET: u16 = 0x0003;

/// Ring pattern shown for an operating state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedPattern {
    Off,
    /// Advertising
    Rotating,
    /// Connecting
    FastBlink,
    /// Connected
    Solid,
    /// Sensor fault latched
    Fault,
}

impl LedPattern {
    /// LED mask for animation step `step` (one step per sample tick)
    pub fn frame(&self, step: u32) -> u16 {
        match self {
            LedPattern::Off => 0,
            LedPattern::Rotating => COMET.rotate_left(step % LED_COUNT),
            LedPattern::FastBlink if step % 2 == 0 => ALL,
            LedPattern::FastBlink => 0,
            LedPattern::Solid => ALL,
            LedPattern::Fault => ALTERNATE,
        }
    }

    /// Whether the mask changes from step to step
    pub fn is_animated(&self) -> bool {
        matches!(self, LedPattern::Rotating | LedPattern::FastBlink)
    }
}

/// What the peripherals should be doing in a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Feedback {
    pub pattern: LedPattern,
    pub sample_interval_ms: u16,
}

/// Map a state (and the fault latch) to its feedback
pub fn feedback_for(state: OperatingState, fault: bool, intervals: &SampleIntervals) -> Feedback {
    let (pattern, sample_interval_ms) = match state {
        OperatingState::Idle if fault => (LedPattern::Fault, intervals.idle_ms),
        OperatingState::Idle => (LedPattern::Off, intervals.idle_ms),
        OperatingState::Advertising => (LedPattern::Rotating, intervals.advertising_ms),
        OperatingState::Connecting => (LedPattern::FastBlink, intervals.connecting_ms),
        OperatingState::Connected => (LedPattern::Solid, intervals.connected_ms),
    };

    Feedback {
        pattern,
        sample_interval_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_mapping() {
        let intervals = SampleIntervals::default();

        let idle = feedback_for(OperatingState::Idle, false, &intervals);
        assert_eq!(idle.pattern, LedPattern::Off);
        assert_eq!(idle.sample_interval_ms, 500);

        let adv = feedback_for(OperatingState::Advertising, false, &intervals);
        assert_eq!(adv.pattern, LedPattern::Rotating);
        assert_eq!(adv.sample_interval_ms, 200);

        let connecting = feedback_for(OperatingState::Connecting, false, &intervals);
        assert_eq!(connecting.pattern, LedPattern::FastBlink);

        let connected = feedback_for(OperatingState::Connected, false, &intervals);
        assert_eq!(connected.pattern, LedPattern::Solid);
        assert_eq!(connected.sample_interval_ms, 100);
    }

    #[test]
    fn test_fault_shows_in_idle() {
        let f = feedback_for(OperatingState::Idle, true, &SampleIntervals::default());
        assert_eq!(f.pattern, LedPattern::Fault);
        assert_eq!(f.sample_interval_ms, 500);
    }

    #[test]
    fn test_rotating_wraps() {
        assert_eq!(LedPattern::Rotating.frame(0), 0x0003);
        assert_eq!(LedPattern::Rotating.frame(1), 0x0006);
        assert_eq!(LedPattern::Rotating.frame(15), 0x8001);
        assert_eq!(LedPattern::Rotating.frame(16), 0x0003);
    }

    #[test]
    fn test_static_patterns() {
        for step in 0..4 {
            assert_eq!(LedPattern::Off.frame(step), 0);
            assert_eq!(LedPattern::Solid.frame(step), 0xFFFF);
            assert_eq!(LedPattern::Fault.frame(step), 0x5555);
        }
        assert_eq!(LedPattern::FastBlink.frame(0), 0xFFFF);
        assert_eq!(LedPattern::FastBlink.frame(1), 0);
    }
}
