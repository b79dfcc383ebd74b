//! Motion classifier
//!
//! Each sample's acceleration magnitude is compared to a rolling baseline of
//! the resting magnitude. Using the magnitude rather than the per-axis vector
//! keeps the baseline valid when the tag comes to rest in a new orientation.
//!
//! Hysteresis: motion is accepted after `start_samples` (N) consecutive
//! samples above threshold and dropped after `stop_samples` (M) consecutive
//! samples below it. The baseline starts at the nominal 1 g magnitude and
//! only learns from still samples while motion is absent, so a tag that boots
//! while moving never mistakes the shaking for rest.

use crate::config::{ClassifierConfig, MAX_BASELINE_SHIFT};
use crate::sensor::{AxisCounts, MotionSample, ONE_G_COUNTS};

/// Fractional bits of the fixed-point baseline
const FRACTION_BITS: u32 = 8;

/// Baseline before any still sample has been learned
const NOMINAL_BASELINE: i32 = ONE_G_COUNTS << FRACTION_BITS;

/// Motion presence change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionChangeEvent {
    /// Presence flipped absent → present
    Started,
    /// Presence flipped present → absent
    Stopped,
}

/// Debounced motion classifier
#[derive(Debug, Clone)]
pub struct MotionClassifier {
    config: ClassifierConfig,
    /// Resting magnitude, `FRACTION_BITS` fixed point
    baseline: i32,
    present: bool,
    /// > 0: consecutive samples above threshold, < 0: consecutive below
    debounce: i16,
}

impl MotionClassifier {
    pub fn new(mut config: ClassifierConfig) -> Self {
        config.baseline_shift = config.baseline_shift.min(MAX_BASELINE_SHIFT);
        Self {
            config,
            baseline: NOMINAL_BASELINE,
            present: false,
            debounce: 0,
        }
    }

    /// Forget the learned baseline and presence
    pub fn reset(&mut self) {
        self.baseline = NOMINAL_BASELINE;
        self.present = false;
        self.debounce = 0;
    }

    /// Whether motion is currently accepted
    pub fn present(&self) -> bool {
        self.present
    }

    /// Fold one sample into the classifier state
    ///
    /// Returns an event only on the sample where presence flips.
    pub fn classify(&mut self, sample: &MotionSample) -> Option<MotionChangeEvent> {
        let magnitude = magnitude(&sample.axes) as i32;
        let scaled = magnitude << FRACTION_BITS;
        let baseline = self.baseline;

        let deviation = (magnitude - (baseline >> FRACTION_BITS)).unsigned_abs();
        let above = deviation > self.config.threshold as u32;

        self.count(above);
        let event = self.decide();

        if !self.present && !above {
            let shift = self.config.baseline_shift as u32;
            self.baseline = baseline + ((scaled - baseline) >> shift);
        }

        event
    }

    fn count(&mut self, above: bool) {
        let limit = self.debounce_limit();

        self.debounce = if above {
            if self.debounce > 0 {
                (self.debounce + 1).min(limit)
            } else {
                1
            }
        } else if self.debounce < 0 {
            (self.debounce - 1).max(-limit)
        } else {
            -1
        };
    }

    fn decide(&mut self) -> Option<MotionChangeEvent> {
        if !self.present && self.debounce >= self.config.start_samples as i16 {
            self.present = true;
            self.debounce = 0;
            return Some(MotionChangeEvent::Started);
        }

        if self.present && -(self.debounce as i32) >= self.config.stop_samples as i32 {
            self.present = false;
            self.debounce = 0;
            return Some(MotionChangeEvent::Stopped);
        }

        None
    }

    fn debounce_limit(&self) -> i16 {
        let widest = (self.config.start_samples as u16).max(self.config.stop_samples);
        widest.min(i16::MAX as u16) as i16
    }
}

/// Acceleration magnitude in counts (integer square root of the sum of squares)
pub fn magnitude(axes: &AxisCounts) -> u32 {
    let sum: u32 = axes
        .as_array()
        .iter()
        .map(|&a| {
            let a = a as i32;
            (a * a) as u32
        })
        .sum();
    isqrt(sum)
}

fn isqrt(n: u32) -> u32 {
    if n < 2 {
        return n;
    }

    let mut x = n;
    let mut y = x / 2 + 1;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1 g resting on the z axis
    const REST: i16 = 128;

    fn config() -> ClassifierConfig {
        ClassifierConfig {
            threshold: 24,
            start_samples: 3,
            stop_samples: 10,
            baseline_shift: 3,
        }
    }

    fn sample(z: i16) -> MotionSample {
        MotionSample {
            axes: AxisCounts::new(0, 0, z),
            tick_ms: 0,
        }
    }

    fn feed(c: &mut MotionClassifier, z: i16, count: usize) -> heapless::Vec<(usize, MotionChangeEvent), 8> {
        let mut events = heapless::Vec::new();
        for i in 0..count {
            if let Some(e) = c.classify(&sample(z)) {
                let _ = events.push((i, e));
            }
        }
        events
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(16_384), 128);
        assert_eq!(isqrt(16_385), 128);
        assert_eq!(isqrt(3 * 2048 * 2048), 3547);
    }

    #[test]
    fn test_magnitude_orientation_independent() {
        assert_eq!(magnitude(&AxisCounts::new(0, 0, 128)), 128);
        assert_eq!(magnitude(&AxisCounts::new(128, 0, 0)), 128);
        assert_eq!(magnitude(&AxisCounts::new(0, -128, 0)), 128);
    }

    #[test]
    fn test_still_never_fires() {
        let mut c = MotionClassifier::new(config());
        assert!(feed(&mut c, REST, 50).is_empty());
    }

    #[test]
    fn test_started_on_third_sample() {
        let mut c = MotionClassifier::new(config());
        feed(&mut c, REST, 50);

        let events = feed(&mut c, REST + 60, 5);
        assert_eq!(events.as_slice(), &[(2, MotionChangeEvent::Started)]);
    }

    #[test]
    fn test_single_spike_suppressed() {
        let mut c = MotionClassifier::new(config());
        feed(&mut c, REST, 20);

        for _ in 0..10 {
            assert_eq!(c.classify(&sample(REST + 200)), None);
            assert_eq!(c.classify(&sample(REST + 200)), None);
            assert_eq!(c.classify(&sample(REST)), None);
        }
    }

    #[test]
    fn test_stopped_after_m_still_samples() {
        let mut c = MotionClassifier::new(config());
        feed(&mut c, REST, 10);
        feed(&mut c, REST + 60, 3);

        let events = feed(&mut c, REST, 12);
        assert_eq!(events.as_slice(), &[(9, MotionChangeEvent::Stopped)]);
    }

    #[test]
    fn test_interrupted_stillness_restarts_count() {
        let mut c = MotionClassifier::new(config());
        feed(&mut c, REST, 10);
        feed(&mut c, REST + 60, 3);

        assert!(feed(&mut c, REST, 9).is_empty());
        assert!(feed(&mut c, REST + 60, 1).is_empty());
        assert!(feed(&mut c, REST, 9).is_empty());
        assert_eq!(
            feed(&mut c, REST, 1).as_slice(),
            &[(0, MotionChangeEvent::Stopped)]
        );
    }

    #[test]
    fn test_baseline_frozen_while_present() {
        let mut c = MotionClassifier::new(config());
        feed(&mut c, REST, 10);
        feed(&mut c, REST + 60, 3);

        // A long stretch of sustained motion must not be learned as rest
        assert!(feed(&mut c, REST + 60, 200).is_empty());
        assert_eq!(c.baseline, (REST as i32) << FRACTION_BITS);
    }

    #[test]
    fn test_reorientation_settles() {
        let mut c = MotionClassifier::new(config());
        feed(&mut c, REST, 10);

        // Picked up and shaken, then laid on its side
        let shake = MotionSample {
            axes: AxisCounts::new(90, 40, 200),
            tick_ms: 0,
        };
        for _ in 0..3 {
            c.classify(&shake);
        }
        assert!(c.present);

        let side = MotionSample {
            axes: AxisCounts::new(128, 0, 0),
            tick_ms: 0,
        };
        let mut stopped = false;
        for _ in 0..10 {
            stopped |= c.classify(&side) == Some(MotionChangeEvent::Stopped);
        }
        assert!(stopped);
    }

    #[test]
    fn test_reset_forgets_baseline() {
        let mut c = MotionClassifier::new(config());

        // Slight calibration offset, learned while still
        feed(&mut c, REST + 20, 100);
        assert!(c.baseline > NOMINAL_BASELINE);

        c.reset();
        assert_eq!(c.baseline, NOMINAL_BASELINE);
        assert!(!c.present);
    }

    #[test]
    fn test_shaken_from_first_sample() {
        let mut c = MotionClassifier::new(config());
        let shake = MotionSample {
            axes: AxisCounts::new(90, 40, 200),
            tick_ms: 0,
        };
        let mut events = heapless::Vec::<MotionChangeEvent, 4>::new();
        for _ in 0..3 {
            if let Some(e) = c.classify(&shake) {
                let _ = events.push(e);
            }
        }
        for _ in 0..500 {
            if let Some(e) = c.classify(&sample(REST)) {
                let _ = events.push(e);
            }
        }

        assert_eq!(
            events.as_slice(),
            &[MotionChangeEvent::Started, MotionChangeEvent::Stopped]
        );
        assert!(!c.present);
    }

    #[test]
    fn test_reset_while_shaken() {
        let mut c = MotionClassifier::new(config());
        feed(&mut c, REST, 10);
        feed(&mut c, REST + 100, 3);
        c.reset();

        // Still shaking after the reset, then laid down
        assert_eq!(
            feed(&mut c, REST + 100, 3).as_slice(),
            &[(2, MotionChangeEvent::Started)]
        );
        assert_eq!(
            feed(&mut c, REST, 20).as_slice(),
            &[(9, MotionChangeEvent::Stopped)]
        );
        assert!(feed(&mut c, REST, 200).is_empty());
    }

    #[test]
    fn test_oversized_shift_clamped() {
        let mut c = MotionClassifier::new(ClassifierConfig {
            baseline_shift: 40,
            ..config()
        });
        assert!(feed(&mut c, REST + 10, 50).is_empty());
    }
}
