//! Sensor sampler
//!
//! Performs exactly one read per tick. Failed reads are never retried within
//! the tick; they count against a consecutive-failure budget, and exhausting
//! the budget escalates once to "sensor unavailable".

use super::sample::{AxisCounts, MotionSample};
use crate::config::SamplerConfig;
use crate::traits::{MotionSource, SensorBusError};

/// Result of one sampler tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleOutcome {
    /// Read succeeded
    Sample(MotionSample),
    /// Read failed, still within the failure budget (or already escalated)
    Missed(SensorBusError),
    /// Read failed and the failure budget is now exhausted
    Unavailable(SensorBusError),
    /// First good read after the sensor was declared unavailable
    Recovered(MotionSample),
}

/// Sensor sampler state
#[derive(Debug, Clone)]
pub struct Sampler {
    config: SamplerConfig,
    consecutive_failures: u8,
    unavailable: bool,
}

impl Sampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            consecutive_failures: 0,
            unavailable: false,
        }
    }

    /// Take one reading from `source`
    pub fn sample<S: MotionSource>(&mut self, source: &mut S, now_ms: u32) -> SampleOutcome {
        match source.read_raw() {
            Ok(raw) => {
                let sample = MotionSample {
                    axes: AxisCounts::from_registers(&raw),
                    tick_ms: now_ms,
                };
                self.consecutive_failures = 0;

                if self.unavailable {
                    self.unavailable = false;
                    SampleOutcome::Recovered(sample)
                } else {
                    SampleOutcome::Sample(sample)
                }
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);

                if !self.unavailable && self.consecutive_failures >= self.config.failure_limit {
                    self.unavailable = true;
                    SampleOutcome::Unavailable(e)
                } else {
                    SampleOutcome::Missed(e)
                }
            }
        }
    }

    /// Consecutive failed reads so far
    pub fn consecutive_failures(&self) -> u8 {
        self.consecutive_failures
    }

    /// Whether the sensor is currently declared unavailable
    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RawAxes;

    /// Fails while `failing` is set, otherwise returns a fixed burst
    struct FlakySource {
        failing: bool,
        reads: u32,
    }

    impl MotionSource for FlakySource {
        fn read_raw(&mut self) -> Result<RawAxes, SensorBusError> {
            self.reads += 1;
            if self.failing {
                Err(SensorBusError::Nack)
            } else {
                Ok([0x00, 0x00, 0x00, 0x00, 0x00, 0x08])
            }
        }
    }

    fn sampler(limit: u8) -> Sampler {
        Sampler::new(SamplerConfig {
            failure_limit: limit,
        })
    }

    #[test]
    fn test_good_read() {
        let mut s = sampler(3);
        let mut src = FlakySource {
            failing: false,
            reads: 0,
        };

        match s.sample(&mut src, 42) {
            SampleOutcome::Sample(sample) => {
                assert_eq!(sample.axes, AxisCounts::new(0, 0, 128));
                assert_eq!(sample.tick_ms, 42);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_one_read_per_tick() {
        let mut s = sampler(3);
        let mut src = FlakySource {
            failing: true,
            reads: 0,
        };

        for tick in 0..10 {
            s.sample(&mut src, tick);
        }
        assert_eq!(src.reads, 10);
    }

    #[test]
    fn test_escalates_once_at_limit() {
        let mut s = sampler(3);
        let mut src = FlakySource {
            failing: true,
            reads: 0,
        };

        assert_eq!(s.sample(&mut src, 0), SampleOutcome::Missed(SensorBusError::Nack));
        assert_eq!(s.sample(&mut src, 1), SampleOutcome::Missed(SensorBusError::Nack));
        assert_eq!(
            s.sample(&mut src, 2),
            SampleOutcome::Unavailable(SensorBusError::Nack)
        );
        assert!(s.is_unavailable());

        // Further failures do not re-escalate
        assert_eq!(s.sample(&mut src, 3), SampleOutcome::Missed(SensorBusError::Nack));
    }

    #[test]
    fn test_success_resets_budget() {
        let mut s = sampler(3);
        let mut src = FlakySource {
            failing: true,
            reads: 0,
        };

        s.sample(&mut src, 0);
        s.sample(&mut src, 1);
        src.failing = false;
        s.sample(&mut src, 2);
        assert_eq!(s.consecutive_failures(), 0);

        src.failing = true;
        assert_eq!(s.sample(&mut src, 3), SampleOutcome::Missed(SensorBusError::Nack));
    }

    #[test]
    fn test_recovery_reported_once() {
        let mut s = sampler(1);
        let mut src = FlakySource {
            failing: true,
            reads: 0,
        };

        assert!(matches!(s.sample(&mut src, 0), SampleOutcome::Unavailable(_)));
        src.failing = false;
        assert!(matches!(s.sample(&mut src, 1), SampleOutcome::Recovered(_)));
        assert!(matches!(s.sample(&mut src, 2), SampleOutcome::Sample(_)));
    }
}
