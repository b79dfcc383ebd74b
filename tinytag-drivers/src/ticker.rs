//! TC3 sample ticker
//!
//! Runs the sample tick from TC3: 32.768 kHz through a /64 prescaler gives a
//! 512 Hz count, so a period in milliseconds becomes `ms * 512 / 1000`
//! compare counts.

use tinytag_core::traits::SampleTimer;
use tinytag_hal::timer::{counts_to_period_ms, period_to_counts, PeriodicTimer};

/// Sample timer backed by a compare-match counter
pub struct SampleTicker<T> {
    timer: T,
    counts: Option<u16>,
}

impl<T: PeriodicTimer> SampleTicker<T> {
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            counts: None,
        }
    }

    /// Compare value last programmed
    pub fn counts(&self) -> Option<u16> {
        self.counts
    }

    /// Period the counter actually produces, after rounding to counts
    pub fn effective_period_ms(&self) -> Option<u32> {
        self.counts.map(counts_to_period_ms)
    }

    /// Release the timer, consuming the driver
    pub fn release(self) -> T {
        self.timer
    }
}

impl<T: PeriodicTimer> SampleTimer for SampleTicker<T> {
    fn set_period_ms(&mut self, period_ms: u16) {
        let counts = period_to_counts(period_ms);
        self.timer.set_compare(counts);
        self.timer.reset();
        self.counts = Some(counts);
    }
}
