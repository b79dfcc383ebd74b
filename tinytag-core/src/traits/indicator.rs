//! LED and sample timer traits

/// LED ring output
pub trait IndicatorSink {
    /// Light exactly the LEDs whose bits are set (bit 0 = D1)
    ///
    /// Applied atomically. Implementations need not deduplicate.
    fn set_leds(&mut self, mask: u16);
}

/// Periodic sample tick source
pub trait SampleTimer {
    /// Change the tick period, in milliseconds
    fn set_period_ms(&mut self, period_ms: u16);
}
