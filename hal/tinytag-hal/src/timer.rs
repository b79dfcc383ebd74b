//! Periodic timer abstraction
//!
//! The sample tick comes from a 16-bit counter clocked from the 32.768 kHz
//! oscillator through a prescaler. The period is programmed as a compare
//! value in prescaled clock counts.

/// Source clock frequency in Hz
pub const CLOCK_FREQUENCY_HZ: u32 = 32_768;

/// Counter prescaler
pub const PRESCALER: u32 = 64;

/// Counter frequency after the prescaler (512 Hz)
pub const PRESCALED_FREQUENCY_HZ: u32 = CLOCK_FREQUENCY_HZ / PRESCALER;

const MS_PER_SECOND: u32 = 1000;

/// Compare-match periodic timer
///
/// An interrupt fires each time the counter reaches the compare value.
pub trait PeriodicTimer {
    /// Program the compare value, in prescaled counts
    fn set_compare(&mut self, counts: u16);

    /// Reset the counter to zero without touching the compare value
    fn reset(&mut self);
}

/// Convert a period in milliseconds to prescaled counter counts
///
/// Clamped to `1..=u16::MAX` so the timer always fires.
pub const fn period_to_counts(period_ms: u16) -> u16 {
    let counts = period_ms as u32 * PRESCALED_FREQUENCY_HZ / MS_PER_SECOND;
    if counts == 0 {
        1
    } else if counts > u16::MAX as u32 {
        u16::MAX
    } else {
        counts as u16
    }
}

/// Convert prescaled counts back to the period actually produced, in ms
pub const fn counts_to_period_ms(counts: u16) -> u32 {
    counts as u32 * MS_PER_SECOND / PRESCALED_FREQUENCY_HZ
}
