//! GPIO pin abstractions
//!
//! The LED ring is charlieplexed, so its lines need three states: driven
//! high, driven low, or released to high impedance.

/// Drive state of a tristate line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineState {
    /// Output, logic 1
    High,
    /// Output, logic 0
    Low,
    /// Input, high impedance
    Floating,
}

/// A GPIO line that can be driven or released
///
/// Implementations should handle the actual port register writes
/// (DIRSET/OUTSET/OUTCLR on the reference board).
pub trait TristatePin {
    /// Configure as output and drive high
    fn drive_high(&mut self);

    /// Configure as output and drive low
    fn drive_low(&mut self);

    /// Release the line (configure as input, no pull)
    fn float(&mut self);

    /// Apply a [`LineState`]
    fn set_state(&mut self, state: LineState) {
        match state {
            LineState::High => self.drive_high(),
            LineState::Low => self.drive_low(),
            LineState::Floating => self.float(),
        }
    }
}
