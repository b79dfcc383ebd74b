//! Accelerometer trait

/// One burst of accelerometer data registers
///
/// Layout: X LSB, X MSB, Y LSB, Y MSB, Z LSB, Z MSB.
pub type RawAxes = [u8; 6];

/// Errors that can occur reading the accelerometer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorBusError {
    /// Device did not acknowledge
    Nack,
    /// Bus timed out
    Timeout,
    /// Fewer bytes transferred than requested
    ShortTransfer,
    /// Other bus fault
    Bus,
}

/// Source of raw motion data
///
/// Implementations perform one blocking read of the three axes. They must
/// not retry internally; the sampler owns the retry budget.
pub trait MotionSource {
    /// Read the six axis data registers in one transaction
    fn read_raw(&mut self) -> Result<RawAxes, SensorBusError>;
}
