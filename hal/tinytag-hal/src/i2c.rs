//! I2C bus abstractions
//!
//! The tag's bus primitive is a single blocking transaction in one direction
//! that reports how many bytes actually moved. A zero count means the
//! secondary device never acknowledged.

use embedded_hal::i2c::Error as _;

/// Transfer direction of a single transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cDirection {
    /// Controller writes `data` to the device
    Write,
    /// Controller fills `data` from the device
    Read,
}

/// Errors reported by I2C bus implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Address or data byte not acknowledged
    Nack,
    /// Bus stuck or clock stretched past the limit
    Timeout,
    /// Arbitration lost to another controller
    ArbitrationLost,
    /// Other bus fault
    Bus,
}

/// I2C bus controller
///
/// Mirrors the board's transaction primitive: one blocking transfer, returning
/// the number of bytes transferred. Implementations return `0` on any failure.
pub trait I2cBus {
    /// Perform a blocking read or write transaction
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `direction` - Transfer direction
    /// * `data` - Bytes to write, or buffer to read into
    fn transaction(&mut self, address: u8, direction: I2cDirection, data: &mut [u8]) -> usize;

    /// Write `data` and check that every byte was acknowledged
    fn write_all(&mut self, address: u8, data: &mut [u8]) -> Result<(), I2cBusError> {
        let len = data.len();
        match self.transaction(address, I2cDirection::Write, data) {
            0 => Err(I2cBusError::Nack),
            n if n < len => Err(I2cBusError::Bus),
            _ => Ok(()),
        }
    }

    /// Write a register pointer, then read `buf.len()` bytes from it
    fn read_register(&mut self, address: u8, register: u8, buf: &mut [u8]) -> Result<(), I2cBusError> {
        self.write_all(address, &mut [register])?;
        match self.transaction(address, I2cDirection::Read, buf) {
            0 => Err(I2cBusError::Nack),
            n if n < buf.len() => Err(I2cBusError::Bus),
            _ => Ok(()),
        }
    }
}

/// Adapts any `embedded-hal` I2C controller to [`I2cBus`]
///
/// Lets the drivers run on any HAL that already implements the
/// `embedded_hal::i2c::I2c` trait.
pub struct EmbeddedHalBus<T> {
    inner: T,
    last_error: Option<I2cBusError>,
}

impl<T> EmbeddedHalBus<T> {
    /// Wrap an `embedded-hal` I2C controller
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            last_error: None,
        }
    }

    /// Error behind the most recent zero-count transaction, if any
    pub fn last_error(&self) -> Option<I2cBusError> {
        self.last_error
    }

    /// Release the wrapped controller
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: embedded_hal::i2c::I2c> I2cBus for EmbeddedHalBus<T> {
    fn transaction(&mut self, address: u8, direction: I2cDirection, data: &mut [u8]) -> usize {
        let result = match direction {
            I2cDirection::Write => self.inner.write(address, data),
            I2cDirection::Read => self.inner.read(address, data),
        };

        match result {
            Ok(()) => {
                self.last_error = None;
                data.len()
            }
            Err(e) => {
                self.last_error = Some(classify(e.kind()));
                0
            }
        }
    }
}

fn classify(kind: embedded_hal::i2c::ErrorKind) -> I2cBusError {
    use embedded_hal::i2c::ErrorKind;

    match kind {
        ErrorKind::NoAcknowledge(_) => I2cBusError::Nack,
        ErrorKind::ArbitrationLoss => I2cBusError::ArbitrationLost,
        ErrorKind::Overrun | ErrorKind::Bus => I2cBusError::Bus,
        _ => I2cBusError::Timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    /// Bus that acknowledges up to `ack_limit` bytes per transaction
    struct CountingBus {
        ack_limit: usize,
        fill: u8,
    }

    impl I2cBus for CountingBus {
        fn transaction(&mut self, _address: u8, direction: I2cDirection, data: &mut [u8]) -> usize {
            let n = data.len().min(self.ack_limit);
            if direction == I2cDirection::Read {
                for b in data[..n].iter_mut() {
                    *b = self.fill;
                }
            }
            n
        }
    }

    #[test]
    fn test_read_register_ok() {
        let mut bus = CountingBus {
            ack_limit: 8,
            fill: 0xAB,
        };
        let mut buf = [0u8; 6];
        assert_eq!(bus.read_register(0x19, 0x02, &mut buf), Ok(()));
        assert_eq!(buf, [0xAB; 6]);
    }

    #[test]
    fn test_zero_count_is_nack() {
        let mut bus = CountingBus {
            ack_limit: 0,
            fill: 0,
        };
        assert_eq!(bus.write_all(0x19, &mut [0x10, 0x08]), Err(I2cBusError::Nack));
    }

    #[test]
    fn test_short_read_is_bus_error() {
        let mut bus = CountingBus {
            ack_limit: 2,
            fill: 0,
        };
        let mut buf = [0u8; 6];
        assert_eq!(bus.read_register(0x19, 0x02, &mut buf), Err(I2cBusError::Bus));
    }

    #[derive(Debug)]
    struct HalError(ErrorKind);

    impl embedded_hal::i2c::Error for HalError {
        fn kind(&self) -> ErrorKind {
            self.0
        }
    }

    struct FailingHal(ErrorKind);

    impl ErrorType for FailingHal {
        type Error = HalError;
    }

    impl embedded_hal::i2c::I2c for FailingHal {
        fn transaction(
            &mut self,
            _address: u8,
            _operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            Err(HalError(self.0))
        }
    }

    #[test]
    fn test_embedded_hal_adapter_reports_zero_on_error() {
        let mut bus = EmbeddedHalBus::new(FailingHal(ErrorKind::NoAcknowledge(
            NoAcknowledgeSource::Address,
        )));
        let mut buf = [0u8; 2];
        assert_eq!(bus.transaction(0x19, I2cDirection::Read, &mut buf), 0);
        assert_eq!(bus.last_error(), Some(I2cBusError::Nack));
    }
}
