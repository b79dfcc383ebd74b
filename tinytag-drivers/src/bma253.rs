//! Bosch BMA253 accelerometer
//!
//! Configured for the slowest bandwidth (7.81 Hz) and the widest range
//! (±16 g, 7.81 mg/LSB). Axis data is 12-bit, left-justified across an
//! LSB/MSB register pair, read in one six-byte burst.
//!
//! # Register usage
//!
//! | Register | Address | Value |
//! |---|---|---|
//! | BGW_CHIPID | 0x00 | reads 0xFA |
//! | ACCD_X_LSB .. ACCD_Z_MSB | 0x02..0x07 | axis data |
//! | PMU_RANGE | 0x0F | 0x0C (±16 g) |
//! | PMU_BW | 0x10 | 0x08 (7.81 Hz) |

use embedded_hal_async::i2c::{Error as _, ErrorKind, I2c};
use tinytag_core::sensor::AxisCounts;
use tinytag_core::traits::{MotionSource, RawAxes, SensorBusError};
use tinytag_hal::i2c::{I2cBus, I2cBusError, I2cDirection};

/// Default 7-bit bus address (SDO pulled low on the tag)
pub const ADDRESS: u8 = 0x19;

/// Value of the chip id register
pub const CHIP_ID: u8 = 0xFA;

/// Register addresses
pub mod reg {
    pub const CHIP_ID: u8 = 0x00;
    /// First of the six axis data registers
    pub const ACCD_X_LSB: u8 = 0x02;
    pub const PMU_RANGE: u8 = 0x0F;
    pub const PMU_BW: u8 = 0x10;
}

/// PMU_BW: 7.81 Hz filter bandwidth, 64 ms update time
pub const BW_7_81_HZ: u8 = 0x08;

/// PMU_RANGE: ±16 g
pub const RANGE_16G: u8 = 0x0C;

/// Errors from the accelerometer driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bma253Error {
    /// Bus transaction failed
    Bus(SensorBusError),
    /// Chip id register did not read [`CHIP_ID`]
    WrongDevice(u8),
}

impl From<SensorBusError> for Bma253Error {
    fn from(e: SensorBusError) -> Self {
        Bma253Error::Bus(e)
    }
}

fn from_bus(e: I2cBusError) -> SensorBusError {
    match e {
        I2cBusError::Nack => SensorBusError::Nack,
        I2cBusError::Timeout => SensorBusError::Timeout,
        I2cBusError::ArbitrationLost | I2cBusError::Bus => SensorBusError::Bus,
    }
}

fn from_kind(kind: ErrorKind) -> SensorBusError {
    match kind {
        ErrorKind::NoAcknowledge(_) => SensorBusError::Nack,
        ErrorKind::ArbitrationLoss | ErrorKind::Bus | ErrorKind::Overrun => SensorBusError::Bus,
        _ => SensorBusError::Timeout,
    }
}

/// Blocking driver over the board's count-returning [`I2cBus`]
pub struct Bma253<I> {
    bus: I,
    address: u8,
}

impl<I: I2cBus> Bma253<I> {
    pub fn new(bus: I) -> Self {
        Self::with_address(bus, ADDRESS)
    }

    pub fn with_address(bus: I, address: u8) -> Self {
        Self { bus, address }
    }

    /// Verify the chip id, then set bandwidth and range
    pub fn init(&mut self) -> Result<(), Bma253Error> {
        let id = self.chip_id()?;
        if id != CHIP_ID {
            return Err(Bma253Error::WrongDevice(id));
        }

        self.write_register(reg::PMU_BW, BW_7_81_HZ)?;
        self.write_register(reg::PMU_RANGE, RANGE_16G)?;
        Ok(())
    }

    pub fn chip_id(&mut self) -> Result<u8, SensorBusError> {
        let mut buf = [0u8; 1];
        self.bus
            .read_register(self.address, reg::CHIP_ID, &mut buf)
            .map_err(from_bus)?;
        Ok(buf[0])
    }

    /// Read all three axes
    pub fn read_xyz(&mut self) -> Result<AxisCounts, SensorBusError> {
        let raw = self.read_burst()?;
        Ok(AxisCounts::from_registers(&raw))
    }

    /// Borrow the bus
    pub fn bus_mut(&mut self) -> &mut I {
        &mut self.bus
    }

    /// Release the bus, consuming the driver
    pub fn release(self) -> I {
        self.bus
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorBusError> {
        self.bus
            .write_all(self.address, &mut [register, value])
            .map_err(from_bus)
    }

    fn read_burst(&mut self) -> Result<RawAxes, SensorBusError> {
        self.bus
            .write_all(self.address, &mut [reg::ACCD_X_LSB])
            .map_err(from_bus)?;

        let mut raw: RawAxes = [0; 6];
        match self.bus.transaction(self.address, I2cDirection::Read, &mut raw) {
            0 => Err(SensorBusError::Nack),
            n if n < raw.len() => Err(SensorBusError::ShortTransfer),
            _ => Ok(raw),
        }
    }
}

impl<I: I2cBus> MotionSource for Bma253<I> {
    fn read_raw(&mut self) -> Result<RawAxes, SensorBusError> {
        self.read_burst()
    }
}

/// Async driver over any `embedded-hal-async` I2C controller
pub struct Bma253Async<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Bma253Async<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            address: ADDRESS,
        }
    }

    /// Verify the chip id, then set bandwidth and range
    pub async fn init(&mut self) -> Result<(), Bma253Error> {
        let mut id = [0u8; 1];
        self.read(reg::CHIP_ID, &mut id).await?;
        if id[0] != CHIP_ID {
            return Err(Bma253Error::WrongDevice(id[0]));
        }

        self.write(reg::PMU_BW, BW_7_81_HZ).await?;
        self.write(reg::PMU_RANGE, RANGE_16G).await?;
        Ok(())
    }

    /// Read the six axis data registers in one burst
    pub async fn read_raw(&mut self) -> Result<RawAxes, SensorBusError> {
        let mut raw: RawAxes = [0; 6];
        self.read(reg::ACCD_X_LSB, &mut raw).await?;
        Ok(raw)
    }

    /// Read all three axes
    pub async fn read_xyz(&mut self) -> Result<AxisCounts, SensorBusError> {
        let raw = self.read_raw().await?;
        Ok(AxisCounts::from_registers(&raw))
    }

    /// Release the bus, consuming the driver
    pub fn release(self) -> I {
        self.i2c
    }

    async fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<(), SensorBusError> {
        self.i2c
            .write_read(self.address, &[register], buf)
            .await
            .map_err(|e| from_kind(e.kind()))
    }

    async fn write(&mut self, register: u8, value: u8) -> Result<(), SensorBusError> {
        self.i2c
            .write(self.address, &[register, value])
            .await
            .map_err(|e| from_kind(e.kind()))
    }
}
