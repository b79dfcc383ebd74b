//! Motion sample types

use crate::traits::RawAxes;

/// Accelerometer resolution: 7.81 mg per count (±16 g range)
pub const MICRO_G_PER_COUNT: i32 = 7_810;

/// Magnitude of 1 g in counts, the reading of a tag at rest in any orientation
pub const ONE_G_COUNTS: i32 = 1_000_000 / MICRO_G_PER_COUNT;

/// Signed acceleration counts per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisCounts {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl AxisCounts {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Decode a register burst (little-endian pairs, X then Y then Z)
    pub fn from_registers(raw: &RawAxes) -> Self {
        Self {
            x: axis_from_registers(raw[0], raw[1]),
            y: axis_from_registers(raw[2], raw[3]),
            z: axis_from_registers(raw[4], raw[5]),
        }
    }

    /// Axes as an array, X first
    pub const fn as_array(&self) -> [i16; 3] {
        [self.x, self.y, self.z]
    }

    /// Acceleration per axis in micro-g
    pub fn to_micro_g(&self) -> [i32; 3] {
        self.as_array().map(|a| a as i32 * MICRO_G_PER_COUNT)
    }
}

/// Convert an accelerometer data register pair to a signed count
///
/// The sensor left-justifies 12-bit two's complement data across the pair,
/// with status bits in the low nibble of the LSB register. Arithmetic shift
/// keeps the sign.
pub const fn axis_from_registers(lsb: u8, msb: u8) -> i16 {
    i16::from_le_bytes([lsb, msb]) >> 4
}

/// One accelerometer reading, stamped with the tick it was captured on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSample {
    pub axes: AxisCounts,
    /// Controller time at capture (ms)
    pub tick_ms: u32,
}
