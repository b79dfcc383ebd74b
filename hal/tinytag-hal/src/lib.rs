//! TinyTag Hardware Abstraction Layer
//!
//! This crate defines the chip-level primitives the tag's device drivers are
//! written against. A board support crate implements them for the actual MCU
//! (the reference board is a SAMD21 with a SERCOM I2C master and TC3 timer).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tinytag-core (decision logic)          │
//! └─────────────────────────────────────────┘
//!                     ▲ device traits
//! ┌─────────────────────────────────────────┐
//! │  tinytag-drivers (BMA253, LED ring, …)  │
//! └─────────────────────────────────────────┘
//!                     ▲ chip traits
//! ┌─────────────────────────────────────────┐
//! │  tinytag-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - Blocking I2C transactions
//! - [`gpio::TristatePin`] - Charlieplex line (drive high, drive low, float)
//! - [`timer::PeriodicTimer`] - Compare-match periodic interrupt timer

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use gpio::TristatePin;
pub use i2c::{I2cBus, I2cBusError, I2cDirection};
pub use timer::PeriodicTimer;
