//! Device drivers for the TinyTag board
//!
//! Implementations of the `tinytag-core` device traits on top of the
//! `tinytag-hal` chip primitives:
//!
//! - BMA253 accelerometer ([`bma253`], blocking and async)
//! - 16-LED charlieplexed ring ([`ledring`])
//! - TC3 sample ticker ([`ticker`])

#![no_std]
#![deny(unsafe_code)]

pub mod bma253;
pub mod ledring;
pub mod ticker;

pub use bma253::{Bma253, Bma253Async, Bma253Error};
pub use ledring::LedRing;
pub use ticker::SampleTicker;

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use tinytag_core::config::TagConfig;
    use tinytag_core::radio::RadioMailbox;
    use tinytag_core::state::Command;
    use tinytag_core::testing::FakeRadio;
    use tinytag_core::OperatingState;
    use tinytag_hal::gpio::TristatePin;
    use tinytag_hal::i2c::{I2cBus, I2cDirection};
    use tinytag_hal::timer::PeriodicTimer;

    /// Accelerometer bus serving a fixed Z reading
    struct TiltBus {
        z: i16,
    }

    impl I2cBus for TiltBus {
        fn transaction(&mut self, _address: u8, direction: I2cDirection, data: &mut [u8]) -> usize {
            if direction == I2cDirection::Read {
                if data.len() == 1 {
                    data[0] = bma253::CHIP_ID;
                } else {
                    data.fill(0);
                    data[4..6].copy_from_slice(&(self.z << 4).to_le_bytes());
                }
            }
            data.len()
        }
    }

    struct Line;

    impl TristatePin for Line {
        fn drive_high(&mut self) {}
        fn drive_low(&mut self) {}
        fn float(&mut self) {}
    }

    #[derive(Default)]
    struct Counter {
        compare: u16,
    }

    impl PeriodicTimer for Counter {
        fn set_compare(&mut self, counts: u16) {
            self.compare = counts;
        }

        fn reset(&mut self) {}
    }

    #[test]
    fn test_tag_on_real_drivers() {
        let mut accel = Bma253::new(TiltBus { z: 128 });
        accel.init().unwrap();

        let mailbox = RadioMailbox::<NoopRawMutex>::new();
        let mut tag = tinytag_core::Tag::new(
            TagConfig::embedded().unwrap(),
            accel,
            FakeRadio::new(),
            LedRing::new([Line, Line, Line, Line, Line]),
            SampleTicker::new(Counter::default()),
            &mailbox,
        )
        .unwrap();
        tag.start().unwrap();
        assert_eq!(tag.timer().counts(), Some(256));

        let mut now = 0;
        for _ in 0..20 {
            now += 500;
            tag.tick(now);
        }
        assert_eq!(tag.state(), OperatingState::Idle);

        // Dropped on a table: a hard jolt
        tag.source_mut().bus_mut().z = 400;
        for _ in 0..3 {
            now += 500;
            tag.tick(now);
        }

        assert_eq!(tag.state(), OperatingState::Advertising);
        assert_eq!(tag.radio().count(Command::StartAdvertising), 1);
        assert_eq!(tag.leds().mask(), 0x0003);
        assert_eq!(tag.leds().lit(), Some(0));
        assert_eq!(tag.timer().counts(), Some(102));
    }
}
