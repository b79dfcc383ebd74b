//! 16-LED charlieplexed ring
//!
//! Five GPIO lines drive sixteen LEDs. Each LED sits between an ordered pair
//! of lines: it lights when its anode line is driven high, its cathode line
//! is driven low and every other line is floating. Only one LED can be lit
//! at a time, so [`LedRing::refresh`] must be called fast enough for the
//! eye to merge the scan.
//!
//! | Line | Pin |
//! |---|---|
//! | 0 | PA06 |
//! | 1 | PA07 |
//! | 2 | PA15 |
//! | 3 | PA20 |
//! | 4 | PA21 |

use tinytag_core::traits::IndicatorSink;
use tinytag_hal::gpio::TristatePin;

/// Number of charlieplex lines
pub const LINE_COUNT: usize = 5;

/// Number of LEDs on the ring
pub const LED_COUNT: usize = 16;

/// (anode, cathode) line indices for D1..D16
const LEDS: [(usize, usize); LED_COUNT] = [
    (2, 3),
    (3, 2),
    (2, 4),
    (4, 2),
    (3, 4),
    (4, 3),
    (3, 0),
    (0, 3),
    (2, 0),
    (0, 2),
    (0, 4),
    (4, 0),
    (1, 4),
    (4, 1),
    (1, 0),
    (0, 1),
];

/// Charlieplexed LED ring
pub struct LedRing<P> {
    lines: [P; LINE_COUNT],
    mask: u16,
    /// LED to try first on the next refresh
    cursor: usize,
    lit: Option<usize>,
}

impl<P: TristatePin> LedRing<P> {
    /// Take the five lines (PA06, PA07, PA15, PA20, PA21 order), all released
    pub fn new(mut lines: [P; LINE_COUNT]) -> Self {
        for line in lines.iter_mut() {
            line.float();
        }

        Self {
            lines,
            mask: 0,
            cursor: 0,
            lit: None,
        }
    }

    /// Latched mask
    pub fn mask(&self) -> u16 {
        self.mask
    }

    /// LED currently lit (0 = D1)
    pub fn lit(&self) -> Option<usize> {
        self.lit
    }

    /// Light the next LED set in the mask
    pub fn refresh(&mut self) {
        self.release_all();

        let Some(led) = (0..LED_COUNT)
            .map(|offset| (self.cursor + offset) % LED_COUNT)
            .find(|&led| self.mask & (1 << led) != 0)
        else {
            return;
        };

        let (anode, cathode) = LEDS[led];
        self.lines[anode].drive_high();
        self.lines[cathode].drive_low();
        self.lit = Some(led);
        self.cursor = (led + 1) % LED_COUNT;
    }

    /// Release the lines, consuming the driver
    pub fn release(mut self) -> [P; LINE_COUNT] {
        self.release_all();
        self.lines
    }

    fn release_all(&mut self) {
        for line in self.lines.iter_mut() {
            line.float();
        }
        self.lit = None;
    }
}

impl<P: TristatePin> IndicatorSink for LedRing<P> {
    fn set_leds(&mut self, mask: u16) {
        self.mask = mask;
        self.cursor = 0;
        self.refresh();
    }
}
