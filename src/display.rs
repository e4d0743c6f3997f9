// Licensed under the Apache-2.0 license

//! Seven-segment digit rendering.
//!
//! Segment letters follow the board silkscreen, which differs from the usual
//! datasheet lettering:
//!
//! ```text
//!  --E--
//! |     |
//! C     G
//! |--D--|
//! B     F
//! |     |
//!  --A--
//! ```

use crate::command::Command;
use embedded_hal::digital::{OutputPin, PinState};

pub const SEGMENT_A: u8 = 0x01;
pub const SEGMENT_B: u8 = 0x02;
pub const SEGMENT_C: u8 = 0x04;
pub const SEGMENT_D: u8 = 0x08;
pub const SEGMENT_E: u8 = 0x10;
pub const SEGMENT_F: u8 = 0x20;
pub const SEGMENT_G: u8 = 0x40;

pub const SEGMENT_COUNT: usize = 7;

const DIGITS: [u8; 10] = [
    SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_E | SEGMENT_F | SEGMENT_G,
    SEGMENT_F | SEGMENT_G,
    SEGMENT_A | SEGMENT_B | SEGMENT_D | SEGMENT_E | SEGMENT_G,
    SEGMENT_A | SEGMENT_D | SEGMENT_E | SEGMENT_F | SEGMENT_G,
    SEGMENT_C | SEGMENT_D | SEGMENT_F | SEGMENT_G,
    SEGMENT_A | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F,
    SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F,
    SEGMENT_E | SEGMENT_F | SEGMENT_G,
    SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F | SEGMENT_G,
    SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F | SEGMENT_G,
];

/// Segment mask for `command`; blank for anything but a digit.
#[must_use]
pub fn segments_for(command: Command) -> u8 {
    command
        .digit()
        .and_then(|d| DIGITS.get(usize::from(d)).copied())
        .unwrap_or(0)
}

/// Seven segment outputs, ordered A through G.
pub struct SegmentDisplay<P: OutputPin> {
    segments: [P; SEGMENT_COUNT],
}

impl<P: OutputPin> SegmentDisplay<P> {
    /// Take the segment pins and drive them all low.
    ///
    /// # Errors
    /// Returns the pin error if any segment cannot be driven.
    pub fn new(segments: [P; SEGMENT_COUNT]) -> Result<Self, P::Error> {
        let mut display = Self { segments };
        display.blank()?;
        Ok(display)
    }

    /// # Errors
    /// Returns the pin error if any segment cannot be driven.
    pub fn show(&mut self, command: Command) -> Result<(), P::Error> {
        self.show_mask(segments_for(command))
    }

    /// # Errors
    /// Returns the pin error if any segment cannot be driven.
    pub fn blank(&mut self) -> Result<(), P::Error> {
        self.show_mask(0)
    }

    /// Light exactly the segments set in `mask` (bit 0 = A).
    ///
    /// # Errors
    /// Returns the pin error if any segment cannot be driven.
    pub fn show_mask(&mut self, mask: u8) -> Result<(), P::Error> {
        for (bit, pin) in self.segments.iter_mut().enumerate() {
            pin.set_state(PinState::from(mask & (1 << bit) != 0))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPin;
    use core::cell::Cell;

    #[test]
    fn test_digit_patterns() {
        assert_eq!(segments_for(Command::Digit(0)), 0x77);
        assert_eq!(segments_for(Command::Digit(1)), 0x60);
        assert_eq!(segments_for(Command::Digit(2)), 0x5B);
        assert_eq!(segments_for(Command::Digit(3)), 0x79);
        assert_eq!(segments_for(Command::Digit(4)), 0x6C);
        assert_eq!(segments_for(Command::Digit(5)), 0x3D);
        assert_eq!(segments_for(Command::Digit(6)), 0x3F);
        assert_eq!(segments_for(Command::Digit(7)), 0x70);
        assert_eq!(segments_for(Command::Digit(8)), 0x7F);
        assert_eq!(segments_for(Command::Digit(9)), 0x7C);
    }

    #[test]
    fn test_non_digits_blank() {
        assert_eq!(segments_for(Command::Off), 0);
        assert_eq!(segments_for(Command::Unknown(0x42)), 0);
    }

    #[test]
    fn test_display_drives_pins() {
        let nets: [Cell<bool>; SEGMENT_COUNT] = Default::default();
        let pins = [
            SimPin::new(&nets[0]),
            SimPin::new(&nets[1]),
            SimPin::new(&nets[2]),
            SimPin::new(&nets[3]),
            SimPin::new(&nets[4]),
            SimPin::new(&nets[5]),
            SimPin::new(&nets[6]),
        ];
        let mut display = SegmentDisplay::new(pins).unwrap();
        assert!(nets.iter().all(|n| !n.get()));

        display.show(Command::Digit(1)).unwrap();
        let lit: Vec<bool> = nets.iter().map(Cell::get).collect();
        assert_eq!(lit, [false, false, false, false, false, true, true]);

        display.show(Command::Off).unwrap();
        assert!(nets.iter().all(|n| !n.get()));

        display.show(Command::Digit(8)).unwrap();
        assert!(nets.iter().all(Cell::get));
    }
}
