// Licensed under the Apache-2.0 license

//! Bus address discovery from solder-jumper straps.
//!
//! Each strap bridges two segment lines. At boot one side is driven high and
//! the other sensed; a fitted jumper reads back high. Three straps give a
//! 3-bit offset added to the base address:
//!
//! | Strap | Drive | Sense | Offset bit |
//! |-------|-------|-------|------------|
//! | ADDR1 | B     | C     | 1          |
//! | ADDR2 | D     | E     | 2          |
//! | ADDR3 | A     | G     | 4          |
//!
//! Discovery runs once at boot, before the segment lines are handed to the
//! display.

use embedded_hal::digital::{InputPin, OutputPin};

/// Base bus address with no jumpers fitted.
pub const IIC_BASE_ADDRESS: u8 = 0x10;

pub const STRAP_COUNT: usize = 3;

const OFFSET_MASK: u8 = (1 << STRAP_COUNT) - 1;

/// One jumper: a driven line and the line it may be bridged to.
pub struct StrapProbe<O, I> {
    drive: O,
    sense: I,
}

impl<O, I> StrapProbe<O, I>
where
    O: OutputPin,
    I: InputPin<Error = O::Error>,
{
    pub fn new(drive: O, sense: I) -> Self {
        Self { drive, sense }
    }

    /// Drive high, sample, and drive low again.
    ///
    /// # Errors
    /// Returns the pin error if either line fails.
    pub fn is_fitted(&mut self) -> Result<bool, O::Error> {
        self.drive.set_high()?;
        let fitted = self.sense.is_high();
        self.drive.set_low()?;
        fitted
    }
}

/// Read all straps into a 3-bit offset; ADDR1 is bit 0.
///
/// # Errors
/// Returns the first pin error encountered.
pub fn discover_offset<O, I>(probes: &mut [StrapProbe<O, I>; STRAP_COUNT]) -> Result<u8, O::Error>
where
    O: OutputPin,
    I: InputPin<Error = O::Error>,
{
    let mut offset = 0;
    for (bit, probe) in probes.iter_mut().enumerate() {
        if probe.is_fitted()? {
            offset |= 1 << bit;
        }
    }
    Ok(offset)
}

/// # Errors
/// Returns the first pin error encountered.
pub fn discover_address<O, I>(
    base: u8,
    probes: &mut [StrapProbe<O, I>; STRAP_COUNT],
) -> Result<u8, O::Error>
where
    O: OutputPin,
    I: InputPin<Error = O::Error>,
{
    discover_offset(probes).map(|offset| address_from_offset(base, offset))
}

#[must_use]
pub const fn address_from_offset(base: u8, offset: u8) -> u8 {
    base.wrapping_add(offset & OFFSET_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPin;
    use core::cell::Cell;

    struct Board {
        // Each strap has a drive net and a sense net; a fitted jumper uses one net for both.
        drive: [Cell<bool>; STRAP_COUNT],
        sense: [Cell<bool>; STRAP_COUNT],
        fitted: [bool; STRAP_COUNT],
    }

    impl Board {
        fn new(fitted: [bool; STRAP_COUNT]) -> Self {
            Self {
                drive: Default::default(),
                sense: Default::default(),
                fitted,
            }
        }

        fn probe(&self, i: usize) -> StrapProbe<SimPin<'_>, SimPin<'_>> {
            let sense = if self.fitted[i] { &self.drive[i] } else { &self.sense[i] };
            StrapProbe::new(SimPin::new(&self.drive[i]), SimPin::new(sense))
        }

        fn probes(&self) -> [StrapProbe<SimPin<'_>, SimPin<'_>>; STRAP_COUNT] {
            [self.probe(0), self.probe(1), self.probe(2)]
        }
    }

    #[test]
    fn test_no_jumpers_gives_base() {
        let board = Board::new([false; 3]);
        let mut probes = board.probes();
        assert_eq!(discover_address(IIC_BASE_ADDRESS, &mut probes).unwrap(), 0x10);
    }

    #[test]
    fn test_each_strap_sets_its_bit() {
        for (i, expected) in [(0, 0x11), (1, 0x12), (2, 0x14)] {
            let mut fitted = [false; 3];
            fitted[i] = true;
            let board = Board::new(fitted);
            let mut probes = board.probes();
            assert_eq!(discover_address(IIC_BASE_ADDRESS, &mut probes).unwrap(), expected);
        }
    }

    #[test]
    fn test_all_jumpers() {
        let board = Board::new([true; 3]);
        let mut probes = board.probes();
        assert_eq!(discover_offset(&mut probes).unwrap(), 7);
        assert_eq!(discover_address(IIC_BASE_ADDRESS, &mut probes).unwrap(), 0x17);
    }

    #[test]
    fn test_probe_leaves_drive_low() {
        let board = Board::new([true, false, true]);
        let mut probes = board.probes();
        discover_offset(&mut probes).unwrap();
        assert!(board.drive.iter().all(|n| !n.get()));
    }

    #[test]
    fn test_offset_is_three_bits() {
        assert_eq!(address_from_offset(0x10, 0x0D), 0x15);
        assert_eq!(address_from_offset(0x20, 3), 0x23);
    }
}
