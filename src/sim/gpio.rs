// Licensed under the Apache-2.0 license

//! Simulated GPIO lines.
//!
//! A [`SimPin`] is a handle onto a shared [`Cell`] representing the electrical
//! level of a net. Two pins built over the same cell behave as if wired
//! together, which is how a fitted address jumper is modelled.

use core::cell::Cell;
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

#[derive(Clone, Copy)]
pub struct SimPin<'a> {
    net: &'a Cell<bool>,
}

impl<'a> SimPin<'a> {
    #[must_use]
    pub fn new(net: &'a Cell<bool>) -> Self {
        Self { net }
    }
}

impl ErrorType for SimPin<'_> {
    type Error = Infallible;
}

impl OutputPin for SimPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.net.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.net.set(true);
        Ok(())
    }
}

impl StatefulOutputPin for SimPin<'_> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.net.get())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.net.get())
    }
}

impl InputPin for SimPin<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.net.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.net.get())
    }
}
