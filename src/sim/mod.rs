// Licensed under the Apache-2.0 license

//! Software models of the board peripherals, used by host tests and the
//! `scoreboard-sim` demo.

pub mod gpio;
pub mod i2c;

pub use gpio::SimPin;
pub use i2c::{SimError, SimSlave};
