// Licensed under the Apache-2.0 license

//! I2C slave driver module.
//!
//! This module provides an interrupt-driven slave-side byte transport for a
//! two-wire serial peripheral, designed for bare-metal and `no_std` targets.
//! Register-level peripheral access sits behind the traits in [`traits`]; the
//! transport in [`slave_async`] builds a polling byte stream on top of them.

pub mod common;
pub mod ring_buffer;
pub mod shared;
pub mod slave_async;
pub mod traits;

pub use common::{AddressMode, BusState, CallbackKind, Error, IrqSource, SlaveEvent};
pub use shared::SharedSlave;
pub use slave_async::{Callback, SlaveTransport};
pub use traits::{SlaveHardware, SlaveHardwareCore, SlaveHardwareInterrupts, SlaveHardwareTx};
