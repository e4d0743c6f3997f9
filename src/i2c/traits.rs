// Licensed under the Apache-2.0 license

//! # I2C Slave Hardware Abstraction Traits
//!
//! This module defines the composable traits the slave transport needs from a
//! serial peripheral. Each trait covers one concern so a register-level driver
//! (or a simulated peripheral in tests) implements only small, focused pieces.
//!
//! ## Trait Hierarchy
//!
//! ```text
//! SlaveHardwareCore (binding, address, enable, status)
//!     ├── SlaveHardwareTx (outbound byte presentation, abort, ACK policy)
//!     ├── SlaveHardwareInterrupts (interrupt source arming, event delivery)
//!     └── SlaveHardware (composite: core + tx + interrupts)
//! ```
//!
//! The peripheral never calls back into the transport. Instead its interrupt
//! service routine calls `SlaveTransport::on_interrupt`, which drains pending
//! [`SlaveEvent`]s through [`SlaveHardwareInterrupts::take_event`].

use crate::i2c::common::{BusState, IrqSource, SlaveEvent};

/// Core slave peripheral interface.
///
/// This is the foundation trait every slave peripheral provides: binding the
/// hardware, programming the address, and switching the bus interface on and off.
pub trait SlaveHardwareCore {
    /// Hardware-specific error type that implements embedded-hal error traits
    type Error: embedded_hal::i2c::Error + core::fmt::Debug;

    /// Bind the peripheral: clocks, pins and slave mode configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral cannot be brought up.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Release the peripheral. No events may be delivered afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral refuses to shut down.
    fn deinit(&mut self) -> Result<(), Self::Error>;

    /// Start answering on the bus.
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral is not bound.
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Stop answering on the bus.
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral is not bound.
    fn disable(&mut self) -> Result<(), Self::Error>;

    /// Program the address the peripheral answers to.
    ///
    /// The value is written as given. Masking for 7-bit mode is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error if the address register cannot be written.
    fn set_address(&mut self, address: u16) -> Result<(), Self::Error>;

    /// Whether the peripheral is strapped for 10-bit (extended) addressing.
    fn is_ten_bit_addressing(&self) -> bool;

    /// Current bus interaction state.
    fn status(&self) -> BusState;
}

/// Outbound data path.
pub trait SlaveHardwareTx: SlaveHardwareCore {
    /// Present a byte to the transmitter.
    ///
    /// Called from interrupt context; implementations must not block.
    fn write_byte(&mut self, byte: u8);

    /// Abort the current hardware-level transmission.
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral cannot release the bus.
    fn abort_transmission(&mut self) -> Result<(), Self::Error>;

    /// Configure the peripheral to acknowledge the next transaction.
    fn arm_ack(&mut self);
}

/// Interrupt source control and event delivery.
pub trait SlaveHardwareInterrupts: SlaveHardwareCore {
    /// Enable or disable one interrupt source.
    ///
    /// A disabled source must not produce events.
    fn set_irq_state(&mut self, source: IrqSource, enabled: bool);

    /// Next pending event, in the order the hardware raised them.
    ///
    /// Returns `None` once every pending event has been consumed.
    fn take_event(&mut self) -> Option<SlaveEvent>;
}

/// Complete slave peripheral interface used by the transport.
pub trait SlaveHardware: SlaveHardwareCore + SlaveHardwareTx + SlaveHardwareInterrupts {}

/// Blanket implementation: any type implementing core + tx + interrupts is a slave peripheral
impl<T> SlaveHardware for T where T: SlaveHardwareCore + SlaveHardwareTx + SlaveHardwareInterrupts {}
