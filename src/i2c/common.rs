// Licensed under the Apache-2.0 license

//! Common types for the I2C slave transport.
//!
//! This module provides the shared error taxonomy, hardware event and interrupt
//! source identifiers, and bus status values used across the transport and the
//! hardware abstraction traits.

use embedded_hal::i2c::ErrorKind;

/// Version of the slave transport driver.
pub const DRIVER_VERSION: u32 = 0x0000_0001;

/// Mask applied to addresses when the peripheral runs in 7-bit mode.
pub const SEVEN_BIT_ADDRESS_MASK: u16 = 0x7F;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Malformed or missing parameter: empty buffers, zero capacity, unknown callback kind.
    InvalidArgument,
    /// A transmission is already in flight.
    Busy,
    /// Ring buffer holds no unread bytes.
    Empty,
    /// The peripheral layer reported a failure.
    Hardware(ErrorKind),
}

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Error::InvalidArgument => embedded_io::ErrorKind::InvalidInput,
            Error::Busy | Error::Empty | Error::Hardware(_) => embedded_io::ErrorKind::Other,
        }
    }
}

/// Addressing width of the peripheral.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddressMode {
    SevenBit,
    TenBit,
}

/// Bus interaction state as reported by the peripheral.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BusState {
    Idle,
    /// The master addressed us with the R/W bit set and is clocking bytes out.
    AddressedForRead,
    /// The master addressed us with the R/W bit clear and is sending bytes.
    AddressedForWrite,
    Error,
}

/// Discrete events the peripheral delivers from its interrupt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlaveEvent {
    Error,
    /// The current outbound byte has been shifted out; the transmitter wants the next one.
    TxReady,
    ByteReceived(u8),
}

/// Peripheral interrupt sources the transport arms and disarms.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum IrqSource {
    Error,
    Tx,
    RxComplete,
}

impl IrqSource {
    pub const ALL: [IrqSource; 3] = [IrqSource::Error, IrqSource::Tx, IrqSource::RxComplete];
}

/// User handler slots on the transport.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CallbackKind {
    Error = 0,
    TxPending = 1,
    TxComplete = 2,
    RxComplete = 3,
}

impl CallbackKind {
    /// Interrupt source that has to be armed for this handler to ever run.
    #[must_use]
    pub const fn irq_source(self) -> IrqSource {
        match self {
            CallbackKind::Error => IrqSource::Error,
            CallbackKind::TxPending | CallbackKind::TxComplete => IrqSource::Tx,
            CallbackKind::RxComplete => IrqSource::RxComplete,
        }
    }
}

impl TryFrom<u8> for CallbackKind {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Error> {
        match raw {
            0 => Ok(CallbackKind::Error),
            1 => Ok(CallbackKind::TxPending),
            2 => Ok(CallbackKind::TxComplete),
            3 => Ok(CallbackKind::RxComplete),
            _ => Err(Error::InvalidArgument),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::Error as _;

    #[test]
    fn test_callback_kind_from_raw() {
        assert_eq!(CallbackKind::try_from(0), Ok(CallbackKind::Error));
        assert_eq!(CallbackKind::try_from(3), Ok(CallbackKind::RxComplete));
        assert_eq!(CallbackKind::try_from(4), Err(Error::InvalidArgument));
        assert_eq!(CallbackKind::try_from(0xFF), Err(Error::InvalidArgument));
    }

    #[test]
    fn test_tx_handlers_share_one_source() {
        assert_eq!(CallbackKind::TxPending.irq_source(), IrqSource::Tx);
        assert_eq!(CallbackKind::TxComplete.irq_source(), IrqSource::Tx);
        assert_eq!(CallbackKind::RxComplete.irq_source(), IrqSource::RxComplete);
    }

    #[test]
    fn test_io_error_kinds() {
        assert_eq!(
            Error::InvalidArgument.kind(),
            embedded_io::ErrorKind::InvalidInput
        );
        assert_eq!(Error::Busy.kind(), embedded_io::ErrorKind::Other);
    }
}
