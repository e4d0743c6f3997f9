// Licensed under the Apache-2.0 license

//! Interrupt-driven I2C slave byte transport.
//!
//! [`SlaveTransport`] turns the per-byte events a slave peripheral raises in
//! interrupt context into a polling byte stream for the main loop:
//!
//! - inbound bytes land in a [`RingBuffer`] over caller-supplied storage and are
//!   drained with [`SlaveTransport::read`];
//! - outbound data is a single caller-owned buffer armed with
//!   [`SlaveTransport::write`] and drip-fed to the transmitter one byte per
//!   `TxReady` event;
//! - four optional user handlers (error, tx-pending, tx-complete, rx-complete)
//!   run synchronously inside the interrupt and receive the transport itself,
//!   so a tx-pending handler can arm a reply on the spot.
//!
//! Nothing here blocks. `read` returns a short count when data is missing and
//! `write` fails with [`Error::Busy`] while a transfer is in flight.
//!
//! # Examples
//!
//! ```no_run
//! use scoreboard_ddk::common::NoOpLogger;
//! use scoreboard_ddk::i2c::common::{AddressMode, SlaveEvent};
//! use scoreboard_ddk::i2c::slave_async::SlaveTransport;
//! use scoreboard_ddk::sim::SimSlave;
//!
//! # fn example() -> Result<(), scoreboard_ddk::i2c::common::Error> {
//! let mut rx = [0u8; 16];
//! let mut slave = SlaveTransport::new(SimSlave::new(AddressMode::SevenBit), &mut rx, NoOpLogger)?;
//! slave.set_address(0x12)?;
//! slave.enable()?;
//!
//! // From the peripheral's interrupt:
//! slave.handle_event(SlaveEvent::ByteReceived(7));
//!
//! // From the main loop:
//! let mut cmd = [0u8; 1];
//! if slave.read(&mut cmd)? == 1 {
//!     assert_eq!(cmd[0], 7);
//! }
//! # Ok(())
//! # }
//! ```

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{
    BusState, CallbackKind, Error, IrqSource, SlaveEvent, DRIVER_VERSION, SEVEN_BIT_ADDRESS_MASK,
};
use crate::i2c::ring_buffer::RingBuffer;
use crate::i2c::traits::SlaveHardware;

/// User handler invoked from interrupt context.
///
/// Handlers must return quickly. They may call [`SlaveTransport::write`]
/// (the tx-pending reply path) and touch the hardware through
/// [`SlaveTransport::hardware_mut`].
pub type Callback<'a, H, L> = fn(&mut SlaveTransport<'a, H, L>);

struct Callbacks<'a, H: SlaveHardware, L: Logger> {
    error: Option<Callback<'a, H, L>>,
    tx_pending: Option<Callback<'a, H, L>>,
    tx_complete: Option<Callback<'a, H, L>>,
    rx_complete: Option<Callback<'a, H, L>>,
}

impl<H: SlaveHardware, L: Logger> Callbacks<'_, H, L> {
    const fn new() -> Self {
        Self {
            error: None,
            tx_pending: None,
            tx_complete: None,
            rx_complete: None,
        }
    }
}

fn hw_error<E: embedded_hal::i2c::Error>(err: E) -> Error {
    Error::Hardware(err.kind())
}

pub struct SlaveTransport<'a, H: SlaveHardware, L: Logger = NoOpLogger> {
    hardware: H,
    logger: L,
    rx: RingBuffer<'a>,
    /// Armed outbound buffer; empty when idle.
    tx_buf: &'a [u8],
    /// Index of the byte currently in the transmitter.
    tx_pos: usize,
    callbacks: Callbacks<'a, H, L>,
    enabled: bool,
    address: Option<u16>,
}

impl<'a, H: SlaveHardware, L: Logger> SlaveTransport<'a, H, L> {
    /// Bind `hardware` and back the receive queue with `rx_storage`.
    ///
    /// All interrupt sources are armed and the outbound side starts idle. The
    /// transport does not answer on the bus until [`enable`](Self::enable).
    ///
    /// # Errors
    /// - `Error::InvalidArgument` if `rx_storage` is empty
    /// - `Error::Hardware` if the peripheral fails to initialise
    pub fn new(mut hardware: H, rx_storage: &'a mut [u8], mut logger: L) -> Result<Self, Error> {
        let rx = RingBuffer::new(rx_storage)?;
        hardware.init().map_err(hw_error)?;
        for source in IrqSource::ALL {
            hardware.set_irq_state(source, true);
        }
        logger.debug(format_args!(
            "i2c slave bound, rx capacity {}",
            rx.capacity()
        ));

        Ok(Self {
            hardware,
            logger,
            rx,
            tx_buf: &[],
            tx_pos: 0,
            callbacks: Callbacks::new(),
            enabled: false,
            address: None,
        })
    }

    /// Release the peripheral and hand it back.
    ///
    /// # Errors
    /// Returns `Error::Hardware` if the peripheral refuses to shut down.
    pub fn deinit(mut self) -> Result<H, Error> {
        self.hardware.deinit().map_err(hw_error)?;
        self.logger.debug(format_args!("i2c slave released"));
        Ok(self.hardware)
    }

    /// Program the bus address.
    ///
    /// In 7-bit mode only the low seven bits are used; in 10-bit mode the value
    /// is programmed as given.
    ///
    /// # Errors
    /// Returns `Error::Hardware` if the address register cannot be written.
    pub fn set_address(&mut self, address: u16) -> Result<(), Error> {
        let programmed = if self.hardware.is_ten_bit_addressing() {
            address
        } else {
            address & SEVEN_BIT_ADDRESS_MASK
        };
        self.hardware.set_address(programmed).map_err(hw_error)?;
        self.address = Some(programmed);
        self.logger
            .debug(format_args!("i2c slave address {programmed:#05x}"));
        Ok(())
    }

    /// Start answering on the bus.
    ///
    /// # Errors
    /// Returns `Error::Hardware` if the peripheral cannot be enabled.
    pub fn enable(&mut self) -> Result<(), Error> {
        self.hardware.enable().map_err(hw_error)?;
        self.enabled = true;
        self.logger.debug(format_args!("i2c slave enabled"));
        Ok(())
    }

    /// Stop answering on the bus.
    ///
    /// Buffered inbound bytes and an in-flight outbound buffer are kept; use
    /// [`flush_rx`](Self::flush_rx) and [`abort_tx`](Self::abort_tx) to drop them.
    ///
    /// # Errors
    /// Returns `Error::Hardware` if the peripheral cannot be disabled.
    pub fn disable(&mut self) -> Result<(), Error> {
        self.hardware.disable().map_err(hw_error)?;
        self.enabled = false;
        self.logger.debug(format_args!("i2c slave disabled"));
        Ok(())
    }

    /// Install or clear a user handler.
    ///
    /// The matching interrupt source is armed while a handler that depends on
    /// it is installed and disarmed otherwise. Tx-pending and tx-complete share
    /// the transmit source, which stays armed while either one is installed.
    /// Slot and source change together inside one protected section.
    pub fn register_callback(&mut self, kind: CallbackKind, handler: Option<Callback<'a, H, L>>) {
        critical_section::with(|_| {
            match kind {
                CallbackKind::Error => self.callbacks.error = handler,
                CallbackKind::TxPending => self.callbacks.tx_pending = handler,
                CallbackKind::TxComplete => self.callbacks.tx_complete = handler,
                CallbackKind::RxComplete => self.callbacks.rx_complete = handler,
            }
            let source = kind.irq_source();
            let armed = match source {
                IrqSource::Tx => {
                    self.callbacks.tx_pending.is_some() || self.callbacks.tx_complete.is_some()
                }
                IrqSource::Error | IrqSource::RxComplete => handler.is_some(),
            };
            self.hardware.set_irq_state(source, armed);
        });
    }

    /// [`register_callback`](Self::register_callback) keyed by a raw slot number.
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` if `kind` names no handler slot.
    pub fn register_callback_raw(
        &mut self,
        kind: u8,
        handler: Option<Callback<'a, H, L>>,
    ) -> Result<(), Error> {
        let kind = CallbackKind::try_from(kind)?;
        self.register_callback(kind, handler);
        Ok(())
    }

    /// Discard every unread inbound byte.
    pub fn flush_rx(&mut self) {
        critical_section::with(|_| self.rx.flush());
    }

    /// Drop the armed outbound buffer and abort the hardware transmission.
    ///
    /// # Errors
    /// Returns `Error::Hardware` if the peripheral cannot abort.
    pub fn abort_tx(&mut self) -> Result<(), Error> {
        let (sent, len) = critical_section::with(|_| -> Result<(usize, usize), Error> {
            let progress = (self.tx_pos, self.tx_buf.len());
            self.tx_buf = &[];
            self.tx_pos = 0;
            self.hardware.abort_transmission().map_err(hw_error)?;
            Ok(progress)
        })?;
        if len != 0 {
            self.logger
                .debug(format_args!("i2c slave tx aborted at {sent}/{len}"));
        }
        Ok(())
    }

    /// Bus interaction state as reported by the peripheral.
    #[must_use]
    pub fn status(&self) -> BusState {
        self.hardware.status()
    }

    /// Number of inbound bytes waiting to be read.
    #[must_use]
    pub fn bytes_received(&self) -> usize {
        critical_section::with(|_| self.rx.len())
    }

    /// Index of the outbound byte currently in the transmitter; 0 when idle.
    #[must_use]
    pub fn bytes_sent(&self) -> usize {
        self.tx_pos
    }

    /// Whether an outbound buffer is armed and not yet fully shifted out.
    #[must_use]
    pub fn is_tx_busy(&self) -> bool {
        self.tx_pos != self.tx_buf.len()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last address programmed, after masking.
    #[must_use]
    pub fn address(&self) -> Option<u16> {
        self.address
    }

    #[must_use]
    pub fn rx_capacity(&self) -> usize {
        self.rx.capacity()
    }

    #[must_use]
    pub const fn version() -> u32 {
        DRIVER_VERSION
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    pub fn logger_mut(&mut self) -> &mut L {
        &mut self.logger
    }

    // --------------------------------------------------------------------
    // Byte-stream facade
    // --------------------------------------------------------------------

    /// Drain up to `buffer.len()` received bytes into `buffer`.
    ///
    /// Returns how many bytes were copied; 0 means nothing has arrived yet.
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` if `buffer` is empty.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
        if buffer.is_empty() {
            return Err(Error::InvalidArgument);
        }
        let available = critical_section::with(|_| self.rx.len());

        let mut was_read = 0;
        for slot in buffer.iter_mut().take(available) {
            match self.rx.get() {
                Ok(byte) => *slot = byte,
                Err(_) => break,
            }
            was_read += 1;
        }
        Ok(was_read)
    }

    /// Single-byte read in `nb` style; `WouldBlock` while nothing is queued.
    ///
    /// # Errors
    /// Returns `nb::Error::WouldBlock` if no byte is available.
    pub fn read_byte(&mut self) -> nb::Result<u8, Error> {
        match self.rx.get() {
            Ok(byte) => Ok(byte),
            Err(Error::Empty) => Err(nb::Error::WouldBlock),
            Err(err) => Err(nb::Error::Other(err)),
        }
    }

    /// Arm `buffer` for transmission and present its first byte.
    ///
    /// The buffer is borrowed, not copied: it stays referenced until the
    /// tx-complete handler runs or [`abort_tx`](Self::abort_tx) is called.
    /// Returns `buffer.len()`.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` if `buffer` is empty
    /// - `Error::Busy` if a previous buffer is still being shifted out
    pub fn write(&mut self, buffer: &'a [u8]) -> Result<usize, Error> {
        let Some(&first) = buffer.first() else {
            return Err(Error::InvalidArgument);
        };
        if self.is_tx_busy() {
            self.logger.debug(format_args!(
                "i2c slave write rejected, {}/{} in flight",
                self.tx_pos,
                self.tx_buf.len()
            ));
            return Err(Error::Busy);
        }

        self.tx_buf = buffer;
        self.tx_pos = 0;
        self.hardware.write_byte(first);
        Ok(buffer.len())
    }

    // --------------------------------------------------------------------
    // Interrupt context
    // --------------------------------------------------------------------

    /// Interrupt service entry: dispatch every event the peripheral has pending.
    pub fn on_interrupt(&mut self) {
        while let Some(event) = self.hardware.take_event() {
            self.handle_event(event);
        }
    }

    /// Dispatch one hardware event.
    pub fn handle_event(&mut self, event: SlaveEvent) {
        match event {
            SlaveEvent::Error => self.on_error(),
            SlaveEvent::TxReady => self.on_tx_ready(),
            SlaveEvent::ByteReceived(byte) => self.on_byte_received(byte),
        }
    }

    fn on_error(&mut self) {
        match self.callbacks.error {
            Some(handler) => handler(self),
            None => self
                .logger
                .error(format_args!("i2c slave bus error dropped, no handler")),
        }
    }

    fn on_tx_ready(&mut self) {
        if self.tx_buf.is_empty() {
            if let Some(handler) = self.callbacks.tx_pending {
                handler(self);
            }
            return;
        }

        self.tx_pos += 1;
        if let Some(&next) = self.tx_buf.get(self.tx_pos) {
            self.hardware.write_byte(next);
        } else {
            self.tx_buf = &[];
            self.tx_pos = 0;
            if let Some(handler) = self.callbacks.tx_complete {
                handler(self);
            }
        }
    }

    fn on_byte_received(&mut self, byte: u8) {
        self.rx.put(byte);
        if let Some(handler) = self.callbacks.rx_complete {
            handler(self);
        }
    }
}

impl<H: SlaveHardware, L: Logger> embedded_io::ErrorType for SlaveTransport<'_, H, L> {
    type Error = Error;
}

impl<H: SlaveHardware, L: Logger> embedded_io::ReadReady for SlaveTransport<'_, H, L> {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.bytes_received() > 0)
    }
}
