// Licensed under the Apache-2.0 license

//! Interrupt-safe owner cell for a [`SlaveTransport`].
//!
//! A peripheral ISR is a free function with no arguments, so it needs a
//! `static` through which to reach its transport. [`SharedSlave`] is that
//! static: the main loop installs the transport once at startup and both sides
//! borrow it inside a critical section.
//!
//! ```rust,ignore
//! static I2C_SLAVE: SharedSlave<'static, Sercom0Slave> = SharedSlave::new();
//!
//! #[interrupt]
//! fn SERCOM0() {
//!     I2C_SLAVE.on_interrupt();
//! }
//!
//! fn main_loop() -> ! {
//!     loop {
//!         let mut cmd = [0u8; 1];
//!         if let Some(Ok(1)) = I2C_SLAVE.with(|slave| slave.read(&mut cmd)) {
//!             // handle cmd[0]
//!         }
//!     }
//! }
//! ```
//!
//! User handlers run while the cell is borrowed. They get the transport as an
//! argument and must not go back through the cell.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::slave_async::SlaveTransport;
use crate::i2c::traits::SlaveHardware;
use core::cell::RefCell;
use critical_section::Mutex;

pub struct SharedSlave<'a, H: SlaveHardware, L: Logger = NoOpLogger> {
    inner: Mutex<RefCell<Option<SlaveTransport<'a, H, L>>>>,
}

impl<'a, H: SlaveHardware, L: Logger> SharedSlave<'a, H, L> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Install `transport`, returning any previously installed one.
    pub fn install(&self, transport: SlaveTransport<'a, H, L>) -> Option<SlaveTransport<'a, H, L>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(transport))
    }

    /// Remove the transport, e.g. to `deinit` it.
    pub fn take(&self) -> Option<SlaveTransport<'a, H, L>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    /// ISR entry point. Does nothing until a transport is installed.
    pub fn on_interrupt(&self) {
        critical_section::with(|cs| {
            if let Some(transport) = self.inner.borrow_ref_mut(cs).as_mut() {
                transport.on_interrupt();
            }
        });
    }

    /// Run `f` against the installed transport with interrupts masked.
    ///
    /// Returns `None` if nothing is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut SlaveTransport<'a, H, L>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }
}

impl<H: SlaveHardware, L: Logger> Default for SharedSlave<'_, H, L> {
    fn default() -> Self {
        Self::new()
    }
}
