// Licensed under the Apache-2.0 license

//! Simulated I2C slave peripheral.
//!
//! Models the register-level behaviour the transport relies on: interrupt
//! source gating, in-order event delivery and the outbound data register. The
//! `master_*` methods play the part of the remote bus controller.

use crate::i2c::common::{AddressMode, BusState, IrqSource, SlaveEvent};
use crate::i2c::traits::{SlaveHardwareCore, SlaveHardwareInterrupts, SlaveHardwareTx};
use embedded_hal::i2c::ErrorKind;
use heapless::{Deque, Vec};

/// Depth of the pending interrupt event queue.
pub const EVENT_QUEUE_DEPTH: usize = 64;
/// Number of transmitted bytes retained for inspection.
pub const TX_LOG_DEPTH: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// Operation attempted before `init` or after `deinit`.
    NotBound,
    /// Peripheral configured to fail bring-up.
    InitFailed,
}

impl embedded_hal::i2c::Error for SimError {
    fn kind(&self) -> ErrorKind {
        match self {
            SimError::NotBound => ErrorKind::Other,
            SimError::InitFailed => ErrorKind::Bus,
        }
    }
}

pub struct SimSlave {
    mode: AddressMode,
    bound: bool,
    enabled: bool,
    address: Option<u16>,
    irq_error: bool,
    irq_tx: bool,
    irq_rx: bool,
    events: Deque<SlaveEvent, EVENT_QUEUE_DEPTH>,
    transmitted: Vec<u8, TX_LOG_DEPTH>,
    state: BusState,
    ack_armed: bool,
    aborts: usize,
    fail_init: bool,
}

impl SimSlave {
    #[must_use]
    pub fn new(mode: AddressMode) -> Self {
        Self {
            mode,
            bound: false,
            enabled: false,
            address: None,
            irq_error: false,
            irq_tx: false,
            irq_rx: false,
            events: Deque::new(),
            transmitted: Vec::new(),
            state: BusState::Idle,
            ack_armed: false,
            aborts: 0,
            fail_init: false,
        }
    }

    /// Make the next `init` fail, as a peripheral with a dead clock would.
    #[must_use]
    pub fn with_failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// The master writes `bytes` to us. Ignored while disabled.
    pub fn master_write(&mut self, bytes: &[u8]) {
        if !self.answering() {
            return;
        }
        self.state = BusState::AddressedForWrite;
        if self.irq_rx {
            for &byte in bytes {
                self.raise(SlaveEvent::ByteReceived(byte));
            }
        }
    }

    /// The master clocks `count` bytes out of us. Ignored while disabled.
    pub fn master_read(&mut self, count: usize) {
        if !self.answering() {
            return;
        }
        self.state = BusState::AddressedForRead;
        if self.irq_tx {
            for _ in 0..count {
                self.raise(SlaveEvent::TxReady);
            }
        }
    }

    /// The master releases the bus.
    pub fn master_stop(&mut self) {
        self.state = BusState::Idle;
    }

    /// Flag a bus error (collision, misplaced start/stop).
    pub fn bus_error(&mut self) {
        self.state = BusState::Error;
        if self.irq_error {
            self.raise(SlaveEvent::Error);
        }
    }

    /// Bytes presented to the transmitter so far, oldest first.
    #[must_use]
    pub fn transmitted(&self) -> &[u8] {
        &self.transmitted
    }

    #[must_use]
    pub fn programmed_address(&self) -> Option<u16> {
        self.address
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn irq_armed(&self, source: IrqSource) -> bool {
        match source {
            IrqSource::Error => self.irq_error,
            IrqSource::Tx => self.irq_tx,
            IrqSource::RxComplete => self.irq_rx,
        }
    }

    #[must_use]
    pub fn ack_armed(&self) -> bool {
        self.ack_armed
    }

    #[must_use]
    pub fn aborts(&self) -> usize {
        self.aborts
    }

    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn answering(&self) -> bool {
        self.bound && self.enabled
    }

    fn raise(&mut self, event: SlaveEvent) {
        // A full queue models an interrupt flag that is already pending.
        let _ = self.events.push_back(event);
    }

    fn require_bound(&self) -> Result<(), SimError> {
        if self.bound {
            Ok(())
        } else {
            Err(SimError::NotBound)
        }
    }
}

impl SlaveHardwareCore for SimSlave {
    type Error = SimError;

    fn init(&mut self) -> Result<(), Self::Error> {
        if self.fail_init {
            return Err(SimError::InitFailed);
        }
        self.bound = true;
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), Self::Error> {
        self.require_bound()?;
        self.bound = false;
        self.enabled = false;
        self.irq_error = false;
        self.irq_tx = false;
        self.irq_rx = false;
        self.events.clear();
        Ok(())
    }

    fn enable(&mut self) -> Result<(), Self::Error> {
        self.require_bound()?;
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        self.require_bound()?;
        self.enabled = false;
        Ok(())
    }

    fn set_address(&mut self, address: u16) -> Result<(), Self::Error> {
        self.require_bound()?;
        self.address = Some(address);
        Ok(())
    }

    fn is_ten_bit_addressing(&self) -> bool {
        self.mode == AddressMode::TenBit
    }

    fn status(&self) -> BusState {
        self.state
    }
}

impl SlaveHardwareTx for SimSlave {
    fn write_byte(&mut self, byte: u8) {
        if self.transmitted.is_full() {
            self.transmitted.remove(0);
        }
        let _ = self.transmitted.push(byte);
    }

    fn abort_transmission(&mut self) -> Result<(), Self::Error> {
        self.require_bound()?;
        self.aborts += 1;
        // Only pending transmit requests die with the transfer.
        let mut pending = core::mem::replace(&mut self.events, Deque::new());
        while let Some(event) = pending.pop_front() {
            if event != SlaveEvent::TxReady {
                let _ = self.events.push_back(event);
            }
        }
        if self.state == BusState::AddressedForRead {
            self.state = BusState::Idle;
        }
        Ok(())
    }

    fn arm_ack(&mut self) {
        self.ack_armed = true;
    }
}

impl SlaveHardwareInterrupts for SimSlave {
    fn set_irq_state(&mut self, source: IrqSource, enabled: bool) {
        match source {
            IrqSource::Error => self.irq_error = enabled,
            IrqSource::Tx => self.irq_tx = enabled,
            IrqSource::RxComplete => self.irq_rx = enabled,
        }
    }

    fn take_event(&mut self) -> Option<SlaveEvent> {
        self.events.pop_front()
    }
}
