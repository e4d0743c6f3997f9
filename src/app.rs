// Licensed under the Apache-2.0 license

//! Scoreboard application glue: transport bring-up, bus callbacks and the
//! command loop body.

use crate::command::Command;
use crate::common::Logger;
use crate::display::SegmentDisplay;
use crate::i2c::common::{CallbackKind, Error, IrqSource};
use crate::i2c::slave_async::{Callback, SlaveTransport};
use crate::i2c::traits::SlaveHardware;
use embedded_hal::digital::OutputPin;

/// Install the scoreboard callbacks, program `address` and go live.
///
/// # Errors
/// Propagates transport errors from address programming or enabling.
pub fn setup_slave<'a, H: SlaveHardware, L: Logger>(
    slave: &mut SlaveTransport<'a, H, L>,
    address: u8,
) -> Result<(), Error> {
    let error_handler: Callback<'a, H, L> = on_bus_error;
    let tx_handler: Callback<'a, H, L> = on_tx_complete;
    slave.register_callback(CallbackKind::Error, Some(error_handler));
    slave.register_callback(CallbackKind::TxComplete, Some(tx_handler));
    slave.set_address(u16::from(address))?;
    slave.enable()?;
    slave
        .logger_mut()
        .debug(format_args!("scoreboard listening on {address:#04x}"));
    Ok(())
}

/// Bus error: silence the error source so a stuck bus cannot storm the CPU.
pub fn on_bus_error<H: SlaveHardware, L: Logger>(slave: &mut SlaveTransport<'_, H, L>) {
    slave.hardware_mut().set_irq_state(IrqSource::Error, false);
    slave
        .logger_mut()
        .error(format_args!("i2c bus error, error interrupt disabled"));
}

/// Reply finished: re-arm acknowledge for the next transfer.
pub fn on_tx_complete<H: SlaveHardware, L: Logger>(slave: &mut SlaveTransport<'_, H, L>) {
    slave.hardware_mut().arm_ack();
}

/// Pop one command byte, if any.
pub fn next_command<H: SlaveHardware, L: Logger>(
    slave: &mut SlaveTransport<'_, H, L>,
) -> Option<Command> {
    let mut buf = [0u8; 1];
    match slave.read(&mut buf) {
        Ok(1) => {
            let [byte] = buf;
            Some(Command::from(byte))
        }
        _ => None,
    }
}

/// One pass of the main loop: apply the next pending command to `display`.
///
/// # Errors
/// Returns the pin error if the display cannot be driven.
pub fn poll_command<H: SlaveHardware, L: Logger, P: OutputPin>(
    slave: &mut SlaveTransport<'_, H, L>,
    display: &mut SegmentDisplay<P>,
) -> Result<Option<Command>, P::Error> {
    let Some(command) = next_command(slave) else {
        return Ok(None);
    };
    if let Command::Unknown(byte) = command {
        slave
            .logger_mut()
            .debug(format_args!("unknown command {byte:#04x}, blanking"));
    }
    display.show(command)?;
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::NoOpLogger;
    use crate::display::{segments_for, SEGMENT_COUNT};
    use crate::i2c::common::{AddressMode, BusState};
    use crate::sim::{SimPin, SimSlave};
    use core::cell::Cell;

    fn lit_mask(nets: &[Cell<bool>; SEGMENT_COUNT]) -> u8 {
        nets.iter()
            .enumerate()
            .filter(|(_, n)| n.get())
            .fold(0, |mask, (bit, _)| mask | (1 << bit))
    }

    fn pins(nets: &[Cell<bool>; SEGMENT_COUNT]) -> [SimPin<'_>; SEGMENT_COUNT] {
        [
            SimPin::new(&nets[0]),
            SimPin::new(&nets[1]),
            SimPin::new(&nets[2]),
            SimPin::new(&nets[3]),
            SimPin::new(&nets[4]),
            SimPin::new(&nets[5]),
            SimPin::new(&nets[6]),
        ]
    }

    #[test]
    fn test_setup_programs_and_enables() {
        let mut rx = [0u8; 16];
        let mut slave =
            SlaveTransport::new(SimSlave::new(AddressMode::SevenBit), &mut rx, NoOpLogger).unwrap();
        setup_slave(&mut slave, 0x15).unwrap();
        assert!(slave.is_enabled());
        assert_eq!(slave.address(), Some(0x15));
        assert_eq!(slave.hardware().programmed_address(), Some(0x15));
        assert!(slave.hardware().irq_armed(IrqSource::Error));
        assert!(slave.hardware().irq_armed(IrqSource::Tx));
    }

    #[test]
    fn test_bus_error_disarms_error_source() {
        let mut rx = [0u8; 16];
        let mut slave =
            SlaveTransport::new(SimSlave::new(AddressMode::SevenBit), &mut rx, NoOpLogger).unwrap();
        setup_slave(&mut slave, 0x10).unwrap();

        slave.hardware_mut().bus_error();
        slave.on_interrupt();
        assert!(!slave.hardware().irq_armed(IrqSource::Error));
        assert_eq!(slave.status(), BusState::Error);

        // A second fault raises nothing now that the source is off.
        slave.hardware_mut().bus_error();
        assert_eq!(slave.hardware().pending_events(), 0);
    }

    #[test]
    fn test_tx_complete_rearms_ack() {
        static REPLY: [u8; 2] = [0x01, 0x02];
        let mut rx = [0u8; 16];
        let mut slave =
            SlaveTransport::new(SimSlave::new(AddressMode::SevenBit), &mut rx, NoOpLogger).unwrap();
        setup_slave(&mut slave, 0x10).unwrap();

        slave.write(&REPLY).unwrap();
        assert!(!slave.hardware().ack_armed());
        slave.hardware_mut().master_read(2);
        slave.on_interrupt();
        assert!(!slave.is_tx_busy());
        assert!(slave.hardware().ack_armed());
        assert_eq!(slave.hardware().transmitted(), &REPLY);
    }

    #[test]
    fn test_poll_applies_commands_in_order() {
        let nets: [Cell<bool>; SEGMENT_COUNT] = Default::default();
        let mut display = SegmentDisplay::new(pins(&nets)).unwrap();
        let mut rx = [0u8; 16];
        let mut slave =
            SlaveTransport::new(SimSlave::new(AddressMode::SevenBit), &mut rx, NoOpLogger).unwrap();
        setup_slave(&mut slave, 0x10).unwrap();

        assert_eq!(poll_command(&mut slave, &mut display).unwrap(), None);

        slave.hardware_mut().master_write(&[3, 0xFF, 0x2A, 9]);
        slave.on_interrupt();

        assert_eq!(poll_command(&mut slave, &mut display).unwrap(), Some(Command::Digit(3)));
        assert_eq!(lit_mask(&nets), segments_for(Command::Digit(3)));

        assert_eq!(poll_command(&mut slave, &mut display).unwrap(), Some(Command::Off));
        assert_eq!(lit_mask(&nets), 0);

        display.show(Command::Digit(8)).unwrap();
        assert_eq!(
            poll_command(&mut slave, &mut display).unwrap(),
            Some(Command::Unknown(0x2A))
        );
        assert_eq!(lit_mask(&nets), 0);

        assert_eq!(poll_command(&mut slave, &mut display).unwrap(), Some(Command::Digit(9)));
        assert_eq!(lit_mask(&nets), 0x7C);
        assert_eq!(poll_command(&mut slave, &mut display).unwrap(), None);
    }
}
