// Licensed under the Apache-2.0 license

//! Host run of the scoreboard firmware against simulated peripherals.

use core::cell::Cell;
use core::convert::Infallible;
use embedded_io::Write;
use fugit::MillisDurationU32;
use std::io::Write as _;

use scoreboard_ddk::address::{discover_address, StrapProbe};
use scoreboard_ddk::app::{poll_command, setup_slave};
use scoreboard_ddk::common::IoLogger;
use scoreboard_ddk::config::{ScoreboardConfigBuilder, RX_BUFFER_SIZE};
use scoreboard_ddk::display::{segments_for, SegmentDisplay, SEGMENT_COUNT};
use scoreboard_ddk::heartbeat::{Heartbeat, HeartbeatConfig};
use scoreboard_ddk::i2c::{Callback, CallbackKind, IrqSource, SharedSlave, SlaveTransport};
use scoreboard_ddk::sim::{SimPin, SimSlave};

const TICKS_PER_STEP: usize = 2_000;

struct Console;

impl embedded_io::ErrorType for Console {
    type Error = Infallible;
}

impl embedded_io::Write for Console {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let _ = std::io::stdout().write_all(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let _ = std::io::stdout().flush();
        Ok(())
    }
}

type Slave<'a> = SlaveTransport<'a, SimSlave, IoLogger<Console>>;

static STATUS: [u8; 2] = *b"SB";

fn on_tx_pending(slave: &mut Slave<'_>) {
    let _ = slave.write(&STATUS);
}

fn render(mask: u8) -> String {
    "ABCDEFG"
        .chars()
        .enumerate()
        .map(|(bit, name)| if mask & (1 << bit) != 0 { name } else { '.' })
        .collect()
}

fn main() {
    let mut console = Console;
    writeln!(console, "\r\nscoreboard-sim\r").unwrap();

    let config = ScoreboardConfigBuilder::new()
        .heartbeat(HeartbeatConfig {
            startup_delay: MillisDurationU32::from_ticks(5),
            ..HeartbeatConfig::default()
        })
        .build();

    // ADDR1 and ADDR3 fitted, ADDR2 open.
    let straps: [Cell<bool>; 4] = Default::default();
    let mut probes = [
        StrapProbe::new(SimPin::new(&straps[0]), SimPin::new(&straps[0])),
        StrapProbe::new(SimPin::new(&straps[1]), SimPin::new(&straps[2])),
        StrapProbe::new(SimPin::new(&straps[3]), SimPin::new(&straps[3])),
    ];
    let address = discover_address(config.base_address, &mut probes).unwrap();
    writeln!(console, "strapped address {address:#04x}\r").unwrap();

    let segments: [Cell<bool>; SEGMENT_COUNT] = Default::default();
    let mut display = SegmentDisplay::new([
        SimPin::new(&segments[0]),
        SimPin::new(&segments[1]),
        SimPin::new(&segments[2]),
        SimPin::new(&segments[3]),
        SimPin::new(&segments[4]),
        SimPin::new(&segments[5]),
        SimPin::new(&segments[6]),
    ])
    .unwrap();

    let led_net = Cell::new(true);
    let mut led = SimPin::new(&led_net);
    let mut heartbeat = config.heartbeat.map(Heartbeat::new);

    let mut rx = [0u8; RX_BUFFER_SIZE];
    let mut transport = SlaveTransport::new(
        SimSlave::new(config.address_mode),
        &mut rx,
        IoLogger::new(Console),
    )
    .unwrap();
    setup_slave(&mut transport, address).unwrap();
    let status_handler: Callback<'_, SimSlave, IoLogger<Console>> = on_tx_pending;
    transport.register_callback(CallbackKind::TxPending, Some(status_handler));

    let shared = SharedSlave::new();
    shared.install(transport);

    let script: [&[u8]; 5] = [&[3], &[7], &[0xFF], &[0x2A], &[1, 9]];
    for bytes in script {
        shared.with(|slave| {
            slave.hardware_mut().master_write(bytes);
            slave.hardware_mut().master_stop();
        });
        shared.on_interrupt();

        while let Some(Ok(Some(command))) = shared.with(|slave| poll_command(slave, &mut display)) {
            writeln!(
                console,
                "command {command:?} -> [{}]\r",
                render(segments_for(command))
            )
            .unwrap();
        }

        if let Some(hb) = heartbeat.as_mut() {
            for _ in 0..TICKS_PER_STEP {
                hb.tick(&mut led).unwrap();
            }
            writeln!(console, "heartbeat level {}\r", hb.level()).unwrap();
        }
    }

    shared.with(|slave| slave.hardware_mut().master_read(STATUS.len() + 1));
    shared.on_interrupt();
    if let Some(sent) = shared.with(|slave| slave.hardware().transmitted().to_vec()) {
        writeln!(console, "master read {sent:02x?}\r").unwrap();
    }

    shared.with(|slave| slave.hardware_mut().bus_error());
    shared.on_interrupt();
    let error_armed = shared.with(|slave| slave.hardware().irq_armed(IrqSource::Error));
    writeln!(console, "after bus error, error irq armed: {error_armed:?}\r").unwrap();

    let sim = shared.take().unwrap().deinit().unwrap();
    writeln!(console, "released, bound: {}\r", sim.is_bound()).unwrap();
}
