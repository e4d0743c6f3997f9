// Licensed under the Apache-2.0 license

//! Shared driver plumbing: the logger abstraction threaded through drivers.
//!
//! Drivers take a `L: Logger` type parameter defaulting to [`NoOpLogger`], so a
//! release build pays nothing for logging while a board bring-up build can route
//! records to a UART through [`IoLogger`].

use core::fmt;

/// Sink for driver log records.
pub trait Logger {
    fn debug(&mut self, args: fmt::Arguments<'_>);
    fn error(&mut self, args: fmt::Arguments<'_>);
}

/// Logger that discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&mut self, _args: fmt::Arguments<'_>) {}
    fn error(&mut self, _args: fmt::Arguments<'_>) {}
}

/// Logger writing one line per record to an `embedded-io` sink.
///
/// Write failures are ignored: a broken log channel must never take the bus down.
pub struct IoLogger<W: embedded_io::Write> {
    writer: W,
}

impl<W: embedded_io::Write> IoLogger<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: embedded_io::Write> Logger for IoLogger<W> {
    fn debug(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.writer.write_fmt(format_args!("[debug] {args}\r\n"));
    }

    fn error(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.writer.write_fmt(format_args!("[error] {args}\r\n"));
    }
}
