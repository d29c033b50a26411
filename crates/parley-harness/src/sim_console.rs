//! Scripted console implementing the Console trait.
//!
//! Input bytes go through the real [`LineReader`], so overflow draining and
//! terminator handling are the production ones. Output is recorded in a
//! shared [`ConsoleLog`].

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    convert::Infallible,
    io::Cursor,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use parley_app::Console;
use parley_client::{LineOutcome, LineReader};
use parley_core::Output;

#[derive(Debug, Default)]
struct LogState {
    rendered: Vec<Output>,
    reads: usize,
}

/// Shared record of what a [`SimConsole`] saw and showed.
#[derive(Debug, Clone, Default)]
pub struct ConsoleLog {
    state: Arc<Mutex<LogState>>,
}

impl ConsoleLog {
    /// Everything rendered, in order.
    pub fn outputs(&self) -> Vec<Output> {
        self.lock().rendered.clone()
    }

    /// Rendered output as the terminal would show it, stdout and stderr
    /// interleaved.
    pub fn transcript(&self) -> String {
        self.lock().rendered.iter().map(ToString::to_string).collect()
    }

    /// Number of completed line reads.
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Console fed from an in-memory byte script.
#[derive(Debug)]
pub struct SimConsole {
    reader: LineReader<Cursor<Vec<u8>>>,
    /// When set, end of input never arrives; reads stay pending instead.
    hold_open: bool,
    log: ConsoleLog,
}

impl SimConsole {
    /// Console whose input is `input`, followed by end of input.
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        Self {
            reader: LineReader::new(Cursor::new(input.into())),
            hold_open: false,
            log: ConsoleLog::default(),
        }
    }

    /// Console whose input is `input`, after which the operator goes quiet
    /// without closing the input.
    pub fn held_open(input: impl Into<Vec<u8>>) -> Self {
        Self { hold_open: true, ..Self::new(input) }
    }

    /// Handle to the output record.
    pub fn log(&self) -> ConsoleLog {
        self.log.clone()
    }
}

impl Console for SimConsole {
    type Error = Infallible;

    async fn read_line(&mut self) -> LineOutcome {
        let outcome = self.reader.read_line().await;
        if self.hold_open && matches!(outcome, LineOutcome::EndOfInput) {
            return std::future::pending().await;
        }
        self.log.lock().reads += 1;
        outcome
    }

    fn render(&mut self, output: &Output) -> Result<(), Infallible> {
        self.log.lock().rendered.push(output.clone());
        Ok(())
    }
}
