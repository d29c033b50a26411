//! Stdio console.
//!
//! [`StdConsole`] reads operator lines from an async byte source through a
//! [`LineReader`] and writes output to two blocking writers, one for the
//! chat stream and one for errors. The process uses it over stdin, stdout
//! and stderr; tests use it over byte buffers.

use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use parley_app::Console;
use parley_client::{LineOutcome, LineReader};
use parley_core::Output;
use parley_proto::{DisplayName, MAX_NAME_LEN, ProtocolError};
use tokio::io::AsyncRead;

use crate::PromptError;

/// When to show the name and input prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PromptMode {
    /// Only when stdin is a terminal.
    #[default]
    Auto,
    /// Always.
    Always,
    /// Never.
    Never,
}

impl PromptMode {
    /// Whether prompts are shown, given whether input is interactive.
    pub fn shows_prompt(self, interactive: bool) -> bool {
        match self {
            Self::Auto => interactive,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Console over an async line source and two blocking writers.
#[derive(Debug)]
pub struct StdConsole<R, O, E> {
    reader: LineReader<R>,
    out: O,
    err: E,
    show_prompt: bool,
}

impl StdConsole<tokio::io::Stdin, io::Stdout, io::Stderr> {
    /// Console over the process's standard streams.
    pub fn stdio(mode: PromptMode) -> Self {
        let interactive = io::stdin().is_terminal();
        Self::new(tokio::io::stdin(), io::stdout(), io::stderr(), mode.shows_prompt(interactive))
    }
}

impl<R, O, E> StdConsole<R, O, E>
where
    R: AsyncRead + Unpin,
    O: Write,
    E: Write,
{
    /// Console over the given streams.
    pub fn new(input: R, out: O, err: E, show_prompt: bool) -> Self {
        Self { reader: LineReader::new(input), out, err, show_prompt }
    }

    /// Ask for a display name until a valid one is entered.
    ///
    /// Blank lines are skipped silently; names that are too long or contain
    /// control characters are rejected with a notice and asked for again.
    pub async fn prompt_display_name(&mut self) -> Result<DisplayName, PromptError> {
        loop {
            if self.show_prompt {
                write!(self.out, "Enter Username: ")?;
                self.out.flush()?;
            }

            match self.reader.read_line_within(MAX_NAME_LEN).await {
                LineOutcome::Line(text) => match DisplayName::new(text) {
                    Ok(name) => return Ok(name),
                    Err(ProtocolError::InvalidNameCharacter(c)) => {
                        tracing::debug!(?c, "username rejected");
                        writeln!(self.err, "Sorry, usernames cannot contain control characters.")?;
                    },
                    Err(err) => {
                        tracing::debug!(%err, "username rejected");
                        self.name_too_long()?;
                    },
                },
                LineOutcome::Empty => {},
                LineOutcome::TooLong => self.name_too_long()?,
                LineOutcome::EndOfInput => return Err(PromptError::EndOfInput),
                LineOutcome::Failed(err) => return Err(PromptError::Read(err)),
            }
        }
    }

    /// Greet the operator before connecting.
    pub fn banner(&mut self, name: &DisplayName) -> io::Result<()> {
        writeln!(self.out, "Hello, {name}. Let's try to connect to the server.")?;
        self.out.flush()
    }

    /// Whether the input prompt is shown.
    pub fn shows_prompt(&self) -> bool {
        self.show_prompt
    }

    /// Consume the console and return its writers.
    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }

    fn name_too_long(&mut self) -> io::Result<()> {
        writeln!(self.err, "Sorry, limit your username to {MAX_NAME_LEN} characters.")
    }

    fn write_output(&mut self, output: &Output) -> io::Result<()> {
        if matches!(output, Output::Prompt { .. }) && !self.show_prompt {
            return self.out.flush();
        }

        if output.is_error() {
            // Anything already on stdout (a prompt) goes first.
            self.out.flush()?;
            write!(self.err, "{output}")?;
            self.err.flush()
        } else {
            write!(self.out, "{output}")?;
            self.out.flush()
        }
    }
}

impl<R, O, E> Console for StdConsole<R, O, E>
where
    R: AsyncRead + Unpin,
    O: Write,
    E: Write,
{
    type Error = io::Error;

    async fn read_line(&mut self) -> LineOutcome {
        self.reader.read_line().await
    }

    fn render(&mut self, output: &Output) -> Result<(), io::Error> {
        self.write_output(output)
    }
}
