//! Bounded line reads from the operator.
//!
//! [`LineReader`] splits an async byte source into newline-terminated lines
//! without ever holding more than one line limit (plus one read) in memory.
//! A line over the limit is drained up to and including its newline before
//! [`LineOutcome::TooLong`] is reported, so the next read always starts at a
//! line boundary.
//!
//! # Cancellation
//!
//! All progress lives in the reader's own buffer and flags. Dropping a
//! `read_line` future (for example when another `select!` branch wins) loses
//! no input; the next call resumes where the previous one stopped.

use std::io;

use bytes::{Buf, BytesMut};
use parley_proto::MAX_TEXT_LEN;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Bytes requested from the source per read.
const READ_CHUNK: usize = 1024;

/// Result of reading one line.
#[derive(Debug)]
pub enum LineOutcome {
    /// A blank line.
    Empty,
    /// A line, without its line terminator.
    Line(String),
    /// A line over the limit. Its bytes have been discarded.
    TooLong,
    /// The source is exhausted.
    EndOfInput,
    /// Reading the source failed.
    Failed(io::Error),
}

/// Newline-delimited reader with an overflow limit.
#[derive(Debug)]
pub struct LineReader<R> {
    source: R,
    buffer: BytesMut,
    limit: usize,
    /// Inside an overlong line, dropping bytes until the next newline.
    discarding: bool,
    eof: bool,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    /// Reader with the message limit, [`MAX_TEXT_LEN`].
    pub fn new(source: R) -> Self {
        Self::with_limit(source, MAX_TEXT_LEN)
    }

    /// Reader whose lines may hold at most `limit` bytes.
    pub fn with_limit(source: R, limit: usize) -> Self {
        Self {
            source,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            limit,
            discarding: false,
            eof: false,
        }
    }

    /// Default line limit in bytes.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Bytes read from the source but not yet returned.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Read the next line under the default limit.
    pub async fn read_line(&mut self) -> LineOutcome {
        self.read_line_within(self.limit).await
    }

    /// Read the next line, allowing at most `limit` bytes of text.
    ///
    /// Shares the buffer with [`Self::read_line`], so bytes read ahead by
    /// one call are seen by the next regardless of the limit used.
    pub async fn read_line_within(&mut self, limit: usize) -> LineOutcome {
        loop {
            if let Some(outcome) = self.take_line(limit) {
                return outcome;
            }

            self.buffer.reserve(READ_CHUNK);
            match self.source.read_buf(&mut self.buffer).await {
                Ok(0) => self.eof = true,
                Ok(_) => {},
                Err(err)
                    if matches!(
                        err.kind(),
                        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                    ) =>
                {
                    tracing::trace!(%err, "input read retried");
                },
                Err(err) => return LineOutcome::Failed(err),
            }
        }
    }

    /// Consume the reader and return the source.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Produce an outcome from buffered bytes, or `None` if more input is
    /// needed.
    fn take_line(&mut self, limit: usize) -> Option<LineOutcome> {
        let newline = self.buffer.iter().position(|&b| b == b'\n');

        if self.discarding {
            match newline {
                Some(pos) => self.buffer.advance(pos + 1),
                None if self.eof => self.buffer.clear(),
                None => {
                    self.buffer.clear();
                    return None;
                },
            }
            self.discarding = false;
            return Some(LineOutcome::TooLong);
        }

        if let Some(pos) = newline {
            let line = self.buffer.split_to(pos + 1);
            return Some(classify(&line[..pos], limit));
        }

        if self.eof {
            if self.buffer.is_empty() {
                return Some(LineOutcome::EndOfInput);
            }
            let line = self.buffer.split();
            return Some(classify(&line, limit));
        }

        // One byte of slack for a carriage return whose newline has not
        // arrived yet.
        let overflowed = self.buffer.len() > limit + 1
            || (self.buffer.len() == limit + 1 && self.buffer[limit] != b'\r');
        if overflowed {
            tracing::debug!(buffered = self.buffer.len(), limit, "input line over limit, draining");
            self.buffer.clear();
            self.discarding = true;
        }

        None
    }
}

fn classify(line: &[u8], limit: usize) -> LineOutcome {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.len() > limit {
        LineOutcome::TooLong
    } else if line.is_empty() {
        LineOutcome::Empty
    } else {
        LineOutcome::Line(String::from_utf8_lossy(line).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        pin::Pin,
        task::{Context, Poll},
    };

    use proptest::prelude::*;
    use tokio::io::{AsyncWriteExt, ReadBuf};

    use super::*;

    /// Source that hands out at most `cut` bytes per read.
    struct Chunked {
        data: Vec<u8>,
        pos: usize,
        cut: usize,
    }

    impl Chunked {
        fn new(data: impl Into<Vec<u8>>, cut: usize) -> Self {
            Self { data: data.into(), pos: 0, cut }
        }
    }

    impl AsyncRead for Chunked {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            let end = (this.pos + this.cut).min(this.data.len());
            let n = (end - this.pos).min(buf.remaining());
            buf.put_slice(&this.data[this.pos..this.pos + n]);
            this.pos += n;
            Poll::Ready(Ok(()))
        }
    }

    /// Read every outcome of `source` under `limit`, rendered as text.
    fn outcomes(source: Chunked, limit: usize) -> Vec<String> {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let mut reader = LineReader::with_limit(source, limit);
            let mut out = Vec::new();
            loop {
                match reader.read_line().await {
                    LineOutcome::Empty => out.push("<empty>".to_string()),
                    LineOutcome::Line(text) => out.push(text),
                    LineOutcome::TooLong => out.push("<too long>".to_string()),
                    LineOutcome::EndOfInput => return out,
                    LineOutcome::Failed(err) => panic!("unexpected failure: {err}"),
                }
            }
        })
    }

    const LIMIT: usize = 16;

    proptest! {
        #[test]
        fn oversized_line_is_reported_then_next_line_is_clean(
            extra in 1usize..=40,
            crlf in any::<bool>(),
            cut in 1usize..20,
        ) {
            let ending = if crlf { "\r\n" } else { "\n" };
            let input = format!("{}{ending}next{ending}", "x".repeat(LIMIT + extra));

            let lines = outcomes(Chunked::new(input, cut), LIMIT);
            prop_assert_eq!(lines, vec!["<too long>".to_string(), "next".to_string()]);
        }

        #[test]
        fn line_at_limit_is_accepted_under_any_chunking(
            crlf in any::<bool>(),
            cut in 1usize..20,
        ) {
            let ending = if crlf { "\r\n" } else { "\n" };
            let full = "a".repeat(LIMIT);
            let input = format!("{full}{ending}b{ending}");

            let lines = outcomes(Chunked::new(input, cut), LIMIT);
            prop_assert_eq!(lines, vec![full, "b".to_string()]);
        }
    }

    async fn collect(input: &[u8], limit: usize) -> Vec<String> {
        let mut reader = LineReader::with_limit(input, limit);
        let mut out = Vec::new();
        loop {
            match reader.read_line().await {
                LineOutcome::Empty => out.push("<empty>".to_string()),
                LineOutcome::Line(text) => out.push(text),
                LineOutcome::TooLong => out.push("<too long>".to_string()),
                LineOutcome::EndOfInput => break,
                LineOutcome::Failed(err) => panic!("unexpected failure: {err}"),
            }
        }
        out
    }

    #[tokio::test]
    async fn splits_lines_and_strips_terminators() {
        let lines = collect(b"hello\nworld\r\n\nlast", 16).await;
        assert_eq!(lines, vec!["hello", "world", "<empty>", "last"]);
    }

    #[tokio::test]
    async fn line_at_limit_is_accepted() {
        let input = format!("{}\n{}\r\n", "a".repeat(8), "b".repeat(8));
        let lines = collect(input.as_bytes(), 8).await;
        assert_eq!(lines, vec!["a".repeat(8), "b".repeat(8)]);
    }

    #[tokio::test]
    async fn overlong_line_is_drained_to_newline() {
        let input = format!("{}\nnext\n", "x".repeat(5000));
        let lines = collect(input.as_bytes(), 16).await;
        assert_eq!(lines, vec!["<too long>", "next"]);
    }

    #[tokio::test]
    async fn overlong_line_at_end_of_input() {
        let input = "y".repeat(100);
        let lines = collect(input.as_bytes(), 16).await;
        assert_eq!(lines, vec!["<too long>"]);
    }

    #[tokio::test]
    async fn end_of_input_is_sticky() {
        let mut reader = LineReader::new(&b""[..]);
        assert!(matches!(reader.read_line().await, LineOutcome::EndOfInput));
        assert!(matches!(reader.read_line().await, LineOutcome::EndOfInput));
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let lines = collect(b"caf\xff\n", 16).await;
        assert_eq!(lines, vec!["caf\u{fffd}"]);
    }

    #[tokio::test]
    async fn limits_can_change_between_reads() {
        let mut reader = LineReader::new(&b"a-name-that-is-long\nshort\nmessage\n"[..]);

        assert!(matches!(reader.read_line_within(8).await, LineOutcome::TooLong));
        assert!(matches!(reader.read_line_within(8).await, LineOutcome::Line(ref s) if s == "short"));
        assert!(matches!(reader.read_line().await, LineOutcome::Line(ref s) if s == "message"));
    }

    #[tokio::test]
    async fn lines_span_partial_writes() {
        let (client, mut server) = tokio::io::duplex(64);
        let mut reader = LineReader::new(client);

        let writer = tokio::spawn(async move {
            for chunk in [&b"hel"[..], b"lo", b"\nwor", b"ld\n"] {
                server.write_all(chunk).await.unwrap();
                tokio::task::yield_now().await;
            }
        });

        assert!(matches!(reader.read_line().await, LineOutcome::Line(ref s) if s == "hello"));
        assert!(matches!(reader.read_line().await, LineOutcome::Line(ref s) if s == "world"));
        writer.await.unwrap();
        assert!(matches!(reader.read_line().await, LineOutcome::EndOfInput));
    }

    #[tokio::test]
    async fn cancelled_read_keeps_partial_line() {
        let (client, mut server) = tokio::io::duplex(64);
        let mut reader = LineReader::new(client);

        server.write_all(b"partial").await.unwrap();
        tokio::select! {
            biased;
            outcome = reader.read_line() => panic!("unexpected outcome: {outcome:?}"),
            () = tokio::task::yield_now() => {},
        }
        assert_eq!(reader.buffered(), 7);

        server.write_all(b" line\n").await.unwrap();
        assert!(matches!(reader.read_line().await, LineOutcome::Line(ref s) if s == "partial line"));
    }
}
