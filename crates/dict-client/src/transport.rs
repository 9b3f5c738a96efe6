//! Line-oriented transport over a byte stream.
//!
//! DICT frames everything as text lines: one command per line outbound, and
//! inbound status lines interleaved with blocks of text closed by a line
//! holding a single `.`. The transport owns the buffered stream, enforces the
//! line and block bounds, and hands back lines with their terminator removed.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Shutdown, TcpStream};

use tracing::debug;

use crate::command::Command;
use crate::error::TransportError;

/// Log target for transport operations.
pub(crate) const TRANSPORT_TARGET: &str = "dict_client::transport";

/// Longest line accepted from the server, terminator included.
pub(crate) const MAX_LINE_BYTES: usize = 64 * 1024;

const SENTINEL: &str = ".";

/// Out-of-band handle that tears a stream down from another thread.
pub trait Interrupt: Send + Sync {
    /// Shuts the stream down so blocked reads and writes fail promptly.
    fn interrupt(&self);
}

/// A byte stream a DICT session can run over.
pub trait DictStream: Read + Write + Send {
    /// Returns a handle able to interrupt this stream while it is in use.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying handle cannot be duplicated.
    fn interrupter(&self) -> io::Result<Box<dyn Interrupt>>;
}

impl Interrupt for TcpStream {
    fn interrupt(&self) {
        if let Err(error) = self.shutdown(Shutdown::Both) {
            debug!(
                target: TRANSPORT_TARGET,
                error = %error,
                "socket shutdown failed"
            );
        }
    }
}

impl DictStream for TcpStream {
    fn interrupter(&self) -> io::Result<Box<dyn Interrupt>> {
        Ok(Box::new(self.try_clone()?))
    }
}

/// Reads and writes DICT lines over a stream.
pub(crate) struct LineTransport<S> {
    reader: BufReader<S>,
    max_block_lines: usize,
}

impl<S: Read + Write> LineTransport<S> {
    pub(crate) fn new(stream: S, max_block_lines: usize) -> Self {
        Self {
            reader: BufReader::new(stream),
            max_block_lines,
        }
    }

    pub(crate) const fn max_block_lines(&self) -> usize {
        self.max_block_lines
    }

    /// Sends one command line terminated by CRLF.
    pub(crate) fn send(&mut self, command: &Command<'_>) -> Result<(), TransportError> {
        let line = format!("{command}\r\n");
        debug!(
            target: TRANSPORT_TARGET,
            command = %command,
            "sending command"
        );
        let stream = self.reader.get_mut();
        stream.write_all(line.as_bytes())?;
        stream.flush()?;
        Ok(())
    }

    /// Reads one line with its CRLF or LF terminator removed.
    pub(crate) fn read_line(&mut self) -> Result<String, TransportError> {
        let mut buffer = Vec::new();
        let limit = u64::try_from(MAX_LINE_BYTES).unwrap_or(u64::MAX);
        let read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut buffer)?;
        if read == 0 {
            return Err(TransportError::ConnectionClosed);
        }
        if buffer.last() == Some(&b'\n') {
            buffer.pop();
            if buffer.last() == Some(&b'\r') {
                buffer.pop();
            }
        } else if read >= MAX_LINE_BYTES {
            return Err(TransportError::LineTooLong {
                limit: MAX_LINE_BYTES,
            });
        } else {
            // A final line without terminator means the peer closed mid-line.
            return Err(TransportError::ConnectionClosed);
        }
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Reads text lines up to, and excluding, the `.` sentinel.
    ///
    /// Lines starting with `..` have their first dot removed.
    pub(crate) fn read_block(&mut self) -> Result<Vec<String>, TransportError> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line()?;
            if line == SENTINEL {
                return Ok(lines);
            }
            if lines.len() >= self.max_block_lines {
                return Err(TransportError::BlockTooLong {
                    limit: self.max_block_lines,
                });
            }
            lines.push(unstuff(line));
        }
    }
}

fn unstuff(line: String) -> String {
    match line.strip_prefix("..") {
        Some(rest) => format!(".{rest}"),
        None => line,
    }
}
