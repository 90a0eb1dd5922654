//! Line framing for the serial command protocol.
//!
//! Bytes are accumulated until a `\n` terminator. Carriage returns are
//! dropped so both `\n` and `\r\n` endings work. A line that overflows
//! the buffer (or carries non-ASCII bytes) is discarded up to its
//! terminator and reported once, when the terminator arrives.

use core::fmt;

use heapless::String;

/// Maximum line length in bytes (excluding the terminator)
pub const MAX_LINE_LEN: usize = 200;

/// A complete command line
pub type Line = String<MAX_LINE_LEN>;

/// Errors that can occur while framing lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded `MAX_LINE_LEN` bytes
    Overflow,
    /// Line contained a non-ASCII byte
    NonAscii,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::Overflow => f.write_str("Line too long"),
            LineError::NonAscii => f.write_str("Invalid character in line"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    /// Appending bytes to the buffer
    Collecting,
    /// Dropping bytes until the next terminator
    Discarding(LineError),
}

/// Accumulates raw bytes into newline-terminated lines
#[derive(Debug, Clone)]
pub struct LineBuffer {
    state: LineState,
    buffer: Line,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    /// Create an empty line buffer
    pub fn new() -> Self {
        Self {
            state: LineState::Collecting,
            buffer: String::new(),
        }
    }

    /// Drop any partially received line
    pub fn reset(&mut self) {
        self.state = LineState::Collecting;
        self.buffer.clear();
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a non-blank line is complete,
    /// `Ok(None)` when more bytes are needed, or `Err` when the line that
    /// just ended had to be discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        match byte {
            b'\n' => self.finish(),
            b'\r' => Ok(None),
            _ => {
                if self.state != LineState::Collecting {
                    return Ok(None);
                }
                if !byte.is_ascii() {
                    self.state = LineState::Discarding(LineError::NonAscii);
                } else if self.buffer.push(byte as char).is_err() {
                    self.state = LineState::Discarding(LineError::Overflow);
                }
                Ok(None)
            }
        }
    }

    fn finish(&mut self) -> Result<Option<Line>, LineError> {
        let state = self.state;
        let line = core::mem::take(&mut self.buffer);
        self.reset();

        match state {
            LineState::Discarding(err) => Err(err),
            LineState::Collecting if line.trim().is_empty() => Ok(None),
            LineState::Collecting => Ok(Some(line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(buf: &mut LineBuffer, bytes: &[u8]) -> Option<Result<Line, LineError>> {
        for &b in bytes {
            match buf.feed(b) {
                Ok(Some(line)) => return Some(Ok(line)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }

    #[test]
    fn test_complete_line() {
        let mut buf = LineBuffer::new();
        let line = feed_all(&mut buf, b"J1:90\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "J1:90");
        assert!(buf.buffer.is_empty());
    }

    #[test]
    fn test_crlf_terminator() {
        let mut buf = LineBuffer::new();
        let line = feed_all(&mut buf, b"STATUS\r\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "STATUS");
    }

    #[test]
    fn test_partial_line_waits() {
        let mut buf = LineBuffer::new();
        assert!(feed_all(&mut buf, b"HO").is_none());
        assert_eq!(buf.buffer.as_str(), "HO");
        let line = feed_all(&mut buf, b"ME\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "HOME");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let mut buf = LineBuffer::new();
        assert!(feed_all(&mut buf, b"\n  \r\n").is_none());
        let line = feed_all(&mut buf, b"STOP\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "STOP");
    }

    #[test]
    fn test_overflow_discards_until_newline() {
        let mut buf = LineBuffer::new();
        let long = [b'A'; MAX_LINE_LEN + 10];
        assert!(feed_all(&mut buf, &long).is_none());
        assert_eq!(buf.feed(b'\n'), Err(LineError::Overflow));

        // Next line is accepted normally
        let line = feed_all(&mut buf, b"STATUS\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "STATUS");
    }

    #[test]
    fn test_exact_capacity_fits() {
        let mut buf = LineBuffer::new();
        let exact = [b'A'; MAX_LINE_LEN];
        assert!(feed_all(&mut buf, &exact).is_none());
        let line = buf.feed(b'\n').unwrap().unwrap();
        assert_eq!(line.len(), MAX_LINE_LEN);
    }

    #[test]
    fn test_non_ascii_rejected() {
        let mut buf = LineBuffer::new();
        assert!(feed_all(&mut buf, &[b'J', 0xC3, 0xA9]).is_none());
        assert_eq!(buf.feed(b'\n'), Err(LineError::NonAscii));
    }
}
