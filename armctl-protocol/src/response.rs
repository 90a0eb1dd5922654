//! Response lines sent back to the host
//!
//! Every command produces exactly one line:
//! - `OK:<detail>` on success
//! - `ERROR:<reason>` on failure
//! - `SEQUENCE:<slot>:<name>,...` for the sequence listing

use core::fmt::{self, Write};

use heapless::String;

/// Maximum response line length (excluding the terminator)
pub const MAX_RESPONSE_LEN: usize = 256;

pub const RESP_OK: &str = "OK:";
pub const RESP_ERROR: &str = "ERROR:";
pub const RESP_SEQUENCE: &str = "SEQUENCE:";

/// Engine-state flags appended to a `STATUS` response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFlags {
    /// At least one joint motion in flight
    pub moving: bool,
    /// A recording session is active
    pub recording: bool,
    /// A playback is active
    pub playback: bool,
    /// A teach session is active
    pub teaching: bool,
    /// A stop interrupted work since the last status report
    pub halted: bool,
}

/// A single rendered response line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseLine(String<MAX_RESPONSE_LEN>);

impl ResponseLine {
    /// `OK:` followed by formatted detail
    pub fn ok(detail: fmt::Arguments<'_>) -> Self {
        Self::build(RESP_OK, detail)
    }

    /// `ERROR:` followed by the error's description
    pub fn error<E: fmt::Display>(reason: E) -> Self {
        Self::build(RESP_ERROR, format_args!("{}", reason))
    }

    /// `OK:J1:<a>,...,J6:<a>|MOVING:m|RECORDING:r|PLAYBACK:p`
    pub fn status(pose: &[i16], flags: StatusFlags) -> Self {
        let mut line = Self::default();
        let _ = line.0.push_str(RESP_OK);
        for (i, angle) in pose.iter().enumerate() {
            if i > 0 {
                let _ = line.0.push(',');
            }
            let _ = write!(line.0, "J{}:{}", i + 1, angle);
        }
        let _ = write!(
            line.0,
            "|MOVING:{}|RECORDING:{}|PLAYBACK:{}",
            flags.moving as u8, flags.recording as u8, flags.playback as u8
        );
        if flags.teaching {
            let _ = line.0.push_str("|TEACHING:1");
        }
        if flags.halted {
            let _ = line.0.push_str("|HALTED:1");
        }
        line
    }

    /// `OK:P1:<raw>,...,P6:<raw>` position input readings
    pub fn readings(raw: &[u16]) -> Self {
        let mut line = Self::default();
        let _ = line.0.push_str(RESP_OK);
        for (i, value) in raw.iter().enumerate() {
            if i > 0 {
                let _ = line.0.push(',');
            }
            let _ = write!(line.0, "P{}:{}", i + 1, value);
        }
        line
    }

    /// `SEQUENCE:` followed by `slot:name` pairs
    pub fn sequences<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let mut line = Self::default();
        let _ = line.0.push_str(RESP_SEQUENCE);
        for (i, (slot, name)) in entries.into_iter().enumerate() {
            if i > 0 {
                let _ = line.0.push(',');
            }
            let _ = write!(line.0, "{}:{}", slot, name);
        }
        line
    }

    fn build(prefix: &str, detail: fmt::Arguments<'_>) -> Self {
        let mut line = Self::default();
        let _ = line.0.push_str(prefix);
        // Detail pieces that do not fit the buffer are dropped
        let _ = line.0.write_fmt(detail);
        line
    }

    /// Check if this is a success line
    pub fn is_ok(&self) -> bool {
        !self.is_error()
    }

    /// Check if this is an error line
    pub fn is_error(&self) -> bool {
        self.0.starts_with(RESP_ERROR)
    }

    /// Line content without terminator
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Line content as bytes, for the UART
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ResponseLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ResponseLine {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.0.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_line() {
        let line = ResponseLine::ok(format_args!("J{}:{}", 1, 30));
        assert_eq!(line.as_str(), "OK:J1:30");
        assert!(line.is_ok());
    }

    #[test]
    fn test_error_line() {
        let line = ResponseLine::error("Unknown command");
        assert_eq!(line.as_str(), "ERROR:Unknown command");
        assert!(line.is_error());
    }

    #[test]
    fn test_status_line() {
        let pose = [92, 85, 45, 108, 80, 152];
        let flags = StatusFlags {
            recording: true,
            ..Default::default()
        };
        let line = ResponseLine::status(&pose, flags);
        assert_eq!(
            line.as_str(),
            "OK:J1:92,J2:85,J3:45,J4:108,J5:80,J6:152|MOVING:0|RECORDING:1|PLAYBACK:0"
        );
    }

    #[test]
    fn test_status_line_halted() {
        let flags = StatusFlags {
            halted: true,
            ..Default::default()
        };
        let line = ResponseLine::status(&[0; 6], flags);
        assert!(line.as_str().ends_with("|PLAYBACK:0|HALTED:1"));
    }

    #[test]
    fn test_status_line_teaching() {
        let flags = StatusFlags {
            teaching: true,
            halted: true,
            ..Default::default()
        };
        let line = ResponseLine::status(&[0; 6], flags);
        assert!(line.as_str().ends_with("|PLAYBACK:0|TEACHING:1|HALTED:1"));
    }

    #[test]
    fn test_readings_line() {
        let line = ResponseLine::readings(&[0, 512, 1023, 4095, 7, 2048]);
        assert_eq!(line.as_str(), "OK:P1:0,P2:512,P3:1023,P4:4095,P5:7,P6:2048");
    }

    #[test]
    fn test_sequence_listing() {
        let line = ResponseLine::sequences([(0, "TEST"), (3, "PICK")]);
        assert_eq!(line.as_str(), "SEQUENCE:0:TEST,3:PICK");

        let empty = ResponseLine::sequences(core::iter::empty());
        assert_eq!(empty.as_str(), "SEQUENCE:");
        assert!(empty.is_ok());
    }
}
