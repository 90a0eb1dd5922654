//! Command grammar
//!
//! The verb is the token before the first `:`; arguments follow,
//! `:`-separated. Numeric arguments must be plain decimal digits; joint
//! angles may also carry a leading `-`. Range checks (joint number, angle limits, slot index) are semantic
//! and left to the dispatcher.

use core::fmt;

use heapless::String;

use crate::line::MAX_LINE_LEN;

/// Maximum length of a sequence name
pub const MAX_NAME_LEN: usize = 16;

/// Name of a recorded sequence
pub type SequenceName = String<MAX_NAME_LEN>;

const CMD_HOME: &str = "HOME";
const CMD_FOLD: &str = "FOLD";
const CMD_STOP: &str = "STOP";
const CMD_STATUS: &str = "STATUS";
const CMD_SET_SPEED: &str = "SET_SPEED";
const CMD_RECORD_START: &str = "RECORD_START";
const CMD_RECORD_STOP: &str = "RECORD_STOP";
const CMD_PLAY_SEQUENCE: &str = "PLAY_SEQUENCE";
const CMD_LIST_SEQUENCES: &str = "LIST_SEQUENCES";
const CMD_DELETE_SEQUENCE: &str = "DELETE_SEQUENCE";
const CMD_TEACH_START: &str = "TEACH_START";
const CMD_TEACH_STOP: &str = "TEACH_STOP";
const CMD_READ_POSITIONS: &str = "READ_POSITIONS";
const CMD_JOINT_PREFIX: char = 'J';

/// Built-in pose sequences triggered by a single keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Choreography {
    /// Hover above the pick position with the gripper open
    PickReady,
    /// Descend, close the gripper, lift
    Pick,
    /// Hover above the place position holding the part
    PlaceReady,
    /// Descend, open the gripper, retract
    Place,
    /// Wave the wrist
    Wave,
    /// Sweep the base and wrist to look around
    Inspect,
    /// Trace a square with base and elbow
    Draw,
    /// Open the gripper and return to the home pose
    Reset,
}

impl Choreography {
    /// Every built-in choreography
    pub const ALL: [Choreography; 8] = [
        Choreography::PickReady,
        Choreography::Pick,
        Choreography::PlaceReady,
        Choreography::Place,
        Choreography::Wave,
        Choreography::Inspect,
        Choreography::Draw,
        Choreography::Reset,
    ];

    /// Look up a choreography by its (upper-case) keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.keyword() == keyword)
    }

    /// Keyword used on the wire
    pub fn keyword(self) -> &'static str {
        match self {
            Choreography::PickReady => "PICK_READY",
            Choreography::Pick => "PICK",
            Choreography::PlaceReady => "PLACE_READY",
            Choreography::Place => "PLACE",
            Choreography::Wave => "WAVE",
            Choreography::Inspect => "INSPECT",
            Choreography::Draw => "DRAW",
            Choreography::Reset => "RESET",
        }
    }
}

/// Malformed command syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Nothing but whitespace
    Empty,
    /// Line longer than the line buffer
    TooLong,
    /// Verb not recognized
    UnknownCommand,
    /// Required `:` argument missing or blank
    MissingArgument,
    /// Argument given to a verb that takes none
    UnexpectedArgument,
    /// Argument is not a plain decimal number
    InvalidNumber,
    /// Sequence name contains a reserved character
    InvalidName,
    /// Sequence name exceeds `MAX_NAME_LEN`
    NameTooLong,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ParseError::Empty => "Empty command",
            ParseError::TooLong => "Command too long",
            ParseError::UnknownCommand => "Unknown command",
            ParseError::MissingArgument => "Missing argument",
            ParseError::UnexpectedArgument => "Unexpected argument",
            ParseError::InvalidNumber => "Invalid number",
            ParseError::InvalidName => "Invalid sequence name",
            ParseError::NameTooLong => "Sequence name too long",
        };
        f.write_str(reason)
    }
}

/// A syntactically valid command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `J<n>:<angle>` (joint number as sent, 1-based)
    MoveJoint { joint: u16, angle: i32 },
    /// `HOME`
    Home,
    /// `FOLD`
    Fold,
    /// `STOP`
    Stop,
    /// `STATUS`
    Status,
    /// `SET_SPEED:<ms>`
    SetSpeed(u16),
    /// `RECORD_START:<slot>:<name>`
    RecordStart { slot: u16, name: SequenceName },
    /// `RECORD_STOP`
    RecordStop,
    /// `PLAY_SEQUENCE:<slot>`
    PlaySequence(u16),
    /// `LIST_SEQUENCES`
    ListSequences,
    /// `DELETE_SEQUENCE:<slot>`
    DeleteSequence(u16),
    /// `TEACH_START`
    TeachStart,
    /// `TEACH_STOP`
    TeachStop,
    /// `READ_POSITIONS`
    ReadPositions,
    /// Built-in choreography keyword
    Choreography(Choreography),
}

impl Command {
    /// Parse a command from a received line
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut upper: String<MAX_LINE_LEN> = String::new();
        upper.push_str(trimmed).map_err(|_| ParseError::TooLong)?;
        upper.make_ascii_uppercase();

        let (verb, args) = match upper.split_once(':') {
            Some((verb, args)) => (verb, Some(args)),
            None => (upper.as_str(), None),
        };

        match verb {
            CMD_HOME => no_args(args, Command::Home),
            CMD_FOLD => no_args(args, Command::Fold),
            CMD_STOP => no_args(args, Command::Stop),
            CMD_STATUS => no_args(args, Command::Status),
            CMD_RECORD_STOP => no_args(args, Command::RecordStop),
            CMD_LIST_SEQUENCES => no_args(args, Command::ListSequences),
            CMD_TEACH_START => no_args(args, Command::TeachStart),
            CMD_TEACH_STOP => no_args(args, Command::TeachStop),
            CMD_READ_POSITIONS => no_args(args, Command::ReadPositions),
            CMD_SET_SPEED => Ok(Command::SetSpeed(parse_number(required(args)?)?)),
            CMD_PLAY_SEQUENCE => Ok(Command::PlaySequence(parse_number(required(args)?)?)),
            CMD_DELETE_SEQUENCE => Ok(Command::DeleteSequence(parse_number(required(args)?)?)),
            CMD_RECORD_START => {
                let (slot, name) = required(args)?
                    .split_once(':')
                    .ok_or(ParseError::MissingArgument)?;
                Ok(Command::RecordStart {
                    slot: parse_number(slot)?,
                    name: parse_name(name)?,
                })
            }
            _ => {
                if let Some(choreography) = Choreography::from_keyword(verb) {
                    return no_args(args, Command::Choreography(choreography));
                }
                match verb.strip_prefix(CMD_JOINT_PREFIX) {
                    Some(joint) if is_decimal(joint) => Ok(Command::MoveJoint {
                        joint: parse_number(joint)?,
                        angle: parse_angle(required(args)?)?,
                    }),
                    _ => Err(ParseError::UnknownCommand),
                }
            }
        }
    }
}

fn no_args(args: Option<&str>, command: Command) -> Result<Command, ParseError> {
    match args {
        None => Ok(command),
        Some(_) => Err(ParseError::UnexpectedArgument),
    }
}

fn required(args: Option<&str>) -> Result<&str, ParseError> {
    match args {
        Some(a) if !a.trim().is_empty() => Ok(a),
        _ => Err(ParseError::MissingArgument),
    }
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_number(s: &str) -> Result<u16, ParseError> {
    let s = s.trim();
    if !is_decimal(s) {
        return Err(ParseError::InvalidNumber);
    }
    s.parse().map_err(|_| ParseError::InvalidNumber)
}

/// Signed decimal angle
///
/// Magnitudes beyond `i32` saturate; no joint accepts them either way.
fn parse_angle(s: &str) -> Result<i32, ParseError> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, s),
    };
    if !is_decimal(digits) {
        return Err(ParseError::InvalidNumber);
    }
    let magnitude = digits.bytes().fold(0i32, |acc, b| {
        acc.saturating_mul(10).saturating_add(i32::from(b - b'0'))
    });
    Ok(if negative { -magnitude } else { magnitude })
}

fn parse_name(s: &str) -> Result<SequenceName, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError::MissingArgument);
    }
    // ',' and ':' delimit the sequence listing
    if s.contains(',') || s.contains(':') {
        return Err(ParseError::InvalidName);
    }
    let mut name = SequenceName::new();
    name.push_str(s).map_err(|_| ParseError::NameTooLong)?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> SequenceName {
        let mut n = SequenceName::new();
        let _ = n.push_str(s);
        n
    }

    #[test]
    fn test_joint_move() {
        assert_eq!(
            Command::parse("J3:120"),
            Ok(Command::MoveJoint { joint: 3, angle: 120 })
        );
    }

    #[test]
    fn test_trim_and_case() {
        assert_eq!(Command::parse("  home \r"), Ok(Command::Home));
        assert_eq!(
            Command::parse("j1:45"),
            Ok(Command::MoveJoint { joint: 1, angle: 45 })
        );
    }

    #[test]
    fn test_out_of_range_joint_is_syntactically_valid() {
        // Range checks belong to the dispatcher
        assert_eq!(
            Command::parse("J7:90"),
            Ok(Command::MoveJoint { joint: 7, angle: 90 })
        );
        assert_eq!(
            Command::parse("J3:999"),
            Ok(Command::MoveJoint { joint: 3, angle: 999 })
        );
    }

    #[test]
    fn test_joint_move_errors() {
        assert_eq!(Command::parse("J1"), Err(ParseError::MissingArgument));
        assert_eq!(Command::parse("J1:"), Err(ParseError::MissingArgument));
        assert_eq!(Command::parse("J1:4x"), Err(ParseError::InvalidNumber));
        assert_eq!(Command::parse("J1:-"), Err(ParseError::InvalidNumber));
        assert_eq!(Command::parse("J1:--5"), Err(ParseError::InvalidNumber));
        assert_eq!(Command::parse("J1:+5"), Err(ParseError::InvalidNumber));
        assert_eq!(Command::parse("JX:90"), Err(ParseError::UnknownCommand));
        assert_eq!(Command::parse("J:90"), Err(ParseError::UnknownCommand));
    }

    #[test]
    fn test_joint_angle_any_magnitude() {
        // Out-of-range angles are numbers; limits are checked later
        assert_eq!(
            Command::parse("J1:-5"),
            Ok(Command::MoveJoint { joint: 1, angle: -5 })
        );
        assert_eq!(
            Command::parse("J1:70000"),
            Ok(Command::MoveJoint { joint: 1, angle: 70000 })
        );
        assert_eq!(
            Command::parse("J2:99999999999"),
            Ok(Command::MoveJoint { joint: 2, angle: i32::MAX })
        );
    }

    #[test]
    fn test_simple_verbs() {
        assert_eq!(Command::parse("FOLD"), Ok(Command::Fold));
        assert_eq!(Command::parse("STOP"), Ok(Command::Stop));
        assert_eq!(Command::parse("STATUS"), Ok(Command::Status));
        assert_eq!(Command::parse("RECORD_STOP"), Ok(Command::RecordStop));
        assert_eq!(Command::parse("LIST_SEQUENCES"), Ok(Command::ListSequences));
        assert_eq!(Command::parse("teach_start"), Ok(Command::TeachStart));
        assert_eq!(Command::parse("TEACH_STOP"), Ok(Command::TeachStop));
        assert_eq!(Command::parse("READ_POSITIONS"), Ok(Command::ReadPositions));
        assert_eq!(
            Command::parse("READ_POSITIONS:1"),
            Err(ParseError::UnexpectedArgument)
        );
        assert_eq!(Command::parse("HOME:1"), Err(ParseError::UnexpectedArgument));
    }

    #[test]
    fn test_numeric_verbs() {
        assert_eq!(Command::parse("SET_SPEED:20"), Ok(Command::SetSpeed(20)));
        assert_eq!(Command::parse("PLAY_SEQUENCE:2"), Ok(Command::PlaySequence(2)));
        assert_eq!(
            Command::parse("DELETE_SEQUENCE:4"),
            Ok(Command::DeleteSequence(4))
        );
        assert_eq!(Command::parse("SET_SPEED"), Err(ParseError::MissingArgument));
        assert_eq!(Command::parse("SET_SPEED:fast"), Err(ParseError::InvalidNumber));
    }

    #[test]
    fn test_record_start() {
        assert_eq!(
            Command::parse("RECORD_START:0:test"),
            Ok(Command::RecordStart {
                slot: 0,
                name: name("TEST"),
            })
        );
        assert_eq!(
            Command::parse("RECORD_START:1:pick and place"),
            Ok(Command::RecordStart {
                slot: 1,
                name: name("PICK AND PLACE"),
            })
        );
    }

    #[test]
    fn test_record_start_errors() {
        assert_eq!(Command::parse("RECORD_START:0"), Err(ParseError::MissingArgument));
        assert_eq!(Command::parse("RECORD_START:0:"), Err(ParseError::MissingArgument));
        assert_eq!(Command::parse("RECORD_START:a:x"), Err(ParseError::InvalidNumber));
        assert_eq!(Command::parse("RECORD_START:0:a,b"), Err(ParseError::InvalidName));
        assert_eq!(Command::parse("RECORD_START:0:a:b"), Err(ParseError::InvalidName));
        assert_eq!(
            Command::parse("RECORD_START:0:abcdefghijklmnopq"),
            Err(ParseError::NameTooLong)
        );
    }

    #[test]
    fn test_choreographies() {
        for c in Choreography::ALL {
            assert_eq!(Command::parse(c.keyword()), Ok(Command::Choreography(c)));
        }
        assert_eq!(
            Command::parse("pick_ready"),
            Ok(Command::Choreography(Choreography::PickReady))
        );
        assert_eq!(Command::parse("WAVE:3"), Err(ParseError::UnexpectedArgument));
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(Command::parse("DANCE"), Err(ParseError::UnknownCommand));
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
    }

    mod prop {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn joint_moves_parse_for_any_number(joint in 0u16..100, angle in -1_000_000i32..1_000_000) {
                let mut line: heapless::String<32> = heapless::String::new();
                let _ = core::fmt::Write::write_fmt(&mut line, format_args!("J{}:{}", joint, angle));
                prop_assert_eq!(Command::parse(&line), Ok(Command::MoveJoint { joint, angle }));
            }

            #[test]
            fn parse_never_panics(s in "\\PC{0,64}") {
                let _ = Command::parse(&s);
            }
        }
    }
}
