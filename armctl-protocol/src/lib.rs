//! Serial Command Protocol
//!
//! This crate defines the text protocol spoken between the host and the
//! arm controller over a UART link (115200 baud by default).
//!
//! # Protocol Overview
//!
//! Every command is a single ASCII line terminated by `\n`:
//! ```text
//! ┌──────┬─────┬──────────┬─────┬──────────┬────┐
//! │ VERB │ ':' │ ARG 1    │ ':' │ ARG 2    │ \n │
//! └──────┴─────┴──────────┴─────┴──────────┴────┘
//! ```
//!
//! Lines are trimmed and upper-cased before parsing. Each command is
//! answered with exactly one line starting with `OK:` or `ERROR:`
//! (`SEQUENCE:` for the sequence listing). Engine events such as a
//! finished move are pushed as additional `OK:`/`ERROR:` lines.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod response;

pub use command::{Choreography, Command, ParseError, SequenceName, MAX_NAME_LEN};
pub use line::{Line, LineBuffer, LineError, MAX_LINE_LEN};
pub use response::{ResponseLine, StatusFlags, MAX_RESPONSE_LEN};

/// Default serial baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
