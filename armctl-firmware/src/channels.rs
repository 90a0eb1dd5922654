//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use armctl_protocol::{Line, ResponseLine};

/// One pending command line; the RX task waits while the controller is busy
const LINE_CHANNEL_SIZE: usize = 1;

/// Responses plus the engine events a single poll can raise
const RESPONSE_CHANNEL_SIZE: usize = 8;

/// Complete command lines from the serial RX task
pub static LINE_CHANNEL: Channel<CriticalSectionRawMutex, Line, LINE_CHANNEL_SIZE> =
    Channel::new();

/// Response and event lines for the serial TX task
pub static RESPONSE_CHANNEL: Channel<CriticalSectionRawMutex, ResponseLine, RESPONSE_CHANNEL_SIZE> =
    Channel::new();
