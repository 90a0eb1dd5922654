//! Asynchronous engine events
//!
//! Events are produced by the motion, playback and teach engines while ticking
//! and are pushed to the host as unsolicited response lines.

use armctl_protocol::ResponseLine;

use crate::safety::StopCause;
use crate::sequence::PlaybackSource;

/// Events emitted by the engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// The last active joint motion reached its target
    MotionComplete,
    /// The last point of a playback was applied
    PlaybackComplete(PlaybackSource),
    /// A playback point could not be applied
    PlaybackAborted(PlaybackSource),
    /// The position input failed during a teach session
    TeachAborted,
    /// The interlock cancelled in-flight work
    EmergencyStop(StopCause),
}

impl Event {
    /// Check if this event reports work interrupted by the interlock
    pub fn is_stop(&self) -> bool {
        matches!(self, Event::EmergencyStop(_))
    }

    /// Check if this event indicates a failure
    pub fn is_error_event(&self) -> bool {
        matches!(
            self,
            Event::EmergencyStop(_) | Event::PlaybackAborted(_) | Event::TeachAborted
        )
    }

    /// Render the event as a host notification line
    pub fn to_response(&self) -> ResponseLine {
        match self {
            Event::MotionComplete => ResponseLine::ok(format_args!("MOVE_COMPLETE")),
            Event::PlaybackComplete(source) => {
                ResponseLine::ok(format_args!("PLAYBACK_COMPLETE:{}", source))
            }
            Event::PlaybackAborted(source) => {
                ResponseLine::error(format_args!("Playback aborted:{}", source))
            }
            Event::TeachAborted => ResponseLine::error("Teach aborted"),
            Event::EmergencyStop(StopCause::Command) => ResponseLine::error("Emergency stop"),
            Event::EmergencyStop(StopCause::ActuatorFault) => {
                ResponseLine::error("Emergency stop (actuator fault)")
            }
        }
    }
}
