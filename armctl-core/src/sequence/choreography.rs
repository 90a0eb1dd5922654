//! Built-in choreographies
//!
//! Fixed waypoint tables played through the playback engine. Every
//! waypoint lies within the default joint limits; the engine still
//! validates them against the configured limits before playing.

use armctl_protocol::Choreography;

use super::SequencePoint;

const fn pt(angles: [i16; 6], delay_ms: u16) -> SequencePoint {
    SequencePoint::new(angles, delay_ms)
}

const PICK_READY: &[SequencePoint] = &[pt([90, 100, 80, 90, 90, 152], 400)];

const PICK: &[SequencePoint] = &[
    pt([90, 100, 80, 90, 90, 152], 400),
    pt([90, 120, 100, 90, 90, 152], 600),
    pt([90, 120, 100, 90, 90, 120], 600),
    pt([90, 100, 80, 90, 90, 120], 600),
];

const PLACE_READY: &[SequencePoint] = &[pt([45, 80, 60, 135, 90, 120], 400)];

const PLACE: &[SequencePoint] = &[
    pt([45, 80, 60, 135, 90, 120], 400),
    pt([45, 100, 80, 135, 90, 120], 600),
    pt([45, 100, 80, 135, 90, 152], 600),
    pt([45, 80, 60, 135, 90, 152], 600),
];

const WAVE: &[SequencePoint] = &[
    pt([92, 85, 45, 60, 80, 152], 500),
    pt([92, 85, 45, 120, 80, 152], 500),
    pt([92, 85, 45, 60, 80, 152], 500),
    pt([92, 85, 45, 120, 80, 152], 500),
    pt([92, 85, 45, 108, 80, 152], 500),
];

const INSPECT: &[SequencePoint] = &[
    pt([60, 70, 60, 90, 60, 152], 800),
    pt([120, 70, 60, 90, 120, 152], 1200),
    pt([92, 85, 45, 108, 80, 152], 800),
];

const DRAW: &[SequencePoint] = &[
    pt([70, 100, 60, 90, 90, 120], 500),
    pt([110, 100, 60, 90, 90, 120], 700),
    pt([110, 110, 80, 90, 90, 120], 700),
    pt([70, 110, 80, 90, 90, 120], 700),
    pt([70, 100, 60, 90, 90, 120], 700),
];

const RESET: &[SequencePoint] = &[
    pt([92, 100, 60, 108, 80, 152], 300),
    pt([92, 85, 45, 108, 80, 152], 500),
];

/// Waypoints of a built-in choreography
pub fn waypoints(choreography: Choreography) -> &'static [SequencePoint] {
    match choreography {
        Choreography::PickReady => PICK_READY,
        Choreography::Pick => PICK,
        Choreography::PlaceReady => PLACE_READY,
        Choreography::Place => PLACE,
        Choreography::Wave => WAVE,
        Choreography::Inspect => INSPECT,
        Choreography::Draw => DRAW,
        Choreography::Reset => RESET,
    }
}
