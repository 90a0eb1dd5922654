//! Recorded sequences and their playback
//!
//! - `store`: fixed slots of named pose sequences and the recording session
//! - `playback`: time-sliced stepping through a sequence or choreography
//! - `choreography`: built-in waypoint tables

pub mod choreography;
pub mod playback;
pub mod store;

pub use playback::{PlaybackEngine, PlaybackSource};
pub use store::{Sequence, SequencePoint, SequenceStore, MAX_SEQUENCES, MAX_SEQUENCE_POINTS};
