//! Teach mode
//!
//! The arm follows operator position inputs instead of host commands.

pub mod engine;

pub use engine::{map_reading, TeachEngine, TEACH_DEADBAND, TEACH_SAMPLE_INTERVAL_MS};
