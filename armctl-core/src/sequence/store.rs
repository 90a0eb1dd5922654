//! Sequence storage and recording
//!
//! Fixed-capacity, RAM-only storage for named pose sequences. Contents
//! are lost on reset. Recording writes into a slot that stays invalid
//! (unlisted, unplayable) until the recording is stopped.

use heapless::Vec;

use armctl_protocol::SequenceName;

use crate::joint::Pose;
use crate::state::ArmError;

/// Number of sequence slots
pub const MAX_SEQUENCES: usize = 5;

/// Points per sequence
pub const MAX_SEQUENCE_POINTS: usize = 20;

/// A pose plus the delay before it is applied during playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequencePoint {
    pub angles: Pose,
    pub delay_ms: u16,
}

impl SequencePoint {
    pub const fn new(angles: Pose, delay_ms: u16) -> Self {
        Self { angles, delay_ms }
    }
}

/// A named, ordered list of points
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sequence {
    name: SequenceName,
    points: Vec<SequencePoint, MAX_SEQUENCE_POINTS>,
    valid: bool,
}

impl Sequence {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn points(&self) -> &[SequencePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check if the sequence was completed by a recording stop
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    fn clear(&mut self) {
        self.name.clear();
        self.points.clear();
        self.valid = false;
    }
}

/// Fixed set of sequence slots plus the recording session
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceStore {
    slots: [Sequence; MAX_SEQUENCES],
    recording: Option<usize>,
}

impl Default for SequenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceStore {
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| Sequence::default()),
            recording: None,
        }
    }

    fn slot_index(slot: usize) -> Result<usize, ArmError> {
        if slot < MAX_SEQUENCES {
            Ok(slot)
        } else {
            Err(ArmError::InvalidSlot)
        }
    }

    /// Begin recording into a slot, discarding its previous contents
    pub fn begin_recording(&mut self, slot: usize, name: &str) -> Result<(), ArmError> {
        let slot = Self::slot_index(slot)?;
        if self.recording.is_some() {
            return Err(ArmError::Busy);
        }
        let sequence = &mut self.slots[slot];
        sequence.clear();
        // Names are length-checked by the parser
        let _ = sequence.name.push_str(name);
        self.recording = Some(slot);
        Ok(())
    }

    /// Fail with `SequenceFull` if the recording slot has no room
    ///
    /// Returns `NotRecording` when no recording is active.
    pub fn ensure_room(&self) -> Result<(), ArmError> {
        let slot = self.recording.ok_or(ArmError::NotRecording)?;
        if self.slots[slot].points.is_full() {
            return Err(ArmError::SequenceFull);
        }
        Ok(())
    }

    /// Append a point to the active recording
    pub fn append_point(&mut self, angles: Pose, delay_ms: u16) -> Result<(), ArmError> {
        let slot = self.recording.ok_or(ArmError::NotRecording)?;
        self.slots[slot]
            .points
            .push(SequencePoint::new(angles, delay_ms))
            .map_err(|_| ArmError::SequenceFull)
    }

    /// Finish the active recording, marking its slot valid
    ///
    /// Returns the slot, or `None` if nothing was being recorded.
    pub fn end_recording(&mut self) -> Option<usize> {
        let slot = self.recording.take()?;
        self.slots[slot].valid = true;
        Some(slot)
    }

    /// Clear a slot
    ///
    /// Erasing the slot being recorded also ends the recording.
    pub fn erase(&mut self, slot: usize) -> Result<(), ArmError> {
        let slot = Self::slot_index(slot)?;
        if self.recording == Some(slot) {
            self.recording = None;
        }
        self.slots[slot].clear();
        Ok(())
    }

    /// Valid sequence in a slot
    ///
    /// A slot holding no completed recording is `InvalidSlot`, the same
    /// as one out of range.
    pub fn get(&self, slot: usize) -> Result<&Sequence, ArmError> {
        let slot = Self::slot_index(slot)?;
        let sequence = &self.slots[slot];
        if sequence.valid {
            Ok(sequence)
        } else {
            Err(ArmError::InvalidSlot)
        }
    }

    /// Slot and name of every valid sequence, in slot order
    pub fn list(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.valid)
            .map(|(i, s)| (i, s.name()))
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    pub fn recording_slot(&self) -> Option<usize> {
        self.recording
    }

    /// Number of points captured by the active recording
    pub fn recorded_points(&self) -> usize {
        self.recording.map_or(0, |slot| self.slots[slot].len())
    }
}
