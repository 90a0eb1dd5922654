//! Safety interlock
//!
//! A stop is a pulse, not a latch: it is raised by `STOP` or by a
//! failed servo write, observed by both engines on their next tick
//! (each cancels its in-flight work), and then released by the
//! controller at the end of that tick. New commands are rejected with
//! `EmergencyStop` while the pulse is raised.

use crate::state::ArmError;

/// What raised the interlock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopCause {
    /// Host sent `STOP`
    Command,
    /// A servo write failed
    ActuatorFault,
}

/// Edge-triggered stop signal shared by the engines
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SafetyInterlock {
    engaged: Option<StopCause>,
    /// Number of stops since boot
    trips: u32,
}

impl SafetyInterlock {
    /// Create a released interlock
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the stop pulse
    ///
    /// An already-raised pulse keeps its original cause.
    pub fn engage(&mut self, cause: StopCause) {
        if self.engaged.is_none() {
            self.engaged = Some(cause);
            self.trips = self.trips.wrapping_add(1);
        }
    }

    /// Release the stop pulse
    ///
    /// Returns the cause if the pulse was raised.
    pub fn release(&mut self) -> Option<StopCause> {
        self.engaged.take()
    }

    /// Check if the stop pulse is raised
    pub fn is_engaged(&self) -> bool {
        self.engaged.is_some()
    }

    /// Cause of the raised pulse, if any
    pub fn cause(&self) -> Option<StopCause> {
        self.engaged
    }

    /// Fail with `EmergencyStop` while the pulse is raised
    pub fn ensure_clear(&self) -> Result<(), ArmError> {
        match self.engaged {
            Some(_) => Err(ArmError::EmergencyStop),
            None => Ok(()),
        }
    }

    /// Number of stops since boot
    pub fn trip_count(&self) -> u32 {
        self.trips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clear() {
        let interlock = SafetyInterlock::new();
        assert!(!interlock.is_engaged());
        assert_eq!(interlock.cause(), None);
        assert_eq!(interlock.ensure_clear(), Ok(()));
    }

    #[test]
    fn test_engage_and_release() {
        let mut interlock = SafetyInterlock::new();
        interlock.engage(StopCause::Command);
        assert_eq!(interlock.cause(), Some(StopCause::Command));
        assert_eq!(interlock.ensure_clear(), Err(ArmError::EmergencyStop));

        assert_eq!(interlock.release(), Some(StopCause::Command));
        assert!(!interlock.is_engaged());
        assert_eq!(interlock.release(), None);
    }

    #[test]
    fn test_first_cause_wins() {
        let mut interlock = SafetyInterlock::new();
        interlock.engage(StopCause::ActuatorFault);
        interlock.engage(StopCause::Command);
        assert_eq!(interlock.cause(), Some(StopCause::ActuatorFault));
        assert_eq!(interlock.trip_count(), 1);
    }

    #[test]
    fn test_trip_count_accumulates() {
        let mut interlock = SafetyInterlock::new();
        for _ in 0..3 {
            interlock.engage(StopCause::Command);
            interlock.release();
        }
        assert_eq!(interlock.trip_count(), 3);
    }
}
