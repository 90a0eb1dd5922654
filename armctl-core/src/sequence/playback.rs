//! Sequence playback
//!
//! Playback steps through a sequence's points, applying each full pose
//! directly once its delay has elapsed. Playback only starts while no
//! joint is moving; a joint move accepted mid-playback pauses it until
//! the motion finishes.

use core::fmt;

use embedded_hal::delay::DelayNs;

use armctl_protocol::Choreography;

use crate::joint::Arm;
use crate::motion::MotionEngine;
use crate::state::{ArmError, Event};
use crate::traits::ServoBank;

use super::{choreography, SequencePoint, SequenceStore};

/// What is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackSource {
    /// A recorded sequence slot
    Slot(u8),
    /// A built-in choreography
    Choreography(Choreography),
}

impl fmt::Display for PlaybackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackSource::Slot(slot) => write!(f, "{}", slot),
            PlaybackSource::Choreography(c) => f.write_str(c.keyword()),
        }
    }
}

/// Progress of the active playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct PlaybackState {
    source: PlaybackSource,
    /// Index of the next point to apply
    step_index: usize,
    /// When the previous point was applied (or playback started)
    last_step_ms: u32,
}

/// Plays one sequence at a time
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackEngine {
    state: Option<PlaybackState>,
}

fn points_of(source: PlaybackSource, store: &SequenceStore) -> &[SequencePoint] {
    match source {
        PlaybackSource::Slot(slot) => store
            .get(usize::from(slot))
            .map(|s| s.points())
            .unwrap_or(&[]),
        PlaybackSource::Choreography(c) => choreography::waypoints(c),
    }
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Check if a recorded slot is being played
    pub fn is_playing_slot(&self, slot: usize) -> bool {
        matches!(
            self.state,
            Some(PlaybackState { source: PlaybackSource::Slot(s), .. }) if usize::from(s) == slot
        )
    }

    /// Start playing a recorded sequence
    pub fn start<B>(
        &mut self,
        slot: usize,
        store: &SequenceStore,
        motion: &MotionEngine,
        arm: &Arm<B>,
        now_ms: u32,
    ) -> Result<(), ArmError> {
        arm.interlock().ensure_clear()?;
        let sequence = store.get(slot)?;
        if sequence.is_empty() {
            return Err(ArmError::EmptySequence);
        }
        if self.is_active() || motion.is_active() {
            return Err(ArmError::Busy);
        }
        let slot = u8::try_from(slot).map_err(|_| ArmError::InvalidSlot)?;
        self.begin(PlaybackSource::Slot(slot), now_ms);
        Ok(())
    }

    /// Start a built-in choreography
    ///
    /// Every waypoint is checked against the joint limits up front.
    pub fn start_choreography<B>(
        &mut self,
        choreography: Choreography,
        motion: &MotionEngine,
        arm: &Arm<B>,
        now_ms: u32,
    ) -> Result<(), ArmError> {
        arm.interlock().ensure_clear()?;
        for point in choreography::waypoints(choreography) {
            arm.joints().check_pose(&point.angles)?;
        }
        if self.is_active() || motion.is_active() {
            return Err(ArmError::Busy);
        }
        self.begin(PlaybackSource::Choreography(choreography), now_ms);
        Ok(())
    }

    fn begin(&mut self, source: PlaybackSource, now_ms: u32) {
        self.state = Some(PlaybackState {
            source,
            step_index: 0,
            last_step_ms: now_ms,
        });
    }

    /// Advance the active playback
    ///
    /// Applies at most one point per call. Returns `PlaybackComplete`
    /// once the last point has been applied.
    pub fn tick<B: ServoBank>(
        &mut self,
        now_ms: u32,
        store: &SequenceStore,
        motion: &MotionEngine,
        arm: &mut Arm<B>,
    ) -> Option<Event> {
        let state = self.state?;
        if let Some(cause) = arm.interlock().cause() {
            self.state = None;
            return Some(Event::EmergencyStop(cause));
        }
        if motion.is_active() {
            return None;
        }

        let points = points_of(state.source, store);
        let Some(point) = points.get(state.step_index) else {
            self.state = None;
            return Some(Event::PlaybackComplete(state.source));
        };
        if now_ms.wrapping_sub(state.last_step_ms) < u32::from(point.delay_ms) {
            return None;
        }

        if arm.apply_pose(&point.angles).is_err() {
            self.state = None;
            return Some(match arm.interlock().cause() {
                Some(cause) => Event::EmergencyStop(cause),
                None => Event::PlaybackAborted(state.source),
            });
        }

        let step_index = state.step_index + 1;
        if step_index >= points.len() {
            self.state = None;
            return Some(Event::PlaybackComplete(state.source));
        }
        self.state = Some(PlaybackState {
            step_index,
            last_step_ms: now_ms,
            ..state
        });
        None
    }

    /// Play points back-to-back, sleeping for each point's delay
    ///
    /// Fallback for callers without a control loop. Returns the number
    /// of points applied. `stop_requested` and the interlock are polled
    /// before every point.
    pub fn play_blocking<B, D, F>(
        &mut self,
        points: &[SequencePoint],
        motion: &MotionEngine,
        arm: &mut Arm<B>,
        delay: &mut D,
        mut stop_requested: F,
    ) -> Result<usize, ArmError>
    where
        B: ServoBank,
        D: DelayNs,
        F: FnMut() -> bool,
    {
        arm.interlock().ensure_clear()?;
        if points.is_empty() {
            return Err(ArmError::EmptySequence);
        }
        if self.is_active() || motion.is_active() {
            return Err(ArmError::Busy);
        }
        for point in points {
            arm.joints().check_pose(&point.angles)?;
        }

        for point in points {
            delay.delay_ms(u32::from(point.delay_ms));
            if stop_requested() {
                return Err(ArmError::EmergencyStop);
            }
            arm.interlock().ensure_clear()?;
            arm.apply_pose(&point.angles)?;
        }
        Ok(points.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArmConfig;
    use crate::safety::StopCause;
    use crate::testing::{MockDelay, MockServos};

    const A: [i16; 6] = [90, 90, 90, 90, 90, 120];
    const B: [i16; 6] = [100, 100, 100, 100, 100, 130];

    struct Fixture {
        playback: PlaybackEngine,
        store: SequenceStore,
        motion: MotionEngine,
        arm: Arm<MockServos>,
    }

    impl Fixture {
        fn new() -> Self {
            let config = ArmConfig::default();
            let mut store = SequenceStore::new();
            store.begin_recording(0, "TEST").unwrap();
            store.append_point(A, 50).unwrap();
            store.append_point(B, 100).unwrap();
            store.end_recording();
            Self {
                playback: PlaybackEngine::new(),
                store,
                motion: MotionEngine::new(config.step_interval_ms),
                arm: Arm::new(&config, MockServos::new()),
            }
        }

        fn tick(&mut self, now_ms: u32) -> Option<Event> {
            self.playback
                .tick(now_ms, &self.store, &self.motion, &mut self.arm)
        }
    }

    #[test]
    fn test_plays_points_in_order() {
        let mut f = Fixture::new();
        f.playback.start(0, &f.store, &f.motion, &f.arm, 0).unwrap();
        assert!(f.playback.is_playing_slot(0));

        assert_eq!(f.tick(49), None);
        assert_eq!(f.arm.joints().pose(), [92, 85, 45, 108, 80, 152]);
        assert_eq!(f.tick(50), None);
        assert_eq!(f.arm.joints().pose(), A);
        assert_eq!(f.tick(149), None);
        assert_eq!(
            f.tick(150),
            Some(Event::PlaybackComplete(PlaybackSource::Slot(0)))
        );
        assert_eq!(f.arm.joints().pose(), B);
        assert!(!f.playback.is_active());
        assert_eq!(f.tick(500), None);
    }

    #[test]
    fn test_start_errors() {
        let mut f = Fixture::new();
        assert_eq!(
            f.playback.start(7, &f.store, &f.motion, &f.arm, 0),
            Err(ArmError::InvalidSlot)
        );
        // In range but never recorded
        assert_eq!(
            f.playback.start(1, &f.store, &f.motion, &f.arm, 0),
            Err(ArmError::InvalidSlot)
        );

        f.playback.start(0, &f.store, &f.motion, &f.arm, 0).unwrap();
        assert_eq!(
            f.playback.start(0, &f.store, &f.motion, &f.arm, 0),
            Err(ArmError::Busy)
        );
    }

    #[test]
    fn test_zero_point_recording_is_empty() {
        let mut f = Fixture::new();
        f.store.begin_recording(2, "NONE").unwrap();
        f.store.end_recording();
        assert_eq!(
            f.playback.start(2, &f.store, &f.motion, &f.arm, 0),
            Err(ArmError::EmptySequence)
        );
    }

    #[test]
    fn test_busy_while_moving() {
        let mut f = Fixture::new();
        f.motion.request_move(&f.arm, 0, 95, 0).unwrap();
        assert_eq!(
            f.playback.start(0, &f.store, &f.motion, &f.arm, 0),
            Err(ArmError::Busy)
        );
        assert_eq!(
            f.playback
                .start_choreography(Choreography::Wave, &f.motion, &f.arm, 0),
            Err(ArmError::Busy)
        );
    }

    #[test]
    fn test_waits_for_motion() {
        let mut f = Fixture::new();
        f.playback.start(0, &f.store, &f.motion, &f.arm, 0).unwrap();
        f.motion.request_move(&f.arm, 0, 95, 0).unwrap();

        assert_eq!(f.tick(60), None);
        assert_eq!(f.arm.joints().get(1), Ok(85));

        f.motion.cancel_all();
        assert_eq!(f.tick(70), None);
        assert_eq!(f.arm.joints().pose(), A);
    }

    #[test]
    fn test_interlock_stops_playback() {
        let mut f = Fixture::new();
        f.playback.start(0, &f.store, &f.motion, &f.arm, 0).unwrap();
        f.tick(50);

        f.arm.interlock_mut().engage(StopCause::Command);
        assert_eq!(
            f.tick(60),
            Some(Event::EmergencyStop(StopCause::Command))
        );
        assert!(!f.playback.is_active());
        assert_eq!(f.arm.joints().pose(), A);
        assert_eq!(
            f.playback.start(0, &f.store, &f.motion, &f.arm, 60),
            Err(ArmError::EmergencyStop)
        );
    }

    #[test]
    fn test_servo_fault_stops_playback() {
        let mut f = Fixture::new();
        f.arm.servos_mut().fail_joint = Some(3);
        f.playback.start(0, &f.store, &f.motion, &f.arm, 0).unwrap();
        assert_eq!(
            f.tick(50),
            Some(Event::EmergencyStop(StopCause::ActuatorFault))
        );
        assert!(!f.playback.is_active());
    }

    #[test]
    fn test_choreography_plays_to_completion() {
        let mut f = Fixture::new();
        f.playback
            .start_choreography(Choreography::Wave, &f.motion, &f.arm, 0)
            .unwrap();

        let mut completed = None;
        for now in (0..5000).step_by(10) {
            if let Some(event) = f.tick(now) {
                completed = Some(event);
                break;
            }
        }
        assert_eq!(
            completed,
            Some(Event::PlaybackComplete(PlaybackSource::Choreography(
                Choreography::Wave
            )))
        );
        assert_eq!(
            f.arm.joints().pose(),
            choreography::waypoints(Choreography::Wave)
                .last()
                .unwrap()
                .angles
        );
    }

    #[test]
    fn test_choreography_checked_against_limits() {
        let mut config = ArmConfig::default();
        config.limits[0].max = 60;
        config.home[0] = 60;
        let arm = Arm::new(&config, MockServos::new());
        let motion = MotionEngine::default();
        let mut playback = PlaybackEngine::new();
        assert!(matches!(
            playback.start_choreography(Choreography::Inspect, &motion, &arm, 0),
            Err(ArmError::AngleOutOfRange { joint: 0, .. })
        ));
        assert!(!playback.is_active());
    }

    #[test]
    fn test_play_blocking() {
        let mut f = Fixture::new();
        let mut delay = MockDelay::default();
        let points = f.store.get(0).unwrap().points();
        let applied = f
            .playback
            .play_blocking(points, &f.motion, &mut f.arm, &mut delay, || false)
            .unwrap();
        assert_eq!(applied, 2);
        assert_eq!(f.arm.joints().pose(), B);
        assert_eq!(delay.elapsed_ms(), 150);
    }

    #[test]
    fn test_play_blocking_stop() {
        let mut f = Fixture::new();
        let mut delay = MockDelay::default();
        let points = choreography::waypoints(Choreography::Draw);
        let mut calls = 0;
        let result = f.playback.play_blocking(
            points,
            &f.motion,
            &mut f.arm,
            &mut delay,
            || {
                calls += 1;
                calls == 2
            },
        );
        assert_eq!(result, Err(ArmError::EmergencyStop));
        assert_eq!(f.arm.joints().pose(), points[0].angles);
    }

    #[test]
    fn test_play_blocking_respects_interlock() {
        let mut f = Fixture::new();
        let mut delay = MockDelay::default();
        f.arm.interlock_mut().engage(StopCause::Command);
        let points = choreography::waypoints(Choreography::Wave);
        let result = f
            .playback
            .play_blocking(points, &f.motion, &mut f.arm, &mut delay, || false);
        assert_eq!(result, Err(ArmError::EmergencyStop));
        assert_eq!(f.arm.servos().writes, 0);
        assert_eq!(delay.elapsed_ms(), 0);
    }
}
