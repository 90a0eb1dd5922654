//! Command dispatcher coordinating the engines
//!
//! The controller owns every piece of runtime state:
//! - Parses command lines and routes them to the engines
//! - Captures poses into the active recording
//! - Ticks the motion, playback and teach engines
//! - Releases the interlock pulse once every engine has observed it
//!
//! Each command line produces exactly one response line. Engine events
//! come back separately from `tick`/`poll`.

use heapless::Vec;

use armctl_protocol::{Choreography, Command, ResponseLine, StatusFlags};

use crate::config::ArmConfig;
use crate::joint::{Arm, Pose, JOINT_COUNT};
use crate::motion::MotionEngine;
use crate::safety::StopCause;
use crate::sequence::{PlaybackEngine, SequenceStore};
use crate::state::{ArmError, Event};
use crate::teach::TeachEngine;
use crate::traits::{NoInput, PoseInput, ServoBank};

/// Most events a single tick can produce (one per engine)
pub const MAX_TICK_EVENTS: usize = 3;

/// Outcome of one scheduler iteration
#[derive(Debug, Default)]
pub struct PollResult {
    /// Response to the line handled this iteration
    pub response: Option<ResponseLine>,
    /// Engine events raised this iteration
    pub events: Vec<Event, MAX_TICK_EVENTS>,
}

/// Arm controller
///
/// `I` supplies the teach-mode position inputs; boards without them use
/// `NoInput`.
pub struct Controller<B, I = NoInput> {
    config: ArmConfig,
    arm: Arm<B>,
    motion: MotionEngine,
    store: SequenceStore,
    playback: PlaybackEngine,
    teach: TeachEngine,
    input: I,
    /// A stop interrupted work since the last `STATUS`
    halted: bool,
}

impl<B> Controller<B, NoInput> {
    /// Create a controller with the arm at the configured home pose
    pub fn new(config: ArmConfig, servos: B) -> Self {
        Self::with_input(config, servos, NoInput)
    }
}

impl<B, I> Controller<B, I> {
    /// Create a controller with position inputs for teach mode
    pub fn with_input(config: ArmConfig, servos: B, input: I) -> Self {
        Self {
            arm: Arm::new(&config, servos),
            motion: MotionEngine::new(config.step_interval_ms),
            store: SequenceStore::new(),
            playback: PlaybackEngine::new(),
            teach: TeachEngine::new(),
            input,
            halted: false,
            config,
        }
    }

    pub fn config(&self) -> &ArmConfig {
        &self.config
    }

    pub fn arm(&self) -> &Arm<B> {
        &self.arm
    }

    pub fn motion(&self) -> &MotionEngine {
        &self.motion
    }

    pub fn store(&self) -> &SequenceStore {
        &self.store
    }

    pub fn playback(&self) -> &PlaybackEngine {
        &self.playback
    }

    pub fn teach(&self) -> &TeachEngine {
        &self.teach
    }

    /// Current joint angles
    pub fn pose(&self) -> Pose {
        self.arm.joints().pose()
    }

    /// Engine flags as reported by `STATUS`
    pub fn status_flags(&self) -> StatusFlags {
        StatusFlags {
            moving: self.motion.is_active(),
            recording: self.store.is_recording(),
            playback: self.playback.is_active(),
            teaching: self.teach.is_active(),
            halted: self.halted,
        }
    }

    /// Reject commanded motion while another engine owns the joints
    fn ensure_joints_free(&self) -> Result<(), ArmError> {
        if self.playback.is_active() || self.teach.is_active() {
            return Err(ArmError::Busy);
        }
        Ok(())
    }
}

impl<B: ServoBank, I: PoseInput> Controller<B, I> {
    /// Drive every servo to the registry pose
    ///
    /// Call once at startup before the first `poll`.
    pub fn boot(&mut self) -> Result<(), ArmError> {
        self.arm.sync()
    }

    /// Run one scheduler iteration
    ///
    /// Handles at most one line, ticks every engine, then releases the
    /// interlock pulse.
    pub fn poll(&mut self, line: Option<&str>, now_ms: u32) -> PollResult {
        let response = line.map(|line| self.handle_line(line, now_ms));
        let events = self.tick(now_ms);
        PollResult { response, events }
    }

    /// Parse and execute one command line
    pub fn handle_line(&mut self, line: &str, now_ms: u32) -> ResponseLine {
        match Command::parse(line) {
            Ok(command) => self.handle_command(command, now_ms),
            Err(err) => ResponseLine::error(ArmError::Parse(err)),
        }
    }

    /// Execute one parsed command
    pub fn handle_command(&mut self, command: Command, now_ms: u32) -> ResponseLine {
        match self.execute(command, now_ms) {
            Ok(response) => response,
            Err(err) => ResponseLine::error(err),
        }
    }

    /// Tick every engine and release the interlock pulse
    pub fn tick(&mut self, now_ms: u32) -> Vec<Event, MAX_TICK_EVENTS> {
        let mut events = Vec::new();
        let motion = self.motion.tick(now_ms, &mut self.arm);
        let playback = self
            .playback
            .tick(now_ms, &self.store, &self.motion, &mut self.arm);
        let teach = self.teach.tick(now_ms, &mut self.input, &mut self.arm);

        for event in [motion, playback, teach].into_iter().flatten() {
            // One stop report per pulse
            if event.is_stop() && events.iter().any(Event::is_stop) {
                continue;
            }
            let _ = events.push(event);
        }
        if events.iter().any(Event::is_stop) {
            self.halted = true;
        }
        self.arm.interlock_mut().release();
        events
    }

    fn execute(&mut self, command: Command, now_ms: u32) -> Result<ResponseLine, ArmError> {
        match command {
            Command::MoveJoint { joint, angle } => self.move_joint(joint, angle, now_ms),
            Command::Home => {
                let home = self.config.home;
                self.move_to_pose(&home, now_ms)?;
                Ok(ResponseLine::ok(format_args!("HOME")))
            }
            Command::Fold => {
                let fold = self.config.fold_pose();
                self.move_to_pose(&fold, now_ms)?;
                Ok(ResponseLine::ok(format_args!("FOLD")))
            }
            Command::Stop => {
                self.arm.interlock_mut().engage(StopCause::Command);
                Ok(ResponseLine::ok(format_args!("STOP")))
            }
            Command::Status => {
                let response = ResponseLine::status(&self.pose(), self.status_flags());
                self.halted = false;
                Ok(response)
            }
            Command::SetSpeed(interval_ms) => {
                self.motion.set_step_interval(interval_ms)?;
                Ok(ResponseLine::ok(format_args!("SPEED:{}", interval_ms)))
            }
            Command::RecordStart { slot, name } => {
                if self.playback.is_active() {
                    return Err(ArmError::Busy);
                }
                self.store.begin_recording(usize::from(slot), &name)?;
                Ok(ResponseLine::ok(format_args!("RECORDING:{}:{}", slot, name)))
            }
            Command::RecordStop => {
                let points = self.store.recorded_points();
                let slot = self.store.end_recording().ok_or(ArmError::NotRecording)?;
                Ok(ResponseLine::ok(format_args!("RECORDED:{}:{}", slot, points)))
            }
            Command::PlaySequence(slot) => {
                if self.store.is_recording() || self.teach.is_active() {
                    return Err(ArmError::Busy);
                }
                self.playback.start(
                    usize::from(slot),
                    &self.store,
                    &self.motion,
                    &self.arm,
                    now_ms,
                )?;
                Ok(ResponseLine::ok(format_args!("PLAYING:{}", slot)))
            }
            Command::ListSequences => Ok(ResponseLine::sequences(self.store.list())),
            Command::DeleteSequence(slot) => {
                let index = usize::from(slot);
                if self.store.recording_slot() == Some(index) || self.playback.is_playing_slot(index)
                {
                    return Err(ArmError::Busy);
                }
                self.store.erase(index)?;
                Ok(ResponseLine::ok(format_args!("DELETED:{}", slot)))
            }
            Command::Choreography(choreography) => self.play_choreography(choreography, now_ms),
            Command::TeachStart => {
                self.teach.start(
                    &mut self.input,
                    &self.motion,
                    &self.playback,
                    &self.arm,
                    now_ms,
                )?;
                Ok(ResponseLine::ok(format_args!("TEACHING")))
            }
            Command::TeachStop => self.stop_teaching(),
            Command::ReadPositions => {
                let readings = self.input.read_all()?;
                Ok(ResponseLine::readings(&readings))
            }
        }
    }

    fn move_joint(&mut self, joint: u16, angle: i32, now_ms: u32) -> Result<ResponseLine, ArmError> {
        let index = usize::from(joint)
            .checked_sub(1)
            .filter(|&j| j < JOINT_COUNT)
            .ok_or(ArmError::InvalidJoint)?;
        let target = self.arm.joints().check(index, angle)?;
        self.ensure_joints_free()?;
        let recording = self.store.is_recording();
        if recording {
            self.store.ensure_room()?;
        }

        self.motion.request_move(&self.arm, index, target, now_ms)?;

        if recording {
            self.record_planned_pose()?;
        }
        Ok(ResponseLine::ok(format_args!("J{}:{}", joint, target)))
    }

    fn move_to_pose(&mut self, pose: &Pose, now_ms: u32) -> Result<(), ArmError> {
        self.ensure_joints_free()?;
        let recording = self.store.is_recording();
        if recording {
            self.store.ensure_room()?;
        }

        self.motion.request_pose(&self.arm, pose, now_ms)?;

        if recording {
            self.record_planned_pose()?;
        }
        Ok(())
    }

    /// Append the pose the arm is heading to into the recording
    fn record_planned_pose(&mut self) -> Result<(), ArmError> {
        let planned = self.motion.planned_pose(&self.arm.joints().pose());
        self.store
            .append_point(planned, self.motion.step_interval_ms())
    }

    /// End the teach session; while recording, the taught pose becomes a point
    ///
    /// The session ends even when the recording has no room left.
    fn stop_teaching(&mut self) -> Result<ResponseLine, ArmError> {
        self.teach.stop()?;
        if self.store.is_recording() {
            let pose = self.pose();
            let delay_ms = self.motion.step_interval_ms();
            self.store.append_point(pose, delay_ms)?;
        }
        Ok(ResponseLine::ok(format_args!("TEACH_STOP")))
    }

    fn play_choreography(
        &mut self,
        choreography: Choreography,
        now_ms: u32,
    ) -> Result<ResponseLine, ArmError> {
        if self.store.is_recording() || self.teach.is_active() {
            return Err(ArmError::Busy);
        }
        self.playback
            .start_choreography(choreography, &self.motion, &self.arm, now_ms)?;
        Ok(ResponseLine::ok(format_args!("{}", choreography.keyword())))
    }
}
