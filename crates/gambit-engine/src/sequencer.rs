//! The transfer choreography state machine.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use gambit_board::{BoardMapper, PieceMove, Point};
use gambit_config::{GambitConfig, MotionProfile, PresetPoses};
use gambit_link::{CancelToken, Channel, LinkError, ResponseWaiter};
use gambit_protocol::{GripperAction, GripperDrive, Pose, encode_gripper, encode_pose};

use crate::report::{StepReport, TransferReport};
use crate::{SequenceError, SequenceResult};

/// One step of the transfer choreography.
///
/// The same variant can occur more than once in a sequence (parking happens
/// on the way to the pick and again on the way to the place).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferStep {
    /// Open the jaws.
    GripperOpen,
    /// Close the jaws.
    GripperClose,
    /// Move to the parking pose, clear of the board.
    Park,
    /// Travel at cruise height over the start square.
    TravelAboveStart,
    /// Descend onto the start square.
    DescendToStart,
    /// Lift away from the start square.
    LiftFromStart,
    /// Travel at cruise height over the end square.
    TravelAboveEnd,
    /// Descend onto the end square.
    DescendToEnd,
    /// Lift away from the end square.
    LiftFromEnd,
    /// Return to the home pose.
    Home,
}

impl TransferStep {
    /// The full choreography, in execution order.
    pub const CHOREOGRAPHY: [TransferStep; 13] = [
        TransferStep::GripperOpen,
        TransferStep::Park,
        TransferStep::TravelAboveStart,
        TransferStep::DescendToStart,
        TransferStep::GripperClose,
        TransferStep::LiftFromStart,
        TransferStep::Park,
        TransferStep::TravelAboveEnd,
        TransferStep::DescendToEnd,
        TransferStep::GripperOpen,
        TransferStep::LiftFromEnd,
        TransferStep::Home,
        TransferStep::GripperClose,
    ];

    /// Stable kebab-case label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            TransferStep::GripperOpen => "gripper-open",
            TransferStep::GripperClose => "gripper-close",
            TransferStep::Park => "parking-pose",
            TransferStep::TravelAboveStart => "travel-above-start",
            TransferStep::DescendToStart => "descend-to-start",
            TransferStep::LiftFromStart => "lift-from-start",
            TransferStep::TravelAboveEnd => "travel-above-end",
            TransferStep::DescendToEnd => "descend-to-end",
            TransferStep::LiftFromEnd => "lift-from-end",
            TransferStep::Home => "home-pose",
        }
    }

    /// Whether this step drives the gripper link rather than the arm.
    pub fn is_gripper(&self) -> bool {
        matches!(self, TransferStep::GripperOpen | TransferStep::GripperClose)
    }
}

impl fmt::Display for TransferStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

enum Height {
    Travel,
    Contact,
}

/// Drives one full piece transfer over the two device links.
///
/// Owns both channels exclusively; a single sequencer supports one
/// choreography in flight at a time and is driven from one thread.
pub struct MotionSequencer<A: Channel, G: Channel> {
    arm: A,
    gripper: G,
    mapper: BoardMapper,
    waiter: ResponseWaiter,
    profile: MotionProfile,
    poses: PresetPoses,
    drive: GripperDrive,
    gripper_settle: Duration,
    cancel: CancelToken,
    in_flight: bool,
}

impl<A: Channel, G: Channel> MotionSequencer<A, G> {
    /// Builds a sequencer from already-open channels and a validated
    /// configuration.
    pub fn new(
        arm: A,
        gripper: G,
        config: &GambitConfig,
        cancel: CancelToken,
    ) -> SequenceResult<Self> {
        let mapper = BoardMapper::new(config.board.clone())?;
        Ok(Self {
            arm,
            gripper,
            mapper,
            waiter: ResponseWaiter::new(
                config.response.poll_interval(),
                config.response.ack_timeout(),
            ),
            profile: config.motion.clone(),
            poses: config.poses.clone(),
            drive: config.gripper_drive,
            gripper_settle: config.response.gripper_settle(),
            cancel,
            in_flight: false,
        })
    }

    /// Executes one full transfer choreography.
    ///
    /// Both squares are mapped before anything is written, so a rejected
    /// move has zero hardware side effects.
    pub fn transfer(&mut self, mv: &PieceMove) -> SequenceResult<TransferReport> {
        if self.in_flight {
            return Err(SequenceError::Busy);
        }
        let from = self.mapper.coordinate_for(mv.from)?;
        let to = self.mapper.coordinate_for(mv.to)?;
        info!(
            %mv,
            from_x = from.x,
            from_y = from.y,
            to_x = to.x,
            to_y = to.y,
            "starting piece transfer"
        );

        self.in_flight = true;
        let result = self.run(mv, from, to);
        self.in_flight = false;
        result
    }

    fn run(&mut self, mv: &PieceMove, from: Point, to: Point) -> SequenceResult<TransferReport> {
        let started = Instant::now();
        let mut steps = Vec::with_capacity(TransferStep::CHOREOGRAPHY.len());
        for step in TransferStep::CHOREOGRAPHY {
            if self.cancel.is_cancelled() {
                return Err(SequenceError::Cancelled { step });
            }
            let step_started = Instant::now();
            let acknowledged = self.execute_step(step, from, to)?;
            steps.push(StepReport {
                step,
                elapsed_ms: step_started.elapsed().as_millis() as u64,
                acknowledged,
            });
        }
        let report = TransferReport {
            notation: mv.to_string(),
            total_ms: started.elapsed().as_millis() as u64,
            steps,
        };
        info!(
            %mv,
            total_ms = report.total_ms,
            unacknowledged = report.unacknowledged(),
            "transfer complete"
        );
        Ok(report)
    }

    fn execute_step(
        &mut self,
        step: TransferStep,
        from: Point,
        to: Point,
    ) -> SequenceResult<Option<bool>> {
        match step {
            TransferStep::GripperOpen => self.gripper_step(step, GripperAction::Open),
            TransferStep::GripperClose => self.gripper_step(step, GripperAction::Close),
            TransferStep::Park => self.preset_step(step),
            TransferStep::Home => self.preset_step(step),
            TransferStep::TravelAboveStart => {
                self.pose_step(step, from, Height::Travel, self.profile.travel_speed)
            }
            TransferStep::DescendToStart => {
                self.pose_step(step, from, Height::Contact, self.profile.approach_speed)
            }
            TransferStep::LiftFromStart => {
                self.pose_step(step, from, Height::Travel, self.profile.lift_speed)
            }
            TransferStep::TravelAboveEnd => {
                self.pose_step(step, to, Height::Travel, self.profile.travel_speed)
            }
            TransferStep::DescendToEnd => {
                self.pose_step(step, to, Height::Contact, self.profile.approach_speed)
            }
            TransferStep::LiftFromEnd => {
                self.pose_step(step, to, Height::Travel, self.profile.lift_speed)
            }
        }
    }

    fn pose_step(
        &mut self,
        step: TransferStep,
        at: Point,
        height: Height,
        speed: u8,
    ) -> SequenceResult<Option<bool>> {
        let z = match height {
            Height::Travel => self.profile.travel_height,
            Height::Contact => self.profile.contact_height,
        };
        let line = encode_pose(&Pose {
            x: at.x,
            y: at.y,
            z,
            speed,
        });
        self.arm_command(step, line.as_bytes())
    }

    fn preset_step(&mut self, step: TransferStep) -> SequenceResult<Option<bool>> {
        let preset = match step {
            TransferStep::Home => &self.poses.home,
            _ => &self.poses.parking,
        };
        let line = format!("{preset}\n");
        self.arm_command(step, line.as_bytes())
    }

    fn arm_command(&mut self, step: TransferStep, line: &[u8]) -> SequenceResult<Option<bool>> {
        debug!(step = %step, "arm command");
        self.arm
            .send(line)
            .map_err(|source| SequenceError::Link { step, source })?;
        match self.waiter.await_response(&mut self.arm, &self.cancel) {
            Ok(outcome) => Ok(Some(outcome.is_acknowledged())),
            Err(LinkError::Cancelled { .. }) => Err(SequenceError::Cancelled { step }),
            Err(source) => Err(SequenceError::Link { step, source }),
        }
    }

    fn gripper_step(
        &mut self,
        step: TransferStep,
        action: GripperAction,
    ) -> SequenceResult<Option<bool>> {
        debug!(step = %step, action = %action, "gripper command");
        let bytes = encode_gripper(action, &self.drive);
        self.gripper
            .send(&bytes)
            .map_err(|source| SequenceError::Link { step, source })?;
        // The gripper never reports back; a fixed settle stands in for its
        // acknowledgment.
        thread::sleep(self.gripper_settle);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gambit_test_helpers::MockChannel;

    fn test_config() -> GambitConfig {
        let mut config = GambitConfig::default();
        config.response.ack_timeout_ms = 20;
        config.response.poll_interval_ms = 1;
        config.response.gripper_settle_ms = 0;
        config
    }

    #[test]
    fn choreography_is_thirteen_steps_bracketed_by_gripper_commands() {
        let steps = TransferStep::CHOREOGRAPHY;
        assert_eq!(steps.len(), 13);
        assert_eq!(steps[0], TransferStep::GripperOpen);
        assert_eq!(steps[12], TransferStep::GripperClose);
        assert_eq!(steps.iter().filter(|s| s.is_gripper()).count(), 4);
    }

    #[test]
    fn busy_guard_rejects_reentry() {
        let mut seq = MotionSequencer::new(
            MockChannel::acknowledging("arm"),
            MockChannel::silent("gripper"),
            &test_config(),
            CancelToken::new(),
        )
        .expect("valid config");
        seq.in_flight = true;
        let mv: PieceMove = "e2e4".parse().expect("valid move");
        assert!(matches!(seq.transfer(&mv), Err(SequenceError::Busy)));
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(TransferStep::Park.label(), "parking-pose");
        assert_eq!(TransferStep::Home.label(), "home-pose");
        assert_eq!(TransferStep::GripperOpen.to_string(), "gripper-open");
    }
}
