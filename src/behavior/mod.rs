//! Motion-execution behavior for Beeline
//!
//! This module implements the cyclic, time-bounded state machine that moves
//! the base along a fixed heading at constant speed:
//! - `start` validates and arms a motion command
//! - `step` runs one control cycle: deadline check, pose fetch, distance
//!   update, goal check, forward collision simulation, command emission
//! - `cancel` halts the base and terminates the behavior cooperatively
//!
//! Every terminal transition halts the robot before the status is returned.

mod simulator;
mod tracker;
mod validator;

use std::time::Duration;

use log::{error, info, warn};

use crate::geometry::{Target, Velocity};
use crate::interfaces::{Clock, CollisionChecker, PoseSource, VelocitySink};
use crate::BehaviorConfig;

pub use simulator::ForwardCollisionSimulator;
pub use tracker::PoseTracker;
pub use validator::GoalValidator;

/// Lifecycle status of the behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// A motion command is armed and being executed
    Running,
    /// The commanded distance was covered
    Succeeded,
    /// The behavior terminated without covering the commanded distance
    Failed,
}

/// Reason attached to a result; exactly one per failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// No specific reason: success, still running, or a generic failure
    /// such as a deadline overrun or a preempted command
    None,
    /// The goal was malformed: motion requested off the configured axis
    InvalidInput,
    /// The current robot pose could not be resolved
    TfError,
    /// The forward simulation predicted a collision within the horizon
    CollisionAhead,
    /// Reserved for invokers that classify deadline overruns themselves;
    /// the cycle itself reports overruns as a generic failure with `None`
    Timeout,
}

/// Status and reason pair returned by `start` and `cancel`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResultStatus {
    /// Lifecycle status after the call
    pub status: Status,
    /// Failure reason, `None` unless `status` is `Failed`
    pub reason: FailureReason,
}

/// Distance report produced on every running control cycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeedbackSample {
    /// Planar displacement from the starting pose (meters)
    pub distance_traveled: f64,
}

/// Outcome of one control cycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepResult {
    /// Lifecycle status after the cycle
    pub status: Status,
    /// Failure reason, `None` unless `status` is `Failed`
    pub reason: FailureReason,
    /// Feedback for the invoker; present on every cycle that resolved a pose
    pub feedback: Option<FeedbackSample>,
}

/// Goal parameters for one motion behavior
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionCommand {
    /// Requested displacement; only the configured axis component may be
    /// nonzero
    pub target: Target,
    /// Commanded speed along the axis (m/s, signed)
    pub speed: f64,
    /// Wall-clock budget for the move; zero disables the deadline
    pub time_allowance: Duration,
}

impl MotionCommand {
    /// Command moving along the base's x axis
    pub fn forward(distance: f64, speed: f64, time_allowance: Duration) -> Self {
        MotionCommand {
            target: Target::new(distance, 0.0, 0.0),
            speed,
            time_allowance,
        }
    }

    /// Command moving along the base's y axis
    pub fn lateral(distance: f64, speed: f64, time_allowance: Duration) -> Self {
        MotionCommand {
            target: Target::new(0.0, distance, 0.0),
            speed,
            time_allowance,
        }
    }
}

/// The translational axis a cycle drives along. Selects the travel component
/// of the target, names the components that must stay zero, and shapes the
/// candidate velocity command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionAxis {
    /// Drive along the base's x axis
    Forward,
    /// Strafe along the base's y axis
    Lateral,
}

impl MotionAxis {
    /// Short axis name used in log messages
    pub fn label(&self) -> &'static str {
        match self {
            MotionAxis::Forward => "x",
            MotionAxis::Lateral => "y",
        }
    }

    /// Signed travel distance selected from a target vector
    pub fn travel_component(&self, target: &Target) -> f64 {
        match self {
            MotionAxis::Forward => target.x,
            MotionAxis::Lateral => target.y,
        }
    }

    /// The two target components that must be zero for a valid command
    pub fn off_axis_components(&self, target: &Target) -> [f64; 2] {
        match self {
            MotionAxis::Forward => [target.y, target.z],
            MotionAxis::Lateral => [target.x, target.z],
        }
    }

    /// Candidate command: `speed` on this axis, zero everywhere else
    pub fn candidate_velocity(&self, speed: f64) -> Velocity {
        let mut command = Velocity::stop();
        match self {
            MotionAxis::Forward => command.linear_x = speed,
            MotionAxis::Lateral => command.linear_y = speed,
        }
        command
    }

    /// The driven component of a velocity command
    pub fn velocity_component(&self, command: &Velocity) -> f64 {
        match self {
            MotionAxis::Forward => command.linear_x,
            MotionAxis::Lateral => command.linear_y,
        }
    }
}

// Single owned mutable record for one armed command. Created by `start`,
// updated once per cycle, dropped on any terminal transition.
#[derive(Clone, Copy, Debug)]
struct BehaviorState {
    tracker: PoseTracker,
    travel: f64,
    speed: f64,
    time_allowance: Duration,
    deadline: Duration,
    elapsed_distance: f64,
}

/// Tick-driven motion behavior. One external scheduler calls [`step`]
/// at the configured control frequency until a terminal status comes back;
/// the cycle owns its collaborators for the lifetime of the behavior.
///
/// [`step`]: MotionCycle::step
pub struct MotionCycle<P, V, C, K>
where
    P: PoseSource,
    V: VelocitySink,
    C: CollisionChecker,
    K: Clock,
{
    axis: MotionAxis,
    validator: GoalValidator,
    simulator: ForwardCollisionSimulator,
    pose_source: P,
    velocity_sink: V,
    collision_checker: C,
    clock: K,
    state: Option<BehaviorState>,
}

impl<P, V, C, K> MotionCycle<P, V, C, K>
where
    P: PoseSource,
    V: VelocitySink,
    C: CollisionChecker,
    K: Clock,
{
    /// Creates an idle cycle from its configuration and collaborators
    pub fn new(
        config: &BehaviorConfig,
        axis: MotionAxis,
        pose_source: P,
        velocity_sink: V,
        collision_checker: C,
        clock: K,
    ) -> Self {
        MotionCycle {
            axis,
            validator: GoalValidator::new(axis),
            simulator: ForwardCollisionSimulator::new(axis, config),
            pose_source,
            velocity_sink,
            collision_checker,
            clock,
            state: None,
        }
    }

    /// True while a motion command is armed and not yet terminal
    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    /// Arms a motion command. Supersedes any previous behavior state. On
    /// success the cycle is `Running` and [`step`] may be called; on failure
    /// the command is rejected before any motion.
    ///
    /// [`step`]: MotionCycle::step
    pub fn start(&mut self, command: MotionCommand) -> ResultStatus {
        self.state = None;

        if let Err(reason) = self.validator.validate(&command) {
            return ResultStatus {
                status: Status::Failed,
                reason,
            };
        }

        let travel = self.axis.travel_component(&command.target);
        let deadline = self.clock.now() + command.time_allowance;

        let initial_pose = match self.pose_source.current_pose() {
            Ok(pose) => pose,
            Err(err) => {
                error!("Initial robot pose is not available: {}", err);
                return ResultStatus {
                    status: Status::Failed,
                    reason: FailureReason::TfError,
                };
            }
        };

        info!(
            "Starting {:.2} m move along the {} axis at {:.2} m/s",
            travel,
            self.axis.label(),
            command.speed
        );

        self.state = Some(BehaviorState {
            tracker: PoseTracker::new(initial_pose),
            travel,
            speed: command.speed,
            time_allowance: command.time_allowance,
            deadline,
            elapsed_distance: 0.0,
        });

        ResultStatus {
            status: Status::Running,
            reason: FailureReason::None,
        }
    }

    /// Runs one control cycle. Performs at most one pose resolution and one
    /// simulation pass, and publishes exactly one command: the candidate
    /// velocity while running, a stop on any terminal transition.
    pub fn step(&mut self) -> StepResult {
        let Some(mut state) = self.state else {
            warn!("step() called with no active motion command");
            return StepResult {
                status: Status::Failed,
                reason: FailureReason::InvalidInput,
                feedback: None,
            };
        };

        // Deadline first: on a cycle where both the deadline and a pose
        // failure hold, the generic timeout failure is the one reported.
        let now = self.clock.now();
        if now > state.deadline && !state.time_allowance.is_zero() {
            warn!("Exceeded time allowance before reaching the goal - halting");
            return self.finish(Status::Failed, FailureReason::None, None);
        }

        let current_pose = match self.pose_source.current_pose() {
            Ok(pose) => pose,
            Err(err) => {
                error!("Current robot pose is not available: {}", err);
                return self.finish(Status::Failed, FailureReason::TfError, None);
            }
        };

        state.elapsed_distance = state.tracker.distance_traveled(&current_pose);
        let feedback = FeedbackSample {
            distance_traveled: state.elapsed_distance,
        };

        if state.elapsed_distance >= state.travel.abs() {
            info!("Goal reached after {:.2} m", state.elapsed_distance);
            return self.finish(Status::Succeeded, FailureReason::None, Some(feedback));
        }

        let candidate = self.axis.candidate_velocity(state.speed);

        let free = self.simulator.is_collision_free(
            &mut self.collision_checker,
            state.travel.abs(),
            state.elapsed_distance,
            &candidate,
            &current_pose,
        );
        if !free {
            warn!("Collision ahead - halting");
            return self.finish(Status::Failed, FailureReason::CollisionAhead, Some(feedback));
        }

        self.state = Some(state);
        self.velocity_sink.publish(&candidate);

        StepResult {
            status: Status::Running,
            reason: FailureReason::None,
            feedback: Some(feedback),
        }
    }

    /// Cooperative cancellation: halts the base, drops the behavior state,
    /// and reports a generic failure. Safe to call when idle.
    pub fn cancel(&mut self) -> ResultStatus {
        if self.state.is_some() {
            info!("Motion command canceled - halting");
            self.velocity_sink.publish(&Velocity::stop());
            self.state = None;
        }
        ResultStatus {
            status: Status::Failed,
            reason: FailureReason::None,
        }
    }

    // Terminal transition: halt unconditionally, drop the state, report.
    fn finish(
        &mut self,
        status: Status,
        reason: FailureReason,
        feedback: Option<FeedbackSample>,
    ) -> StepResult {
        self.velocity_sink.publish(&Velocity::stop());
        self.state = None;
        StepResult {
            status,
            reason,
            feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Pose2D;
    use crate::interfaces::{
        MockClock, MockCollisionChecker, MockPoseSource, MockVelocitySink, PoseError,
    };

    fn config() -> BehaviorConfig {
        BehaviorConfig {
            cycle_frequency: 10.0,
            simulate_ahead_time: 2.0,
        }
    }

    fn clock_at(seconds: f64) -> MockClock {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .return_const(Duration::from_secs_f64(seconds));
        clock
    }

    #[test]
    fn off_axis_target_is_rejected_without_resolving_a_pose() {
        let mut pose_source = MockPoseSource::new();
        pose_source.expect_current_pose().times(0);
        let mut sink = MockVelocitySink::new();
        sink.expect_publish().times(0);

        let mut cycle = MotionCycle::new(
            &config(),
            MotionAxis::Lateral,
            pose_source,
            sink,
            MockCollisionChecker::new(),
            clock_at(0.0),
        );

        let result = cycle.start(MotionCommand {
            target: Target::new(0.3, 1.0, 0.0),
            speed: 0.2,
            time_allowance: Duration::from_secs(10),
        });

        assert_eq!(result.status, Status::Failed);
        assert_eq!(result.reason, FailureReason::InvalidInput);
        assert!(!cycle.is_running());
    }

    #[test]
    fn start_fails_with_tf_error_when_pose_is_unavailable() {
        let mut pose_source = MockPoseSource::new();
        pose_source
            .expect_current_pose()
            .times(1)
            .returning(|| Err(PoseError::Unavailable("tf tree not ready".into())));

        let mut cycle = MotionCycle::new(
            &config(),
            MotionAxis::Lateral,
            pose_source,
            MockVelocitySink::new(),
            MockCollisionChecker::new(),
            clock_at(0.0),
        );

        let result = cycle.start(MotionCommand::lateral(1.0, 0.2, Duration::from_secs(5)));
        assert_eq!(result.status, Status::Failed);
        assert_eq!(result.reason, FailureReason::TfError);
    }

    #[test]
    fn deadline_overrun_is_reported_before_pose_resolution() {
        let mut pose_source = MockPoseSource::new();
        // start resolves one pose; the late step must not resolve another
        pose_source
            .expect_current_pose()
            .times(1)
            .returning(|| Ok(Pose2D::new(0.0, 0.0, 0.0)));
        let mut sink = MockVelocitySink::new();
        sink.expect_publish()
            .withf(|command: &Velocity| command.is_stop())
            .times(1)
            .return_const(());

        let mut clock = MockClock::new();
        let mut calls = 0u32;
        clock.expect_now().returning(move || {
            calls += 1;
            if calls == 1 {
                Duration::from_secs(0)
            } else {
                Duration::from_secs(6)
            }
        });

        let mut cycle = MotionCycle::new(
            &config(),
            MotionAxis::Lateral,
            pose_source,
            sink,
            MockCollisionChecker::new(),
            clock,
        );

        let started = cycle.start(MotionCommand::lateral(1.0, 0.2, Duration::from_secs(5)));
        assert_eq!(started.status, Status::Running);

        let outcome = cycle.step();
        assert_eq!(outcome.status, Status::Failed);
        assert_eq!(outcome.reason, FailureReason::None);
        assert!(outcome.feedback.is_none());
        assert!(!cycle.is_running());
    }

    #[test]
    fn zero_time_allowance_disables_the_deadline() {
        let mut pose_source = MockPoseSource::new();
        pose_source
            .expect_current_pose()
            .returning(|| Ok(Pose2D::new(0.0, 0.0, 0.0)));
        let mut sink = MockVelocitySink::new();
        sink.expect_publish()
            .withf(|command: &Velocity| !command.is_stop())
            .times(1)
            .return_const(());
        let mut checker = MockCollisionChecker::new();
        checker.expect_is_collision_free().returning(|_, _| true);

        // An hour past start with a zero allowance: still running.
        let mut cycle = MotionCycle::new(
            &config(),
            MotionAxis::Lateral,
            pose_source,
            sink,
            checker,
            clock_at(3600.0),
        );

        cycle.start(MotionCommand::lateral(1.0, 0.2, Duration::ZERO));
        let outcome = cycle.step();
        assert_eq!(outcome.status, Status::Running);
    }

    #[test]
    fn step_fails_with_tf_error_and_halts_when_pose_is_lost() {
        let mut pose_source = MockPoseSource::new();
        let mut calls = 0u32;
        pose_source.expect_current_pose().returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(Pose2D::new(0.0, 0.0, 0.0))
            } else {
                Err(PoseError::Unavailable("transform expired".into()))
            }
        });
        let mut sink = MockVelocitySink::new();
        sink.expect_publish()
            .withf(|command: &Velocity| command.is_stop())
            .times(1)
            .return_const(());

        let mut cycle = MotionCycle::new(
            &config(),
            MotionAxis::Lateral,
            pose_source,
            sink,
            MockCollisionChecker::new(),
            clock_at(0.0),
        );

        cycle.start(MotionCommand::lateral(1.0, 0.2, Duration::from_secs(10)));
        let outcome = cycle.step();
        assert_eq!(outcome.status, Status::Failed);
        assert_eq!(outcome.reason, FailureReason::TfError);
    }

    #[test]
    fn collision_veto_halts_instead_of_publishing_the_candidate() {
        let mut pose_source = MockPoseSource::new();
        pose_source
            .expect_current_pose()
            .returning(|| Ok(Pose2D::new(0.0, 0.0, 0.0)));
        let mut sink = MockVelocitySink::new();
        // The only publish this step is the halt; the candidate never goes out.
        sink.expect_publish()
            .withf(|command: &Velocity| command.is_stop())
            .times(1)
            .return_const(());
        let mut checker = MockCollisionChecker::new();
        checker
            .expect_is_collision_free()
            .times(1)
            .returning(|_, _| false);

        let mut cycle = MotionCycle::new(
            &config(),
            MotionAxis::Lateral,
            pose_source,
            sink,
            checker,
            clock_at(0.0),
        );

        cycle.start(MotionCommand::lateral(2.0, 0.5, Duration::from_secs(10)));
        let outcome = cycle.step();
        assert_eq!(outcome.status, Status::Failed);
        assert_eq!(outcome.reason, FailureReason::CollisionAhead);
        assert!(outcome.feedback.is_some());
    }

    #[test]
    fn zero_distance_goal_succeeds_on_the_first_step() {
        let mut pose_source = MockPoseSource::new();
        pose_source
            .expect_current_pose()
            .returning(|| Ok(Pose2D::new(1.0, 2.0, 0.5)));
        let mut sink = MockVelocitySink::new();
        sink.expect_publish()
            .withf(|command: &Velocity| command.is_stop())
            .times(1)
            .return_const(());

        let mut cycle = MotionCycle::new(
            &config(),
            MotionAxis::Lateral,
            pose_source,
            sink,
            MockCollisionChecker::new(),
            clock_at(0.0),
        );

        cycle.start(MotionCommand::lateral(0.0, 0.2, Duration::from_secs(10)));
        let outcome = cycle.step();
        assert_eq!(outcome.status, Status::Succeeded);
        assert_eq!(outcome.reason, FailureReason::None);
        assert_eq!(
            outcome.feedback,
            Some(FeedbackSample {
                distance_traveled: 0.0
            })
        );
    }

    #[test]
    fn step_without_start_is_rejected() {
        let mut pose_source = MockPoseSource::new();
        pose_source.expect_current_pose().times(0);
        let mut sink = MockVelocitySink::new();
        sink.expect_publish().times(0);

        let mut cycle = MotionCycle::new(
            &config(),
            MotionAxis::Forward,
            pose_source,
            sink,
            MockCollisionChecker::new(),
            clock_at(0.0),
        );

        let outcome = cycle.step();
        assert_eq!(outcome.status, Status::Failed);
        assert_eq!(outcome.reason, FailureReason::InvalidInput);
    }

    #[test]
    fn cancel_halts_a_running_behavior() {
        let mut pose_source = MockPoseSource::new();
        pose_source
            .expect_current_pose()
            .returning(|| Ok(Pose2D::new(0.0, 0.0, 0.0)));
        let mut sink = MockVelocitySink::new();
        sink.expect_publish()
            .withf(|command: &Velocity| command.is_stop())
            .times(1)
            .return_const(());

        let mut cycle = MotionCycle::new(
            &config(),
            MotionAxis::Lateral,
            pose_source,
            sink,
            MockCollisionChecker::new(),
            clock_at(0.0),
        );

        cycle.start(MotionCommand::lateral(1.0, 0.2, Duration::from_secs(10)));
        let result = cycle.cancel();
        assert_eq!(result.status, Status::Failed);
        assert_eq!(result.reason, FailureReason::None);
        assert!(!cycle.is_running());
    }
}
